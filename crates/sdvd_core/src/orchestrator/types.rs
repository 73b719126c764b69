//! Core types for the orchestrator pipeline.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::logging::JobLogger;
use crate::models::Job;
use crate::tools::{StageResult, ToolInvoker};
use crate::workspace::WorkspaceLayout;

/// Progress callback type for reporting pipeline progress.
///
/// Arguments: (step_name, percent_complete, message)
pub type ProgressCallback = Box<dyn Fn(&str, u32, &str) + Send + Sync>;

/// Read-only context passed to pipeline steps.
///
/// Contains job configuration and shared resources that steps can read
/// but not modify. Mutable state goes in `JobState`.
pub struct Context {
    /// The request being processed.
    pub job: Job,
    /// Application settings.
    pub settings: Settings,
    /// Job name/identifier.
    pub job_name: String,
    /// Artifact locations inside the workspace.
    pub layout: WorkspaceLayout,
    /// Where the mastering stage writes the disc image.
    pub image_path: PathBuf,
    /// Per-job logger.
    pub logger: Arc<JobLogger>,
    /// Runs external tools, with fallback.
    pub invoker: ToolInvoker,
    progress_callback: Option<ProgressCallback>,
}

impl Context {
    pub fn new(
        job: Job,
        settings: Settings,
        layout: WorkspaceLayout,
        logger: Arc<JobLogger>,
        invoker: ToolInvoker,
    ) -> Self {
        let image_path = layout.image_path(job.iso_output());
        Self {
            job_name: job.name(),
            job,
            settings,
            layout,
            image_path,
            logger,
            invoker,
            progress_callback: None,
        }
    }

    /// Set the progress callback.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Report progress to callback (if set).
    pub fn report_progress(&self, step_name: &str, percent: u32, message: &str) {
        if let Some(ref callback) = self.progress_callback {
            callback(step_name, percent, message);
        }
    }
}

/// Where the job is in `Init → Transcoding → Authoring → Mastering →
/// Burning → Done`, with `Failed` reachable from any working phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobPhase {
    #[default]
    Init,
    Transcoding,
    Authoring,
    Mastering,
    Burning,
    Done,
    Failed,
}

impl JobPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Transcoding => "transcoding",
            Self::Authoring => "authoring",
            Self::Mastering => "mastering",
            Self::Burning => "burning",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Mutable job state that accumulates results from pipeline steps.
///
/// Write-once manifest: each stage records its own result and never
/// touches another stage's entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobState {
    /// Unique job identifier.
    pub job_id: String,
    /// When the job started.
    pub started_at: Option<String>,
    /// Current phase.
    pub phase: JobPhase,
    /// Phase that was active when the job failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_in: Option<JobPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcode: Option<StageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<StageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master: Option<StageResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burn: Option<StageResult>,
}

impl JobState {
    /// Create a new job state with the given ID.
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    /// Move to `phase`.
    pub fn enter(&mut self, phase: JobPhase) {
        self.phase = phase;
    }

    /// Move to `Failed`, remembering where it happened.
    pub fn fail(&mut self) {
        if self.phase != JobPhase::Failed {
            self.failed_in = Some(self.phase);
            self.phase = JobPhase::Failed;
        }
    }

    /// Stage results recorded so far, in pipeline order.
    pub fn stage_results(&self) -> impl Iterator<Item = &StageResult> {
        [&self.transcode, &self.author, &self.master, &self.burn]
            .into_iter()
            .flatten()
    }
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Step completed successfully.
    Success,
    /// Step was skipped (preconditions not met, but not an error).
    Skipped(String),
}
