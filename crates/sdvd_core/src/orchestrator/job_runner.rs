//! Runs one job end to end: logger, workspace, pipeline, cleanup.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::{GuiLogCallback, JobLogger};
use crate::models::Job;
use crate::tools::{ProcessRunner, ShellFallback, ToolInvoker};
use crate::workspace::Workspace;

use super::errors::{PipelineError, PipelineResult};
use super::pipeline::{CancelHandle, Pipeline, PipelineRunResult};
use super::types::{Context, JobState, ProgressCallback};
use super::create_standard_pipeline;

/// Outcome of a successful job.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_name: String,
    /// Final manifest (phase `Done`).
    pub state: JobState,
    pub run: PipelineRunResult,
    /// Where the image was written.
    pub image_path: PathBuf,
    /// Whether the image is still on disk after cleanup.
    pub image_retained: bool,
    /// Per-job log file.
    pub log_path: PathBuf,
}

/// Runs jobs through the standard pipeline.
///
/// # Example
///
/// ```ignore
/// let runner = JobRunner::new(settings, Arc::new(SystemRunner::new()));
/// let report = runner.run(&job, None, None)?;
/// println!("Image: {}", report.image_path.display());
/// ```
pub struct JobRunner {
    settings: Settings,
    runner: Arc<dyn ProcessRunner>,
    workdir: PathBuf,
    log_dir: PathBuf,
    pipeline: Pipeline,
}

impl JobRunner {
    /// Workspace and log locations come from `settings.paths`.
    pub fn new(settings: Settings, runner: Arc<dyn ProcessRunner>) -> Self {
        let workdir = PathBuf::from(&settings.paths.workdir);
        let log_dir = PathBuf::from(&settings.paths.logs_folder);
        Self {
            settings,
            runner,
            workdir,
            log_dir,
            pipeline: create_standard_pipeline(),
        }
    }

    pub fn with_workdir(mut self, workdir: impl Into<PathBuf>) -> Self {
        self.workdir = workdir.into();
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.pipeline.cancel_handle()
    }

    /// Run `job` to completion.
    ///
    /// The workspace is released on every exit path. On failure the image
    /// is not retained inside the workspace.
    pub fn run(
        &self,
        job: &Job,
        gui_callback: Option<GuiLogCallback>,
        progress_callback: Option<ProgressCallback>,
    ) -> PipelineResult<JobReport> {
        let job_name = job.name();

        if !job.input().is_file() {
            return Err(PipelineError::validation_failed(
                &job_name,
                format!("Input file not found: {}", job.input().display()),
            ));
        }

        let logger = JobLogger::new(
            &job_name,
            &self.log_dir,
            self.settings.logging.log_config(),
            gui_callback,
        )
        .map(Arc::new)
        .map_err(|e| PipelineError::setup_failed(&job_name, format!("Failed to create logger: {}", e)))?;

        logger.info(&format!("Starting job: {}", job_name));
        logger.info(&format!("Input: {}", job.input().display()));
        if job.preview() {
            logger.warn("Preview is not supported; ignoring");
        }
        if job.burn_requested() && !job.will_burn() {
            logger.warn("Burn requested without a device; the burn stage will be skipped");
        }

        let mut workspace = Workspace::create(&self.workdir).map_err(|e| {
            logger.error(&e.to_string());
            PipelineError::setup_failed(&job_name, e.to_string())
        })?;
        logger.debug(&format!("Workspace: {}", workspace.root().display()));

        let layout = workspace.layout().clone();
        let image_path = layout.image_path(job.iso_output());
        if job.retains_image() {
            workspace.retain(&image_path);
        }
        if self.settings.paths.keep_workdir {
            workspace.keep();
        }

        let fallback = ShellFallback::from_settings(&self.settings.fallback);
        let invoker = ToolInvoker::new(Arc::clone(&self.runner), fallback, Arc::clone(&logger));

        let mut ctx = Context::new(
            job.clone(),
            self.settings.clone(),
            layout,
            Arc::clone(&logger),
            invoker,
        );
        if let Some(callback) = progress_callback {
            ctx = ctx.with_progress_callback(callback);
        }

        let job_id = format!("{}-{}", job_name, chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let mut state = JobState::new(job_id);

        let result = self.pipeline.run(&ctx, &mut state);

        if result.is_err() {
            workspace.clear_retained();
        }
        if let Err(e) = workspace.release() {
            logger.warn(&format!("Workspace cleanup failed: {}", e));
        }

        let run = match result {
            Ok(run) => run,
            Err(e) => {
                logger.error(&e.to_string());
                logger.flush();
                return Err(e);
            }
        };

        let image_retained = image_path.is_file();
        if image_retained {
            logger.success(&format!("Image: {}", image_path.display()));
        }
        logger.flush();

        Ok(JobReport {
            job_name,
            state,
            run,
            image_path,
            image_retained,
            log_path: logger.log_path().to_path_buf(),
        })
    }
}
