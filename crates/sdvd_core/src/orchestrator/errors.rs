//! Error types for the orchestrator pipeline.
//!
//! Errors carry context that chains through layers:
//! Job → Step → Tool invocation → Detail

use std::io;

use thiserror::Error;

use crate::tools::ToolError;
use crate::workspace::WorkspaceError;

/// Coarse classification of a job failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A program could not be resolved (and no fallback applied).
    ToolNotFound,
    /// A program ran and exited non-zero, or could not be started.
    ToolExecutionFailed,
    /// Workspace or artifact filesystem failure.
    Filesystem,
    /// Inputs or outputs did not meet a stage's preconditions.
    Validation,
    /// The pipeline was cancelled between stages.
    Cancelled,
}

/// Top-level pipeline error with job context.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A step failed during execution.
    #[error("Job '{job_name}' failed at step '{step_name}': {source}")]
    StepFailed {
        job_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Input validation failed before pipeline started.
    #[error("Job '{job_name}' failed validation: {message}")]
    ValidationFailed { job_name: String, message: String },

    /// Pipeline was cancelled.
    #[error("Job '{job_name}' was cancelled")]
    Cancelled { job_name: String },

    /// Failed to set up job (workspace, logger).
    #[error("Job '{job_name}' setup failed: {message}")]
    SetupFailed { job_name: String, message: String },
}

impl PipelineError {
    pub fn step_failed(
        job_name: impl Into<String>,
        step_name: impl Into<String>,
        source: StepError,
    ) -> Self {
        Self::StepFailed {
            job_name: job_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    pub fn validation_failed(job_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            job_name: job_name.into(),
            message: message.into(),
        }
    }

    pub fn setup_failed(job_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            job_name: job_name.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(job_name: impl Into<String>) -> Self {
        Self::Cancelled {
            job_name: job_name.into(),
        }
    }

    /// Name of the stage that failed, if the failure happened inside one.
    pub fn failed_stage(&self) -> Option<&str> {
        match self {
            Self::StepFailed { step_name, .. } => Some(step_name),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StepFailed { source, .. } => source.kind(),
            Self::ValidationFailed { .. } => ErrorKind::Validation,
            Self::Cancelled { .. } => ErrorKind::Cancelled,
            Self::SetupFailed { .. } => ErrorKind::Filesystem,
        }
    }
}

/// Error from a pipeline step with operation context.
#[derive(Error, Debug)]
pub enum StepError {
    /// Output validation failed.
    #[error("Output validation failed: {0}")]
    InvalidOutput(String),

    /// An external tool failed.
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// File I/O error.
    #[error("I/O error in {operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    /// A required file was not found.
    #[error("Required file not found: {path}")]
    FileNotFound { path: String },

    /// A precondition was not met.
    #[error("Precondition not met: {0}")]
    PreconditionFailed(String),
}

impl StepError {
    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::PreconditionFailed(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Tool(ToolError::NotFound { .. } | ToolError::FallbackUnavailable { .. }) => {
                ErrorKind::ToolNotFound
            }
            Self::Tool(ToolError::ExecutionFailed { .. } | ToolError::Spawn { .. }) => {
                ErrorKind::ToolExecutionFailed
            }
            Self::Tool(ToolError::Prepare { .. })
            | Self::Workspace(_)
            | Self::IoError { .. }
            | Self::FileNotFound { .. } => ErrorKind::Filesystem,
            Self::InvalidOutput(_) | Self::PreconditionFailed(_) => {
                ErrorKind::Validation
            }
        }
    }
}

/// Result type for step operations.
pub type StepResult<T> = Result<T, StepError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_failure_displays_context() {
        let err = StepError::from(ToolError::execution_failed(
            "ffmpeg",
            1,
            Some("Invalid data found when processing input".to_string()),
        ));
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("Invalid data"));
        assert_eq!(err.kind(), ErrorKind::ToolExecutionFailed);
    }

    #[test]
    fn pipeline_error_names_failed_stage() {
        let step_err = StepError::from(ToolError::not_found("dvdauthor"));
        let pipeline_err = PipelineError::step_failed("holiday", "Author", step_err);

        let msg = pipeline_err.to_string();
        assert!(msg.contains("holiday"));
        assert!(msg.contains("Author"));
        assert_eq!(pipeline_err.failed_stage(), Some("Author"));
        assert_eq!(pipeline_err.kind(), ErrorKind::ToolNotFound);
    }

    #[test]
    fn non_stage_errors_have_no_stage() {
        let err = PipelineError::setup_failed("holiday", "permission denied");
        assert_eq!(err.failed_stage(), None);
        assert_eq!(err.kind(), ErrorKind::Filesystem);
        assert_eq!(PipelineError::cancelled("holiday").kind(), ErrorKind::Cancelled);
    }
}
