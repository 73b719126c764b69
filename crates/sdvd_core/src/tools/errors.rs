//! Error types for external tool invocation.

use std::io;

use thiserror::Error;

/// Failure of a single external tool invocation.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The program could not be resolved in the environment it was run in.
    #[error("{tool} was not found")]
    NotFound { tool: String },

    /// The program was missing natively and the fallback shell could not be started.
    #[error("{tool} was not found and the fallback shell {shell} is not available")]
    FallbackUnavailable { tool: String, shell: String },

    /// The program ran and exited non-zero.
    #[error("{tool} failed with exit code {exit_code}{}", diagnostic_suffix(.diagnostic))]
    ExecutionFailed {
        tool: String,
        exit_code: i32,
        diagnostic: Option<String>,
    },

    /// The program exists but could not be started.
    #[error("Failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// Writing an input file for the attempt failed.
    #[error("Failed to prepare inputs for {tool}: {source}")]
    Prepare {
        tool: String,
        #[source]
        source: io::Error,
    },
}

fn diagnostic_suffix(diagnostic: &Option<String>) -> String {
    match diagnostic {
        Some(text) if !text.is_empty() => format!(": {}", text),
        _ => String::new(),
    }
}

impl ToolError {
    pub fn not_found(tool: impl Into<String>) -> Self {
        Self::NotFound { tool: tool.into() }
    }

    pub fn fallback_unavailable(tool: impl Into<String>, shell: impl Into<String>) -> Self {
        Self::FallbackUnavailable {
            tool: tool.into(),
            shell: shell.into(),
        }
    }

    pub fn execution_failed(
        tool: impl Into<String>,
        exit_code: i32,
        diagnostic: Option<String>,
    ) -> Self {
        Self::ExecutionFailed {
            tool: tool.into(),
            exit_code,
            diagnostic,
        }
    }

    pub fn spawn(tool: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            tool: tool.into(),
            source,
        }
    }

    pub fn prepare(tool: impl Into<String>, source: io::Error) -> Self {
        Self::Prepare {
            tool: tool.into(),
            source,
        }
    }

    /// True for the resolution failure that may trigger a fallback.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Name of the program involved.
    pub fn tool(&self) -> &str {
        match self {
            Self::NotFound { tool }
            | Self::FallbackUnavailable { tool, .. }
            | Self::ExecutionFailed { tool, .. }
            | Self::Spawn { tool, .. }
            | Self::Prepare { tool, .. } => tool,
        }
    }
}

/// Result type for tool invocations.
pub type ToolResult<T> = Result<T, ToolError>;
