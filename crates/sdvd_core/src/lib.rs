//! Simple DVD Creator core - turns a video file into a DVD image.
//!
//! Everything here is UI-free: the pipeline orchestrator, the external
//! tool invoker with its compatibility-shell fallback, the workspace, the
//! authoring descriptor, and optical drive discovery. The `simple-dvd`
//! binary drives it from the command line or an interactive form.

pub mod config;
pub mod descriptor;
pub mod drives;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod platform;
pub mod tools;
pub mod workspace;

use std::sync::Arc;

use config::Settings;
use models::Job;
use orchestrator::{JobReport, JobRunner, PipelineResult};
use tools::ProcessRunner;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Run one job with locations taken from `settings`.
pub fn run_job(
    job: &Job,
    settings: &Settings,
    runner: Arc<dyn ProcessRunner>,
) -> PipelineResult<JobReport> {
    JobRunner::new(settings.clone(), runner).run(job, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
