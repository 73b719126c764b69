//! Pipeline orchestrator for coordinating job execution.
//!
//! # Architecture
//!
//! ```text
//! JobRunner (workspace guard, logger, cleanup)
//!   └── Pipeline
//!         ├── Step: Transcode   (Init → Transcoding)
//!         ├── Step: Author      (→ Authoring)
//!         ├── Step: Master      (→ Mastering)
//!         └── Step: Burn        (→ Burning, skipped unless requested)
//! ```
//!
//! Any step failure moves the job to `Failed` and nothing after it runs.

mod errors;
mod job_runner;
mod pipeline;
mod step;
pub mod steps;
#[cfg(test)]
pub(crate) mod test_support;
mod types;

pub use errors::{ErrorKind, PipelineError, PipelineResult, StepError, StepResult};
pub use job_runner::{JobReport, JobRunner};
pub use pipeline::{CancelHandle, Pipeline, PipelineRunResult};
pub use step::PipelineStep;
pub use steps::{AuthorStep, BurnStep, MasterStep, TranscodeStep};
pub use types::{Context, JobPhase, JobState, ProgressCallback, StepOutcome};

/// Create the standard pipeline: transcode, author, master, burn.
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(TranscodeStep::new())
        .with_step(AuthorStep::new())
        .with_step(MasterStep::new())
        .with_step(BurnStep::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_pipeline_order() {
        let pipeline = create_standard_pipeline();
        assert_eq!(
            pipeline.step_names(),
            vec!["Transcode", "Author", "Master", "Burn"]
        );
    }
}
