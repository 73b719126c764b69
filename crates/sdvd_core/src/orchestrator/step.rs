//! Pipeline step trait definition.

use super::errors::StepResult;
use super::types::{Context, JobPhase, JobState, StepOutcome};

/// Trait for pipeline steps.
///
/// The pipeline runner calls these methods in order:
///
/// 1. `validate_input` - Check preconditions before execution
/// 2. `execute` - Perform the step's work
/// 3. `validate_output` - Verify the step produced valid output
///
/// # Example
///
/// ```ignore
/// struct TranscodeStep;
///
/// impl PipelineStep for TranscodeStep {
///     fn name(&self) -> &str { "Transcode" }
///     fn phase(&self) -> JobPhase { JobPhase::Transcoding }
///
///     fn validate_input(&self, ctx: &Context) -> StepResult<()> {
///         if !ctx.job.input().is_file() {
///             return Err(StepError::file_not_found(ctx.job.input().display().to_string()));
///         }
///         Ok(())
///     }
///
///     fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
///         state.transcode = Some(ctx.invoker.invoke(&invocation, true)?);
///         Ok(StepOutcome::Success)
///     }
///
///     fn validate_output(&self, ctx: &Context, _state: &JobState) -> StepResult<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait PipelineStep: Send + Sync {
    /// Get the step name (for logging and error context).
    fn name(&self) -> &str;

    /// Phase the job is in while this step runs.
    fn phase(&self) -> JobPhase;

    /// Validate inputs before execution.
    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Execute the step's main work and record results in `state`.
    ///
    /// Returns `StepOutcome::Skipped` when the step decided not to run
    /// (not an error).
    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome>;

    /// Validate outputs after `execute` returned `Success`.
    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()>;

    /// Whether this step can be skipped.
    fn is_optional(&self) -> bool {
        false
    }

    /// Human-readable description of what this step does.
    fn description(&self) -> &str {
        self.name()
    }
}
