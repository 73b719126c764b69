//! Burn step - writes the image to an optical drive when requested.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobPhase, JobState, StepOutcome};
use crate::tools::commands;

/// Skipped unless the job asked to burn and named a device.
#[derive(Debug, Default)]
pub struct BurnStep;

impl BurnStep {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineStep for BurnStep {
    fn name(&self) -> &str {
        "Burn"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Burning
    }

    fn description(&self) -> &str {
        "Burn the image to disc"
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.job.will_burn() && !ctx.image_path.is_file() {
            return Err(StepError::file_not_found(ctx.image_path.display().to_string()));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        if !ctx.job.burn_requested() {
            return Ok(StepOutcome::Skipped("burn not requested".to_string()));
        }
        let Some(device) = ctx.job.burn_device() else {
            ctx.logger.warn("Burn requested but no device selected");
            return Ok(StepOutcome::Skipped("no burn device selected".to_string()));
        };

        let burner = &ctx.settings.tools.burner;
        ctx.logger.info(&format!("Burning to {}", device));

        let inv = commands::burn(burner, device, &ctx.image_path);
        state.burn = Some(ctx.invoker.invoke(&inv, burner.allow_fallback)?);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.burn.is_none() {
            return Err(StepError::invalid_output("Burn result not recorded"));
        }
        Ok(())
    }
}
