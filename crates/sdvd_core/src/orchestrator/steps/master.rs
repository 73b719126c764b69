//! Master step - packages the authored structure into a disc image.

use std::fs;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobPhase, JobState, StepOutcome};
use crate::tools::commands;

use super::author::dir_has_entries;

#[derive(Debug, Default)]
pub struct MasterStep;

impl MasterStep {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineStep for MasterStep {
    fn name(&self) -> &str {
        "Master"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Mastering
    }

    fn description(&self) -> &str {
        "Create the DVD image"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let authored = ctx.layout.authored_dir();
        if !dir_has_entries(&authored) {
            return Err(StepError::precondition_failed(format!(
                "Authored structure missing or empty: {}",
                authored.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let tool = &ctx.settings.tools.master;
        if let Some(parent) = ctx.image_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StepError::io_error("creating image output directory", e))?;
        }
        ctx.logger
            .info(&format!("Image: {}", ctx.image_path.display()));

        let inv = commands::master(tool, &ctx.layout, &ctx.image_path);
        state.master = Some(ctx.invoker.invoke(&inv, tool.allow_fallback)?);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.master.is_none() {
            return Err(StepError::invalid_output("Master result not recorded"));
        }
        if !ctx.image_path.is_file() {
            return Err(StepError::invalid_output(format!(
                "Image not created: {}",
                ctx.image_path.display()
            )));
        }
        Ok(())
    }
}
