//! Transcode step - converts the source video into disc-ready MPEG-2.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobPhase, JobState, StepOutcome};
use crate::tools::commands;

/// Runs the transcoder to produce `output.mpg` in the workspace.
#[derive(Debug, Default)]
pub struct TranscodeStep;

impl TranscodeStep {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineStep for TranscodeStep {
    fn name(&self) -> &str {
        "Transcode"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Transcoding
    }

    fn description(&self) -> &str {
        "Convert the source video to the DVD profile"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let input = ctx.job.input();
        if !input.is_file() {
            return Err(StepError::file_not_found(input.display().to_string()));
        }
        if !ctx.layout.root().is_dir() {
            return Err(StepError::precondition_failed(format!(
                "Workspace {} does not exist",
                ctx.layout.root().display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let tool = &ctx.settings.tools.transcoder;
        let output = ctx.layout.media_path();
        ctx.logger.info(&format!(
            "Transcoding {} ({} @ {})",
            ctx.job.input().display(),
            ctx.settings.encoding.target,
            ctx.settings.encoding.video_bitrate
        ));

        let inv = commands::transcode(tool, &ctx.settings.encoding, ctx.job.input(), &output);
        state.transcode = Some(ctx.invoker.invoke(&inv, tool.allow_fallback)?);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.transcode.is_none() {
            return Err(StepError::invalid_output("Transcode result not recorded"));
        }
        let media = ctx.layout.media_path();
        if !media.is_file() {
            return Err(StepError::invalid_output(format!(
                "Transcoded media not created: {}",
                media.display()
            )));
        }
        Ok(())
    }
}
