//! Author step - writes the descriptor and builds the DVD structure.

use std::fs;

use crate::descriptor;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, JobPhase, JobState, StepOutcome};
use crate::tools::{commands, PathForm};
use crate::workspace::WorkspaceLayout;

/// Runs the authoring tool inside the workspace.
///
/// The descriptor is rewritten before each attempt so its media reference
/// matches the environment the tool runs in.
#[derive(Debug, Default)]
pub struct AuthorStep;

impl AuthorStep {
    pub fn new() -> Self {
        Self
    }
}

impl PipelineStep for AuthorStep {
    fn name(&self) -> &str {
        "Author"
    }

    fn phase(&self) -> JobPhase {
        JobPhase::Authoring
    }

    fn description(&self) -> &str {
        "Build the DVD-Video structure"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        let media = ctx.layout.media_path();
        if !media.is_file() {
            return Err(StepError::precondition_failed(format!(
                "Transcoded media missing: {}",
                media.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut JobState) -> StepResult<StepOutcome> {
        let tool = &ctx.settings.tools.author;
        let authored = ctx.layout.authored_dir();
        fs::create_dir_all(&authored)
            .map_err(|e| StepError::io_error("creating authored structure directory", e))?;

        let media = ctx.layout.media_path();
        let descriptor_path = ctx.layout.descriptor_path();
        let inv = commands::author(tool, &ctx.settings.encoding, &ctx.layout);

        let result = ctx
            .invoker
            .invoke_prepared(&inv, tool.allow_fallback, |form| {
                let media_ref = match form {
                    PathForm::Native => WorkspaceLayout::MEDIA_FILE.to_string(),
                    PathForm::Translated(translator) => translator.translate(&media, None),
                };
                ctx.logger
                    .debug(&format!("Descriptor ({}) references {}", form.env(), media_ref));
                descriptor::emit(&descriptor_path, &media_ref)
            })?;
        state.author = Some(result);

        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &JobState) -> StepResult<()> {
        if state.author.is_none() {
            return Err(StepError::invalid_output("Author result not recorded"));
        }
        if !dir_has_entries(&ctx.layout.authored_dir()) {
            return Err(StepError::invalid_output(format!(
                "Authored structure is empty: {}",
                ctx.layout.authored_dir().display()
            )));
        }
        Ok(())
    }
}

pub(super) fn dir_has_entries(path: &std::path::Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
