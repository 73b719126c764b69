//! Fallback-capable invoker.
//!
//! Runs the native program first. Only a "not found" failure, with the
//! fallback configured and permitted for the tool, leads to exactly one
//! more attempt inside the fallback shell.

use std::io;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::logging::JobLogger;

use super::errors::{ToolError, ToolResult};
use super::fallback::{native_command_line, ExecEnv, PathForm, ShellFallback};
use super::invocation::Invocation;
use super::runner::{CommandLine, ProcessOutput, ProcessRunner};

/// Exit status shells use for an unknown command.
const SHELL_COMMAND_NOT_FOUND: i32 = 127;

/// Outcome of one successful stage invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageResult {
    /// Program name.
    pub tool: String,
    /// Environment the program ran in.
    pub env: ExecEnv,
    pub exit_code: i32,
    /// Last diagnostic line the tool printed, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    /// Command line as executed.
    pub command: String,
}

/// Invokes tools through a [`ProcessRunner`], with optional shell fallback.
#[derive(Clone)]
pub struct ToolInvoker {
    runner: Arc<dyn ProcessRunner>,
    fallback: Option<ShellFallback>,
    logger: Arc<JobLogger>,
}

impl ToolInvoker {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        fallback: Option<ShellFallback>,
        logger: Arc<JobLogger>,
    ) -> Self {
        Self {
            runner,
            fallback,
            logger,
        }
    }

    /// Run `inv`, falling back when permitted.
    pub fn invoke(&self, inv: &Invocation, allow_fallback: bool) -> ToolResult<StageResult> {
        self.invoke_prepared(inv, allow_fallback, |_| Ok(()))
    }

    /// Run `inv`, calling `prepare` before each attempt with the path form
    /// that attempt expects.
    pub fn invoke_prepared<F>(
        &self,
        inv: &Invocation,
        allow_fallback: bool,
        mut prepare: F,
    ) -> ToolResult<StageResult>
    where
        F: FnMut(PathForm<'_>) -> io::Result<()>,
    {
        let tool = inv.program();

        prepare(PathForm::Native).map_err(|e| ToolError::prepare(tool, e))?;
        let native = native_command_line(inv);
        self.logger.command(&native.display());

        let err = match self.runner.run(&native) {
            Ok(output) => return self.finish(tool, ExecEnv::Native, &native, output),
            Err(err) if err.is_not_found() => err,
            Err(err) => {
                self.logger.error(&err.to_string());
                return Err(err);
            }
        };

        let fallback = match self.fallback.as_ref() {
            Some(fallback) if allow_fallback => fallback,
            _ => {
                self.logger.error(&format!("{} (no fallback permitted)", err));
                return Err(err);
            }
        };

        self.logger.warn(&format!(
            "{} not found natively; retrying through {}",
            tool,
            fallback.shell()
        ));

        let form = PathForm::Translated(fallback.translator());
        prepare(form).map_err(|e| ToolError::prepare(tool, e))?;
        let line = fallback.command_line(inv);
        self.logger.command(&line.display());

        let output = self.runner.run(&line).map_err(|err| {
            let err = if err.is_not_found() {
                ToolError::fallback_unavailable(tool, fallback.shell())
            } else {
                err
            };
            self.logger.error(&err.to_string());
            err
        })?;
        if output.exit_code == SHELL_COMMAND_NOT_FOUND {
            self.record_output(&output);
            self.logger.error(&format!(
                "{} is not available in {} either",
                tool,
                fallback.shell()
            ));
            return Err(ToolError::not_found(tool));
        }

        self.finish(tool, ExecEnv::Fallback, &line, output)
    }

    fn finish(
        &self,
        tool: &str,
        env: ExecEnv,
        line: &CommandLine,
        output: ProcessOutput,
    ) -> ToolResult<StageResult> {
        self.record_output(&output);
        let diagnostic = last_diagnostic(&output);

        if !output.success() {
            self.logger.show_tail(tool);
            let err = ToolError::execution_failed(tool, output.exit_code, diagnostic);
            self.logger.error(&err.to_string());
            return Err(err);
        }

        Ok(StageResult {
            tool: tool.to_string(),
            env,
            exit_code: output.exit_code,
            diagnostic,
            command: line.display(),
        })
    }

    fn record_output(&self, output: &ProcessOutput) {
        for line in output.stdout.lines() {
            self.logger.output_line(line, false);
        }
        for line in output.stderr.lines() {
            self.logger.output_line(line, true);
        }
    }
}

fn last_diagnostic(output: &ProcessOutput) -> Option<String> {
    last_line(&output.stderr).or_else(|| last_line(&output.stdout))
}

fn last_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .last()
        .map(str::to_string)
}
