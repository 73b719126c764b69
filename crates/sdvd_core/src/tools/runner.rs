//! Process runner: starts one program and waits for it.

use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::errors::{ToolError, ToolResult};

/// Fully resolved command line, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<OsString>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// Single-line rendering for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in self.args_lossy() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a command line to completion.
///
/// Implementations must report an unresolvable program as
/// [`ToolError::NotFound`] and must not treat a non-zero exit as an error.
pub trait ProcessRunner: Send + Sync {
    fn run(&self, line: &CommandLine) -> ToolResult<ProcessOutput>;
}

/// Runner backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, line: &CommandLine) -> ToolResult<ProcessOutput> {
        let mut cmd = Command::new(&line.program);
        cmd.args(&line.args)
            .envs(line.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null());

        if let Some(ref dir) = line.cwd {
            // A missing cwd also surfaces as NotFound from spawn.
            if !dir.is_dir() {
                return Err(ToolError::spawn(
                    &line.program,
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("working directory {} does not exist", dir.display()),
                    ),
                ));
            }
            cmd.current_dir(dir);
        }

        tracing::debug!("Spawning: {}", line.display());

        let output = cmd.output().map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                ToolError::not_found(&line.program)
            } else {
                ToolError::spawn(&line.program, e)
            }
        })?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
