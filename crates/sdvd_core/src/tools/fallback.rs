//! Fallback shell: re-expresses an invocation as one composed command
//! string run inside a secondary execution environment.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::FallbackSettings;

use super::invocation::{Invocation, ToolArg};
use super::runner::CommandLine;
use super::translate::{shell_quote, PathTranslator};

/// Environment a stage actually ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecEnv {
    Native,
    Fallback,
}

impl fmt::Display for ExecEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

/// Path form expected by the environment about to run a tool.
#[derive(Debug, Clone, Copy)]
pub enum PathForm<'a> {
    Native,
    Translated(&'a PathTranslator),
}

impl PathForm<'_> {
    pub fn env(&self) -> ExecEnv {
        match self {
            Self::Native => ExecEnv::Native,
            Self::Translated(_) => ExecEnv::Fallback,
        }
    }
}

/// Secondary shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellFallback {
    shell: String,
    shell_args: Vec<String>,
    translator: PathTranslator,
}

impl ShellFallback {
    pub fn new(
        shell: impl Into<String>,
        shell_args: Vec<String>,
        translator: PathTranslator,
    ) -> Self {
        Self {
            shell: shell.into(),
            shell_args,
            translator,
        }
    }

    /// Build from settings; `None` when the fallback is switched off.
    pub fn from_settings(settings: &FallbackSettings) -> Option<Self> {
        if !settings.enabled {
            return None;
        }
        Some(Self::new(
            settings.shell.clone(),
            settings.shell_args.clone(),
            PathTranslator::new(settings.mount_root.clone()),
        ))
    }

    pub fn shell(&self) -> &str {
        &self.shell
    }

    pub fn translator(&self) -> &PathTranslator {
        &self.translator
    }

    /// Compose the single shell command equivalent to `inv`.
    ///
    /// Environment overlay variables become `export` assignments, the
    /// working directory becomes a `cd`, and every path is translated.
    pub fn compose(&self, inv: &Invocation) -> String {
        let mut out = String::new();

        for (key, value) in inv.env_overlay() {
            out.push_str(&format!("export {}={}; ", key, shell_quote(value)));
        }

        let cwd = inv.working_dir();
        if let Some(dir) = cwd {
            let dir = self.translator.translate(dir, None);
            out.push_str(&format!("cd {} && ", shell_quote(&dir)));
        }

        out.push_str(inv.program());
        for arg in inv.args() {
            out.push(' ');
            out.push_str(&shell_quote(&self.render_arg(arg, cwd)));
        }

        out
    }

    /// Command line that runs the composed command in the shell.
    pub fn command_line(&self, inv: &Invocation) -> CommandLine {
        let composed = self.compose(inv);
        tracing::debug!("Composed fallback command: {}", composed);

        let mut line = CommandLine::new(self.shell.clone());
        line.args = self
            .shell_args
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(OsString::from(composed)))
            .collect();
        line
    }

    fn render_arg(&self, arg: &ToolArg, cwd: Option<&Path>) -> String {
        match arg {
            ToolArg::Flag(flag) => flag.clone(),
            ToolArg::Path(path) => self.translator.translate(path, cwd),
            ToolArg::PrefixedPath { prefix, path } => {
                format!("{}{}", prefix, self.translator.translate(path, cwd))
            }
        }
    }
}

/// Native command line for `inv`, arguments passed as-is.
pub fn native_command_line(inv: &Invocation) -> CommandLine {
    let mut line = CommandLine::new(inv.program());
    line.args = inv
        .args()
        .iter()
        .map(|arg| match arg {
            ToolArg::Flag(flag) => OsString::from(flag),
            ToolArg::Path(path) => path.clone().into_os_string(),
            ToolArg::PrefixedPath { prefix, path } => {
                let mut joined = OsString::from(prefix);
                joined.push(path.as_os_str());
                joined
            }
        })
        .collect();
    line.cwd = inv.working_dir().map(Path::to_path_buf);
    line.env = inv.env_overlay().to_vec();
    line
}
