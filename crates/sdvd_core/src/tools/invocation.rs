//! Description of one external program run, independent of where it runs.

use std::fmt;
use std::path::{Path, PathBuf};

/// One command-line argument.
///
/// Paths are kept apart from plain flags so the fallback environment can
/// rewrite them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolArg {
    /// Passed through verbatim.
    Flag(String),
    /// A filesystem path.
    Path(PathBuf),
    /// A path glued to a literal prefix in one argument (`/dev/sr0=image.iso`).
    PrefixedPath { prefix: String, path: PathBuf },
}

/// Program, arguments, working directory and environment overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<ToolArg>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.args.push(ToolArg::Flag(flag.into()));
        self
    }

    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.args.push(ToolArg::Path(path.into()));
        self
    }

    pub fn prefixed_path(mut self, prefix: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.args.push(ToolArg::PrefixedPath {
            prefix: prefix.into(),
            path: path.into(),
        });
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Add a variable to the child's environment overlay.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[ToolArg] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn env_overlay(&self) -> &[(String, String)] {
        &self.env
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            match arg {
                ToolArg::Flag(flag) => write!(f, " {}", flag)?,
                ToolArg::Path(path) => write!(f, " {}", path.display())?,
                ToolArg::PrefixedPath { prefix, path } => {
                    write!(f, " {}{}", prefix, path.display())?
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_argument_order() {
        let inv = Invocation::new("ffmpeg")
            .flag("-i")
            .path("in.mp4")
            .flag("-target")
            .flag("ntsc-dvd");

        assert_eq!(inv.program(), "ffmpeg");
        assert_eq!(inv.args().len(), 4);
        assert_eq!(inv.args()[1], ToolArg::Path(PathBuf::from("in.mp4")));
        assert_eq!(inv.to_string(), "ffmpeg -i in.mp4 -target ntsc-dvd");
    }

    #[test]
    fn prefixed_path_displays_joined() {
        let inv = Invocation::new("growisofs")
            .flag("-Z")
            .prefixed_path("/dev/sr0=", "/tmp/dvd.iso");
        assert_eq!(inv.to_string(), "growisofs -Z /dev/sr0=/tmp/dvd.iso");
    }

    #[test]
    fn env_overlay_and_cwd_are_recorded() {
        let inv = Invocation::new("dvdauthor")
            .cwd("/work")
            .env("VIDEO_FORMAT", "NTSC");
        assert_eq!(inv.working_dir(), Some(Path::new("/work")));
        assert_eq!(
            inv.env_overlay(),
            &[("VIDEO_FORMAT".to_string(), "NTSC".to_string())]
        );
    }
}
