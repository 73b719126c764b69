//! Fixtures shared by orchestrator unit tests.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::config::Settings;
use crate::logging::{JobLogger, JobLoggerBuilder, LogConfig};
use crate::models::Job;
use crate::tools::{
    CommandLine, ProcessOutput, ProcessRunner, ToolError, ToolInvoker, ToolResult,
};
use crate::workspace::WorkspaceLayout;

use super::types::Context;

/// Runner that fakes the disc tools by producing their output files.
#[derive(Default)]
pub(crate) struct FakeTools {
    pub calls: Mutex<Vec<CommandLine>>,
    pub missing: Vec<&'static str>,
    pub failing: Vec<&'static str>,
}

impl FakeTools {
    pub fn programs(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.program.clone()).collect()
    }

    fn resolve(line: &CommandLine, arg: &str) -> PathBuf {
        match line.cwd {
            Some(ref dir) => dir.join(arg),
            None => PathBuf::from(arg),
        }
    }
}

impl ProcessRunner for FakeTools {
    fn run(&self, line: &CommandLine) -> ToolResult<ProcessOutput> {
        self.calls.lock().push(line.clone());
        let program = line.program.as_str();

        if self.missing.iter().any(|m| *m == program) {
            return Err(ToolError::not_found(program));
        }
        if self.failing.iter().any(|m| *m == program) {
            return Ok(ProcessOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("{}: simulated failure\n", program),
            });
        }

        let args = line.args_lossy();
        match program {
            "ffmpeg" => {
                if let Some(out) = args.last() {
                    fs::write(Self::resolve(line, out), b"mpeg").unwrap();
                }
            }
            "dvdauthor" => {
                let dir = Self::resolve(line, "DVD").join("VIDEO_TS");
                fs::create_dir_all(&dir).unwrap();
                fs::write(dir.join("VIDEO_TS.IFO"), b"ifo").unwrap();
            }
            "genisoimage" => {
                if let Some(pos) = args.iter().position(|a| a == "-o") {
                    fs::write(Self::resolve(line, &args[pos + 1]), b"iso").unwrap();
                }
            }
            _ => {}
        }

        Ok(ProcessOutput::default())
    }
}

/// Temp directory with an input file and a workspace root.
pub(crate) struct TestJob {
    pub dir: TempDir,
    pub input: PathBuf,
    pub layout: WorkspaceLayout,
    pub logger: Arc<JobLogger>,
}

impl TestJob {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("holiday.mp4");
        fs::write(&input, b"video").unwrap();

        let root = dir.path().join("dvd_workdir");
        fs::create_dir_all(&root).unwrap();

        let logger = Arc::new(
            JobLoggerBuilder::new("test", dir.path().join("logs"))
                .config(LogConfig::default())
                .build()
                .unwrap(),
        );

        Self {
            input,
            layout: WorkspaceLayout::new(root),
            logger,
            dir,
        }
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn context(&self) -> Context {
        self.context_with(Job::builder(&self.input).build(), Arc::new(FakeTools::default()))
    }

    pub fn context_with(&self, job: Job, runner: Arc<FakeTools>) -> Context {
        let invoker = ToolInvoker::new(runner, None, Arc::clone(&self.logger));
        Context::new(
            job,
            Settings::default(),
            self.layout.clone(),
            Arc::clone(&self.logger),
            invoker,
        )
    }
}
