//! End-to-end pipeline runs against a scripted tool runner.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sdvd_core::config::{BurnerEntry, Settings};
use sdvd_core::models::Job;
use sdvd_core::orchestrator::{ErrorKind, JobPhase, JobRunner};
use sdvd_core::platform::BurnerStyle;
use sdvd_core::run_job;
use sdvd_core::tools::{CommandLine, ExecEnv, ProcessOutput, ProcessRunner, ToolError, ToolResult};
use tempfile::TempDir;

const SHELL: &str = "wsl";

/// Records every command line and fakes each tool's artifacts.
struct ScriptedTools {
    root: PathBuf,
    image: PathBuf,
    missing: Vec<&'static str>,
    failing: Vec<&'static str>,
    calls: Mutex<Vec<CommandLine>>,
}

impl ScriptedTools {
    fn new(root: PathBuf, image: PathBuf) -> Self {
        Self {
            root,
            image,
            missing: Vec::new(),
            failing: Vec::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn programs(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|c| c.program.clone())
            .collect()
    }

    fn calls(&self) -> Vec<CommandLine> {
        self.calls.lock().unwrap().clone()
    }

    /// Tool named by a native line or by a composed fallback command.
    fn tool_of(line: &CommandLine) -> String {
        if line.program != SHELL {
            return line.program.clone();
        }
        let composed = line.args_lossy().pop().unwrap_or_default();
        let command = composed
            .rsplit("; ")
            .next()
            .unwrap_or(&composed)
            .rsplit(" && ")
            .next()
            .unwrap_or(&composed)
            .to_string();
        command.split(' ').next().unwrap_or_default().to_string()
    }

    fn produce(&self, tool: &str) {
        match tool {
            "ffmpeg" => fs::write(self.root.join("output.mpg"), b"mpeg").unwrap(),
            "dvdauthor" => {
                let dir = self.root.join("DVD").join("VIDEO_TS");
                fs::create_dir_all(&dir).unwrap();
                fs::write(dir.join("VIDEO_TS.IFO"), b"ifo").unwrap();
            }
            "genisoimage" => fs::write(&self.image, b"iso").unwrap(),
            _ => {}
        }
    }
}

impl ProcessRunner for ScriptedTools {
    fn run(&self, line: &CommandLine) -> ToolResult<ProcessOutput> {
        self.calls.lock().unwrap().push(line.clone());
        let tool = Self::tool_of(line);

        if line.program != SHELL && self.missing.iter().any(|m| *m == tool) {
            return Err(ToolError::not_found(&line.program));
        }
        if self.failing.iter().any(|m| *m == tool) {
            return Ok(ProcessOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("{}: cannot process input\n", tool),
            });
        }

        self.produce(&tool);
        Ok(ProcessOutput::default())
    }
}

struct Fixture {
    dir: TempDir,
    input: PathBuf,
    settings: Settings,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("holiday.mp4");
        fs::write(&input, b"video").unwrap();

        let mut settings = Settings::default();
        settings.fallback.enabled = false;
        settings.fallback.shell = SHELL.to_string();
        settings.tools.burner = BurnerEntry {
            program: "growisofs".to_string(),
            style: BurnerStyle::Growisofs,
            allow_fallback: false,
        };

        Self {
            dir,
            input,
            settings,
        }
    }

    fn root(&self) -> PathBuf {
        self.dir.path().join("dvd_workdir")
    }

    fn tools(&self, image: &Path) -> Arc<ScriptedTools> {
        Arc::new(ScriptedTools::new(self.root(), image.to_path_buf()))
    }

    fn runner(&self, tools: &Arc<ScriptedTools>) -> JobRunner {
        JobRunner::new(self.settings.clone(), Arc::clone(tools) as Arc<dyn ProcessRunner>)
            .with_workdir(self.root())
            .with_log_dir(self.dir.path().join("logs"))
    }
}

#[test]
fn stages_run_in_fixed_order() {
    let fx = Fixture::new();
    let tools = fx.tools(&fx.root().join("dvd.iso"));

    let job = Job::builder(&fx.input)
        .iso(true)
        .burn(true)
        .burn_device(Some("/dev/sr0"))
        .build();
    let report = fx.runner(&tools).run(&job, None, None).unwrap();

    assert_eq!(
        tools.programs(),
        vec!["ffmpeg", "dvdauthor", "genisoimage", "growisofs"]
    );
    assert_eq!(report.state.phase, JobPhase::Done);
    assert!(report.run.all_completed());

    let burn = tools.calls().pop().unwrap();
    let image = fx.root().join("dvd.iso");
    assert_eq!(
        burn.args_lossy(),
        vec![
            "-dvd-compat".to_string(),
            "-Z".to_string(),
            format!("/dev/sr0={}", image.display()),
        ]
    );
}

#[test]
fn transcode_failure_stops_everything() {
    let fx = Fixture::new();
    let mut tools = ScriptedTools::new(fx.root(), fx.root().join("dvd.iso"));
    tools.failing = vec!["ffmpeg"];
    let tools = Arc::new(tools);

    let job = Job::builder(&fx.input).iso(true).build();
    let err = fx.runner(&tools).run(&job, None, None).unwrap_err();

    assert_eq!(tools.programs(), vec!["ffmpeg"]);
    assert_eq!(err.failed_stage(), Some("Transcode"));
    assert_eq!(err.kind(), ErrorKind::ToolExecutionFailed);
    assert!(err.to_string().contains("cannot process input"));
    assert!(!fx.root().exists());
}

#[test]
fn missing_tools_fall_back_once_per_stage() {
    let mut fx = Fixture::new();
    fx.settings.fallback.enabled = true;
    fx.settings.paths.keep_workdir = true;

    let mut tools = ScriptedTools::new(fx.root(), fx.root().join("dvd.iso"));
    tools.missing = vec!["ffmpeg", "dvdauthor", "genisoimage"];
    let tools = Arc::new(tools);

    let job = Job::builder(&fx.input).iso(true).build();
    let report = fx.runner(&tools).run(&job, None, None).unwrap();

    assert_eq!(
        tools.programs(),
        vec!["ffmpeg", SHELL, "dvdauthor", SHELL, "genisoimage", SHELL]
    );
    for stage in report.state.stage_results() {
        assert_eq!(stage.env, ExecEnv::Fallback);
    }

    let calls = tools.calls();
    let author = &calls[3];
    let args = author.args_lossy();
    assert_eq!(&args[..2], &["bash".to_string(), "-c".to_string()]);
    let composed = &args[2];
    assert!(composed.starts_with("export VIDEO_FORMAT='NTSC'; cd '"));
    assert!(composed.contains(&format!("'{}'", fx.root().join("DVD").display())));
    assert!(author.env.is_empty());
    assert!(author.cwd.is_none());

    let xml = fs::read_to_string(fx.root().join("dvd.xml")).unwrap();
    assert!(xml.contains(&format!("file=\"{}\"", fx.root().join("output.mpg").display())));
}

#[test]
fn missing_tool_without_fallback_is_not_found() {
    let fx = Fixture::new();
    let mut tools = ScriptedTools::new(fx.root(), fx.root().join("dvd.iso"));
    tools.missing = vec!["dvdauthor"];
    let tools = Arc::new(tools);

    let job = Job::builder(&fx.input).iso(true).build();
    let err = fx.runner(&tools).run(&job, None, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ToolNotFound);
    assert_eq!(err.failed_stage(), Some("Author"));
    assert_eq!(tools.programs(), vec!["ffmpeg", "dvdauthor"]);
}

#[test]
fn image_defaults_to_workspace() {
    let fx = Fixture::new();
    let tools = fx.tools(&fx.root().join("dvd.iso"));

    let job = Job::builder(&fx.input).iso(true).build();
    let report = fx.runner(&tools).run(&job, None, None).unwrap();

    assert_eq!(report.image_path, fx.root().join("dvd.iso"));
    assert!(report.image_retained);
    assert!(fx.root().join("dvd.iso").is_file());
    assert!(!fx.root().join("output.mpg").exists());
    assert!(!fx.root().join("DVD").exists());
}

#[test]
fn relative_iso_output_resolves_against_workspace() {
    let fx = Fixture::new();
    let tools = fx.tools(&fx.root().join("holiday.iso"));

    let job = Job::builder(&fx.input)
        .iso(true)
        .iso_output(Some("holiday.iso"))
        .build();
    let report = fx.runner(&tools).run(&job, None, None).unwrap();

    assert_eq!(report.image_path, fx.root().join("holiday.iso"));
    assert!(report.image_path.is_file());
}

#[test]
fn burn_without_device_is_skipped() {
    let fx = Fixture::new();
    let tools = fx.tools(&fx.root().join("dvd.iso"));

    let job = Job::builder(&fx.input).burn(true).build();
    let report = fx.runner(&tools).run(&job, None, None).unwrap();

    assert_eq!(report.state.phase, JobPhase::Done);
    assert_eq!(report.run.steps_skipped, vec!["Burn"]);
    assert!(report.state.burn.is_none());
    assert_eq!(tools.programs(), vec!["ffmpeg", "dvdauthor", "genisoimage"]);
}

#[test]
fn preview_flag_changes_nothing() {
    let fx = Fixture::new();
    let tools = fx.tools(&fx.root().join("dvd.iso"));

    let job = Job::builder(&fx.input).iso(true).preview(true).build();
    fx.runner(&tools).run(&job, None, None).unwrap();

    assert_eq!(tools.programs(), vec!["ffmpeg", "dvdauthor", "genisoimage"]);
}

#[test]
fn run_job_uses_configured_paths() {
    let mut fx = Fixture::new();
    let image = fx.root().join("dvd.iso");

    let job = Job::builder(&fx.input).iso(true).build();
    let report = run_job_in(&mut fx, &job, &image);

    assert_eq!(report.image_path, image);
    assert!(report.image_retained);
    assert!(report.log_path.starts_with(fx.dir.path().join("logs")));
}

fn run_job_in(fx: &mut Fixture, job: &Job, image: &Path) -> sdvd_core::orchestrator::JobReport {
    fx.settings.paths.workdir = fx.root().to_string_lossy().into_owned();
    fx.settings.paths.logs_folder = fx.dir.path().join("logs").to_string_lossy().into_owned();
    let tools = fx.tools(image);
    run_job(job, &fx.settings, tools as Arc<dyn ProcessRunner>).unwrap()
}

#[test]
fn nested_relative_iso_output_survives_cleanup() {
    let mut fx = Fixture::new();
    let image = fx.root().join("out").join("holiday.iso");

    let job = Job::builder(&fx.input)
        .iso(true)
        .iso_output(Some("out/holiday.iso"))
        .build();
    let report = run_job_in(&mut fx, &job, &image);

    assert_eq!(report.image_path, image);
    assert!(report.image_retained);
    assert!(image.is_file());
    assert!(!fx.root().join("output.mpg").exists());
    assert!(!fx.root().join("DVD").exists());
}

#[test]
fn absolute_iso_output_inside_workspace_survives_cleanup() {
    let mut fx = Fixture::new();
    let image = fx.root().join("discs").join("final").join("holiday.iso");

    let job = Job::builder(&fx.input)
        .iso(true)
        .iso_output(Some(image.clone()))
        .build();
    let report = run_job_in(&mut fx, &job, &image);

    assert_eq!(report.image_path, image);
    assert!(report.image_retained);
    assert!(image.is_file());
    assert!(!fx.root().join("dvd.xml").exists());
}
