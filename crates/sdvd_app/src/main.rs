//! Simple DVD Creator - entry point.
//!
//! With `--file-path` the job runs straight from the command line;
//! without it an interactive form collects the same choices.

use std::path::PathBuf;

use clap::Parser;

use sdvd_core::config::ConfigManager;
use sdvd_core::logging::{init_tracing_with_file, LogLevel};
use sdvd_core::models::Job;

mod cli;
mod gui;

#[derive(Parser, Debug)]
#[command(
    name = "simple-dvd",
    version,
    about = "Convert a video file into a DVD image and optionally burn it"
)]
struct Args {
    /// Burn the image after mastering (requires --device).
    #[arg(long)]
    burn: bool,

    /// Keep the DVD image after the job.
    #[arg(long)]
    iso: bool,

    /// Reserved; accepted and ignored.
    #[arg(long)]
    preview: bool,

    /// Input video. Omit to open the interactive form.
    #[arg(long, value_name = "PATH")]
    file_path: Option<PathBuf>,

    /// Image output path (default: dvd.iso inside the workspace).
    #[arg(long, value_name = "PATH")]
    iso_output: Option<PathBuf>,

    /// Burn target, e.g. /dev/sr0 or E:
    #[arg(long, value_name = "DEVICE")]
    device: Option<String>,

    /// Settings file.
    #[arg(long, value_name = "PATH", default_value = ".config/simple-dvd.toml")]
    config: PathBuf,

    /// Leave the workspace on disk after the job.
    #[arg(long)]
    keep_workdir: bool,

    /// List optical drives and exit.
    #[arg(long)]
    list_drives: bool,

    /// Report which tools are installed and exit.
    #[arg(long)]
    check_tools: bool,

    /// Debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ConfigManager::new(&args.config);
    if let Err(e) = config.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    let level = if args.verbose {
        LogLevel::Debug
    } else {
        config.settings().logging.level
    };
    let _log_guard = init_tracing_with_file(level, &config.logs_folder());

    tracing::info!("Simple DVD Creator starting");
    tracing::debug!("Config: {}", config.path().display());
    tracing::debug!("Core version: {}", sdvd_core::version());

    if args.keep_workdir {
        config.settings_mut().paths.keep_workdir = true;
    }

    if args.list_drives {
        cli::list_drives();
        return Ok(());
    }

    if args.check_tools {
        return cli::check_tools(config.settings());
    }

    match args.file_path {
        Some(ref input) => {
            let job = Job::builder(input)
                .burn(args.burn)
                .burn_device(args.device.clone())
                .iso(args.iso)
                .iso_output(args.iso_output.clone())
                .preview(args.preview)
                .build();
            cli::run(&job, config.settings())
        }
        None => gui::run(config, args.burn, args.iso),
    }
}
