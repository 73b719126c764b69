//! Non-interactive commands.

use std::sync::Arc;

use anyhow::{bail, Context as _};

use sdvd_core::config::Settings;
use sdvd_core::models::Job;
use sdvd_core::platform::HostPlatform;
use sdvd_core::tools::{check_tools as resolve_tools, SystemRunner};

/// Run one job and print where the image went.
pub fn run(job: &Job, settings: &Settings) -> anyhow::Result<()> {
    let report = sdvd_core::run_job(job, settings, Arc::new(SystemRunner::new()))
        .with_context(|| format!("Failed to create DVD from {}", job.input().display()))?;

    for stage in report.state.stage_results() {
        println!("{:<12} ok ({})", stage.tool, stage.env);
    }
    if report.image_retained {
        println!("Image: {}", report.image_path.display());
    }
    if report.state.burn.is_some() {
        println!("Burned to {}", job.burn_device().unwrap_or_default());
    }
    println!("Log: {}", report.log_path.display());
    Ok(())
}

/// Print every optical drive the host reports.
pub fn list_drives() {
    let enumerator = HostPlatform::current().drive_enumerator();
    let mut count = 0;
    for drive in &enumerator {
        println!("{}", drive);
        count += 1;
    }
    if count == 0 {
        println!("No optical drives found");
    }
}

/// Print tool availability; fails when a required stage tool is missing
/// and no fallback shell is configured.
pub fn check_tools(settings: &Settings) -> anyhow::Result<()> {
    let checks = resolve_tools(&settings.tools);
    for check in &checks {
        match check.resolved {
            Some(ref path) => println!("{:<10} {:<14} {}", check.stage, check.program, path.display()),
            None => println!("{:<10} {:<14} not found", check.stage, check.program),
        }
    }

    let missing: Vec<_> = checks
        .iter()
        .filter(|c| c.stage != "burn" && !c.found())
        .map(|c| c.program.as_str())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    if settings.fallback.enabled {
        println!(
            "Missing tools will be run through '{}' ({})",
            settings.fallback.shell,
            missing.join(", ")
        );
        return Ok(());
    }
    bail!("Required tools not found: {}", missing.join(", "))
}
