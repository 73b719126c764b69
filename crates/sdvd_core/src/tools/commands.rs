//! Command builders for each pipeline stage.

use std::path::{Path, PathBuf};

use crate::config::{BurnerEntry, EncodingSettings, ToolEntry, ToolSettings};
use crate::platform::BurnerStyle;
use crate::workspace::WorkspaceLayout;

use super::invocation::Invocation;

/// Environment variable read by the authoring tool.
pub const VIDEO_FORMAT_VAR: &str = "VIDEO_FORMAT";

/// Transcode `input` into the disc-ready media file at `output`.
pub fn transcode(
    tool: &ToolEntry,
    encoding: &EncodingSettings,
    input: &Path,
    output: &Path,
) -> Invocation {
    Invocation::new(&tool.program)
        .flag("-i")
        .path(input)
        .flag("-target")
        .flag(&encoding.target)
        .flag("-b:v")
        .flag(&encoding.video_bitrate)
        .path(output)
}

/// Author the disc structure inside the workspace.
pub fn author(tool: &ToolEntry, encoding: &EncodingSettings, layout: &WorkspaceLayout) -> Invocation {
    Invocation::new(&tool.program)
        .flag("-o")
        .path(WorkspaceLayout::AUTHORED_DIR)
        .flag("-x")
        .path(WorkspaceLayout::DESCRIPTOR_FILE)
        .cwd(layout.root())
        .env(VIDEO_FORMAT_VAR, &encoding.video_format)
}

/// Master the authored structure into `image`.
pub fn master(tool: &ToolEntry, layout: &WorkspaceLayout, image: &Path) -> Invocation {
    Invocation::new(&tool.program)
        .flag("-o")
        .path(image)
        .flag("-dvd-video")
        .path(WorkspaceLayout::AUTHORED_DIR)
        .cwd(layout.root())
}

/// Burn `image` to `device` in the burner's dialect.
pub fn burn(burner: &BurnerEntry, device: &str, image: &Path) -> Invocation {
    match burner.style {
        BurnerStyle::Growisofs => Invocation::new(&burner.program)
            .flag("-dvd-compat")
            .flag("-Z")
            .prefixed_path(format!("{}=", device), image),
        BurnerStyle::Isoburn => Invocation::new(&burner.program)
            .flag("/q")
            .flag(device)
            .path(image),
    }
}

/// Availability of one configured program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCheck {
    pub stage: &'static str,
    pub program: String,
    pub resolved: Option<PathBuf>,
}

impl ToolCheck {
    pub fn found(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Resolve every configured program on the native search path.
pub fn check_tools(tools: &ToolSettings) -> Vec<ToolCheck> {
    [
        ("transcode", &tools.transcoder.program),
        ("author", &tools.author.program),
        ("master", &tools.master.program),
        ("burn", &tools.burner.program),
    ]
    .into_iter()
    .map(|(stage, program)| {
        let resolved = which::which(program).ok();
        tracing::debug!("{} -> {:?}", program, resolved);
        ToolCheck {
            stage,
            program: program.clone(),
            resolved,
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::invocation::ToolArg;

    #[test]
    fn transcode_uses_target_and_bitrate() {
        let tools = ToolSettings::default();
        let inv = transcode(
            &tools.transcoder,
            &EncodingSettings::default(),
            Path::new("movie.mp4"),
            Path::new("/work/output.mpg"),
        );
        assert_eq!(
            inv.to_string(),
            "ffmpeg -i movie.mp4 -target ntsc-dvd -b:v 1800k /work/output.mpg"
        );
        assert!(inv.working_dir().is_none());
    }

    #[test]
    fn author_runs_in_workspace_with_video_format() {
        let layout = WorkspaceLayout::new("/work");
        let inv = author(
            &ToolSettings::default().author,
            &EncodingSettings::default(),
            &layout,
        );
        assert_eq!(inv.to_string(), "dvdauthor -o DVD -x dvd.xml");
        assert_eq!(inv.working_dir(), Some(Path::new("/work")));
        assert_eq!(
            inv.env_overlay(),
            &[(VIDEO_FORMAT_VAR.to_string(), "NTSC".to_string())]
        );
        assert_eq!(inv.args()[1], ToolArg::Path(PathBuf::from("DVD")));
    }

    #[test]
    fn master_writes_requested_image() {
        let layout = WorkspaceLayout::new("/work");
        let inv = master(
            &ToolSettings::default().master,
            &layout,
            &layout.default_image_path(),
        );
        assert_eq!(inv.to_string(), "genisoimage -o /work/dvd.iso -dvd-video DVD");
    }

    #[test]
    fn burn_dialects() {
        let growisofs = BurnerEntry {
            program: "growisofs".to_string(),
            style: BurnerStyle::Growisofs,
            allow_fallback: false,
        };
        assert_eq!(
            burn(&growisofs, "/dev/sr0", Path::new("/work/dvd.iso")).to_string(),
            "growisofs -dvd-compat -Z /dev/sr0=/work/dvd.iso"
        );

        let isoburn = BurnerEntry {
            program: "isoburn.exe".to_string(),
            style: BurnerStyle::Isoburn,
            allow_fallback: false,
        };
        assert_eq!(
            burn(&isoburn, "E:", Path::new("/work/dvd.iso")).to_string(),
            "isoburn.exe /q E: /work/dvd.iso"
        );
    }

    #[test]
    fn check_tools_reports_every_stage() {
        let mut tools = ToolSettings::default();
        tools.transcoder.program = "sdvd-missing-transcoder".to_string();

        let checks = check_tools(&tools);
        assert_eq!(
            checks.iter().map(|c| c.stage).collect::<Vec<_>>(),
            vec!["transcode", "author", "master", "burn"]
        );
        assert!(!checks[0].found());
    }
}
