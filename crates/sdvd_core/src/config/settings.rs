//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::platform::{BurnerStyle, HostPlatform};

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Transcode profile.
    #[serde(default)]
    pub encoding: EncodingSettings,

    /// External tool programs.
    #[serde(default)]
    pub tools: ToolSettings,

    /// Compatibility shell fallback.
    #[serde(default)]
    pub fallback: FallbackSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Path configuration for the scratch workspace and logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Scratch directory for intermediate artifacts.
    #[serde(default = "default_workdir")]
    pub workdir: String,

    /// Folder for log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Leave the workspace on disk after the job (debugging aid).
    #[serde(default)]
    pub keep_workdir: bool,

    /// Last input video chosen in the form.
    #[serde(default)]
    pub last_input_path: String,

    /// Last image output chosen in the form.
    #[serde(default)]
    pub last_iso_output: String,
}

fn default_workdir() -> String {
    "dvd_workdir".to_string()
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            logs_folder: default_logs_folder(),
            keep_workdir: false,
            last_input_path: String::new(),
            last_iso_output: String::new(),
        }
    }
}

/// Transcoder target profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingSettings {
    /// Value for the transcoder's `-target` flag.
    #[serde(default = "default_target")]
    pub target: String,

    /// Value for the transcoder's `-b:v` flag.
    #[serde(default = "default_video_bitrate")]
    pub video_bitrate: String,

    /// Exported as `VIDEO_FORMAT` to the authoring tool.
    #[serde(default = "default_video_format")]
    pub video_format: String,
}

fn default_target() -> String {
    "ntsc-dvd".to_string()
}

fn default_video_bitrate() -> String {
    "1800k".to_string()
}

fn default_video_format() -> String {
    "NTSC".to_string()
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self {
            target: default_target(),
            video_bitrate: default_video_bitrate(),
            video_format: default_video_format(),
        }
    }
}

/// One external program and whether it may run through the fallback shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub program: String,
    #[serde(default = "default_true")]
    pub allow_fallback: bool,
}

impl ToolEntry {
    pub fn new(program: impl Into<String>, allow_fallback: bool) -> Self {
        Self {
            program: program.into(),
            allow_fallback,
        }
    }
}

/// Burner program and its command-line dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnerEntry {
    #[serde(default = "default_burner_program")]
    pub program: String,
    #[serde(default = "default_burner_style")]
    pub style: BurnerStyle,
    #[serde(default)]
    pub allow_fallback: bool,
}

fn default_burner_program() -> String {
    HostPlatform::current().default_burner_program().to_string()
}

fn default_burner_style() -> BurnerStyle {
    HostPlatform::current().default_burner()
}

impl Default for BurnerEntry {
    fn default() -> Self {
        Self {
            program: default_burner_program(),
            style: default_burner_style(),
            allow_fallback: false,
        }
    }
}

/// Programs used by each stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_transcoder")]
    pub transcoder: ToolEntry,
    #[serde(default = "default_author")]
    pub author: ToolEntry,
    #[serde(default = "default_master")]
    pub master: ToolEntry,
    #[serde(default)]
    pub burner: BurnerEntry,
}

fn default_transcoder() -> ToolEntry {
    ToolEntry::new("ffmpeg", true)
}

fn default_author() -> ToolEntry {
    ToolEntry::new("dvdauthor", true)
}

fn default_master() -> ToolEntry {
    ToolEntry::new("genisoimage", true)
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            transcoder: default_transcoder(),
            author: default_author(),
            master: default_master(),
            burner: BurnerEntry::default(),
        }
    }
}

/// Secondary execution shell used when a native program is missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackSettings {
    /// Master switch; per-tool `allow_fallback` flags apply on top.
    #[serde(default = "default_fallback_enabled")]
    pub enabled: bool,

    /// Shell launcher program.
    #[serde(default = "default_shell")]
    pub shell: String,

    /// Arguments placed before the composed command string.
    #[serde(default = "default_shell_args")]
    pub shell_args: Vec<String>,

    /// Where host drive letters are mounted inside the shell.
    #[serde(default = "default_mount_root")]
    pub mount_root: String,
}

fn default_fallback_enabled() -> bool {
    HostPlatform::current().fallback_by_default()
}

fn default_shell() -> String {
    "wsl".to_string()
}

fn default_shell_args() -> Vec<String> {
    vec!["bash".to_string(), "-c".to_string()]
}

fn default_mount_root() -> String {
    "/mnt".to_string()
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            enabled: default_fallback_enabled(),
            shell: default_shell(),
            shell_args: default_shell_args(),
            mount_root: default_mount_root(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Keep tool output out of the log unless a stage fails.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of tool output lines shown when a stage fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix log lines with a timestamp.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Minimum level written to the job log.
    #[serde(default)]
    pub level: LogLevel,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            compact: true,
            error_tail: default_error_tail(),
            show_timestamps: true,
            level: LogLevel::Info,
        }
    }
}

impl LoggingSettings {
    /// Job logger configuration for these settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            error_tail: self.error_tail as usize,
            show_timestamps: self.show_timestamps,
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Encoding,
    Tools,
    Fallback,
    Logging,
}

impl ConfigSection {
    /// All sections in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Paths,
        ConfigSection::Encoding,
        ConfigSection::Tools,
        ConfigSection::Fallback,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Encoding => "encoding",
            ConfigSection::Tools => "tools",
            ConfigSection::Fallback => "fallback",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "# Scratch workspace and log locations",
            ConfigSection::Encoding => "# Transcode profile for DVD-compliant MPEG-2",
            ConfigSection::Tools => "# External programs for each stage",
            ConfigSection::Fallback => "# Compatibility shell used when a program is missing",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}
