//! Host platform capabilities.
//!
//! Platform differences (which burner to use, whether the compatibility
//! shell fallback is on by default, how optical drives are discovered) are
//! answered by [`HostPlatform`], chosen once at startup.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::drives::{CimProbe, DevNodeProbe, DriveEnumerator, SysfsProbe};

/// Burner command-line dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurnerStyle {
    /// `growisofs -dvd-compat -Z <device>=<image>`
    Growisofs,
    /// `isoburn.exe /q <drive> <image>`
    Isoburn,
}

/// The platform the program runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPlatform {
    Linux,
    Windows,
    Other,
}

impl HostPlatform {
    /// Detect the current host.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            HostPlatform::Windows
        } else if cfg!(target_os = "linux") {
            HostPlatform::Linux
        } else {
            HostPlatform::Other
        }
    }

    /// Burner dialect used by default on this host.
    pub fn default_burner(&self) -> BurnerStyle {
        match self {
            HostPlatform::Windows => BurnerStyle::Isoburn,
            HostPlatform::Linux | HostPlatform::Other => BurnerStyle::Growisofs,
        }
    }

    /// Default burner program name.
    pub fn default_burner_program(&self) -> &'static str {
        match self.default_burner() {
            BurnerStyle::Isoburn => "isoburn.exe",
            BurnerStyle::Growisofs => "growisofs",
        }
    }

    /// Whether the compatibility shell fallback is enabled by default.
    pub fn fallback_by_default(&self) -> bool {
        matches!(self, HostPlatform::Windows)
    }

    /// Build the drive enumerator for this host.
    ///
    /// Probes run in order; later probes fill in drives earlier ones missed.
    pub fn drive_enumerator(&self) -> DriveEnumerator {
        match self {
            HostPlatform::Linux => DriveEnumerator::new()
                .with_probe(SysfsProbe::new(PathBuf::from("/sys/block"), PathBuf::from("/dev")))
                .with_probe(DevNodeProbe::new(PathBuf::from("/dev"))),
            HostPlatform::Windows => {
                let enumerator = DriveEnumerator::new().with_probe(CimProbe::new());
                #[cfg(windows)]
                let enumerator = enumerator.with_probe(crate::drives::LogicalDriveProbe::new());
                enumerator
            }
            HostPlatform::Other => DriveEnumerator::new(),
        }
    }
}
