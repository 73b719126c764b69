//! Linux drive probes: sysfs block devices and well-known device nodes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::OpticalDrive;

use super::{DriveError, DriveProbe};

/// Reads `sr*` entries under a sysfs block directory.
///
/// Name comes from `device/vendor` and `device/model`; a non-zero `size`
/// means a disc is loaded.
#[derive(Debug, Clone)]
pub struct SysfsProbe {
    sys_block: PathBuf,
    dev_dir: PathBuf,
}

impl SysfsProbe {
    pub fn new(sys_block: PathBuf, dev_dir: PathBuf) -> Self {
        Self { sys_block, dev_dir }
    }

    fn read_drive(&self, entry: &Path, name: &str) -> OpticalDrive {
        let vendor = read_trimmed(&entry.join("device").join("vendor"));
        let model = read_trimmed(&entry.join("device").join("model"));
        let label = match (vendor, model) {
            (Some(v), Some(m)) => format!("{} {}", v, m),
            (Some(v), None) => v,
            (None, Some(m)) => m,
            (None, None) => name.to_string(),
        };

        let media_loaded = read_trimmed(&entry.join("size"))
            .and_then(|s| s.parse::<u64>().ok())
            .is_some_and(|sectors| sectors > 0);

        let id = self.dev_dir.join(name).to_string_lossy().into_owned();
        OpticalDrive::new(id, label, media_loaded)
    }
}

impl DriveProbe for SysfsProbe {
    fn name(&self) -> &str {
        "sysfs"
    }

    fn probe(&self) -> Result<Vec<OpticalDrive>, DriveError> {
        let entries = match fs::read_dir(&self.sys_block) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(self.name(), source)),
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| is_scsi_rom(n))
            .collect();
        names.sort();

        Ok(names
            .iter()
            .map(|name| self.read_drive(&self.sys_block.join(name), name))
            .collect())
    }
}

/// Scans a device directory for `sr*`, `cdrom*` and `dvd*` nodes.
#[derive(Debug, Clone)]
pub struct DevNodeProbe {
    dev_dir: PathBuf,
}

impl DevNodeProbe {
    pub fn new(dev_dir: PathBuf) -> Self {
        Self { dev_dir }
    }
}

impl DriveProbe for DevNodeProbe {
    fn name(&self) -> &str {
        "device nodes"
    }

    fn probe(&self) -> Result<Vec<OpticalDrive>, DriveError> {
        let entries = match fs::read_dir(&self.dev_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(io_error(self.name(), source)),
        };

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|e| {
                let name = e.file_name().to_string_lossy().into_owned();
                is_scsi_rom(&name) || name.starts_with("cdrom") || name.starts_with("dvd")
            })
            .map(|e| {
                // Symlinks like /dev/cdrom resolve to the sr node they alias.
                let path = e.path();
                fs::canonicalize(&path)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect();
        ids.sort();
        ids.dedup();

        Ok(ids
            .into_iter()
            .map(|id| OpticalDrive::new(id.clone(), id, false))
            .collect())
    }
}

fn is_scsi_rom(name: &str) -> bool {
    name.strip_prefix("sr")
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}

fn read_trimmed(path: &Path) -> Option<String> {
    let text = fs::read_to_string(path).ok()?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn io_error(probe: &str, source: io::Error) -> DriveError {
    DriveError::Io {
        probe: probe.to_string(),
        source,
    }
}
