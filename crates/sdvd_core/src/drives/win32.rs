//! Windows logical-drive scan: every drive letter whose type is CD-ROM.

use std::ptr;

use windows_sys::Win32::Storage::FileSystem::{
    GetDriveTypeW, GetLogicalDrives, GetVolumeInformationW,
};

use crate::models::OpticalDrive;

use super::{DriveError, DriveProbe};

/// `GetDriveTypeW` result for optical drives.
const DRIVE_CDROM: u32 = 5;

const MAX_LABEL: usize = 261;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogicalDriveProbe;

impl LogicalDriveProbe {
    pub fn new() -> Self {
        Self
    }
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Volume label, or `None` when no readable disc is present.
fn volume_label(root: &[u16]) -> Option<String> {
    let mut label = [0u16; MAX_LABEL];
    // SAFETY: `root` is NUL-terminated, `label` is writable for MAX_LABEL
    // units, and null out-pointers are permitted.
    let ok = unsafe {
        GetVolumeInformationW(
            root.as_ptr(),
            label.as_mut_ptr(),
            MAX_LABEL as u32,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            0,
        )
    };
    if ok == 0 {
        return None;
    }
    let len = label.iter().position(|&c| c == 0).unwrap_or(MAX_LABEL);
    Some(String::from_utf16_lossy(&label[..len]))
}

impl DriveProbe for LogicalDriveProbe {
    fn name(&self) -> &str {
        "logical drives"
    }

    fn probe(&self) -> Result<Vec<OpticalDrive>, DriveError> {
        // SAFETY: no arguments; returns a bitmask.
        let mask = unsafe { GetLogicalDrives() };
        if mask == 0 {
            return Err(DriveError::Io {
                probe: self.name().to_string(),
                source: std::io::Error::last_os_error(),
            });
        }

        let mut drives = Vec::new();
        for bit in 0..26u8 {
            if mask & (1 << bit) == 0 {
                continue;
            }
            let letter = (b'A' + bit) as char;
            let root = wide(&format!("{}:\\", letter));

            // SAFETY: `root` is a NUL-terminated UTF-16 string.
            let kind = unsafe { GetDriveTypeW(root.as_ptr()) };
            if kind != DRIVE_CDROM {
                continue;
            }

            let id = format!("{}:", letter);
            let drive = match volume_label(&root) {
                Some(label) if !label.is_empty() => OpticalDrive::new(id, label, true),
                Some(_) => OpticalDrive::new(id, "Optical drive", true),
                None => OpticalDrive::new(id, "Optical drive", false),
            };
            drives.push(drive);
        }

        Ok(drives)
    }
}
