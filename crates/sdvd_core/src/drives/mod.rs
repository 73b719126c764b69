//! Optical drive discovery.
//!
//! A [`DriveEnumerator`] chains platform probes into one lazy sequence of
//! [`OpticalDrive`]s. A failing probe is logged and skipped so the next,
//! simpler probe still gets a chance; no error reaches the caller.

mod cim;
mod sysfs;
#[cfg(windows)]
mod win32;

use std::collections::HashSet;
use std::io;

use thiserror::Error;

use crate::models::OpticalDrive;

pub use cim::{parse_cim_json, CimProbe};
pub use sysfs::{DevNodeProbe, SysfsProbe};
#[cfg(windows)]
pub use win32::LogicalDriveProbe;

/// Failure inside a single probe.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("{probe}: I/O error: {source}")]
    Io {
        probe: String,
        #[source]
        source: io::Error,
    },

    #[error("{probe}: query failed: {message}")]
    Query { probe: String, message: String },

    #[error("{probe}: unreadable response: {source}")]
    Parse {
        probe: String,
        #[source]
        source: serde_json::Error,
    },
}

/// One way of discovering drives.
pub trait DriveProbe: Send + Sync {
    fn name(&self) -> &str;

    fn probe(&self) -> Result<Vec<OpticalDrive>, DriveError>;
}

/// Ordered set of probes.
#[derive(Default)]
pub struct DriveEnumerator {
    probes: Vec<Box<dyn DriveProbe>>,
}

impl DriveEnumerator {
    pub fn new() -> Self {
        Self { probes: Vec::new() }
    }

    pub fn with_probe<P: DriveProbe + 'static>(mut self, probe: P) -> Self {
        self.probes.push(Box::new(probe));
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }

    /// Start a fresh enumeration. Probes run only as the sequence is consumed.
    pub fn iter(&self) -> Drives<'_> {
        Drives {
            probes: self.probes.iter(),
            pending: Vec::new().into_iter(),
            seen: HashSet::new(),
        }
    }
}

/// Lazy drive sequence, de-duplicated by device id.
pub struct Drives<'a> {
    probes: std::slice::Iter<'a, Box<dyn DriveProbe>>,
    pending: std::vec::IntoIter<OpticalDrive>,
    seen: HashSet<String>,
}

impl Iterator for Drives<'_> {
    type Item = OpticalDrive;

    fn next(&mut self) -> Option<OpticalDrive> {
        loop {
            for drive in self.pending.by_ref() {
                if self.seen.insert(drive.id.clone()) {
                    return Some(drive);
                }
            }

            let probe = self.probes.next()?;
            tracing::debug!("Probing optical drives via {}", probe.name());
            self.pending = match probe.probe() {
                Ok(drives) => {
                    tracing::debug!("{} reported {} drive(s)", probe.name(), drives.len());
                    drives.into_iter()
                }
                Err(e) => {
                    tracing::error!("Drive enumeration failed: {}", e);
                    Vec::new().into_iter()
                }
            };
        }
    }
}

impl<'a> IntoIterator for &'a DriveEnumerator {
    type Item = OpticalDrive;
    type IntoIter = Drives<'a>;

    fn into_iter(self) -> Drives<'a> {
        self.iter()
    }
}
