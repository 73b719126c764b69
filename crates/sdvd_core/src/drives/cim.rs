//! Windows drive probe through the CIM `Win32_CDROMDrive` class.

use std::sync::Arc;

use serde::Deserialize;

use crate::models::OpticalDrive;
use crate::tools::{CommandLine, ProcessRunner, SystemRunner};

use super::{DriveError, DriveProbe};

const CIM_QUERY: &str = "Get-CimInstance -ClassName Win32_CDROMDrive | \
     Select-Object Drive,Name,MediaLoaded | ConvertTo-Json -Compress";

const PROBE_NAME: &str = "CIM";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CimDrive {
    drive: Option<String>,
    name: Option<String>,
    media_loaded: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CimResponse {
    Many(Vec<CimDrive>),
    One(CimDrive),
}

/// Parse `ConvertTo-Json` output: one object, an array, or nothing.
pub fn parse_cim_json(json: &str) -> Result<Vec<OpticalDrive>, serde_json::Error> {
    let json = json.trim();
    if json.is_empty() {
        return Ok(Vec::new());
    }

    let drives = match serde_json::from_str::<CimResponse>(json)? {
        CimResponse::Many(drives) => drives,
        CimResponse::One(drive) => vec![drive],
    };

    Ok(drives
        .into_iter()
        .filter_map(|d| {
            let id = d.drive.filter(|s| !s.trim().is_empty())?;
            let name = d.name.unwrap_or_else(|| id.clone());
            Some(OpticalDrive::new(id, name, d.media_loaded.unwrap_or(false)))
        })
        .collect())
}

/// Queries PowerShell for CD/DVD drives.
pub struct CimProbe {
    runner: Arc<dyn ProcessRunner>,
}

impl CimProbe {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemRunner::new()))
    }

    pub fn with_runner(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn command_line() -> CommandLine {
        let mut line = CommandLine::new("powershell");
        line.args = vec![
            "-NoProfile".into(),
            "-NonInteractive".into(),
            "-Command".into(),
            CIM_QUERY.into(),
        ];
        line
    }
}

impl Default for CimProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl DriveProbe for CimProbe {
    fn name(&self) -> &str {
        PROBE_NAME
    }

    fn probe(&self) -> Result<Vec<OpticalDrive>, DriveError> {
        let output = self
            .runner
            .run(&Self::command_line())
            .map_err(|e| DriveError::Query {
                probe: PROBE_NAME.to_string(),
                message: e.to_string(),
            })?;

        if !output.success() {
            return Err(DriveError::Query {
                probe: PROBE_NAME.to_string(),
                message: format!(
                    "powershell exited with code {}: {}",
                    output.exit_code,
                    output.stderr.trim()
                ),
            });
        }

        parse_cim_json(&output.stdout).map_err(|source| DriveError::Parse {
            probe: PROBE_NAME.to_string(),
            source,
        })
    }
}
