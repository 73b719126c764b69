//! Discovered optical drives.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An optical drive that can be used as a burn target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OpticalDrive {
    /// Device path (`/dev/sr0`) or drive letter (`E:`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether a disc is present.
    pub media_loaded: bool,
}

impl OpticalDrive {
    pub fn new(id: impl Into<String>, name: impl Into<String>, media_loaded: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            media_loaded,
        }
    }
}

impl fmt::Display for OpticalDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let media = if self.media_loaded { "disc loaded" } else { "empty" };
        if self.name.is_empty() || self.name == self.id {
            write!(f, "{} ({})", self.id, media)
        } else {
            write!(f, "{} - {} ({})", self.id, self.name, media)
        }
    }
}
