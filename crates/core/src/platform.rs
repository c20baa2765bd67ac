//! Server platforms a plugin version can be published for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Paper,
    Waterfall,
    Velocity,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Paper, Platform::Waterfall, Platform::Velocity];

    /// Upper-case identifier used on the wire and in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Paper => "PAPER",
            Platform::Waterfall => "WATERFALL",
            Platform::Velocity => "VELOCITY",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

impl FromStr for Platform {
    type Err = UnknownPlatform;

    /// Case-insensitive, so `paper` and `PAPER` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPlatform(s.to_string()))
    }
}
