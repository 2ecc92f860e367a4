//! Format version resolution.
//!
//! The root descriptor of every item names the format version it was written
//! with. The set of versions is closed: anything outside it fails fast.

use serde::Serialize;

use crate::error::{Result, WorkflowalizerError};
use crate::parse::{self, WorkflowParser};

/// A known format version, ordered from oldest to newest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum FormatVersion {
    #[serde(rename = "2.0.0")]
    V2_0,
    #[serde(rename = "2.1.0")]
    V2_1,
    #[serde(rename = "2.2.0")]
    V2_2,
    #[serde(rename = "2.3.0")]
    V2_3,
    #[serde(rename = "2.4.0")]
    V2_4,
    #[serde(rename = "2.5.0")]
    V2_5,
    #[serde(rename = "2.6.0")]
    V2_6,
    #[serde(rename = "2.7.0")]
    V2_7,
    #[serde(rename = "2.8.0")]
    V2_8,
    #[serde(rename = "2.10.0")]
    V2_10,
    #[serde(rename = "3.1.0")]
    V3_1,
    #[serde(rename = "3.3.0")]
    V3_3,
    #[serde(rename = "3.5.0")]
    V3_5,
    #[serde(rename = "3.6.0")]
    V3_6,
    #[serde(rename = "3.7.0")]
    V3_7,
    #[serde(rename = "4.0.0")]
    V4_0,
    #[serde(rename = "4.1.0")]
    V4_1,
    #[serde(rename = "5.1.0")]
    V5_1,
    #[serde(rename = "5.2.0")]
    V5_2,
}

/// Group of format versions that share one parser strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Era {
    /// Everything before 3.6.
    Legacy,
    V3_6,
    V4_1,
    V5_1,
}

const KNOWN_VERSIONS: &[(&str, FormatVersion)] = &[
    ("2.0.0", FormatVersion::V2_0),
    ("2.1.0", FormatVersion::V2_1),
    ("2.2.0", FormatVersion::V2_2),
    ("2.3.0", FormatVersion::V2_3),
    ("2.4.0", FormatVersion::V2_4),
    ("2.5.0", FormatVersion::V2_5),
    ("2.6.0", FormatVersion::V2_6),
    ("2.7.0", FormatVersion::V2_7),
    ("2.8.0", FormatVersion::V2_8),
    ("2.10.0", FormatVersion::V2_10),
    ("3.1.0", FormatVersion::V3_1),
    ("3.3.0", FormatVersion::V3_3),
    ("3.5.0", FormatVersion::V3_5),
    ("3.6.0", FormatVersion::V3_6),
    ("3.7.0", FormatVersion::V3_7),
    ("4.0.0", FormatVersion::V4_0),
    ("4.1.0", FormatVersion::V4_1),
    ("5.1.0", FormatVersion::V5_1),
    ("5.2.0", FormatVersion::V5_2),
];

impl FormatVersion {
    /// Maps a raw version string onto a known version.
    pub fn resolve(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        KNOWN_VERSIONS
            .iter()
            .find(|(s, _)| *s == trimmed)
            .map(|(_, v)| *v)
            .ok_or_else(|| WorkflowalizerError::UnsupportedVersion(raw.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        KNOWN_VERSIONS
            .iter()
            .find(|(_, v)| v == self)
            .map(|(s, _)| *s)
            .unwrap_or("unknown")
    }

    pub fn era(&self) -> Era {
        if *self >= FormatVersion::V5_1 {
            Era::V5_1
        } else if *self >= FormatVersion::V4_1 {
            Era::V4_1
        } else if *self >= FormatVersion::V3_6 {
            Era::V3_6
        } else {
            Era::Legacy
        }
    }

    /// The parser strategy for this version's era.
    pub fn parser(&self) -> &'static dyn WorkflowParser {
        parse::parser_for(self.era())
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
