//! Space and page types.

use serde::Deserialize;

use super::string_or_number;

/// Confluence space.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Space {
    /// Space id, used by the v2 pages API.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Space key.
    #[serde(default)]
    pub key: String,
}

/// Confluence page as returned by the v2 API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    /// Page id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Page title.
    #[serde(default)]
    pub title: String,
    /// Version information, absent in some list responses.
    #[serde(default)]
    pub version: Option<Version>,
}

impl Page {
    /// Current version number, `1` when the response carried none.
    #[must_use]
    pub fn current_version(&self) -> u32 {
        self.version.as_ref().map_or(1, |v| v.number)
    }
}

/// Page version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Version {
    /// Version number.
    pub number: u32,
}
