//! Custom script records and the requests that register or apply them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Document location a script is injected into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLocation {
    /// Injected inside `<head>`
    Header,
    /// Injected before `</body>`
    Footer,
}

impl ScriptLocation {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Header => "header",
            Self::Footer => "footer",
        }
    }
}

impl fmt::Display for ScriptLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScriptLocation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" => Ok(Self::Header),
            "footer" => Ok(Self::Footer),
            other => Err(CoreError::InvalidLocation(other.to_owned())),
        }
    }
}

/// Kind of target a script can be applied to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Site,
    Page,
}

impl TargetType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Site => "site",
            Self::Page => "page",
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "site" => Ok(Self::Site),
            "page" => Ok(Self::Page),
            other => Err(CoreError::InvalidTargetType(other.to_owned())),
        }
    }
}

/// A script registered with a site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomCode {
    pub id: String,
    pub display_name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_copy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Script payload: either a hosted URL or inline source, never both.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptData {
    pub display_name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosted_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_code: Option<String>,
}

impl ScriptData {
    /// Builds script data from raw code, routing it to `hostedLocation` or
    /// `sourceCode` depending on `is_hosted`.
    #[must_use]
    pub fn new(display_name: String, version: String, code: String, is_hosted: bool) -> Self {
        let (hosted_location, source_code) =
            if is_hosted { (Some(code), None) } else { (None, Some(code)) };
        Self { display_name, version, hosted_location, source_code }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRegistrationRequest {
    pub site_id: String,
    pub is_hosted: bool,
    pub script_data: ScriptData,
}

/// One apply mutation: a script placed on one target at one location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CodeApplication {
    pub script_id: String,
    pub target_type: TargetType,
    pub target_id: String,
    pub location: ScriptLocation,
}
