//! Script application status per target, and the keys it is cached under.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::script::ScriptLocation;

/// Whether one script is applied to one target, and where.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TargetStatus {
    pub is_applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ScriptLocation>,
}

impl TargetStatus {
    #[must_use]
    pub const fn applied(location: Option<ScriptLocation>) -> Self {
        Self { is_applied: true, location }
    }

    #[must_use]
    pub const fn not_applied() -> Self {
        Self { is_applied: false, location: None }
    }
}

/// Target ID to status. A missing key means "not determined yet".
pub type ApplicationStatus = BTreeMap<String, TargetStatus>;

/// Backend record for one script applied to a target.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppliedScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<ScriptLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Script ID to application record, for one target.
pub type ScriptStatus = BTreeMap<String, AppliedScript>;

/// Raw status payload: target ID to every script applied there.
pub type StatusPayload = BTreeMap<String, ScriptStatus>;

/// Reduces a target's raw script map to the status of a single script.
#[must_use]
pub fn status_for_script(scripts: &ScriptStatus, script_id: &str) -> TargetStatus {
    match scripts.get(script_id) {
        Some(applied) => TargetStatus::applied(applied.location),
        None => TargetStatus::not_applied(),
    }
}

/// Cache identity of a status query.
///
/// Page IDs are sorted and deduplicated, so permutations of the same page set
/// map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StatusCacheKey {
    script_id: String,
    site_id: String,
    pages: String,
}

impl StatusCacheKey {
    #[must_use]
    pub fn new(script_id: &str, site_id: &str, page_ids: &[String]) -> Self {
        let mut sorted: Vec<&str> = page_ids.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted.dedup();
        Self {
            script_id: script_id.to_owned(),
            site_id: site_id.to_owned(),
            pages: sorted.join(","),
        }
    }

    #[must_use]
    pub fn script_id(&self) -> &str {
        &self.script_id
    }

    #[must_use]
    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// Comma-joined, sorted page component.
    #[must_use]
    pub fn pages(&self) -> &str {
        &self.pages
    }
}

impl fmt::Display for StatusCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "applicationStatus:{}:{}:{}", self.script_id, self.site_id, self.pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_key_is_order_independent() {
        let a = StatusCacheKey::new("s", "site", &ids(&["p3", "p1", "p2"]));
        let b = StatusCacheKey::new("s", "site", &ids(&["p2", "p3", "p1"]));
        assert_eq!(a, b);
        assert_eq!(a.pages(), "p1,p2,p3");
    }

    #[test]
    fn test_key_differs_by_script_and_site() {
        let pages = ids(&["p1"]);
        let base = StatusCacheKey::new("s1", "site", &pages);
        assert_ne!(base, StatusCacheKey::new("s2", "site", &pages));
        assert_ne!(base, StatusCacheKey::new("s1", "other", &pages));
    }

    #[test]
    fn test_key_ignores_duplicate_pages() {
        let a = StatusCacheKey::new("s", "site", &ids(&["p1", "p1", "p2"]));
        let b = StatusCacheKey::new("s", "site", &ids(&["p2", "p1"]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_key_display() {
        let key = StatusCacheKey::new("s", "site", &ids(&["b", "a"]));
        assert_eq!(key.to_string(), "applicationStatus:s:site:a,b");
    }

    #[test]
    fn test_status_for_script_present_and_absent() {
        let mut scripts = ScriptStatus::new();
        scripts.insert(
            "s1".to_owned(),
            AppliedScript { location: Some(ScriptLocation::Footer), version: None },
        );
        assert_eq!(
            status_for_script(&scripts, "s1"),
            TargetStatus::applied(Some(ScriptLocation::Footer))
        );
        assert_eq!(status_for_script(&scripts, "s2"), TargetStatus::not_applied());
    }

    #[test]
    fn test_not_applied_serializes_without_location() {
        let json = serde_json::to_value(TargetStatus::not_applied()).unwrap();
        assert_eq!(json, serde_json::json!({ "isApplied": false }));
    }
}
