//! Environment variable parsing with warn-level logging for invalid values.

use std::path::PathBuf;

use crate::constants::DATA_DIR_ENV;

/// Parse an environment variable with a default fallback.
///
/// - If the variable is not set: returns `default` silently (expected case).
/// - If the variable is set but cannot be parsed: logs a warning and returns `default`.
pub fn env_parse_with_default<T: std::str::FromStr + std::fmt::Display>(
    var: &str,
    default: T,
) -> T {
    match std::env::var(var) {
        Ok(v) => match v.parse() {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(
                    var,
                    value = %v,
                    default = %default,
                    "invalid env var value, using default"
                );
                default
            },
        },
        Err(_) => default,
    }
}

/// Parse an optional environment variable. Unset or blank yields `None`;
/// an unparseable value is logged and also yields `None`.
pub fn env_parse_optional<T: std::str::FromStr>(var: &str) -> Option<T> {
    let raw = std::env::var(var).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var, value = %raw, "invalid env var value, ignoring");
            None
        },
    }
}

/// Directory holding persisted session state.
///
/// `DESIGNER_EXT_DATA_DIR` wins when set; otherwise the platform data dir.
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join("designer-ext")
}
