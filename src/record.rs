//! Structured log records
//!
//! A record serializes to one JSON object per line: level, message,
//! timestamp and call site, with any caller-supplied fields flattened into
//! the same object.

use std::panic::Location;

use chrono::{Local, SecondsFormat};
use serde::Serialize;
use serde_json::Value;

/// Caller-supplied structured fields attached to a record.
pub type LogFields = serde_json::Map<String, Value>;

/// Severity of a record. Custom channels emit at info level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug,
    Info,
    Error,
}

impl Level {
    /// Channel name used for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Error => "error",
        }
    }
}

/// Call-site metadata captured at the facade boundary.
///
/// Captured with `#[track_caller]` rather than walking the stack at a fixed
/// depth, so it stays correct regardless of how the facade layers its calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    /// Capture the immediate caller's location
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// A single structured record
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: Level,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(flatten)]
    pub fields: LogFields,
}

impl LogRecord {
    /// Create a record stamped with the current local time
    pub fn new(
        level: Level,
        message: impl Into<String>,
        fields: LogFields,
        site: Option<CallSite>,
    ) -> Self {
        Self {
            timestamp: Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            level,
            message: message.into(),
            file: site.map(|s| s.file.to_string()),
            line: site.map(|s| s.line),
            fields,
        }
    }

    /// Serialize to a single JSON line, without the trailing newline.
    ///
    /// Returns None if serialization fails; emission is fire-and-forget.
    pub(crate) fn to_json_line(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Level::Debug).unwrap(), "\"debug\"");
        assert_eq!(serde_json::to_string(&Level::Info).unwrap(), "\"info\"");
        assert_eq!(serde_json::to_string(&Level::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn test_level_channel_names() {
        assert_eq!(Level::Debug.as_str(), "debug");
        assert_eq!(Level::Info.as_str(), "info");
        assert_eq!(Level::Error.as_str(), "error");
    }

    #[test]
    fn test_call_site_capture() {
        let site = CallSite::here();
        assert!(site.file.ends_with("record.rs"));
        assert!(site.line > 0);
    }

    #[test]
    fn test_record_json_shape() {
        let mut fields = LogFields::new();
        fields.insert("request_id".into(), Value::from("abc-123"));

        let record = LogRecord::new(Level::Info, "hello", fields, Some(CallSite::here()));
        let json: Value = serde_json::from_str(&record.to_json_line().unwrap()).unwrap();

        assert_eq!(json["level"], "info");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["request_id"], "abc-123");
        assert!(json["timestamp"].as_str().is_some());
        assert!(json["file"].as_str().unwrap().ends_with("record.rs"));
        assert!(json["line"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_record_without_call_site_omits_location_keys() {
        let record = LogRecord::new(Level::Error, "boom", LogFields::new(), None);
        let json: Value = serde_json::from_str(&record.to_json_line().unwrap()).unwrap();

        assert_eq!(json["level"], "error");
        assert!(json.get("file").is_none());
        assert!(json.get("line").is_none());
    }
}
