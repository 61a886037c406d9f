//! Severity classification for outgoing events
//!
//! The inbound logging contract speaks the eight syslog-flavored level names
//! (`debug` .. `emergency`); the error-tracking backend only understands five.
//! The mapping is total: anything unrecognized is reported as `error` rather
//! than dropped.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity classifies an event for the error-tracking backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Severity {
    /// Map an inbound report level name to a backend severity.
    ///
    /// Unknown or unsupported names fall back to [`Severity::Error`].
    pub fn from_report_level(level: &str) -> Self {
        match level {
            "debug" => Severity::Debug,
            "info" => Severity::Info,
            "notice" | "warning" => Severity::Warning,
            "emergency" | "critical" => Severity::Fatal,
            // "alert", "error" and anything else
            _ => Severity::Error,
        }
    }

    /// Map a `log` facade level to a backend severity.
    pub fn from_log_level(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_level_mapping_is_total() {
        let cases = [
            ("debug", Severity::Debug),
            ("info", Severity::Info),
            ("notice", Severity::Warning),
            ("warning", Severity::Warning),
            ("emergency", Severity::Fatal),
            ("critical", Severity::Fatal),
            ("alert", Severity::Error),
            ("error", Severity::Error),
        ];
        for (input, expected) in cases {
            assert_eq!(Severity::from_report_level(input), expected, "{input}");
        }
    }

    #[test]
    fn unknown_levels_default_to_error() {
        assert_eq!(Severity::from_report_level("verbose"), Severity::Error);
        assert_eq!(Severity::from_report_level(""), Severity::Error);
        assert_eq!(Severity::from_report_level("WARNING"), Severity::Error);
    }

    #[test]
    fn severity_is_ordered() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn serializes_to_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
    }

    #[test]
    fn log_facade_levels_map() {
        assert_eq!(Severity::from_log_level(log::Level::Warn), Severity::Warning);
        assert_eq!(Severity::from_log_level(log::Level::Trace), Severity::Debug);
    }
}
