//! Structured outcome records for check invocations.
//!
//! In JSON mode every check run is summarized as exactly one JSON line,
//! success or failure. The record's field set is part of the wire contract:
//! `application`, `type`, `name`, `total`, `output`, `success`, `duration`.

use serde::Serialize;

/// Application tag carried by every outcome record
pub const APPLICATION: &str = "gremlin-fsck";

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Human,
    /// One JSON line per check invocation
    Json,
}

impl OutputFormat {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(OutputFormat::Human),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Structured summary of one check invocation.
///
/// Constructed once per invocation and never mutated; `total` is `-1` exactly
/// when the wrapped call failed, and `success == (total >= 0)` always holds.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    /// Constant application tag
    pub application: String,
    /// First underscore-delimited segment of the check name ("check", "clean")
    #[serde(rename = "type")]
    pub kind: String,
    /// Full check name
    pub name: String,
    /// Item count, or `-1` on failure
    pub total: i64,
    /// Text captured while the check ran (may be empty)
    pub output: String,
    /// `total >= 0`
    pub success: bool,
    /// Wall-clock duration, formatted as `"<ms, two decimals> ms"`
    pub duration: String,
}

impl CheckOutcome {
    /// Build an outcome record for a finished invocation.
    pub fn new(name: &str, total: i64, output: String, duration_ms: f64) -> Self {
        let kind = name.split('_').next().unwrap_or(name).to_string();
        CheckOutcome {
            application: APPLICATION.to_string(),
            kind,
            name: name.to_string(),
            total,
            output,
            success: total >= 0,
            duration: format!("{:.2} ms", duration_ms),
        }
    }

    /// Encode as a single compact JSON line.
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
