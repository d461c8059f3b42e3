//! Display severity mapping

use serde::{Deserialize, Serialize};

/// Severity an alert message is displayed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplaySeverity {
    Low,
    Medium,
    High,
}

impl DisplaySeverity {
    /// Classify a message by the words it contains.
    ///
    /// First match wins: "Mild"/"Warning" are low, "Moderate"/"Alert" are
    /// medium, everything else (including "Severe") is high.
    pub fn from_message(message: &str) -> Self {
        if message.contains("Mild") || message.contains("Warning") {
            DisplaySeverity::Low
        } else if message.contains("Moderate") || message.contains("Alert") {
            DisplaySeverity::Medium
        } else {
            DisplaySeverity::High
        }
    }

    /// Overlay colour (RGB)
    pub fn rgb(self) -> [u8; 3] {
        match self {
            DisplaySeverity::Low => [255, 255, 255],
            DisplaySeverity::Medium => [255, 255, 0],
            DisplaySeverity::High => [255, 0, 0],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplaySeverity::Low => "low",
            DisplaySeverity::Medium => "medium",
            DisplaySeverity::High => "high",
        }
    }
}
