//! Alert Ledger Implementation

use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::severity::DisplaySeverity;
use crate::AlertError;

/// Default time an alert stays active (3 seconds)
pub const DEFAULT_ALERT_DURATION_MS: u64 = 3_000;

/// Upper bound accepted for the alert duration (1 hour)
pub(crate) const MAX_ALERT_DURATION_MS: u64 = 3_600_000;

/// Local wall-clock label format attached to every entry
const LABEL_FORMAT: &str = "%H:%M:%S";

/// Ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// How long an entry stays active after it was recorded (milliseconds)
    pub alert_duration_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            alert_duration_ms: DEFAULT_ALERT_DURATION_MS,
        }
    }
}

impl LedgerConfig {
    /// Check the configured duration is usable
    pub fn validate(&self) -> Result<(), AlertError> {
        if self.alert_duration_ms == 0 || self.alert_duration_ms > MAX_ALERT_DURATION_MS {
            return Err(AlertError::InvalidDuration(self.alert_duration_ms));
        }
        Ok(())
    }

    /// Alert duration as a signed chrono duration
    pub fn alert_duration(&self) -> Duration {
        Duration::milliseconds(self.alert_duration_ms.min(MAX_ALERT_DURATION_MS) as i64)
    }
}

/// One firing of an alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEntry {
    /// `HH:MM:SS` label of the firing time on the local clock
    pub label: String,
    /// Alert message text
    pub message: String,
    /// Exact firing time, used for expiry
    pub created_at: DateTime<Utc>,
}

impl AlertEntry {
    /// Text shown on screen: label followed by message
    pub fn text(&self) -> String {
        format!("{} {}", self.label, self.message)
    }

    /// Display severity derived from the message text
    pub fn severity(&self) -> DisplaySeverity {
        DisplaySeverity::from_message(&self.message)
    }

    /// Whether the entry is still active at `now`
    pub fn is_active(&self, now: DateTime<Utc>, duration: Duration) -> bool {
        now.signed_duration_since(self.created_at) <= duration
    }
}

/// Read-only view of an active entry handed to the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertSnapshot {
    pub label: String,
    pub message: String,
    pub severity: DisplaySeverity,
    /// RGB colour for the overlay
    pub color: [u8; 3],
}

impl From<&AlertEntry> for AlertSnapshot {
    fn from(entry: &AlertEntry) -> Self {
        let severity = entry.severity();
        Self {
            label: entry.label.clone(),
            message: entry.message.clone(),
            severity,
            color: severity.rgb(),
        }
    }
}

/// Time-windowed list of active alerts.
///
/// Every firing appends a new entry, so a message re-triggered on later frames
/// accumulates entries instead of refreshing one. Entries leave the ledger only
/// through [`AlertLedger::expire`].
#[derive(Debug, Clone)]
pub struct AlertLedger {
    /// Active window
    alert_duration: Duration,
    /// Entries in insertion order
    entries: Vec<AlertEntry>,
    /// Entries recorded since creation (for statistics)
    total_recorded: usize,
}

impl AlertLedger {
    /// Create a new ledger
    pub fn new(config: LedgerConfig) -> Self {
        info!("Creating alert ledger with config: {:?}", config);
        Self {
            alert_duration: config.alert_duration(),
            entries: Vec::new(),
            total_recorded: 0,
        }
    }

    /// Record a firing of `message` at `now`
    pub fn record(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> &AlertEntry {
        let entry = AlertEntry {
            label: now.with_timezone(&Local).format(LABEL_FORMAT).to_string(),
            message: message.into(),
            created_at: now,
        };
        debug!("Alert recorded [{}]: {}", entry.severity().as_str(), entry.text());

        self.total_recorded += 1;
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    /// Drop every entry older than the alert duration, returning how many were removed
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let duration = self.alert_duration;
        self.entries.retain(|entry| entry.is_active(now, duration));

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("Expired {} alert(s), {} active", removed, self.entries.len());
        }
        removed
    }

    /// Active entries in insertion order
    pub fn snapshot(&self) -> Vec<AlertSnapshot> {
        self.entries.iter().map(AlertSnapshot::from).collect()
    }

    /// Borrow the raw entries
    pub fn entries(&self) -> &[AlertEntry] {
        &self.entries
    }

    /// Whether any active entry carries `message`
    pub fn contains(&self, message: &str) -> bool {
        self.entries.iter().any(|e| e.message == message)
    }

    /// Number of active entries carrying `message`
    pub fn count_of(&self, message: &str) -> usize {
        self.entries.iter().filter(|e| e.message == message).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries recorded since creation, including expired ones
    pub fn total_recorded(&self) -> usize {
        self.total_recorded
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for AlertLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}
