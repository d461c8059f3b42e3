//! Alerting System
//!
//! Holds the time-windowed set of active driver-state alerts and maps each
//! message to the severity it is displayed with.

mod ledger;
mod severity;

pub use ledger::{AlertEntry, AlertLedger, AlertSnapshot, LedgerConfig, DEFAULT_ALERT_DURATION_MS};
pub use severity::DisplaySeverity;

use thiserror::Error;

/// Alerting error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlertError {
    #[error("Alert duration {0} ms is out of range [1, {}]", ledger::MAX_ALERT_DURATION_MS)]
    InvalidDuration(u64),
}
