//! DMS analysis results and alerts

use alerting::{AlertSnapshot, DisplaySeverity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classifier::{Severity, SignalLevel};
use crate::debounce::EyeClosureLevel;
use crate::features::FaceFeatures;

/// Status shown when nothing fired on a frame
pub const NORMAL_STATUS: &str = "Normal and Active Driving";

/// Shown while no calibration has been captured
pub const CALIBRATION_PROMPT: &str = "Align face naturally and press 'c' to calibrate...";

/// DMS alert types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmsAlert {
    /// Eyes closed beyond the long-closure limit
    EyesClosedTooLong,

    /// Eyes closed beyond the configured frame threshold
    EyesClosed,

    /// Blink count over a window reached the configured rate
    HighBlinkRate,

    /// Sustained open mouth
    Yawning,

    GazeDeviation(Severity),

    HeadTurn(Severity),

    LookingUpward(Severity),

    HeadDroop(Severity),

    /// Hand held at an ear
    MobileCall,

    HandNearFace,

    /// Both hands low and close together
    Texting,

    ModerateDrowsiness,
    SevereDrowsiness,
    ModerateDistraction,
    SevereDistraction,
}

impl DmsAlert {
    /// Message written to the ledger
    pub fn message(&self) -> &'static str {
        use Severity::*;
        match self {
            DmsAlert::EyesClosedTooLong => "Alert: Eyes Closed Too Long",
            DmsAlert::EyesClosed => "Warning: Eyes Closed",
            DmsAlert::HighBlinkRate => "High Blinking Rate",
            DmsAlert::Yawning => "Warning: Yawning",
            DmsAlert::GazeDeviation(Mild) => "Mild Gaze Deviation",
            DmsAlert::GazeDeviation(Moderate) => "Moderate Gaze Deviation",
            DmsAlert::GazeDeviation(Severe) => "Severe Gaze Deviation",
            DmsAlert::HeadTurn(Mild) => "Mild Head Turn",
            DmsAlert::HeadTurn(Moderate) => "Moderate Head Turn",
            DmsAlert::HeadTurn(Severe) => "Severe Head Turn",
            DmsAlert::LookingUpward(Mild) => "Mild Looking Upward",
            DmsAlert::LookingUpward(Moderate) => "Moderate Looking Upward",
            DmsAlert::LookingUpward(Severe) => "Severe Looking Upward",
            DmsAlert::HeadDroop(Mild) => "Head drooping symptom",
            DmsAlert::HeadDroop(Moderate) => "Head drooping started",
            DmsAlert::HeadDroop(Severe) => "Head drooped",
            DmsAlert::MobileCall => "Likely mobile call",
            DmsAlert::HandNearFace => "Hand near the face",
            DmsAlert::Texting => "Possible texting observed",
            DmsAlert::ModerateDrowsiness => "Moderate DROWSINESS Observed",
            DmsAlert::SevereDrowsiness => "Severe DROWSINESS Observed",
            DmsAlert::ModerateDistraction => "Moderate DISTRACTION Observed",
            DmsAlert::SevereDistraction => "Severe DISTRACTION Observed",
        }
    }

    /// Compound conclusion rather than a single signal
    pub fn is_compound(&self) -> bool {
        matches!(
            self,
            DmsAlert::ModerateDrowsiness
                | DmsAlert::SevereDrowsiness
                | DmsAlert::ModerateDistraction
                | DmsAlert::SevereDistraction
        )
    }

    pub fn display_severity(&self) -> DisplaySeverity {
        DisplaySeverity::from_message(self.message())
    }
}

/// Signal levels derived on one frame; nothing carries over to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SignalLevels {
    pub eye_closed: EyeClosureLevel,
    pub yawn: bool,
    pub gaze: SignalLevel,
    pub head_turn: SignalLevel,
    pub head_tilt: SignalLevel,
    pub head_droop: SignalLevel,
    /// A hand is at an ear, at the face, or texting
    pub hands_occupied: bool,
    pub mobile_call: bool,
    pub hand_near_face: bool,
    pub texting: bool,
}

/// Complete DMS analysis result for one frame
#[derive(Debug, Clone, Serialize)]
pub struct DmsAnalysis {
    pub timestamp: DateTime<Utc>,

    /// Whether a usable face was detected
    pub face_detected: bool,

    /// Number of hands considered
    pub hands_detected: usize,

    /// Face metrics (if detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FaceFeatures>,

    /// Average eye aspect ratio (if detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f32>,

    /// Whether gaze/head checks were active
    pub calibrated: bool,

    pub levels: SignalLevels,

    /// Alerts fired on this frame, in firing order
    pub fired: Vec<DmsAlert>,

    /// Last message fired, or [`NORMAL_STATUS`]
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_prompt: Option<&'static str>,

    /// Active ledger entries after expiry
    pub alerts: Vec<AlertSnapshot>,
}

impl DmsAnalysis {
    /// Check if any alerts are active
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    /// Check if `alert` fired on this frame
    pub fn fired(&self, alert: DmsAlert) -> bool {
        self.fired.contains(&alert)
    }

    /// Highest display severity among active alerts
    pub fn highest_severity(&self) -> Option<DisplaySeverity> {
        self.alerts.iter().map(|a| a.severity).max()
    }

    /// Whether an active ledger entry carries `message`
    pub fn shows(&self, message: &str) -> bool {
        self.alerts.iter().any(|a| a.message == message)
    }
}
