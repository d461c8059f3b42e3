//! Severity classification of gaze and head-pose offsets

use serde::{Deserialize, Serialize};

use crate::calibration::PoseOffsets;
use crate::DmsConfig;

/// Band upper bounds (exclusive) for Mild and Moderate
pub type Bands = (f32, f32);

pub const GAZE_BANDS: Bands = (0.1, 0.2);
pub const HEAD_TURN_BANDS: Bands = (0.1, 0.2);
pub const LOOKING_UP_BANDS: Bands = (0.08, 0.15);
pub const HEAD_DROOP_BANDS: Bands = (0.07, 0.12);

/// Non-zero severity of a classified signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

/// Per-frame level of a graded signal, ordered `None < Mild < Moderate < Severe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum SignalLevel {
    #[default]
    None,
    Mild,
    Moderate,
    Severe,
}

impl SignalLevel {
    pub fn severity(self) -> Option<Severity> {
        match self {
            SignalLevel::None => None,
            SignalLevel::Mild => Some(Severity::Mild),
            SignalLevel::Moderate => Some(Severity::Moderate),
            SignalLevel::Severe => Some(Severity::Severe),
        }
    }

    pub fn is_active(self) -> bool {
        self != SignalLevel::None
    }
}

impl From<Severity> for SignalLevel {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Mild => SignalLevel::Mild,
            Severity::Moderate => SignalLevel::Moderate,
            Severity::Severe => SignalLevel::Severe,
        }
    }
}

/// Classify an offset against a threshold and two band bounds.
///
/// Nothing fires at or below `threshold`. Above it the first band whose
/// (exclusive) upper bound exceeds the offset wins.
pub fn classify(offset: f32, threshold: f32, bands: Bands) -> SignalLevel {
    if offset.is_nan() || offset <= threshold {
        return SignalLevel::None;
    }
    if offset < bands.0 {
        SignalLevel::Mild
    } else if offset < bands.1 {
        SignalLevel::Moderate
    } else {
        SignalLevel::Severe
    }
}

/// Gaze and head-pose levels for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoseLevels {
    pub gaze: SignalLevel,
    pub head_turn: SignalLevel,
    /// Looking upward
    pub head_tilt: SignalLevel,
    /// Head drooping downward
    pub head_droop: SignalLevel,
}

/// Classify calibrated offsets.
///
/// The vertical offset feeds either `head_tilt` or `head_droop` depending on
/// which side of the baseline the nose sits; the other stays `None`.
pub fn classify_pose(offsets: &PoseOffsets, config: &DmsConfig) -> PoseLevels {
    let mut levels = PoseLevels {
        gaze: classify(offsets.gaze, config.gaze_deviation_threshold, GAZE_BANDS),
        head_turn: classify(offsets.head_x, config.head_turn_threshold, HEAD_TURN_BANDS),
        ..Default::default()
    };

    if offsets.looking_up {
        levels.head_tilt = classify(offsets.head_y, config.head_turn_threshold, LOOKING_UP_BANDS);
    } else {
        levels.head_droop = classify(offsets.head_y, config.head_turn_threshold, HEAD_DROOP_BANDS);
    }
    levels
}
