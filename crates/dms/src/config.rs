//! DMS configuration

use serde::{Deserialize, Serialize};
use crate::DmsError;

/// DMS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// Eye aspect ratio below which an eye counts as closed
    pub ear_threshold: f32,

    /// Consecutive closed frames before "Warning: Eyes Closed"
    pub eye_closed_frames_threshold: u32,

    /// Blinks per 60 s window that raise "High Blinking Rate"
    pub blink_rate_threshold: u32,

    /// Mouth aspect ratio above which a frame counts toward a yawn
    pub mar_threshold: f32,

    /// Open-mouth frames needed before "Warning: Yawning"
    pub yawn_threshold: u32,

    /// Gaze deviation from the calibrated center (0-1)
    pub gaze_deviation_threshold: f32,

    /// Head offset from the calibrated center, both axes (0-1)
    pub head_turn_threshold: f32,

    /// Hand-to-nose distance for "Hand near the face" (pixels)
    pub hand_near_face_px: u32,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.140,
            eye_closed_frames_threshold: 9,
            blink_rate_threshold: 5,
            mar_threshold: 0.6,
            yawn_threshold: 3,
            gaze_deviation_threshold: 0.05,
            head_turn_threshold: 0.08,
            hand_near_face_px: 200,
        }
    }
}

impl DmsConfig {
    /// Check every threshold sits inside its documented range
    pub fn validate(&self) -> Result<(), DmsError> {
        if !(self.ear_threshold > 0.0 && self.ear_threshold <= 1.0) {
            return Err(DmsError::Config(format!(
                "ear_threshold {} must be in (0, 1]",
                self.ear_threshold
            )));
        }
        if self.eye_closed_frames_threshold == 0 {
            return Err(DmsError::Config(
                "eye_closed_frames_threshold must be at least 1".to_string(),
            ));
        }
        if !(self.mar_threshold > 0.0 && self.mar_threshold.is_finite()) {
            return Err(DmsError::Config(format!(
                "mar_threshold {} must be positive",
                self.mar_threshold
            )));
        }
        for (name, value) in [
            ("gaze_deviation_threshold", self.gaze_deviation_threshold),
            ("head_turn_threshold", self.head_turn_threshold),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(DmsError::Config(format!("{} {} must be in [0, 1)", name, value)));
            }
        }
        if self.hand_near_face_px == 0 {
            return Err(DmsError::Config("hand_near_face_px must be positive".into()));
        }
        Ok(())
    }
}
