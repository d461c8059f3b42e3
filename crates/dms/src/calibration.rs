//! Gaze and head-pose calibration baseline

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::features::FaceFeatures;

/// Neutral gaze/head position every deviation is measured against
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationBaseline {
    /// Normalized gaze x at calibration
    pub gaze_center: f32,
    /// Normalized nose x at calibration
    pub head_center_x: f32,
    /// Normalized nose y at calibration
    pub head_center_y: f32,
    pub is_calibrated: bool,
}

impl Default for CalibrationBaseline {
    fn default() -> Self {
        Self {
            gaze_center: 0.5,
            head_center_x: 0.5,
            head_center_y: 0.5,
            is_calibrated: false,
        }
    }
}

/// Absolute offsets of one frame from the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoseOffsets {
    pub gaze: f32,
    pub head_x: f32,
    pub head_y: f32,
    /// Nose sits above its calibrated position
    pub looking_up: bool,
}

/// Gaze and nose position observed on a frame, the input to calibration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseObservation {
    pub gaze_x_norm: f32,
    pub head_x: f32,
    pub head_y: f32,
}

impl From<&FaceFeatures> for PoseObservation {
    fn from(features: &FaceFeatures) -> Self {
        Self {
            gaze_x_norm: features.gaze_x_norm,
            head_x: features.head_x,
            head_y: features.head_y,
        }
    }
}

impl CalibrationBaseline {
    /// Overwrite the baseline with `observed` and enable deviation checks
    pub fn calibrate(&mut self, observed: PoseObservation) {
        *self = Self {
            gaze_center: observed.gaze_x_norm,
            head_center_x: observed.head_x,
            head_center_y: observed.head_y,
            is_calibrated: true,
        };
        info!(
            "Calibrated gaze center: {:.3}, head center: ({:.3}, {:.3})",
            self.gaze_center, self.head_center_x, self.head_center_y
        );
    }

    /// Offsets from the baseline, `None` while uncalibrated
    pub fn offsets(&self, observed: PoseObservation) -> Option<PoseOffsets> {
        if !self.is_calibrated {
            return None;
        }
        Some(PoseOffsets {
            gaze: (observed.gaze_x_norm - self.gaze_center).abs(),
            head_x: (observed.head_x - self.head_center_x).abs(),
            head_y: (observed.head_y - self.head_center_y).abs(),
            looking_up: observed.head_y < self.head_center_y,
        })
    }
}
