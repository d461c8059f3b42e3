#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use dms::landmarks::mesh;
use dms::{FaceLandmarks, HandLandmarks, Landmark, LandmarkFrame};

pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 1000;

/// Frame period at ~30 fps
pub const FRAME_MS: i64 = 33;

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// Time of frame `i` counted from [`start`]
pub fn frame_time(i: i64) -> DateTime<Utc> {
    start() + Duration::milliseconds(i * FRAME_MS)
}

/// Builds a face mesh with controllable eye, mouth, iris and nose geometry
/// on a [`WIDTH`] x [`HEIGHT`] frame.
#[derive(Debug, Clone, Copy)]
pub struct FaceBuilder {
    pub ear: f32,
    pub mar: f32,
    pub gaze_x: f32,
    pub iris_y: f32,
    pub iris_visibility: Option<f32>,
    pub nose: (f32, f32),
}

impl Default for FaceBuilder {
    fn default() -> Self {
        Self {
            ear: 0.30,
            mar: 0.20,
            gaze_x: 0.5,
            iris_y: 0.4,
            iris_visibility: None,
            nose: (0.5, 0.5),
        }
    }
}

impl FaceBuilder {
    pub fn ear(mut self, ear: f32) -> Self {
        self.ear = ear;
        self
    }

    pub fn closed(self) -> Self {
        self.ear(0.05)
    }

    pub fn mar(mut self, mar: f32) -> Self {
        self.mar = mar;
        self
    }

    pub fn yawning(self) -> Self {
        self.mar(0.8)
    }

    pub fn gaze(mut self, x: f32) -> Self {
        self.gaze_x = x;
        self
    }

    pub fn iris(mut self, y: f32, visibility: Option<f32>) -> Self {
        self.iris_y = y;
        self.iris_visibility = visibility;
        self
    }

    pub fn nose(mut self, x: f32, y: f32) -> Self {
        self.nose = (x, y);
        self
    }

    pub fn build(&self) -> FaceLandmarks {
        let mut face = FaceLandmarks::new(vec![Landmark::new(0.5, 0.5); mesh::MIN_POINTS]);
        let mut set = |idx: usize, lm: Landmark| {
            if let Some(slot) = face.get_mut(idx) {
                *slot = lm;
            }
        };

        // Square frame: EAR = lid gap / eye width, both in the same units
        let eye_width = 0.06;
        let gap = self.ear * eye_width;
        for (indices, x0) in [(mesh::LEFT_EYE, 0.40), (mesh::RIGHT_EYE, 0.54)] {
            let cy = 0.40;
            set(indices[0], Landmark::new(x0, cy));
            set(indices[1], Landmark::new(x0 + 0.02, cy - gap / 2.0));
            set(indices[2], Landmark::new(x0 + 0.04, cy - gap / 2.0));
            set(indices[3], Landmark::new(x0 + eye_width, cy));
            set(indices[4], Landmark::new(x0 + 0.04, cy + gap / 2.0));
            set(indices[5], Landmark::new(x0 + 0.02, cy + gap / 2.0));
        }

        let mouth_width = 0.10;
        let [top, bottom, left, right] = mesh::MOUTH;
        set(top, Landmark::new(0.5, 0.65 - self.mar * mouth_width / 2.0));
        set(bottom, Landmark::new(0.5, 0.65 + self.mar * mouth_width / 2.0));
        set(left, Landmark::new(0.45, 0.65));
        set(right, Landmark::new(0.55, 0.65));

        for indices in [mesh::LEFT_IRIS, mesh::RIGHT_IRIS] {
            let offsets = [(-0.005, 0.0), (0.0, -0.005), (0.005, 0.0), (0.0, 0.005)];
            for (&idx, (dx, dy)) in indices.iter().zip(offsets) {
                let mut lm = Landmark::new(self.gaze_x + dx, self.iris_y + dy);
                lm.visibility = self.iris_visibility;
                set(idx, lm);
            }
        }

        set(mesh::NOSE_TIP, Landmark::new(self.nose.0, self.nose.1));
        set(mesh::LEFT_EAR_TIP, Landmark::new(0.30, 0.45));
        set(mesh::RIGHT_EAR_TIP, Landmark::new(0.70, 0.45));
        face
    }

    pub fn frame(&self) -> LandmarkFrame {
        LandmarkFrame::new(WIDTH, HEIGHT).with_face(self.build())
    }
}

/// Hand whose 21 points all sit at normalized (x, y)
pub fn hand_at(x: f32, y: f32) -> HandLandmarks {
    HandLandmarks::new(vec![Landmark::new(x, y); 21])
}

pub fn frame_without_face() -> LandmarkFrame {
    LandmarkFrame::new(WIDTH, HEIGHT)
}
