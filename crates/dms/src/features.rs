//! Geometric features derived from one frame of landmarks
//!
//! Everything here is stateless. Ratios with a zero denominator return 0 so a
//! degenerate measurement reads as "not measurable" instead of failing.

use serde::{Deserialize, Serialize};

use crate::landmarks::{mesh, FaceLandmarks, HandLandmarks, Point};
use crate::DmsError;

/// Minimum visibility score for an iris landmark to count as seen
pub const IRIS_VISIBILITY_THRESHOLD: f32 = 0.1;
/// Visible iris landmarks needed before the iris position is trusted
pub const MIN_VISIBLE_IRIS_POINTS: usize = 4;

/// Horizontal tolerance around an ear tip (pixels)
pub const EAR_TOLERANCE_X_PX: f32 = 40.0;
/// Vertical tolerance around an ear tip (pixels)
pub const EAR_TOLERANCE_Y_PX: f32 = 90.0;

/// Eye aspect ratio over 6 ordered points.
///
/// `(|p1-p5| + |p2-p4|) / (2 * |p0-p3|)`, 0 when the eye has no width.
pub fn eye_aspect_ratio(points: &[Point; 6]) -> f32 {
    let a = points[1].distance(&points[5]);
    let b = points[2].distance(&points[4]);
    let c = points[0].distance(&points[3]);

    if c > 0.0 {
        (a + b) / (2.0 * c)
    } else {
        0.0
    }
}

/// Mouth aspect ratio, 0 when the mouth has no width
pub fn mouth_aspect_ratio(top: Point, bottom: Point, left: Point, right: Point) -> f32 {
    let vertical = top.distance(&bottom);
    let horizontal = left.distance(&right);

    if horizontal > 0.0 {
        vertical / horizontal
    } else {
        0.0
    }
}

/// Centroid of the iris landmarks
pub fn iris_center(points: &[Point]) -> Option<Point> {
    Point::centroid(points)
}

/// True when any hand point sits inside the tolerance box of either ear tip
pub fn hand_near_ear(ear_tips_px: &[Point; 2], hand: &HandLandmarks, width: u32, height: u32) -> bool {
    hand.pixels(width, height).any(|p| {
        ear_tips_px.iter().any(|ear| {
            (p.x - ear.x).abs() < EAR_TOLERANCE_X_PX && (p.y - ear.y).abs() < EAR_TOLERANCE_Y_PX
        })
    })
}

/// True when any hand point is closer than `threshold_px` to the face center.
///
/// Hand points are truncated to whole pixels, matching `face_center_px`.
pub fn hand_near_face(
    face_center_px: Point,
    hand: &HandLandmarks,
    width: u32,
    height: u32,
    threshold_px: f32,
) -> bool {
    hand.pixels(width, height)
        .map(|p| Point::new(p.x.trunc(), p.y.trunc()))
        .any(|p| face_center_px.distance(&p) < threshold_px)
}

/// Relative position of two hands, used for texting detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPairMetrics {
    /// Normalized centroid of each hand
    pub centroids: [Point; 2],
    /// Normalized distance between the centroids
    pub distance: f32,
}

impl HandPairMetrics {
    pub fn both_below(&self, y: f32) -> bool {
        self.centroids.iter().all(|c| c.y > y)
    }
}

/// Centroids and distance for a pair of hands, `None` if either hand is empty
pub fn hand_pair_metrics(first: &HandLandmarks, second: &HandLandmarks) -> Option<HandPairMetrics> {
    let a = first.centroid()?;
    let b = second.centroid()?;
    Some(HandPairMetrics {
        centroids: [a, b],
        distance: a.distance(&b),
    })
}

/// Face metrics for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceFeatures {
    pub left_ear: f32,
    pub right_ear: f32,
    /// Mean of both eyes
    pub ear: f32,
    /// Both eyes had a non-zero width
    pub ear_measurable: bool,
    pub mar: f32,
    /// Enough iris landmarks carried a visibility score
    pub iris_visible: bool,
    /// Iris midpoint y, normalized by frame height
    pub iris_y_norm: f32,
    /// Iris midpoint x, normalized by frame width
    pub gaze_x_norm: f32,
    /// Nose tip x (normalized)
    pub head_x: f32,
    /// Nose tip y (normalized)
    pub head_y: f32,
    /// Nose tip in whole pixels
    pub face_center_px: Point,
    /// Left and right ear tips (pixels)
    pub ear_tips_px: [Point; 2],
}

impl FaceFeatures {
    /// Extract all face metrics for a `width` x `height` frame
    pub fn extract(face: &FaceLandmarks, width: u32, height: u32) -> Result<Self, DmsError> {
        if face.len() < mesh::MIN_POINTS {
            return Err(DmsError::KeypointsMissing);
        }

        let left_eye = face.pixels(&mesh::LEFT_EYE, width, height)?;
        let right_eye = face.pixels(&mesh::RIGHT_EYE, width, height)?;
        let left_ear = eye_aspect_ratio(&left_eye);
        let right_ear = eye_aspect_ratio(&right_eye);
        let ear_measurable =
            left_eye[0].distance(&left_eye[3]) > 0.0 && right_eye[0].distance(&right_eye[3]) > 0.0;

        let [top, bottom, left, right] = face.pixels(&mesh::MOUTH, width, height)?;
        let mar = mouth_aspect_ratio(top, bottom, left, right);

        let visible_iris = mesh::LEFT_IRIS
            .iter()
            .chain(mesh::RIGHT_IRIS.iter())
            .filter_map(|&idx| face.get(idx).ok())
            .filter(|lm| lm.is_visible(IRIS_VISIBILITY_THRESHOLD))
            .count();

        let left_iris = iris_center(&face.pixels(&mesh::LEFT_IRIS, width, height)?)
            .ok_or(DmsError::KeypointsMissing)?;
        let right_iris = iris_center(&face.pixels(&mesh::RIGHT_IRIS, width, height)?)
            .ok_or(DmsError::KeypointsMissing)?;
        let iris_mid = left_iris.midpoint(&right_iris);
        let (gaze_x_norm, iris_y_norm) = normalize(iris_mid, width, height);

        let nose = face.get(mesh::NOSE_TIP)?;
        let nose_px = nose.to_pixels(width, height);

        Ok(Self {
            left_ear,
            right_ear,
            ear: (left_ear + right_ear) / 2.0,
            ear_measurable,
            mar,
            iris_visible: visible_iris >= MIN_VISIBLE_IRIS_POINTS,
            iris_y_norm,
            gaze_x_norm,
            head_x: nose.x,
            head_y: nose.y,
            face_center_px: Point::new(nose_px.x.trunc(), nose_px.y.trunc()),
            ear_tips_px: [
                face.get(mesh::LEFT_EAR_TIP)?.to_pixels(width, height),
                face.get(mesh::RIGHT_EAR_TIP)?.to_pixels(width, height),
            ],
        })
    }

    /// Iris cannot rule out a closed eye: not seen, or sitting low in the frame
    pub fn iris_missing_or_low(&self) -> bool {
        !self.iris_visible || self.iris_y_norm > 0.5
    }
}

fn normalize(p: Point, width: u32, height: u32) -> (f32, f32) {
    let x = if width > 0 { p.x / width as f32 } else { 0.0 };
    let y = if height > 0 { p.y / height as f32 } else { 0.0 };
    (x, y)
}
