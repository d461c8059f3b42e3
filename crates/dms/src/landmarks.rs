//! Face and hand landmark input types
//!
//! Landmarks arrive from the external face-mesh and hand detectors with
//! coordinates normalized to the frame (0-1). Pixel-space helpers convert them
//! using the frame geometry.

use serde::{Deserialize, Serialize};
use crate::DmsError;

/// Face mesh indices (refined 478-point topology)
pub mod mesh {
    /// Left eye: outer corner, two upper lid points, inner corner, two lower lid points
    pub const LEFT_EYE: [usize; 6] = [33, 160, 158, 133, 153, 144];
    pub const RIGHT_EYE: [usize; 6] = [362, 385, 387, 263, 373, 380];
    /// Mouth: top, bottom, left corner, right corner
    pub const MOUTH: [usize; 4] = [13, 14, 78, 308];
    pub const LEFT_IRIS: [usize; 4] = [474, 475, 476, 477];
    pub const RIGHT_IRIS: [usize; 4] = [469, 470, 471, 472];
    pub const NOSE_TIP: usize = 1;
    pub const LEFT_EAR_TIP: usize = 234;
    pub const RIGHT_EAR_TIP: usize = 454;

    /// Minimum landmark count covering every index above
    pub const MIN_POINTS: usize = 478;
}

/// Maximum number of hands considered per frame
pub const MAX_HANDS: usize = 2;

/// Point in pixel or normalized space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Mean of a set of points, `None` when empty
    pub fn centroid(points: &[Point]) -> Option<Point> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f32;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }
}

/// Single detector landmark
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Normalized x (0-1)
    pub x: f32,
    /// Normalized y (0-1)
    pub y: f32,
    /// Visibility score, when the detector provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, visibility: None }
    }

    pub fn with_visibility(mut self, visibility: f32) -> Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn normalized(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Position in pixel space for a `width` x `height` frame
    pub fn to_pixels(&self, width: u32, height: u32) -> Point {
        Point::new(self.x * width as f32, self.y * height as f32)
    }

    /// Visible only when a score is present and above `threshold`
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility.map_or(false, |v| v > threshold)
    }
}

/// Face mesh landmarks for one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceLandmarks {
    pub points: Vec<Landmark>,
}

impl FaceLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Landmark at a mesh index
    pub fn get(&self, index: usize) -> Result<&Landmark, DmsError> {
        self.points.get(index).ok_or(DmsError::KeypointsMissing)
    }

    /// Mutable landmark at a mesh index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Landmark> {
        self.points.get_mut(index)
    }

    /// Pixel positions for a fixed set of indices
    pub fn pixels<const N: usize>(
        &self,
        indices: &[usize; N],
        width: u32,
        height: u32,
    ) -> Result<[Point; N], DmsError> {
        let mut out = [Point::default(); N];
        for (slot, &idx) in out.iter_mut().zip(indices.iter()) {
            *slot = self.get(idx)?.to_pixels(width, height);
        }
        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Hand landmarks for one detected hand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandLandmarks {
    pub points: Vec<Landmark>,
}

impl HandLandmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// Normalized centroid of the hand
    pub fn centroid(&self) -> Option<Point> {
        let points: Vec<Point> = self.points.iter().map(Landmark::normalized).collect();
        Point::centroid(&points)
    }

    pub fn pixels(&self, width: u32, height: u32) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(move |lm| lm.to_pixels(width, height))
    }
}

/// Everything the detectors produced for a single camera frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Frame width (pixels)
    pub width: u32,
    /// Frame height (pixels)
    pub height: u32,
    /// Face mesh, `None` when no face was detected
    #[serde(default)]
    pub face: Option<FaceLandmarks>,
    /// Zero to two detected hands
    #[serde(default)]
    pub hands: Vec<HandLandmarks>,
}

impl LandmarkFrame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            face: None,
            hands: Vec::new(),
        }
    }

    pub fn with_face(mut self, face: FaceLandmarks) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_hand(mut self, hand: HandLandmarks) -> Self {
        self.hands.push(hand);
        self
    }

    pub fn face_detected(&self) -> bool {
        self.face.is_some()
    }
}
