use crate::constants::{LANDMARK_COUNT, PALM_CENTER_LANDMARK, WRIST_LANDMARK};
use glam::Vec2;

/// Gesture categories produced by the external hand classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureCategory {
    OpenPalm,
    ClosedFist,
    Victory,
    PointingUp,
    ThumbUp,
    ILoveYou,
    None,
}

impl GestureCategory {
    /// Parse a classifier label. Unknown labels map to `None`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Open_Palm" => Self::OpenPalm,
            "Closed_Fist" => Self::ClosedFist,
            "Victory" => Self::Victory,
            "Pointing_Up" => Self::PointingUp,
            "Thumb_Up" => Self::ThumbUp,
            "ILoveYou" => Self::ILoveYou,
            _ => Self::None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OpenPalm => "Open_Palm",
            Self::ClosedFist => "Closed_Fist",
            Self::Victory => "Victory",
            Self::PointingUp => "Pointing_Up",
            Self::ThumbUp => "Thumb_Up",
            Self::ILoveYou => "ILoveYou",
            Self::None => "None",
        }
    }
}

/// The 21 normalized image-space points of one tracked hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Vec2; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec2; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Build from a classifier landmark list; `None` unless it has exactly
    /// 21 points.
    pub fn from_slice(points: &[Vec2]) -> Option<Self> {
        let points: [Vec2; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { points })
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn wrist(&self) -> Vec2 {
        self.points[WRIST_LANDMARK]
    }

    pub fn palm_center(&self) -> Vec2 {
        self.points[PALM_CENTER_LANDMARK]
    }
}

/// One processed classifier frame: the top-ranked gesture and the primary
/// hand's landmarks.
#[derive(Clone, Debug, PartialEq)]
pub struct GestureEvent {
    pub category: GestureCategory,
    pub confidence: f32,
    pub landmarks: Option<HandLandmarks>,
    pub timestamp_ms: u64,
}

impl GestureEvent {
    pub fn new(category: GestureCategory, confidence: f32, timestamp_ms: u64) -> Self {
        Self {
            category,
            confidence,
            landmarks: None,
            timestamp_ms,
        }
    }

    pub fn with_landmarks(mut self, landmarks: HandLandmarks) -> Self {
        self.landmarks = Some(landmarks);
        self
    }
}

/// A single ranked classifier guess.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub label: String,
    pub score: f32,
}

/// Raw classifier result for one frame: ranked guesses for the primary hand
/// and zero or more landmark sets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifierOutput {
    pub classifications: Vec<Classification>,
    pub landmarks: Vec<Vec<Vec2>>,
}

impl ClassifierOutput {
    /// Reduce to the engine's input: top-ranked classification plus the
    /// first landmark set. `None` when nothing was classified.
    pub fn top_event(&self, timestamp_ms: u64) -> Option<GestureEvent> {
        let top = self.classifications.first()?;
        Some(GestureEvent {
            category: GestureCategory::from_label(&top.label),
            confidence: top.score,
            landmarks: self
                .landmarks
                .first()
                .and_then(|points| HandLandmarks::from_slice(points)),
            timestamp_ms,
        })
    }
}

/// Mirror horizontally and invert vertically: camera image space to the
/// scene's hand coordinates.
#[inline]
pub fn mirror_to_scene(p: Vec2) -> Vec2 {
    Vec2::new(1.0 - p.x, 1.0 - p.y)
}

/// Bones of the 21-point hand model, drawn by the camera preview overlay.
#[rustfmt::skip]
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1), (1, 2), (2, 3), (3, 4), // thumb
    (0, 5), (5, 6), (6, 7), (7, 8), // index
    (5, 9), (9, 10), (10, 11), (11, 12), // middle
    (9, 13), (13, 14), (14, 15), (15, 16), // ring
    (13, 17), (17, 18), (18, 19), (19, 20), // pinky
    (0, 17), // palm base
];

/// Pixel-space bone segments for an overlay of `width` x `height`.
pub fn skeleton_segments(landmarks: &HandLandmarks, width: u32, height: u32) -> Vec<(Vec2, Vec2)> {
    let size = Vec2::new(width as f32, height as f32);
    let points = landmarks.points();
    HAND_CONNECTIONS
        .iter()
        .map(|&(a, b)| (points[a] * size, points[b] * size))
        .collect()
}

/// Pixel-space joint positions for the same overlay.
pub fn skeleton_joints(landmarks: &HandLandmarks, width: u32, height: u32) -> Vec<Vec2> {
    let size = Vec2::new(width as f32, height as f32);
    landmarks.points().iter().map(|p| *p * size).collect()
}
