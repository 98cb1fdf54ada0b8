// Hand landmarks as delivered by the external hand detector.
//
// A detected hand is always 21 normalized keypoints in a fixed anatomical
// order. x and y are in [0,1] relative to frame width/height (y grows
// downwards), z is relative depth. Nothing here mutates a landmark after the
// detector produced it.

use std::ops::RangeInclusive;

use image::RgbImage;
use serde::Deserialize;

use crate::error::Error;

/// Number of keypoints per hand.
pub const LANDMARK_COUNT: usize = 21;

/// Normalized coordinates a detector may plausibly report.
pub const COORD_RANGE: RangeInclusive<f32> = -1.0..=2.0;

/// Named landmark positions, indexed 0..=20.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc,
    ThumbMcp,
    ThumbIp,
    ThumbTip,
    IndexMcp,
    IndexPip,
    IndexDip,
    IndexTip,
    MiddleMcp,
    MiddlePip,
    MiddleDip,
    MiddleTip,
    RingMcp,
    RingPip,
    RingDip,
    RingTip,
    PinkyMcp,
    PinkyPip,
    PinkyDip,
    PinkyTip,
}

impl HandLandmark {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Skeleton edges for overlays.
pub const HAND_CONNECTIONS: [(HandLandmark, HandLandmark); 21] = {
    use HandLandmark::*;
    [
        (Wrist, ThumbCmc),
        (ThumbCmc, ThumbMcp),
        (ThumbMcp, ThumbIp),
        (ThumbIp, ThumbTip),
        (Wrist, IndexMcp),
        (IndexMcp, IndexPip),
        (IndexPip, IndexDip),
        (IndexDip, IndexTip),
        (IndexMcp, MiddleMcp),
        (MiddleMcp, MiddlePip),
        (MiddlePip, MiddleDip),
        (MiddleDip, MiddleTip),
        (MiddleMcp, RingMcp),
        (RingMcp, RingPip),
        (RingPip, RingDip),
        (RingDip, RingTip),
        (RingMcp, PinkyMcp),
        (Wrist, PinkyMcp),
        (PinkyMcp, PinkyPip),
        (PinkyPip, PinkyDip),
        (PinkyDip, PinkyTip),
    ]
};

/// A single normalized keypoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    #[allow(dead_code)]
    pub z: f32,
}

impl Landmark {
    /// Planar distance in normalized units (depth ignored).
    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Detectors report points slightly off-frame; anything past one frame
    /// width/height outside [0,1], or non-finite, is garbage.
    pub fn is_plausible(&self) -> bool {
        COORD_RANGE.contains(&self.x) && COORD_RANGE.contains(&self.y)
    }

    /// Convert to pixel coordinates, truncating towards zero.
    /// Coordinates are clamped to `COORD_RANGE` first so lines to them stay short.
    pub fn to_pixel(&self, width: usize, height: usize) -> (i32, i32) {
        let x = self.x.clamp(*COORD_RANGE.start(), *COORD_RANGE.end());
        let y = self.y.clamp(*COORD_RANGE.start(), *COORD_RANGE.end());
        ((x * width as f32) as i32, (y * height as f32) as i32)
    }
}

/// One hand in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    pub handedness: String,
    pub score: f32,
}

impl HandObservation {
    #[inline]
    pub fn get(&self, which: HandLandmark) -> Landmark {
        self.landmarks[which.index()]
    }
}

/// Detector tuning handed to a landmark source when it is built.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub max_hands: usize,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl DetectorConfig {
    /// Two hands, strict thresholds (gesture session).
    pub fn gestures() -> Self {
        Self { max_hands: 2, min_detection_confidence: 0.7, min_tracking_confidence: 0.7 }
    }

    /// One hand, lenient thresholds (drawing session).
    pub fn drawing() -> Self {
        Self { max_hands: 1, min_detection_confidence: 0.5, min_tracking_confidence: 0.5 }
    }
}

/// A `[*.detector]` table as written; missing fields come from a preset.
#[derive(Debug, Deserialize)]
pub struct DetectorOverrides {
    max_hands: Option<usize>,
    min_detection_confidence: Option<f32>,
    min_tracking_confidence: Option<f32>,
}

impl DetectorOverrides {
    pub fn over(self, preset: DetectorConfig) -> DetectorConfig {
        DetectorConfig {
            max_hands: self.max_hands.unwrap_or(preset.max_hands),
            min_detection_confidence: self
                .min_detection_confidence
                .unwrap_or(preset.min_detection_confidence),
            min_tracking_confidence: self
                .min_tracking_confidence
                .unwrap_or(preset.min_tracking_confidence),
        }
    }
}

/// Anything that turns a frame into zero or more hands.
pub trait LandmarkSource {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandObservation>, Error>;
}
