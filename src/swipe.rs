// Horizontal swipes from a short window of recent hand positions.

use std::collections::VecDeque;
use std::fmt;

use crate::landmarks::{HandLandmark, HandObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Swipe Left",
            Self::Right => "Swipe Right",
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeStatus {
    /// Not enough samples yet.
    Collecting,
    Detected(SwipeDirection),
    None,
}

/// Fixed-capacity FIFO of recent hands, oldest first.
#[derive(Debug, Clone)]
pub struct LandmarkHistory {
    samples: VecDeque<HandObservation>,
    capacity: usize,
}

impl LandmarkHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { samples: VecDeque::with_capacity(capacity + 1), capacity }
    }

    /// Append, then evict from the front until within capacity.
    pub fn push(&mut self, hand: HandObservation) {
        self.samples.push_back(hand);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn oldest(&self) -> Option<&HandObservation> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&HandObservation> {
        self.samples.back()
    }
}

impl Default for LandmarkHistory {
    fn default() -> Self {
        Self::new(21)
    }
}

pub struct SwipeDetector {
    pub min_samples: usize,
    pub distance: f32,
    pub reference: HandLandmark,
}

impl Default for SwipeDetector {
    fn default() -> Self {
        Self { min_samples: 10, distance: 0.3, reference: HandLandmark::Wrist }
    }
}

impl SwipeDetector {
    /// Compare the reference landmark's x in the oldest and newest samples.
    pub fn detect(&self, history: &LandmarkHistory) -> SwipeStatus {
        if history.len() < self.min_samples {
            return SwipeStatus::Collecting;
        }
        let (Some(oldest), Some(newest)) = (history.oldest(), history.newest()) else {
            return SwipeStatus::Collecting;
        };
        let first = oldest.get(self.reference).x;
        let last = newest.get(self.reference).x;

        if first - last > self.distance {
            SwipeStatus::Detected(SwipeDirection::Right)
        } else if last - first > self.distance {
            SwipeStatus::Detected(SwipeDirection::Left)
        } else {
            SwipeStatus::None
        }
    }
}
