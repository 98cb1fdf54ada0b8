// Per-frame gesture labelling: static poses first, swipes as fallback.

use std::fmt;

use crate::config::GestureConfig;
use crate::landmarks::HandObservation;
use crate::pose::{Pose, PoseClassifier};
use crate::swipe::{LandmarkHistory, SwipeDetector, SwipeDirection, SwipeStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureLabel {
    Pose(Pose),
    Swipe(SwipeDirection),
    Collecting,
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pose(p) => fmt::Display::fmt(p, f),
            Self::Swipe(d) => fmt::Display::fmt(d, f),
            Self::Collecting => f.write_str("Collecting Data..."),
        }
    }
}

pub struct GestureRecognizer {
    classifier: PoseClassifier,
    swipes: SwipeDetector,
    history: LandmarkHistory,
    clear_on_hand_loss: bool,
}

impl GestureRecognizer {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            classifier: PoseClassifier::new(config.ok_distance),
            swipes: SwipeDetector {
                min_samples: config.min_samples,
                distance: config.swipe_distance,
                ..SwipeDetector::default()
            },
            history: LandmarkHistory::new(config.history_capacity),
            clear_on_hand_loss: config.clear_history_on_hand_loss,
        }
    }

    /// Feed this frame's hands; only the first (primary) hand is tracked.
    pub fn observe(&mut self, hands: &[HandObservation]) -> Option<GestureLabel> {
        let Some(hand) = hands.first() else {
            if self.clear_on_hand_loss && !self.history.is_empty() {
                log::trace!("Hand lost, dropping {} history samples", self.history.len());
                self.history.clear();
            }
            return None;
        };

        log::trace!("Tracking {} hand (score {:.2})", hand.handedness, hand.score);
        self.history.push(hand.clone());

        if let Some(pose) = self.classifier.classify(hand) {
            return Some(GestureLabel::Pose(pose));
        }
        match self.swipes.detect(&self.history) {
            SwipeStatus::Collecting => Some(GestureLabel::Collecting),
            SwipeStatus::Detected(dir) => Some(GestureLabel::Swipe(dir)),
            SwipeStatus::None => None,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::HandLandmark::*;
    use crate::landmarks::fixtures::{flat_hand, set};

    /// Every fingertip level with its pip: nothing extended, no pose.
    fn fist_at(x: f32) -> HandObservation {
        let mut h = flat_hand();
        set(&mut h, Wrist, x, 0.8);
        h
    }

    fn rock_on() -> HandObservation {
        // Left hand layout: pinky base left of index base, thumb tip further left.
        let mut h = flat_hand();
        set(&mut h, IndexMcp, 0.6, 0.6);
        set(&mut h, PinkyMcp, 0.4, 0.6);
        set(&mut h, ThumbIp, 0.3, 0.6);
        set(&mut h, ThumbTip, 0.2, 0.6);
        set(&mut h, IndexTip, 0.6, 0.3);
        set(&mut h, PinkyTip, 0.4, 0.3);
        h
    }

    #[test]
    fn pose_wins_over_swipe() {
        let mut r = GestureRecognizer::new(&GestureConfig::default());
        for i in 0..12 {
            r.observe(&[fist_at(0.1 + 0.05 * i as f32)]);
        }
        assert_eq!(r.observe(&[rock_on()]), Some(GestureLabel::Pose(Pose::RockOn)));
    }

    #[test]
    fn collecting_then_swipe() {
        let mut r = GestureRecognizer::new(&GestureConfig::default());
        for i in 0..9 {
            assert_eq!(r.observe(&[fist_at(0.2 + 0.05 * i as f32)]), Some(GestureLabel::Collecting));
        }
        assert_eq!(
            r.observe(&[fist_at(0.65)]),
            Some(GestureLabel::Swipe(SwipeDirection::Left))
        );
    }

    #[test]
    fn no_hand_no_label() {
        let mut r = GestureRecognizer::new(&GestureConfig::default());
        assert_eq!(r.observe(&[]), None);
    }

    #[test]
    fn hand_loss_clears_history_when_configured() {
        let mut r = GestureRecognizer::new(&GestureConfig::default());
        for _ in 0..10 {
            r.observe(&[fist_at(0.9)]);
        }
        r.observe(&[]);
        assert_eq!(r.history_len(), 0);
        // Reappearing far away must not combine with the stale samples.
        assert_eq!(r.observe(&[fist_at(0.1)]), Some(GestureLabel::Collecting));
    }

    #[test]
    fn hand_loss_keeps_history_otherwise() {
        let config = GestureConfig { clear_history_on_hand_loss: false, ..GestureConfig::default() };
        let mut r = GestureRecognizer::new(&config);
        for _ in 0..10 {
            r.observe(&[fist_at(0.9)]);
        }
        r.observe(&[]);
        assert_eq!(r.history_len(), 10);
        assert_eq!(
            r.observe(&[fist_at(0.1)]),
            Some(GestureLabel::Swipe(SwipeDirection::Right))
        );
    }

    #[test]
    fn labels_render_like_the_hud_expects() {
        assert_eq!(GestureLabel::Pose(Pose::Ok).to_string(), "OK");
        assert_eq!(GestureLabel::Swipe(SwipeDirection::Right).to_string(), "Swipe Right");
        assert_eq!(GestureLabel::Collecting.to_string(), "Collecting Data...");
    }
}
