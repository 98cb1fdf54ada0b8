// Static hand poses from one frame of landmarks.
//
// A pose is a fixed rule over the finger extension vector plus a couple of
// distance checks. Rules are evaluated top to bottom and the first match
// wins, so "Spider-Man" (same extension pattern as "Rock On") never fires.

use std::fmt;

use crate::landmarks::HandLandmark::{self, *};
use crate::landmarks::HandObservation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pose {
    RockOn,
    Ok,
    ThumbsDown,
    SpiderMan,
}

impl Pose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RockOn => "Rock On",
            Self::Ok => "OK",
            Self::ThumbsDown => "Thumbs Down",
            Self::SpiderMan => "Spider-Man",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which fingers are straightened: [thumb, index, middle, ring, pinky].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionVector(pub [bool; 5]);

impl ExtensionVector {
    pub fn of(hand: &HandObservation) -> Self {
        let tip = hand.get(ThumbTip);
        let ip = hand.get(ThumbIp);
        // Pinky base right of index base flips which way an open thumb points.
        let thumb = if hand.get(PinkyMcp).x > hand.get(IndexMcp).x {
            tip.x > ip.x
        } else {
            tip.x < ip.x
        };

        // Smaller y is higher on screen.
        let finger = |tip: HandLandmark, pip: HandLandmark| hand.get(tip).y < hand.get(pip).y;

        Self([
            thumb,
            finger(IndexTip, IndexPip),
            finger(MiddleTip, MiddlePip),
            finger(RingTip, RingPip),
            finger(PinkyTip, PinkyPip),
        ])
    }

    pub const fn from_bits(bits: [u8; 5]) -> Self {
        Self([bits[0] != 0, bits[1] != 0, bits[2] != 0, bits[3] != 0, bits[4] != 0])
    }

    pub fn index(&self) -> bool {
        self.0[1]
    }

    pub fn middle(&self) -> bool {
        self.0[2]
    }

    pub fn ring(&self) -> bool {
        self.0[3]
    }

    pub fn pinky(&self) -> bool {
        self.0[4]
    }
}

struct Features<'a> {
    hand: &'a HandObservation,
    ext: ExtensionVector,
    ok_distance: f32,
}

type Rule = (fn(&Features<'_>) -> bool, Pose);

const ROCK_PATTERN: ExtensionVector = ExtensionVector::from_bits([1, 1, 0, 0, 1]);
const THUMB_ONLY: ExtensionVector = ExtensionVector::from_bits([1, 0, 0, 0, 0]);

fn rock_pattern(f: &Features<'_>) -> bool {
    f.ext == ROCK_PATTERN
}

fn ok_ring(f: &Features<'_>) -> bool {
    f.hand.get(ThumbTip).distance_2d(&f.hand.get(IndexTip)) < f.ok_distance
        && f.ext.middle()
        && f.ext.ring()
        && f.ext.pinky()
}

// Display is mirrored, so a lowered thumb sits below the middle finger base.
fn thumb_pointing_down(f: &Features<'_>) -> bool {
    f.ext == THUMB_ONLY && f.hand.get(ThumbTip).y > f.hand.get(MiddleMcp).y
}

const RULES: [Rule; 4] = [
    (rock_pattern, Pose::RockOn),
    (ok_ring, Pose::Ok),
    (thumb_pointing_down, Pose::ThumbsDown),
    (rock_pattern, Pose::SpiderMan),
];

pub struct PoseClassifier {
    ok_distance: f32,
}

impl Default for PoseClassifier {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl PoseClassifier {
    /// `ok_distance` is the thumb-tip/index-tip gap (normalized units) below which the OK ring counts.
    pub fn new(ok_distance: f32) -> Self {
        Self { ok_distance }
    }

    pub fn classify(&self, hand: &HandObservation) -> Option<Pose> {
        let features = Features {
            hand,
            ext: ExtensionVector::of(hand),
            ok_distance: self.ok_distance,
        };
        RULES
            .iter()
            .find(|(matches, _)| matches(&features))
            .map(|&(_, pose)| pose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures::{flat_hand, set};

    /// Right hand seen mirrored: index base left of pinky base.
    /// Curled fingers have tip below pip; extended ones above.
    fn hand_with(ext: [bool; 5]) -> HandObservation {
        let mut h = flat_hand();
        set(&mut h, Wrist, 0.5, 0.9);
        set(&mut h, IndexMcp, 0.40, 0.6);
        set(&mut h, MiddleMcp, 0.47, 0.6);
        set(&mut h, RingMcp, 0.54, 0.6);
        set(&mut h, PinkyMcp, 0.60, 0.6);

        // Thumb: extended means tip right of ip (pinky base is right of index base).
        set(&mut h, ThumbIp, 0.30, 0.65);
        set(&mut h, ThumbTip, if ext[0] { 0.35 } else { 0.25 }, 0.55);

        let fingers = [
            (IndexPip, IndexTip, 0.40),
            (MiddlePip, MiddleTip, 0.47),
            (RingPip, RingTip, 0.54),
            (PinkyPip, PinkyTip, 0.60),
        ];
        for (i, (pip, tip, x)) in fingers.into_iter().enumerate() {
            set(&mut h, pip, x, 0.5);
            set(&mut h, tip, x, if ext[i + 1] { 0.3 } else { 0.55 });
        }
        h
    }

    #[test]
    fn extension_vector_reads_fingers() {
        let h = hand_with([true, false, true, false, true]);
        assert_eq!(ExtensionVector::of(&h), ExtensionVector::from_bits([1, 0, 1, 0, 1]));
    }

    #[test]
    fn thumb_direction_follows_handedness() {
        let mut h = hand_with([true, false, false, false, false]);
        assert!(ExtensionVector::of(&h).0[0]);

        // Swap index/pinky bases: the same thumb now reads as curled.
        set(&mut h, IndexMcp, 0.60, 0.6);
        set(&mut h, PinkyMcp, 0.40, 0.6);
        assert!(!ExtensionVector::of(&h).0[0]);
    }

    #[test]
    fn rock_on_shadows_spider_man() {
        let h = hand_with([true, true, false, false, true]);
        assert!(h.get(ThumbTip).distance_2d(&h.get(IndexTip)) >= 0.05);
        assert_eq!(PoseClassifier::default().classify(&h), Some(Pose::RockOn));
    }

    #[test]
    fn ok_ignores_thumb_and_index_flags() {
        for (thumb, index) in [(false, false), (true, false), (false, true), (true, true)] {
            let mut h = hand_with([thumb, index, true, true, true]);
            let tip = h.get(IndexTip);
            set(&mut h, ThumbTip, tip.x + 0.02, tip.y + 0.02);
            // Keep the thumb flag as requested once its tip sits on the index tip.
            let ip_x = if thumb { 0.30 } else { 0.45 };
            set(&mut h, ThumbIp, ip_x, 0.65);
            assert_eq!(ExtensionVector::of(&h).0[..2], [thumb, index]);
            assert_eq!(
                PoseClassifier::default().classify(&h),
                Some(Pose::Ok),
                "thumb={thumb} index={index}"
            );
        }
    }

    #[test]
    fn ok_needs_the_gap_closed() {
        let mut h = hand_with([false, false, true, true, true]);
        let tip = h.get(IndexTip);
        set(&mut h, ThumbTip, tip.x + 0.06, tip.y);
        assert_eq!(PoseClassifier::default().classify(&h), None);
    }

    #[test]
    fn ok_needs_the_other_three_fingers_up() {
        let mut h = hand_with([false, false, true, false, true]);
        let tip = h.get(IndexTip);
        set(&mut h, ThumbTip, tip.x, tip.y);
        assert_eq!(PoseClassifier::default().classify(&h), None);
    }

    #[test]
    fn thumbs_down_needs_thumb_below_middle_base() {
        let mut h = hand_with([true, false, false, false, false]);
        set(&mut h, ThumbIp, 0.30, 0.70);
        set(&mut h, ThumbTip, 0.35, 0.75);
        assert_eq!(PoseClassifier::default().classify(&h), Some(Pose::ThumbsDown));

        set(&mut h, ThumbTip, 0.35, 0.45);
        assert_eq!(PoseClassifier::default().classify(&h), None);
    }

    #[test]
    fn open_hand_matches_nothing() {
        let h = hand_with([true; 5]);
        assert_eq!(PoseClassifier::default().classify(&h), None);
    }

    #[test]
    fn custom_ok_distance_is_respected() {
        let mut h = hand_with([false, false, true, true, true]);
        let tip = h.get(IndexTip);
        set(&mut h, ThumbTip, tip.x + 0.08, tip.y);
        assert_eq!(PoseClassifier::new(0.1).classify(&h), Some(Pose::Ok));
    }
}
