// Hand skeleton overlay: bones as lines, joints as dots.
// Visual: a white wireframe hand with red knuckles tracks each detected hand.

use crate::draw::{draw_line, fill_circle};
use crate::landmarks::{HAND_CONNECTIONS, HandObservation};
use crate::types::FrameBuffer;

const BONE_COLOR: u32 = 0x00_FF_FF_FF;
const JOINT_COLOR: u32 = 0x00_FF_30_30;
const JOINT_RADIUS: i32 = 3;

pub fn draw_hand(fb: &mut FrameBuffer, hand: &HandObservation) {
    let (w, h) = (fb.width, fb.height);
    let px: Vec<(i32, i32)> = hand.landmarks.iter().map(|lm| lm.to_pixel(w, h)).collect();

    for (a, b) in HAND_CONNECTIONS {
        let (x0, y0) = px[a.index()];
        let (x1, y1) = px[b.index()];
        draw_line(fb, x0, y0, x1, y1, BONE_COLOR);
    }
    for &(x, y) in &px {
        fill_circle(fb, x, y, JOINT_RADIUS, JOINT_COLOR);
    }
}

pub fn draw_hands(fb: &mut FrameBuffer, hands: &[HandObservation]) {
    for hand in hands {
        draw_hand(fb, hand);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::HandLandmark;
    use crate::landmarks::fixtures::{flat_hand, set};

    #[test]
    fn joints_and_bones_land_on_the_frame() {
        let mut fb = FrameBuffer::new(100, 100);
        let mut hand = flat_hand();
        set(&mut hand, HandLandmark::Wrist, 0.5, 0.9);
        draw_hand(&mut fb, &hand);
        assert_eq!(fb.get(50, 90), Some(JOINT_COLOR));
        assert_eq!(fb.get(50, 50), Some(JOINT_COLOR));
        // Wrist-to-thumb bone runs straight up between them.
        assert_eq!(fb.get(50, 70), Some(BONE_COLOR));
        assert_eq!(fb.get(10, 10), Some(0));
    }

    #[test]
    fn off_frame_points_are_clipped() {
        let mut fb = FrameBuffer::new(10, 10);
        let mut hand = flat_hand();
        set(&mut hand, HandLandmark::IndexTip, 3.0, -2.0);
        draw_hands(&mut fb, &[hand]);
        assert_eq!(fb.get(5, 5), Some(JOINT_COLOR));
    }
}
