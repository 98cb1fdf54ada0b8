// Finger painting: pointer state machine and keyboard commands.
//
// Index finger up, middle down paints; both up erases; anything else lifts
// the pen so the next stroke starts fresh instead of joining the last one.

use std::fmt;

use minifb::Key;
use serde::Deserialize;

use crate::canvas::Canvas;
use crate::landmarks::{HandLandmark, HandObservation};
use crate::pose::ExtensionVector;
use crate::types::pack_rgb;

pub const MIN_THICKNESS: u32 = 1;
pub const MAX_THICKNESS: u32 = 20;
/// Eraser radius as a multiple of stroke thickness.
pub const ERASER_SCALE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedColor {
    Red,
    Green,
    Blue,
    White,
    Yellow,
    Purple,
    Orange,
}

impl NamedColor {
    pub fn rgb(self) -> u32 {
        match self {
            Self::Red => pack_rgb(255, 0, 0),
            Self::Green => pack_rgb(0, 255, 0),
            Self::Blue => pack_rgb(0, 0, 255),
            Self::White => pack_rgb(255, 255, 255),
            Self::Yellow => pack_rgb(255, 255, 0),
            Self::Purple => pack_rgb(255, 0, 255),
            Self::Orange => pack_rgb(255, 128, 0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::White => "White",
            Self::Yellow => "Yellow",
            Self::Purple => "Purple",
            Self::Orange => "Orange",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    Draw,
    Erase,
    Idle,
}

impl fmt::Display for ToolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draw => "Drawing Mode",
            Self::Erase => "Eraser Mode",
            Self::Idle => "Idle",
        })
    }
}

/// What one frame's hand says about the pen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerInput {
    pub index_tip: (i32, i32),
    pub index_extended: bool,
    pub middle_extended: bool,
}

impl FingerInput {
    /// Index fingertip in pixels for a `width` x `height` frame.
    pub fn from_hand(hand: &HandObservation, width: usize, height: usize) -> Self {
        let ext = ExtensionVector::of(hand);
        Self {
            index_tip: hand.get(HandLandmark::IndexTip).to_pixel(width, height),
            index_extended: ext.index(),
            middle_extended: ext.middle(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawingState {
    pub prev: Option<(i32, i32)>,
    pub is_drawing: bool,
    pub mode: ToolMode,
    pub color: NamedColor,
    pub thickness: u32,
}

impl Default for DrawingState {
    fn default() -> Self {
        Self::new(NamedColor::Green, 4)
    }
}

impl DrawingState {
    pub fn new(color: NamedColor, thickness: u32) -> Self {
        Self {
            prev: None,
            is_drawing: false,
            mode: ToolMode::Idle,
            color,
            thickness: thickness.clamp(MIN_THICKNESS, MAX_THICKNESS),
        }
    }

    pub fn eraser_radius(&self) -> i32 {
        (self.thickness * ERASER_SCALE) as i32
    }

    /// Advance one frame. `None` means no hand was seen.
    pub fn update(&mut self, input: Option<FingerInput>, canvas: &mut Canvas) {
        let Some(input) = input else {
            self.lift();
            return;
        };
        let current = input.index_tip;

        match (input.index_extended, input.middle_extended) {
            (true, false) => {
                self.mode = ToolMode::Draw;
                if let Some(prev) = self.prev {
                    canvas.stroke(prev, current, self.color.rgb(), self.thickness);
                }
                self.prev = Some(current);
                self.is_drawing = true;
            }
            (true, true) => {
                self.mode = ToolMode::Erase;
                if self.prev.is_some() {
                    canvas.erase(current, self.eraser_radius());
                }
                self.prev = Some(current);
                self.is_drawing = true;
            }
            _ => self.lift(),
        }
    }

    fn lift(&mut self) {
        self.mode = ToolMode::Idle;
        self.prev = None;
        self.is_drawing = false;
    }

    pub fn thicker(&mut self) {
        self.thickness = (self.thickness + 1).min(MAX_THICKNESS);
    }

    pub fn thinner(&mut self) {
        self.thickness = self.thickness.saturating_sub(1).max(MIN_THICKNESS);
    }
}

/// Keyboard actions in the drawing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Clear,
    Color(NamedColor),
    Thicker,
    Thinner,
    Save,
    Quit,
}

impl Command {
    pub fn from_key(key: Key) -> Option<Self> {
        Some(match key {
            Key::C => Self::Clear,
            Key::R => Self::Color(NamedColor::Red),
            Key::G => Self::Color(NamedColor::Green),
            Key::B => Self::Color(NamedColor::Blue),
            Key::W => Self::Color(NamedColor::White),
            Key::Y => Self::Color(NamedColor::Yellow),
            Key::P => Self::Color(NamedColor::Purple),
            Key::O => Self::Color(NamedColor::Orange),
            // '+' and '=' share a key, as do '-' and '_'.
            Key::Equal | Key::NumPadPlus => Self::Thicker,
            Key::Minus | Key::NumPadMinus => Self::Thinner,
            Key::S => Self::Save,
            Key::Q | Key::Escape => Self::Quit,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::fixtures::{flat_hand, set};

    const GREEN: u32 = 0x00_00_FF_00;

    fn pointing(x: i32, y: i32) -> Option<FingerInput> {
        Some(FingerInput {
            index_tip: (x, y),
            index_extended: true,
            middle_extended: false,
        })
    }

    fn two_up(x: i32, y: i32) -> Option<FingerInput> {
        Some(FingerInput {
            index_tip: (x, y),
            index_extended: true,
            middle_extended: true,
        })
    }

    fn fist() -> Option<FingerInput> {
        Some(FingerInput {
            index_tip: (0, 0),
            index_extended: false,
            middle_extended: false,
        })
    }

    #[test]
    fn consecutive_frames_draw_connected_segments() {
        let mut canvas = Canvas::new(80, 60);
        let mut state = DrawingState::default();

        state.update(pointing(10, 10), &mut canvas);
        assert!(canvas.is_blank(), "first frame only sets the pointer");
        state.update(pointing(20, 10), &mut canvas);
        state.update(pointing(30, 10), &mut canvas);

        assert_eq!(state.mode, ToolMode::Draw);
        assert_eq!(state.prev, Some((30, 10)));
        for x in [10, 15, 20, 25, 30] {
            assert_eq!(canvas.pixels().get(x, 10), Some(GREEN), "x={x}");
        }
    }

    #[test]
    fn lifting_the_finger_breaks_the_stroke() {
        let mut canvas = Canvas::new(80, 60);
        let mut state = DrawingState::default();
        for x in [10, 20, 30] {
            state.update(pointing(x, 10), &mut canvas);
        }

        state.update(fist(), &mut canvas);
        assert_eq!(state.mode, ToolMode::Idle);
        assert_eq!(state.prev, None);
        assert!(!state.is_drawing);

        state.update(pointing(50, 40), &mut canvas);
        state.update(pointing(60, 40), &mut canvas);
        // Nothing bridges (30,10) and (50,40).
        assert_eq!(canvas.pixels().get(40, 25), Some(0));
        assert_eq!(canvas.pixels().get(55, 40), Some(GREEN));
    }

    #[test]
    fn no_hand_behaves_like_idle() {
        let mut canvas = Canvas::new(80, 60);
        let mut state = DrawingState::default();
        state.update(pointing(10, 10), &mut canvas);
        state.update(None, &mut canvas);
        assert_eq!(state.prev, None);
        assert_eq!(state.mode, ToolMode::Idle);
        state.update(pointing(70, 50), &mut canvas);
        assert!(canvas.is_blank());
    }

    #[test]
    fn two_fingers_stamp_an_eraser_disc_not_a_line() {
        let mut canvas = Canvas::new(200, 120);
        for y in 0..120 {
            canvas.stroke((0, y), (199, y), GREEN, 1);
        }
        let mut state = DrawingState::default();
        state.update(pointing(10, 50), &mut canvas);
        state.update(two_up(100, 50), &mut canvas);

        assert_eq!(state.mode, ToolMode::Erase);
        assert_eq!(state.prev, Some((100, 50)));
        let r = state.eraser_radius();
        assert_eq!(r, 20);
        assert_eq!(canvas.pixels().get(100, 50), Some(0));
        assert_eq!(canvas.pixels().get(100, 50 + r), Some(0));
        assert_eq!(canvas.pixels().get(100 + r + 1, 50), Some(GREEN));
        // A line from the old pointer would have blackened this.
        assert_eq!(canvas.pixels().get(40, 50), Some(GREEN));
    }

    #[test]
    fn eraser_needs_a_previous_pointer() {
        let mut canvas = Canvas::new(50, 50);
        canvas.stroke((25, 25), (25, 25), GREEN, 1);
        let mut state = DrawingState::default();
        state.update(two_up(25, 25), &mut canvas);
        assert_eq!(canvas.pixels().get(25, 25), Some(GREEN));
        assert_eq!(state.prev, Some((25, 25)));
        assert!(state.is_drawing);
    }

    #[test]
    fn thickness_stays_in_bounds() {
        let mut state = DrawingState::default();
        assert_eq!(state.thickness, 4);
        for _ in 0..40 {
            state.thicker();
            assert!(state.thickness <= MAX_THICKNESS);
        }
        assert_eq!(state.thickness, MAX_THICKNESS);
        for _ in 0..40 {
            state.thinner();
            assert!(state.thickness >= MIN_THICKNESS);
        }
        assert_eq!(state.thickness, MIN_THICKNESS);
    }

    #[test]
    fn active_color_and_thickness_are_used() {
        let mut canvas = Canvas::new(60, 60);
        let mut state = DrawingState::new(NamedColor::Purple, 9);
        state.update(pointing(10, 30), &mut canvas);
        state.update(pointing(40, 30), &mut canvas);
        let purple = NamedColor::Purple.rgb();
        assert_eq!(canvas.pixels().get(25, 34), Some(purple));
        assert_eq!(canvas.pixels().get(25, 35), Some(0));
    }

    #[test]
    fn finger_input_reads_tips_and_pips() {
        let mut hand = flat_hand();
        set(&mut hand, HandLandmark::IndexPip, 0.5, 0.5);
        set(&mut hand, HandLandmark::IndexTip, 0.25, 0.25);
        set(&mut hand, HandLandmark::MiddlePip, 0.6, 0.5);
        set(&mut hand, HandLandmark::MiddleTip, 0.5, 0.75);
        let input = FingerInput::from_hand(&hand, 640, 480);
        assert_eq!(input.index_tip, (160, 120));
        assert!(input.index_extended);
        assert!(!input.middle_extended);
    }

    #[test]
    fn keys_map_to_commands() {
        assert_eq!(Command::from_key(Key::C), Some(Command::Clear));
        assert_eq!(Command::from_key(Key::O), Some(Command::Color(NamedColor::Orange)));
        assert_eq!(Command::from_key(Key::Equal), Some(Command::Thicker));
        assert_eq!(Command::from_key(Key::Minus), Some(Command::Thinner));
        assert_eq!(Command::from_key(Key::S), Some(Command::Save));
        assert_eq!(Command::from_key(Key::Q), Some(Command::Quit));
        assert_eq!(Command::from_key(Key::Z), None);
    }
}
