// What you SEE now:
// • `gestures`: mirrored live camera, hand skeleton, and the recognised gesture
//   ("Rock On", "OK", "Thumbs Down", swipes) in the top-left corner.
// • `draw`: index finger up paints onto a canvas blended over the feed; index +
//   middle up erases. C clears, R/G/B/W/Y/P/O pick a color, +/- change brush
//   size, S saves the canvas. Q or ESC quits in both modes.

mod args;
mod camera;
mod canvas;
mod config;
mod draw;
mod drawing;
mod error;
mod landmarks;
mod pose;
mod recognizer;
mod skeleton;
mod swipe;
mod tracker;
mod types;

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use minifb::Key;

use args::{Args, Mode};
use camera::CameraCapture;
use canvas::Canvas;
use config::{AppConfig, DrawingConfig, GestureConfig};
use draw::{Drawer, draw_crosshair, draw_text_5x7};
use drawing::{Command, DrawingState, FingerInput};
use error::Error;
use landmarks::{DetectorConfig, LandmarkSource};
use recognizer::GestureRecognizer;
use tracker::{ReplaySource, SubprocessTracker};
use types::FrameBuffer;

const LABEL_COLOR: u32 = 0x00_00_FF_00;
const MODE_COLOR: u32 = 0x00_FF_00_00;
const HUD_COLOR: u32 = 0x00_FF_FF_FF;
const CURSOR_COLOR: u32 = 0x00_FF_CC_33;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    if let Some(index) = args.camera {
        config.camera.index = index;
    }

    let (detector, title) = match args.mode {
        Mode::Gestures => (config.gestures.detector.clone(), "Advanced Hand Gesture Detection"),
        Mode::Draw => (config.drawing.detector.clone(), "Finger Drawing"),
    };

    // The camera is released when `cam` drops, whichever way we leave.
    let mut cam = CameraCapture::new(&config.camera)?;
    let (w, h) = cam.resolution();
    let mut source = open_source(args, &config, detector)?;
    let mut drawer = Drawer::new(title, w as usize, h as usize)?;

    match args.mode {
        Mode::Gestures => run_gestures(&mut cam, source.as_mut(), &mut drawer, &config.gestures),
        Mode::Draw => run_drawing(&mut cam, source.as_mut(), &mut drawer, &config.drawing),
    }
}

fn open_source(
    args: &Args,
    config: &AppConfig,
    detector: DetectorConfig,
) -> Result<Box<dyn LandmarkSource>, Error> {
    Ok(match &args.replay {
        Some(path) => Box::new(ReplaySource::open(path, detector)?),
        None => Box::new(SubprocessTracker::spawn(&config.tracker, detector)?),
    })
}

/* ------------------------------ Gesture session ------------------------------ */

fn run_gestures(
    cam: &mut CameraCapture,
    source: &mut dyn LandmarkSource,
    drawer: &mut Drawer,
    config: &GestureConfig,
) -> Result<(), Error> {
    let mut recognizer = GestureRecognizer::new(config);
    let mut fps = FpsCounter::new();
    let mut last_label = None;

    while drawer.is_open() {
        /* 1) Frame in, hands out */
        let frame = cam.next_frame()?;
        let hands = source.detect(&frame)?;

        /* 2) Skeleton + label over the live feed */
        let mut screen = FrameBuffer::from_rgb(&frame);
        skeleton::draw_hands(&mut screen, &hands);

        let label = recognizer.observe(&hands);
        if label != last_label {
            log::debug!("Gesture: {label:?} ({} samples)", recognizer.history_len());
            last_label = label;
        }
        if let Some(label) = label {
            draw_text_5x7(&mut screen, 10, 10, &format!("Gesture: {label}"), LABEL_COLOR, 3);
        }

        /* 3) Present, then poll keys */
        drawer.present(&screen)?;
        if drawer.keys_pressed().iter().any(|k| matches!(k, Key::Q | Key::Escape)) {
            break;
        }
        fps.tick();
    }
    Ok(())
}

/* ------------------------------ Drawing session ------------------------------ */

fn run_drawing(
    cam: &mut CameraCapture,
    source: &mut dyn LandmarkSource,
    drawer: &mut Drawer,
    config: &DrawingConfig,
) -> Result<(), Error> {
    let (w, h) = cam.resolution();
    let mut canvas = Canvas::new(w as usize, h as usize);
    let mut state = DrawingState::new(config.color, config.initial_thickness());
    let mut fps = FpsCounter::new();

    while drawer.is_open() {
        let frame = cam.next_frame()?;
        let hands = source.detect(&frame)?;

        let mut screen = FrameBuffer::from_rgb(&frame);
        skeleton::draw_hands(&mut screen, &hands);

        // Only the first hand holds the pen.
        let input = hands
            .first()
            .map(|hand| FingerInput::from_hand(hand, screen.width, screen.height));
        state.update(input, &mut canvas);

        if input.is_some() {
            draw_text_5x7(&mut screen, 10, 10, &state.mode.to_string(), MODE_COLOR, 3);
        }
        if state.is_drawing
            && let Some((x, y)) = state.prev
        {
            draw_crosshair(&mut screen, x, y, 12, CURSOR_COLOR);
        }
        let hud = format!(
            "Color: {} | Size: {} | {}",
            state.color.name(),
            state.thickness,
            fps.text()
        );
        let hud_y = screen.height as i32 - 20;
        draw_text_5x7(&mut screen, 10, hud_y, &hud, HUD_COLOR, 2);

        canvas.composite_onto(&mut screen, config.canvas_weight)?;
        drawer.present(&screen)?;

        for key in drawer.keys_pressed() {
            let Some(command) = Command::from_key(key) else { continue };
            match command {
                Command::Clear => {
                    canvas.clear();
                    log::info!("Canvas cleared");
                }
                Command::Color(color) => {
                    state.color = color;
                    log::debug!("Color: {}", color.name());
                }
                Command::Thicker => state.thicker(),
                Command::Thinner => state.thinner(),
                Command::Save => {
                    if canvas.is_blank() {
                        log::warn!("Saving an empty canvas");
                    }
                    match canvas.save(&config.save_path) {
                        Ok(()) => log::info!("Drawing saved to '{}'", config.save_path.display()),
                        Err(e) => log::error!("{e}"),
                    }
                }
                Command::Quit => return Ok(()),
            }
        }
        fps.tick();
    }
    Ok(())
}

/* ------------------------------ FPS counter ------------------------------ */

struct FpsCounter {
    since: Instant,
    frames: u32,
    text: String,
}

impl FpsCounter {
    fn new() -> Self {
        Self { since: Instant::now(), frames: 0, text: String::from("FPS: 0.0") }
    }

    /// Count a frame; once per second refresh the text and log it.
    fn tick(&mut self) {
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            let fps = self.frames as f32 / elapsed.as_secs_f32();
            self.text = format!("FPS: {fps:.1}");
            log::debug!("{}", self.text);
            self.frames = 0;
            self.since = Instant::now();
        }
    }

    fn text(&self) -> &str {
        &self.text
    }
}
