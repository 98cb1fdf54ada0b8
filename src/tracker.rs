// Landmark sources backed by the external hand detector.
//
// The pre-trained detector runs out of process. It prints `READY` once, then
// for every frame reads a header of three little-endian `u32` (width, height,
// channels) followed by raw RGB bytes, and answers with one JSON line:
//
// ```text
// {"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":0.5,"y":0.6,"z":0.0}, ...]}],"error":null}
// ```
//
// `ReplaySource` reads the same JSON lines from a file, one per frame.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use image::RgbImage;
use serde::Deserialize;

use crate::config::TrackerConfig;
use crate::error::Error;
use crate::landmarks::{
    DetectorConfig, HandObservation, LANDMARK_COUNT, Landmark, LandmarkSource,
};

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    #[serde(default = "full_score")]
    score: f32,
    landmarks: Vec<Landmark>,
}

fn full_score() -> f32 {
    1.0
}

#[derive(Deserialize, Debug)]
struct DetectionResult {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse one detector reply and keep the hands that pass `config`.
pub fn parse_response(line: &str, config: &DetectorConfig) -> Result<Vec<HandObservation>, Error> {
    let result: DetectionResult = serde_json::from_str(line)
        .map_err(|e| Error::LandmarkSource(format!("Bad detector reply {line:?}: {e}")))?;

    if let Some(error) = result.error {
        log::warn!("Hand detector error: {error}");
        return Ok(Vec::new());
    }

    let mut hands = Vec::with_capacity(result.hands.len().min(config.max_hands));
    for hand in result.hands {
        if hands.len() >= config.max_hands {
            break;
        }
        if hand.score < config.min_detection_confidence {
            log::trace!("Dropping {} hand, score {:.2}", hand.handedness, hand.score);
            continue;
        }
        let Ok(landmarks) = <[Landmark; LANDMARK_COUNT]>::try_from(hand.landmarks.as_slice()) else {
            log::warn!("Expected {LANDMARK_COUNT} landmarks, got {}", hand.landmarks.len());
            continue;
        };
        if !landmarks.iter().all(Landmark::is_plausible) {
            log::warn!("Dropping {} hand with out-of-range landmarks", hand.handedness);
            continue;
        }
        hands.push(HandObservation {
            landmarks,
            handedness: hand.handedness,
            score: hand.score,
        });
    }
    Ok(hands)
}

/// Hand detector running as a child process.
pub struct SubprocessTracker {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    config: DetectorConfig,
}

impl SubprocessTracker {
    /// Spawn the detector and wait for its `READY` line.
    pub fn spawn(tracker: &TrackerConfig, config: DetectorConfig) -> Result<Self, Error> {
        log::info!("Starting hand detector: {} {:?}", tracker.program, tracker.args);

        let mut process = Command::new(&tracker.program)
            .args(&tracker.args)
            .arg("--max-hands")
            .arg(config.max_hands.to_string())
            .arg("--min-detection-confidence")
            .arg(config.min_detection_confidence.to_string())
            .arg("--min-tracking-confidence")
            .arg(config.min_tracking_confidence.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| Error::LandmarkSource(format!("Spawn {}: {e}", tracker.program)))?;

        let (Some(stdin), Some(stdout)) = (process.stdin.take(), process.stdout.take()) else {
            let _ = process.kill();
            return Err(Error::LandmarkSource("Detector pipes unavailable".into()));
        };
        let mut stdout = BufReader::new(stdout);

        let mut ready = String::new();
        let read = stdout.read_line(&mut ready);
        if !matches!(read, Ok(n) if n > 0) || ready.trim() != "READY" {
            let _ = process.kill();
            let _ = process.wait();
            return Err(Error::LandmarkSource(format!(
                "Detector {} did not signal ready, got {:?} (check [tracker] in the config)",
                tracker.program,
                ready.trim()
            )));
        }

        log::info!("Hand detector ready");
        Ok(Self { process, stdin, stdout, config })
    }

    fn send_frame(&mut self, frame: &RgbImage) -> std::io::Result<()> {
        let (w, h) = frame.dimensions();
        self.stdin.write_all(&w.to_le_bytes())?;
        self.stdin.write_all(&h.to_le_bytes())?;
        self.stdin.write_all(&3u32.to_le_bytes())?;
        self.stdin.write_all(frame.as_raw())?;
        self.stdin.flush()
    }
}

impl LandmarkSource for SubprocessTracker {
    fn detect(&mut self, frame: &RgbImage) -> Result<Vec<HandObservation>, Error> {
        self.send_frame(frame)
            .map_err(|e| Error::LandmarkSource(format!("Send frame: {e}")))?;

        let mut line = String::new();
        let n = self
            .stdout
            .read_line(&mut line)
            .map_err(|e| Error::LandmarkSource(format!("Read reply: {e}")))?;
        if n == 0 {
            return Err(Error::LandmarkSource("Detector exited".into()));
        }
        parse_response(&line, &self.config)
    }
}

impl Drop for SubprocessTracker {
    fn drop(&mut self) {
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Recorded detector replies, one JSON line per frame.
pub struct ReplaySource<R> {
    reader: R,
    config: DetectorConfig,
    exhausted: bool,
}

impl ReplaySource<BufReader<File>> {
    pub fn open(path: &Path, config: DetectorConfig) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::LandmarkSource(format!("Open replay {}: {e}", path.display())))?;
        log::info!("Replaying landmarks from {}", path.display());
        Ok(Self::new(BufReader::new(file), config))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R, config: DetectorConfig) -> Self {
        Self { reader, config, exhausted: false }
    }
}

impl<R: BufRead> LandmarkSource for ReplaySource<R> {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Vec<HandObservation>, Error> {
        if self.exhausted {
            return Ok(Vec::new());
        }
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| Error::LandmarkSource(format!("Read replay: {e}")))?;
        if n == 0 {
            log::info!("Replay finished");
            self.exhausted = true;
            return Ok(Vec::new());
        }
        if line.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse_response(&line, &self.config)
    }
}
