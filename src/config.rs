use std::fs;
use std::path::{Path, PathBuf};

use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Deserializer};

use crate::drawing::{MAX_THICKNESS, MIN_THICKNESS, NamedColor};
use crate::error::Error;
use crate::landmarks::{DetectorConfig, DetectorOverrides};

const CONFIG_FILE_NAME: &str = "gesture-canvas.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub mirror: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: 640,
            height: 480,
            fps: 30,
            mirror: true,
        }
    }
}

/// How to launch the external hand detector.
///
/// The default expects a `hand_detect.py` in the working directory: any
/// MediaPipe Hands wrapper that accepts `--max-hands`,
/// `--min-detection-confidence` and `--min-tracking-confidence`, prints
/// `READY`, then answers each frame as described in `tracker.rs`. Point
/// `program`/`args` elsewhere, or run with `--replay`, when it is absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            program: "python3".into(),
            args: vec!["hand_detect.py".into()],
        }
    }
}

fn gesture_detector<'de, D: Deserializer<'de>>(d: D) -> Result<DetectorConfig, D::Error> {
    Ok(DetectorOverrides::deserialize(d)?.over(DetectorConfig::gestures()))
}

fn drawing_detector<'de, D: Deserializer<'de>>(d: D) -> Result<DetectorConfig, D::Error> {
    Ok(DetectorOverrides::deserialize(d)?.over(DetectorConfig::drawing()))
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    #[serde(deserialize_with = "gesture_detector")]
    pub detector: DetectorConfig,
    pub ok_distance: f32,
    pub history_capacity: usize,
    pub min_samples: usize,
    pub swipe_distance: f32,
    pub clear_history_on_hand_loss: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::gestures(),
            ok_distance: 0.05,
            history_capacity: 21,
            min_samples: 10,
            swipe_distance: 0.3,
            clear_history_on_hand_loss: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    #[serde(deserialize_with = "drawing_detector")]
    pub detector: DetectorConfig,
    pub color: NamedColor,
    pub thickness: u32,
    pub save_path: PathBuf,
    pub canvas_weight: f32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::drawing(),
            color: NamedColor::Green,
            thickness: 4,
            save_path: PathBuf::from("drawing.png"),
            canvas_weight: 0.5,
        }
    }
}

impl DrawingConfig {
    pub fn initial_thickness(&self) -> u32 {
        self.thickness.clamp(MIN_THICKNESS, MAX_THICKNESS)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub tracker: TrackerConfig,
    pub gestures: GestureConfig,
    pub drawing: DrawingConfig,
}

impl AppConfig {
    /// First readable config among the candidate paths, defaults otherwise.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match Self::parse(&contents) {
                    Ok(cfg) => {
                        log::info!("Loaded config from {}", path.display());
                        return cfg;
                    }
                    Err(err) => {
                        log::warn!("Failed to parse config {}: {err}", path.display());
                    }
                }
            }
        }
        log::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Load an explicitly requested file; any failure is fatal.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {}: {e}", path.display())))?;
        let cfg = Self::parse(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    pub fn parse(contents: &str) -> Result<Self, Error> {
        toml::from_str::<Self>(contents).map_err(|e| Error::Config(e.to_string()))
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "GestureCanvas", "gesture-canvas") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("gesture-canvas").join(CONFIG_FILE_NAME));
        }

        paths
    }
}
