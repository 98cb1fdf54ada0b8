use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Webcam hand gestures and finger painting")]
pub struct Args {
    #[command(subcommand)]
    pub mode: Mode,

    /// Config file (defaults to gesture-canvas.toml in the usual places)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Camera index, overrides the config
    #[arg(long, global = true)]
    pub camera: Option<u32>,

    /// Feed recorded detector output (JSON lines) instead of the live detector
    #[arg(long, global = true)]
    pub replay: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Label static poses and swipes
    Gestures,
    /// Paint with the index finger, erase with two fingers
    Draw,
}
