// One error type for the whole app.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed
    #[error("Composite error: {0}")]
    Composite(String), // Canvas and frame disagree on size
    #[error("Landmark source error: {0}")]
    LandmarkSource(String), // Talking to the hand detector failed
    #[error("Config error: {0}")]
    Config(String), // Reading/parsing the config file failed
    #[error("Save error: {0}")]
    Save(String), // Writing the canvas image failed
}
