use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the playback engine.
///
/// Every variant here has a defined recovery path: missing files and
/// unsupported formats are skipped over, playback failures trigger a
/// delayed restart of the whole cycle. None of them is fatal to the host.
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("extension not supported: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("playback failed: {0}")]
    Playback(String),

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}
