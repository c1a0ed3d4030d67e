//! Error types for render orchestration

use std::path::PathBuf;
use thiserror::Error;

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while orchestrating or performing renders
#[derive(Error, Debug)]
pub enum RenderError {
    /// No output directory has been selected
    #[error("no output directory selected")]
    NoOutputDirectory,

    /// The studio has no rig cameras to render
    #[error("no rig cameras to render")]
    NoRigCameras,

    /// `execute` was called while a render queue is still active
    #[error("a render queue is already running")]
    AlreadyRunning,

    /// `tick` was called before `execute`
    #[error("orchestrator has not been started")]
    NotRunning,

    /// The render host rejected or failed a request
    #[error("render host error: {0}")]
    Host(String),

    /// Renderer has nothing to save yet
    #[error("{0} has no rendered image")]
    NoImage(String),

    /// Could not create the output directory
    #[error("failed to create output directory {path}: {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
