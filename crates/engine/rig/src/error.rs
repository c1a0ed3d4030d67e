//! Error types for rig geometry

use thiserror::Error;

/// Result type for rig operations
pub type Result<T> = std::result::Result<T, RigError>;

/// Errors that can occur while building or arranging a rig
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RigError {
    /// No main camera has been designated
    #[error("no main camera designated as pose source")]
    NoPoseSource,

    /// The studio already has a focus marker
    #[error("studio already built (focus marker exists)")]
    AlreadyBuilt,

    /// A rig parameter is outside its valid range
    #[error("invalid rig settings: {0}")]
    InvalidSettings(String),

    /// A rig slot does not match the camera it holds
    #[error("rig geometry inconsistent at slot {index}: {reason}")]
    GeometryInconsistency { index: usize, reason: String },
}
