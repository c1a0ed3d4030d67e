//! Lentimaker - lenticular print pipeline
//!
//! Glue between the engine crates: loads `lentimaker.toml`, builds the camera rig,
//! renders every rig camera with the offline host and interleaves the frames.

pub mod commands;
pub mod config;
pub mod report;

pub use config::{LentimakerConfig, Overrides, DEFAULT_CONFIG_FILE};
