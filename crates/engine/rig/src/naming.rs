//! Deterministic rig camera names
//!
//! Rig cameras are called `LentiCamera_<index>`. Rendered frames reuse the camera
//! name as their file stem, so the view order of a rendered set can be recovered
//! from file names alone.

/// Name prefix shared by every rig camera
pub const RENDER_CAMERA_PREFIX: &str = "LentiCamera";

/// Name of the rig camera in slot `index`
pub fn camera_name(index: usize) -> String {
    format!("{RENDER_CAMERA_PREFIX}_{index}")
}

/// Slot index encoded in a rig camera name (or rendered file stem)
///
/// Only names [`camera_name`] can produce are accepted, so `LentiCamera_01` is not
/// another spelling of slot 1.
pub fn parse_camera_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(RENDER_CAMERA_PREFIX)?.strip_prefix('_')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}
