//! Lighting constants for preview renders
//!
//! A single directional light plus ambient term. Preview frames only have to show
//! parallax between rig cameras, so the model stays deliberately flat.

use glam::Vec3;

/// Directional light direction (normalized)
///
/// Pre-normalized: normalize(0.5, 1.0, 0.3)
pub const LIGHT_DIR: Vec3 = Vec3::new(0.431934, 0.863868, 0.259161);

/// Ambient lighting term (0.0-1.0)
pub const AMBIENT: f32 = 0.3;

/// Diffuse lighting strength multiplier
pub const DIFFUSE_STRENGTH: f32 = 0.7;

/// Background color for rays that miss the scene
pub const BACKGROUND_COLOR: Vec3 = Vec3::new(0.4, 0.5, 0.6);

/// Ground checker colors
pub const GROUND_LIGHT: Vec3 = Vec3::new(0.8, 0.8, 0.8);
pub const GROUND_DARK: Vec3 = Vec3::new(0.35, 0.35, 0.35);

/// `material_color * (AMBIENT + diffuse * DIFFUSE_STRENGTH)`
pub fn shade(normal: Vec3, material_color: Vec3) -> Vec3 {
    let diffuse = normal.dot(LIGHT_DIR).max(0.0);
    material_color * (AMBIENT + diffuse * DIFFUSE_STRENGTH)
}
