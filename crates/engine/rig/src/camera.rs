//! Camera model shared by the rig and the render host
//!
//! # Components
//!
//! - [`Camera`]: named camera with a pose and lens settings
//! - [`Lens`]: the visual/render properties cloned onto every rig camera
//! - [`Object`]: trait for types with position and rotation in 3D space

use crate::pose::Pose;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

// ============================================================================
// Object Trait
// ============================================================================

/// Base trait for any object with position and rotation in 3D space.
pub trait Object {
    /// Get the current position
    fn position(&self) -> Vec3;

    /// Get the current rotation as a quaternion
    fn rotation(&self) -> Quat;

    /// Set the position
    fn set_position(&mut self, position: Vec3);

    /// Set the rotation
    fn set_rotation(&mut self, rotation: Quat);

    /// Position and rotation as a [`Pose`]
    fn pose(&self) -> Pose {
        Pose::new(self.position(), self.rotation())
    }

    /// Overwrite position and rotation from a [`Pose`]
    fn set_pose(&mut self, pose: Pose) {
        self.set_position(pose.position);
        self.set_rotation(pose.rotation);
    }
}

// ============================================================================
// Lens
// ============================================================================

/// Default vertical field of view: 60 degrees
pub const DEFAULT_VFOV: f32 = 60.0 * std::f32::consts::PI / 180.0;

/// Lens and clipping settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lens {
    /// Vertical field of view in radians
    pub vfov: f32,
    /// Near clip distance
    pub clip_start: f32,
    /// Far clip distance
    pub clip_end: f32,
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            vfov: DEFAULT_VFOV,
            clip_start: 0.1,
            clip_end: 100.0,
        }
    }
}

// ============================================================================
// Camera
// ============================================================================

/// Named camera for rendering
///
/// Uses OpenGL convention:
/// - +X is right
/// - +Y is up
/// - -Z is forward (into the screen)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Object name; rig cameras use [`crate::naming::camera_name`]
    pub name: String,
    /// Camera position in world space
    pub position: Vec3,
    /// Camera rotation (orientation) as quaternion
    pub rotation: Quat,
    /// Lens settings
    #[serde(default)]
    pub lens: Lens,
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at("Camera", Vec3::new(0.0, 1.0, 6.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y)
    }
}

impl Camera {
    /// Create a camera at a position with no rotation (looking down -Z)
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Quat::IDENTITY,
            lens: Lens::default(),
        }
    }

    /// Create a camera from a pose
    pub fn from_pose(name: impl Into<String>, pose: Pose) -> Self {
        Self {
            name: name.into(),
            position: pose.position,
            rotation: pose.rotation,
            lens: Lens::default(),
        }
    }

    /// Create camera with position looking at target
    pub fn look_at(name: impl Into<String>, position: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut camera = Self::new(name, position);
        camera.set_look_at(target, up);
        camera
    }

    /// Point the camera at a target
    pub fn set_look_at(&mut self, target: Vec3, up: Vec3) {
        let forward = (target - self.position).normalize();
        let right = forward.cross(up).normalize();
        let cam_up = right.cross(forward);

        // In camera space: right=+X, up=+Y, forward=-Z
        let rotation_matrix = glam::Mat3::from_cols(right, cam_up, -forward);
        self.rotation = Quat::from_mat3(&rotation_matrix);
    }

    /// Copy of this camera (pose and lens) under a new name
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Get the forward direction vector
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// Get the right direction vector
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction vector
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Get the target point the camera is looking at (1 unit forward)
    pub fn target(&self) -> Vec3 {
        self.position + self.forward()
    }
}

impl Object for Camera {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}
