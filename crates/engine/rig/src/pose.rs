//! Rigid transforms (position + rotation)
//!
//! A [`Pose`] is the world-space (or parent-space) placement of an object. Parent and
//! child poses combine with [`Pose::compose`]; [`Pose::relative_to`] answers the
//! reverse question of which local pose keeps a child's world placement unchanged
//! under a new parent.
//!
//! # Coordinate System
//!
//! - +X is right
//! - +Y is up
//! - -Z is forward

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Position and orientation in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Translation
    pub position: Vec3,
    /// Orientation
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    /// Pose at the origin with no rotation
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Pose from a translation only
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Create a pose from XYZ Euler angles in radians.
    ///
    /// Angles are extrinsic X, then Y, then Z (`R = Rz * Ry * Rx`), which is how
    /// 3D content tools usually store object rotation.
    pub fn from_euler_xyz(position: Vec3, euler: [f32; 3]) -> Self {
        let rotation = Quat::from_rotation_z(euler[2])
            * Quat::from_rotation_y(euler[1])
            * Quat::from_rotation_x(euler[0]);
        Self { position, rotation }
    }

    /// XYZ Euler angles (radians) of this pose's rotation, inverse of [`Pose::from_euler_xyz`]
    pub fn to_euler_xyz(&self) -> [f32; 3] {
        // R = Rz * Ry * Rx, so decompose with the intrinsic ZYX order
        let (z, y, x) = self.rotation.to_euler(glam::EulerRot::ZYX);
        [x, y, z]
    }

    /// Parent ∘ child: world pose of `child` given in this pose's local space
    pub fn compose(&self, child: &Pose) -> Pose {
        Pose {
            position: self.position + self.rotation * child.position,
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }

    /// Inverse transform
    pub fn inverse(&self) -> Pose {
        let inv = self.rotation.inverse();
        Pose {
            position: inv * -self.position,
            rotation: inv,
        }
    }

    /// Local pose under `parent` that reproduces this world pose.
    ///
    /// `parent.compose(&self.relative_to(parent)) == self` (up to float error).
    pub fn relative_to(&self, parent: &Pose) -> Pose {
        parent.inverse().compose(self)
    }

    /// Rotate about the object's own vertical (local +Y) axis
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_y(angle)).normalize();
    }

    /// Transform a point from local into parent space
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * point
    }

    /// Unit forward direction (local -Z)
    pub fn forward(&self) -> Vec3 {
        (self.rotation * Vec3::NEG_Z).normalize()
    }

    /// Approximate equality used by arrangement checks and tests
    pub fn abs_diff_eq(&self, other: &Pose, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}
