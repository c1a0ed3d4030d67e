//! Focus point and focus marker
//!
//! The focus point is where every rig camera looks: `focus_distance` units along the
//! main camera's forward axis. The [`FocusMarker`] caches it as a child of the main
//! camera, so moving the main camera carries the focus (and with it the rig) along.

use crate::camera::{Camera, Object};
use crate::pose::Pose;
use glam::Vec3;

/// `camera.position + focus_distance * forward(camera)`
pub fn compute_focus_point(camera: &Camera, focus_distance: f32) -> Vec3 {
    camera.position + focus_distance * camera.forward().normalize()
}

/// Focus marker parented to the main camera
///
/// Only the marker's offset in main-camera space is stored; its world pose is always
/// derived from the current main camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusMarker {
    local: Pose,
}

impl FocusMarker {
    /// Place a marker at the focus point of `main`, oriented like `main`
    pub fn new(main: &Camera, focus_distance: f32) -> Self {
        let mut marker = Self {
            local: Pose::IDENTITY,
        };
        marker.set_focus_distance(main, focus_distance);
        marker
    }

    /// Recompute the marker from scratch for a new focus distance.
    ///
    /// The world position is computed first and then re-parented under `main` with
    /// its world transform kept.
    pub fn set_focus_distance(&mut self, main: &Camera, focus_distance: f32) {
        let world = Pose::new(compute_focus_point(main, focus_distance), main.rotation);
        self.local = world.relative_to(&main.pose());
    }

    /// World pose of the marker under the given main camera
    pub fn world_pose(&self, main: &Camera) -> Pose {
        main.pose().compose(&self.local)
    }

    /// World position of the marker under the given main camera
    pub fn position(&self, main: &Camera) -> Vec3 {
        self.world_pose(main).position
    }

    /// Offset of the marker in main-camera space
    pub fn local_pose(&self) -> Pose {
        self.local
    }
}
