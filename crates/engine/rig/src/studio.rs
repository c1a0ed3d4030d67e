//! Rig geometry engine
//!
//! A [`Studio`] owns the main camera, the focus marker and one [`RigCamera`] per slot.
//! Each rig camera hangs off a pivot placed at the focus point with the main
//! camera's orientation. The camera starts at the main camera's pose and the pivot is
//! then turned about its local vertical axis by
//!
//! ```text
//! angle_i = i * spacing - (count - 1) * spacing / 2
//! ```
//!
//! so the rig is symmetric about the main camera's forward axis. Arranging again
//! repositions existing cameras in place and converges to the same layout as a fresh
//! build with the same parameters.

use crate::camera::{Camera, Object};
use crate::error::{Result, RigError};
use crate::focus::FocusMarker;
use crate::naming::camera_name;
use crate::pose::Pose;
use crate::settings::RigSettings;
use glam::Vec3;

/// Angle (degrees) of rig slot `index` for a rig of `count` cameras
pub fn rig_angle(index: usize, count: usize, spacing_deg: f32) -> f32 {
    index as f32 * spacing_deg - (count.saturating_sub(1)) as f32 * spacing_deg / 2.0
}

/// Angles (degrees) of every slot, in index order
pub fn rig_angles(count: usize, spacing_deg: f32) -> Vec<f32> {
    (0..count)
        .map(|index| rig_angle(index, count, spacing_deg))
        .collect()
}

// ============================================================================
// Rig Camera
// ============================================================================

/// One satellite camera and its pivot
#[derive(Debug, Clone, PartialEq)]
pub struct RigCamera {
    index: usize,
    pivot: Pose,
    /// Camera pose in pivot space
    offset: Pose,
    camera: Camera,
}

impl RigCamera {
    fn create(index: usize, main: &Camera, focus: Vec3, angle: f32) -> Self {
        let mut rig_camera = Self {
            index,
            pivot: Pose::IDENTITY,
            offset: Pose::IDENTITY,
            camera: main.duplicate(camera_name(index)),
        };
        rig_camera.place(main, focus, angle);
        rig_camera
    }

    /// Detach, move the pivot to the focus, reset the camera to the main pose,
    /// re-attach with world transform kept, then turn the pivot.
    fn place(&mut self, main: &Camera, focus: Vec3, angle: f32) {
        self.pivot = Pose::new(focus, main.rotation);
        self.camera.set_pose(main.pose());
        self.offset = self.camera.pose().relative_to(&self.pivot);

        self.pivot.rotate_local_y(angle);
        self.camera.set_pose(self.pivot.compose(&self.offset));
    }

    /// Slot index in `[0, camera_count)`
    pub fn index(&self) -> usize {
        self.index
    }

    /// Pivot pose (at the focus point)
    pub fn pivot(&self) -> Pose {
        self.pivot
    }

    /// Camera pose relative to its pivot
    pub fn offset(&self) -> Pose {
        self.offset
    }

    /// The rig camera itself, in world space
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// World pose of the camera (`pivot ∘ offset`)
    pub fn world_pose(&self) -> Pose {
        self.pivot.compose(&self.offset)
    }
}

// ============================================================================
// Studio
// ============================================================================

/// Summary of one arrangement pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    /// No focus marker exists yet; nothing was touched
    Skipped,
    /// Rig was laid out
    Arranged {
        created: usize,
        repositioned: usize,
        removed: usize,
    },
}

/// Main camera, focus marker and the rig built around them
#[derive(Debug, Clone, Default)]
pub struct Studio {
    settings: RigSettings,
    main: Option<Camera>,
    focus: Option<FocusMarker>,
    rig: Vec<RigCamera>,
}

impl Studio {
    pub fn new(settings: RigSettings) -> Self {
        Self {
            settings,
            main: None,
            focus: None,
            rig: Vec::new(),
        }
    }

    pub fn settings(&self) -> &RigSettings {
        &self.settings
    }

    /// Designate the camera the rig is built around.
    ///
    /// Does not re-arrange; call [`Studio::arrange`] or use
    /// [`Studio::move_main_camera`] to move an existing rig.
    pub fn set_main_camera(&mut self, camera: Camera) {
        self.main = Some(camera);
    }

    pub fn main_camera(&self) -> Option<&Camera> {
        self.main.as_ref()
    }

    /// True when a main camera exists and the studio has not been built yet
    pub fn can_build(&self) -> bool {
        self.main.is_some() && self.focus.is_none()
    }

    /// True once a focus marker exists
    pub fn is_built(&self) -> bool {
        self.focus.is_some()
    }

    /// Create the focus marker in front of the main camera and lay out the rig
    pub fn build(&mut self) -> Result<Arrangement> {
        let main = self.main.as_ref().ok_or(RigError::NoPoseSource)?;
        if self.focus.is_some() {
            return Err(RigError::AlreadyBuilt);
        }

        self.focus = Some(FocusMarker::new(main, self.settings.focus_distance()));
        tracing::info!(
            "Built studio around '{}' (focus distance {:.2})",
            main.name,
            self.settings.focus_distance()
        );
        self.arrange()
    }

    /// Current focus point in world space
    pub fn focus_point(&self) -> Option<Vec3> {
        let main = self.main.as_ref()?;
        self.focus.map(|marker| marker.position(main))
    }

    pub fn focus_marker(&self) -> Option<&FocusMarker> {
        self.focus.as_ref()
    }

    /// Rig cameras in index order
    pub fn rig_cameras(&self) -> &[RigCamera] {
        &self.rig
    }

    pub fn rig_camera(&self, index: usize) -> Option<&RigCamera> {
        self.rig.get(index)
    }

    /// Change the focus distance, re-place the focus marker and re-arrange
    pub fn set_focus_distance(&mut self, focus_distance: f32) -> Result<Arrangement> {
        self.settings.set_focus_distance(focus_distance)?;
        if let (Some(main), Some(marker)) = (self.main.as_ref(), self.focus.as_mut()) {
            marker.set_focus_distance(main, focus_distance);
        }
        self.arrange()
    }

    /// Change the number of rig cameras and re-arrange
    pub fn set_camera_count(&mut self, camera_count: usize) -> Result<Arrangement> {
        self.settings.set_camera_count(camera_count)?;
        self.arrange()
    }

    /// Change the angle between neighbouring cameras and re-arrange
    pub fn set_angular_spacing(&mut self, angular_spacing_deg: f32) -> Result<Arrangement> {
        self.settings.set_angular_spacing_deg(angular_spacing_deg)?;
        self.arrange()
    }

    /// Move the main camera; the focus marker follows and the rig is re-arranged
    pub fn move_main_camera(&mut self, pose: Pose) -> Result<Arrangement> {
        let main = self.main.as_mut().ok_or(RigError::NoPoseSource)?;
        main.set_pose(pose);
        self.arrange()
    }

    /// Lay out the rig for the current settings, main camera and focus marker.
    ///
    /// Creates missing slots, repositions existing ones in place and deletes slots at
    /// or beyond the camera count.
    pub fn arrange(&mut self) -> Result<Arrangement> {
        let main = self.main.as_ref().ok_or(RigError::NoPoseSource)?;
        let Some(marker) = self.focus.as_ref() else {
            tracing::debug!("Arrange requested before the studio was built, skipping");
            return Ok(Arrangement::Skipped);
        };
        self.check_consistency()?;

        let focus = marker.position(main);
        let count = self.settings.camera_count();
        let spacing = self.settings.angular_spacing_deg();

        let mut created = 0;
        let mut repositioned = 0;
        for index in 0..count {
            let angle = rig_angle(index, count, spacing).to_radians();
            match self.rig.get_mut(index) {
                Some(rig_camera) => {
                    rig_camera.place(main, focus, angle);
                    repositioned += 1;
                }
                None => {
                    self.rig.push(RigCamera::create(index, main, focus, angle));
                    created += 1;
                }
            }
        }

        let removed = self.rig.len().saturating_sub(count);
        self.rig.truncate(count);

        tracing::debug!(
            "Arranged {} rig cameras around {:?}: {} created, {} repositioned, {} removed",
            count,
            focus,
            created,
            repositioned,
            removed
        );

        Ok(Arrangement::Arranged {
            created,
            repositioned,
            removed,
        })
    }

    fn check_consistency(&self) -> Result<()> {
        for (slot, rig_camera) in self.rig.iter().enumerate() {
            if rig_camera.index != slot {
                return Err(RigError::GeometryInconsistency {
                    index: slot,
                    reason: format!("slot holds rig camera {}", rig_camera.index),
                });
            }
            if rig_camera.camera.name != camera_name(slot) {
                return Err(RigError::GeometryInconsistency {
                    index: slot,
                    reason: format!("camera '{}' is not bound to this slot", rig_camera.camera.name),
                });
            }
        }
        Ok(())
    }
}
