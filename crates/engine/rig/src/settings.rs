//! Validated rig parameters

use crate::error::{Result, RigError};
use serde::{Deserialize, Serialize};

/// Default number of rig cameras
pub const DEFAULT_CAMERA_COUNT: usize = 2;

/// Default angle between neighbouring rig cameras, in degrees
pub const DEFAULT_ANGULAR_SPACING_DEG: f32 = 30.0;

/// Default distance from the main camera to the focus point
pub const DEFAULT_FOCUS_DISTANCE: f32 = 3.0;

/// Smallest rig that still produces a parallax pair
pub const MIN_CAMERA_COUNT: usize = 2;

/// Smallest allowed focus distance
pub const MIN_FOCUS_DISTANCE: f32 = 1.0;

/// Rig layout parameters
///
/// Construct through [`RigSettings::new`] or the setters so the ranges are always
/// checked; a failed update leaves the previous values in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedRigSettings")]
pub struct RigSettings {
    camera_count: usize,
    angular_spacing_deg: f32,
    focus_distance: f32,
}

#[derive(Deserialize)]
struct UncheckedRigSettings {
    camera_count: usize,
    angular_spacing_deg: f32,
    focus_distance: f32,
}

impl TryFrom<UncheckedRigSettings> for RigSettings {
    type Error = RigError;

    fn try_from(raw: UncheckedRigSettings) -> Result<Self> {
        Self::new(raw.camera_count, raw.angular_spacing_deg, raw.focus_distance)
    }
}

impl Default for RigSettings {
    fn default() -> Self {
        Self {
            camera_count: DEFAULT_CAMERA_COUNT,
            angular_spacing_deg: DEFAULT_ANGULAR_SPACING_DEG,
            focus_distance: DEFAULT_FOCUS_DISTANCE,
        }
    }
}

impl RigSettings {
    pub fn new(camera_count: usize, angular_spacing_deg: f32, focus_distance: f32) -> Result<Self> {
        validate_camera_count(camera_count)?;
        validate_angular_spacing(angular_spacing_deg)?;
        validate_focus_distance(focus_distance)?;
        Ok(Self {
            camera_count,
            angular_spacing_deg,
            focus_distance,
        })
    }

    pub fn camera_count(&self) -> usize {
        self.camera_count
    }

    pub fn angular_spacing_deg(&self) -> f32 {
        self.angular_spacing_deg
    }

    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
    }

    pub fn set_camera_count(&mut self, camera_count: usize) -> Result<()> {
        validate_camera_count(camera_count)?;
        self.camera_count = camera_count;
        Ok(())
    }

    pub fn set_angular_spacing_deg(&mut self, angular_spacing_deg: f32) -> Result<()> {
        validate_angular_spacing(angular_spacing_deg)?;
        self.angular_spacing_deg = angular_spacing_deg;
        Ok(())
    }

    pub fn set_focus_distance(&mut self, focus_distance: f32) -> Result<()> {
        validate_focus_distance(focus_distance)?;
        self.focus_distance = focus_distance;
        Ok(())
    }
}

fn validate_camera_count(camera_count: usize) -> Result<()> {
    if camera_count < MIN_CAMERA_COUNT {
        return Err(RigError::InvalidSettings(format!(
            "camera count must be >= {MIN_CAMERA_COUNT} (got {camera_count})"
        )));
    }
    Ok(())
}

fn validate_angular_spacing(angular_spacing_deg: f32) -> Result<()> {
    if !angular_spacing_deg.is_finite() || angular_spacing_deg <= 0.0 {
        return Err(RigError::InvalidSettings(format!(
            "angular spacing must be a positive number of degrees (got {angular_spacing_deg})"
        )));
    }
    Ok(())
}

fn validate_focus_distance(focus_distance: f32) -> Result<()> {
    if !focus_distance.is_finite() || focus_distance < MIN_FOCUS_DISTANCE {
        return Err(RigError::InvalidSettings(format!(
            "focus distance must be >= {MIN_FOCUS_DISTANCE} (got {focus_distance})"
        )));
    }
    Ok(())
}
