//! Printable rig summaries

use rig::{rig_angle, Object, Studio};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigCameraReport {
    pub index: usize,
    pub name: String,
    /// Swing about the focus point in degrees
    pub angle_deg: f32,
    pub position: [f32; 3],
    /// Extrinsic XYZ Euler rotation in degrees
    pub rotation_deg: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RigReport {
    pub focus_point: [f32; 3],
    pub focus_distance: f32,
    pub angular_spacing_deg: f32,
    pub cameras: Vec<RigCameraReport>,
}

impl RigReport {
    /// `None` until the studio has been built
    pub fn from_studio(studio: &Studio) -> Option<Self> {
        let focus_point = studio.focus_point()?;
        let settings = studio.settings();

        let cameras = studio
            .rig_cameras()
            .iter()
            .map(|rig_camera| {
                let camera = rig_camera.camera();
                RigCameraReport {
                    index: rig_camera.index(),
                    name: camera.name.clone(),
                    angle_deg: rig_angle(
                        rig_camera.index(),
                        settings.camera_count(),
                        settings.angular_spacing_deg(),
                    ),
                    position: camera.position.to_array(),
                    rotation_deg: camera.pose().to_euler_xyz().map(f32::to_degrees),
                }
            })
            .collect();

        Some(Self {
            focus_point: focus_point.to_array(),
            focus_distance: settings.focus_distance(),
            angular_spacing_deg: settings.angular_spacing_deg(),
            cameras,
        })
    }
}

impl fmt::Display for RigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [fx, fy, fz] = self.focus_point;
        writeln!(
            f,
            "focus ({fx:.3}, {fy:.3}, {fz:.3}) at distance {:.3}, spacing {:.2} deg",
            self.focus_distance, self.angular_spacing_deg
        )?;
        writeln!(
            f,
            "{:<16} {:>8}  {:>26}  {:>26}",
            "camera", "angle", "position", "rotation (deg)"
        )?;
        for camera in &self.cameras {
            let [x, y, z] = camera.position;
            let [rx, ry, rz] = camera.rotation_deg;
            writeln!(
                f,
                "{:<16} {:>8.2}  ({:>7.3}, {:>7.3}, {:>7.3})  ({:>7.2}, {:>7.2}, {:>7.2})",
                camera.name, camera.angle_deg, x, y, z, rx, ry, rz
            )?;
        }
        Ok(())
    }
}
