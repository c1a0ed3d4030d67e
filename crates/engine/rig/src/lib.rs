//! Rig geometry for lenticular capture
//!
//! Builds a set of satellite cameras around a single reference ("main") camera.
//! The satellites sit on a circular arc around a shared focus point placed
//! `focus_distance` units in front of the main camera, spaced by a fixed angle and
//! symmetric about the main camera's forward axis.
//!
//! # Architecture
//!
//! - **pose**: position + quaternion transforms and their composition
//! - **camera**: camera model (pose + lens) and the [`Object`] trait
//! - **focus**: focus point math and the focus marker that follows the main camera
//! - **settings**: validated rig parameters
//! - **studio**: the [`Studio`] that owns the main camera, focus marker and rig
//! - **naming**: deterministic rig camera names
//!
//! ```
//! use rig::{Camera, RigSettings, Studio};
//! use glam::Vec3;
//!
//! let main = Camera::look_at("Camera", Vec3::new(0.0, 1.0, 5.0), Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
//! let mut studio = Studio::new(RigSettings::new(3, 15.0, 5.0).unwrap());
//! studio.set_main_camera(main);
//! studio.build().unwrap();
//!
//! assert_eq!(studio.rig_cameras().len(), 3);
//! ```

pub mod camera;
pub mod error;
pub mod focus;
pub mod naming;
pub mod pose;
pub mod settings;
pub mod studio;

pub use camera::{Camera, Lens, Object, DEFAULT_VFOV};
pub use error::{Result, RigError};
pub use focus::{compute_focus_point, FocusMarker};
pub use naming::{camera_name, parse_camera_index, RENDER_CAMERA_PREFIX};
pub use pose::Pose;
pub use settings::{
    RigSettings, DEFAULT_ANGULAR_SPACING_DEG, DEFAULT_CAMERA_COUNT, DEFAULT_FOCUS_DISTANCE,
    MIN_CAMERA_COUNT, MIN_FOCUS_DISTANCE,
};
pub use studio::{rig_angle, rig_angles, Arrangement, RigCamera, Studio};
