//! Configuration loaded from lentimaker.toml
//!
//! Every section and field is optional; missing values fall back to the defaults
//! below. Command-line [`Overrides`] are applied on top.

use anyhow::{Context, Result};
use clap::Args;
use glam::Vec3;
use lenticular::{compute_render_resolution, PrintSettings};
use renderer::OrchestratorConfig;
use rig::{Camera, Object, Pose, RigSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "lentimaker.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LentimakerConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub rig: RigConfig,
    #[serde(default)]
    pub print: PrintConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// The main camera the rig is built around
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Point to look at; ignored when `rotation_deg` is set
    #[serde(default = "default_camera_target")]
    pub target: [f32; 3],
    /// Extrinsic XYZ Euler rotation in degrees
    #[serde(default)]
    pub rotation_deg: Option<[f32; 3]>,
    #[serde(default = "default_vfov_deg")]
    pub vfov_deg: f32,
}

fn default_camera_position() -> [f32; 3] {
    [0.0, 1.0, 6.0]
}

fn default_camera_target() -> [f32; 3] {
    [0.0, 0.5, 0.0]
}

fn default_vfov_deg() -> f32 {
    40.0
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: default_camera_position(),
            target: default_camera_target(),
            rotation_deg: None,
            vfov_deg: default_vfov_deg(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigConfig {
    #[serde(default = "default_camera_count")]
    pub camera_count: usize,
    #[serde(default = "default_angular_spacing_deg")]
    pub angular_spacing_deg: f32,
    #[serde(default = "default_focus_distance")]
    pub focus_distance: f32,
}

fn default_camera_count() -> usize {
    rig::DEFAULT_CAMERA_COUNT
}

fn default_angular_spacing_deg() -> f32 {
    rig::DEFAULT_ANGULAR_SPACING_DEG
}

fn default_focus_distance() -> f32 {
    rig::DEFAULT_FOCUS_DISTANCE
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            camera_count: default_camera_count(),
            angular_spacing_deg: default_angular_spacing_deg(),
            focus_distance: default_focus_distance(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_lpi")]
    pub lpi: u32,
    #[serde(default = "default_print_width_cm")]
    pub width_cm: f64,
    #[serde(default = "default_print_height_cm")]
    pub height_cm: f64,
}

fn default_dpi() -> u32 {
    lenticular::DEFAULT_DPI
}

fn default_lpi() -> u32 {
    lenticular::DEFAULT_LPI
}

fn default_print_width_cm() -> f64 {
    lenticular::DEFAULT_PRINT_WIDTH_CM
}

fn default_print_height_cm() -> f64 {
    lenticular::DEFAULT_PRINT_HEIGHT_CM
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            dpi: default_dpi(),
            lpi: default_lpi(),
            width_cm: default_print_width_cm(),
            height_cm: default_print_height_cm(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_reissue_after_ticks")]
    pub reissue_after_ticks: u32,
    /// Frame size; derived from the print settings when unset
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("render")
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_reissue_after_ticks() -> u32 {
    renderer::DEFAULT_REISSUE_AFTER_TICKS
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            reissue_after_ticks: default_reissue_after_ticks(),
            width: None,
            height: None,
        }
    }
}

/// Command-line values that take precedence over the file
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Number of rig cameras (>= 2)
    #[arg(long, global = true)]
    pub count: Option<usize>,

    /// Angle between neighbouring cameras in degrees
    #[arg(long, global = true)]
    pub spacing: Option<f32>,

    /// Distance from the main camera to the focus point (>= 1.0)
    #[arg(long, global = true)]
    pub focus: Option<f32>,

    /// Printer resolution in dots per inch (>= 100)
    #[arg(long, global = true)]
    pub dpi: Option<u32>,

    /// Lens sheet pitch in lenses per inch (>= 10)
    #[arg(long, global = true)]
    pub lpi: Option<u32>,

    /// Print width in centimetres
    #[arg(long, global = true)]
    pub width_cm: Option<f64>,

    /// Print height in centimetres
    #[arg(long, global = true)]
    pub height_cm: Option<f64>,

    /// Directory rendered frames are written to
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Poll interval of the render loop in milliseconds
    #[arg(long, global = true)]
    pub poll_interval_ms: Option<u64>,
}

impl LentimakerConfig {
    /// Load `path`, or `lentimaker.toml` if it exists, or the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(count) = overrides.count {
            self.rig.camera_count = count;
        }
        if let Some(spacing) = overrides.spacing {
            self.rig.angular_spacing_deg = spacing;
        }
        if let Some(focus) = overrides.focus {
            self.rig.focus_distance = focus;
        }
        if let Some(dpi) = overrides.dpi {
            self.print.dpi = dpi;
        }
        if let Some(lpi) = overrides.lpi {
            self.print.lpi = lpi;
        }
        if let Some(width_cm) = overrides.width_cm {
            self.print.width_cm = width_cm;
        }
        if let Some(height_cm) = overrides.height_cm {
            self.print.height_cm = height_cm;
        }
        if let Some(output_dir) = &overrides.output_dir {
            self.render.output_dir = output_dir.clone();
        }
        if let Some(poll_interval_ms) = overrides.poll_interval_ms {
            self.render.poll_interval_ms = poll_interval_ms;
        }
    }

    pub fn main_camera(&self) -> Camera {
        let position = Vec3::from_array(self.camera.position);
        let mut camera = match self.camera.rotation_deg {
            Some(rotation) => {
                let mut camera = Camera::new("Camera", position);
                camera.set_pose(Pose::from_euler_xyz(
                    position,
                    rotation.map(f32::to_radians),
                ));
                camera
            }
            None => Camera::look_at(
                "Camera",
                position,
                Vec3::from_array(self.camera.target),
                Vec3::Y,
            ),
        };
        camera.lens.vfov = self.camera.vfov_deg.to_radians();
        camera
    }

    pub fn rig_settings(&self) -> Result<RigSettings> {
        RigSettings::new(
            self.rig.camera_count,
            self.rig.angular_spacing_deg,
            self.rig.focus_distance,
        )
        .context("invalid [rig] settings")
    }

    pub fn print_settings(&self) -> Result<PrintSettings> {
        PrintSettings::new(
            self.print.dpi,
            self.print.lpi,
            self.print.width_cm,
            self.print.height_cm,
        )
        .context("invalid [print] settings")
    }

    /// Frame size: explicit `[render]` values, else the print resolution
    pub fn frame_size(&self) -> Result<(u32, u32)> {
        if let (Some(width), Some(height)) = (self.render.width, self.render.height) {
            return Ok((width, height));
        }
        let resolution = compute_render_resolution(&self.print_settings()?);
        Ok((
            self.render.width.unwrap_or(resolution.width),
            self.render.height.unwrap_or(resolution.height),
        ))
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_output_dir(self.render.output_dir.clone())
            .with_poll_interval(Duration::from_millis(self.render.poll_interval_ms))
            .with_reissue_after_ticks(self.render.reissue_after_ticks)
    }
}
