//! CPU preview tracer for studio scenes
//!
//! Renders a checkered ground plane and a handful of axis-aligned boxes. Good enough
//! to see parallax between rig cameras without a real host application.

use crate::lighting::{shade, BACKGROUND_COLOR, GROUND_DARK, GROUND_LIGHT};
use crate::renderer::Renderer;
use glam::{Vec2, Vec3};
use image::{ImageBuffer, Rgb, RgbImage};
use rig::Camera;

/// Ray for raytracing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Hit information from a ray-scene intersection
#[derive(Debug, Clone, Copy)]
pub struct HitInfo {
    pub hit: bool,
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

impl Default for HitInfo {
    fn default() -> Self {
        Self {
            hit: false,
            t: f32::MAX,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
        }
    }
}

/// Axis-aligned box with a flat colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBox {
    pub min: Vec3,
    pub max: Vec3,
    pub color: Vec3,
}

impl SceneBox {
    pub fn new(min: Vec3, max: Vec3, color: Vec3) -> Self {
        Self { min, max, color }
    }

    /// Box of edge length `size` resting on the ground at `(x, z)`
    pub fn cube_on_ground(x: f32, z: f32, size: f32, color: Vec3) -> Self {
        let half = size * 0.5;
        Self::new(
            Vec3::new(x - half, 0.0, z - half),
            Vec3::new(x + half, size, z + half),
            color,
        )
    }
}

/// Ground plane at `y = 0` plus boxes
#[derive(Debug, Clone, PartialEq)]
pub struct StudioScene {
    pub boxes: Vec<SceneBox>,
    /// Edge length of one ground checker tile
    pub checker_size: f32,
}

impl Default for StudioScene {
    /// Three cubes staggered in depth around the origin
    fn default() -> Self {
        Self {
            boxes: vec![
                SceneBox::cube_on_ground(0.0, 0.0, 1.0, Vec3::new(0.9, 0.45, 0.2)),
                SceneBox::cube_on_ground(-1.5, -1.5, 0.8, Vec3::new(0.3, 0.6, 0.9)),
                SceneBox::cube_on_ground(1.4, 1.2, 0.6, Vec3::new(0.5, 0.85, 0.4)),
            ],
            checker_size: 0.5,
        }
    }
}

/// Ray-box intersection (slab method)
pub fn intersect_box(ray: Ray, box_min: Vec3, box_max: Vec3) -> HitInfo {
    let mut hit_info = HitInfo::default();

    let inv_dir = 1.0 / ray.direction;
    let t_min = (box_min - ray.origin) * inv_dir;
    let t_max = (box_max - ray.origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return hit_info;
    }

    hit_info.hit = true;
    hit_info.t = if t_near > 0.0 { t_near } else { t_far };
    hit_info.point = ray.origin + ray.direction * hit_info.t;

    let center = (box_min + box_max) * 0.5;
    let local_point = hit_info.point - center;
    let size = (box_max - box_min) * 0.5;
    let d = (local_point / size).abs();

    let max_component = d.x.max(d.y).max(d.z);
    hit_info.normal = if (max_component - d.x).abs() < 0.0001 {
        Vec3::new(local_point.x.signum(), 0.0, 0.0)
    } else if (max_component - d.y).abs() < 0.0001 {
        Vec3::new(0.0, local_point.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, local_point.z.signum())
    };

    hit_info
}

/// Ray through a pixel of `camera`.
///
/// `uv` is centred on the image and scaled by image height, so `uv.y` runs over
/// `[-0.5, 0.5]` top to bottom.
pub fn create_camera_ray(uv: Vec2, camera: &Camera) -> Ray {
    let scale = 2.0 * (camera.lens.vfov * 0.5).tan();
    let direction =
        camera.forward() + uv.x * scale * camera.right() + uv.y * scale * camera.up();
    Ray {
        origin: camera.position,
        direction: direction.normalize(),
    }
}

/// Pure Rust CPU raytracer for [`StudioScene`]s
pub struct StudioTracer {
    scene: StudioScene,
    image_buffer: Option<RgbImage>,
}

impl StudioTracer {
    pub fn new(scene: StudioScene) -> Self {
        Self {
            scene,
            image_buffer: None,
        }
    }

    pub fn scene(&self) -> &StudioScene {
        &self.scene
    }

    fn trace(&self, ray: Ray, clip_end: f32) -> Vec3 {
        let mut nearest = HitInfo::default();
        let mut color = BACKGROUND_COLOR;

        for scene_box in &self.scene.boxes {
            let hit = intersect_box(ray, scene_box.min, scene_box.max);
            if hit.hit && hit.t < nearest.t {
                color = shade(hit.normal, scene_box.color);
                nearest = hit;
            }
        }

        if ray.direction.y < 0.0 {
            let t = -ray.origin.y / ray.direction.y;
            if t > 0.0 && t < nearest.t {
                let point = ray.origin + ray.direction * t;
                let cell = (point.x / self.scene.checker_size).floor() as i64
                    + (point.z / self.scene.checker_size).floor() as i64;
                let ground = if cell.rem_euclid(2) == 0 {
                    GROUND_LIGHT
                } else {
                    GROUND_DARK
                };
                color = shade(Vec3::Y, ground);
                nearest.t = t;
            }
        }

        if nearest.t > clip_end {
            color = BACKGROUND_COLOR;
        }

        // Gamma correction
        color.powf(1.0 / 2.2)
    }
}

impl Default for StudioTracer {
    fn default() -> Self {
        Self::new(StudioScene::default())
    }
}

impl Renderer for StudioTracer {
    fn render_with_camera(&mut self, width: u32, height: u32, camera: &Camera) {
        let buffer = ImageBuffer::from_fn(width, height, |x, y| {
            let uv = Vec2::new(
                (x as f32 + 0.5 - 0.5 * width as f32) / height as f32,
                -((y as f32 + 0.5 - 0.5 * height as f32) / height as f32),
            );
            let color = self.trace(create_camera_ray(uv, camera), camera.lens.clip_end);

            let r = (color.x.clamp(0.0, 1.0) * 255.0) as u8;
            let g = (color.y.clamp(0.0, 1.0) * 255.0) as u8;
            let b = (color.z.clamp(0.0, 1.0) * 255.0) as u8;

            Rgb([r, g, b])
        });

        self.image_buffer = Some(buffer);
    }

    fn name(&self) -> &str {
        "StudioTracer"
    }

    fn image_buffer(&self) -> Option<&RgbImage> {
        self.image_buffer.as_ref()
    }
}
