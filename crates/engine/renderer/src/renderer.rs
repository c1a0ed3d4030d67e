//! Software renderer trait

use crate::error::{RenderError, Result};
use image::RgbImage;
use rig::Camera;
use std::path::Path;

/// Common trait for CPU renderers that produce an image buffer
///
/// - Call `render_with_camera()` to render a frame
/// - Access the image buffer with `image_buffer()`
/// - Save to file with `save_to_file()`
pub trait Renderer {
    /// Render one frame from the given camera
    fn render_with_camera(&mut self, width: u32, height: u32, camera: &Camera);

    /// Get the name of the renderer
    fn name(&self) -> &str;

    /// Last rendered frame, if any
    fn image_buffer(&self) -> Option<&RgbImage>;

    /// Save the last rendered frame; the format follows the file extension
    fn save_to_file(&self, path: &Path) -> Result<()> {
        match self.image_buffer() {
            Some(buffer) => Ok(buffer.save(path)?),
            None => Err(RenderError::NoImage(self.name().to_string())),
        }
    }
}
