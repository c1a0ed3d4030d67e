//! Output files
//!
//! Composed rasters are encoded to a temporary file next to the target and renamed
//! into place, so a failed encode never leaves a partial image behind.

use crate::error::Result;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// File stem of the interleaved raster
pub const LENTICULAR_STEM: &str = "lenticular";

/// `<dir>/lenticular.<extension>`
pub fn lenticular_path(dir: &Path, extension: &str) -> PathBuf {
    dir.join(format!("{LENTICULAR_STEM}.{extension}"))
}

/// Encode `image` as `format` and move it to `path`
pub fn write_atomic(image: &DynamicImage, path: &Path, format: ImageFormat) -> Result<()> {
    let tmp = path.with_extension("tmp");
    if let Err(err) = image.save_with_format(&tmp, format) {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
