//! Rendered frame discovery
//!
//! Frames are named after their rig camera (`LentiCamera_<i>.<ext>`), so the view
//! order is recovered from the index in the file name, never from timestamps or
//! directory order.

use crate::error::{LenticularError, Result};
use image::{DynamicImage, ImageFormat};
use rig::parse_camera_index;
use std::fs;
use std::path::{Path, PathBuf};

/// One rendered frame on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFrame {
    pub index: usize,
    pub path: PathBuf,
}

/// Rendered frames of one rig, sorted by camera index
#[derive(Debug, Clone)]
pub struct RenderedImageSet {
    dir: PathBuf,
    frames: Vec<RenderedFrame>,
    extension: String,
    format: ImageFormat,
}

impl RenderedImageSet {
    /// Scan `dir` for rig frames.
    ///
    /// Files that do not follow the rig naming scheme are ignored. All frames must
    /// share one file extension, and each camera index may appear only once.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut frames = Vec::new();
        let mut extension: Option<String> = None;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(index) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(parse_camera_index)
            else {
                continue;
            };
            let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
                continue;
            };
            let ext = ext.to_ascii_lowercase();

            match &extension {
                None => extension = Some(ext),
                Some(expected) if *expected != ext => {
                    return Err(LenticularError::FormatMismatch {
                        index,
                        expected: expected.clone(),
                        found: ext,
                    });
                }
                Some(_) => {}
            }
            frames.push(RenderedFrame { index, path });
        }

        let Some(extension) = extension else {
            return Err(LenticularError::EmptySourceSet(dir.to_path_buf()));
        };
        let format = ImageFormat::from_extension(&extension)
            .ok_or_else(|| LenticularError::UnsupportedFormat(extension.clone()))?;

        frames.sort_by_key(|frame| frame.index);
        if let Some(pair) = frames.windows(2).find(|pair| pair[0].index == pair[1].index) {
            return Err(LenticularError::DuplicateView {
                index: pair[0].index,
                first: pair[0].path.clone(),
                second: pair[1].path.clone(),
            });
        }
        for (position, frame) in frames.iter().enumerate() {
            if frame.index != position {
                tracing::warn!(
                    "Rendered set in {} has a gap: expected camera {}, found {}",
                    dir.display(),
                    position,
                    frame.index
                );
                break;
            }
        }

        tracing::debug!(
            "Discovered {} frames ({}) in {}",
            frames.len(),
            extension,
            dir.display()
        );
        Ok(Self {
            dir: dir.to_path_buf(),
            frames,
            extension,
            format,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frames(&self) -> &[RenderedFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Lower-case file extension shared by all frames
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Drop frames whose camera index is `count` or higher
    pub fn retain_below(&mut self, count: usize) {
        let before = self.frames.len();
        self.frames.retain(|frame| frame.index < count);
        if self.frames.len() < before {
            tracing::debug!(
                "Ignoring {} frames at camera index {} or above",
                before - self.frames.len(),
                count
            );
        }
    }

    /// Decode every frame in index order
    pub fn load(&self) -> Result<Vec<DynamicImage>> {
        self.frames
            .iter()
            .map(|frame| {
                image::open(&frame.path).map_err(|source| LenticularError::Decode {
                    path: frame.path.clone(),
                    source,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        assert!(matches!(
            RenderedImageSet::discover(dir.path()),
            Err(LenticularError::EmptySourceSet(_))
        ));
    }

    #[test]
    fn test_mixed_extensions_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("LentiCamera_0.png"), b"").unwrap();
        fs::write(dir.path().join("LentiCamera_1.jpg"), b"").unwrap();
        assert!(matches!(
            RenderedImageSet::discover(dir.path()),
            Err(LenticularError::FormatMismatch { .. })
        ));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RenderedImageSet::discover(dir.path().join("nope")),
            Err(LenticularError::Io(_))
        ));
    }
}
