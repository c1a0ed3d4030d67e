//! Lenticular column interleaving
//!
//! Every lens covers `px_per_lens` printed columns. Those columns are split evenly
//! among the `K` views so that, seen through the lens from different angles, each
//! eye picks up a different camera.

use crate::compose::{assemble_columns, check_uniform, ColumnSource};
use crate::error::{LenticularError, Result};
use crate::image_set::RenderedImageSet;
use crate::output::{lenticular_path, write_atomic};
use crate::print::PrintSettings;
use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// How output columns are assigned to source views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnMapping {
    /// `floor((x mod p) * K / p)`: every lens repeats the same K-way split
    #[default]
    Modulo,
    /// `floor(x * K / p) mod K`: kept to reproduce old prints.
    ///
    /// Equal to `Modulo` in exact arithmetic. Because `x` is not reduced first, float
    /// rounding on wide rasters with a non-integral `p` can move a column to the
    /// neighbouring view.
    Sweep,
}

impl ColumnMapping {
    /// Source view for output column `x`
    pub fn select(self, x: u32, view_count: usize, px_per_lens: f64) -> usize {
        if view_count <= 1 {
            return 0;
        }
        let k = view_count as f64;
        let x = f64::from(x);
        let view = match self {
            ColumnMapping::Modulo => ((x % px_per_lens) * (k / px_per_lens)).floor(),
            ColumnMapping::Sweep => (x * k / px_per_lens).floor() % k,
        };
        // Float error at the top of a lens must not select past the last view
        (view as usize).min(view_count - 1)
    }
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnMapping::Modulo => write!(f, "modulo"),
            ColumnMapping::Sweep => write!(f, "sweep"),
        }
    }
}

impl FromStr for ColumnMapping {
    type Err = LenticularError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "modulo" | "mod" => Ok(ColumnMapping::Modulo),
            "sweep" => Ok(ColumnMapping::Sweep),
            other => Err(LenticularError::InvalidSettings(format!(
                "unknown column mapping '{other}' (expected modulo or sweep)"
            ))),
        }
    }
}

/// Interleaves K equally sized views into one lenticular raster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interleaver {
    px_per_lens: f64,
    mapping: ColumnMapping,
    width: Option<u32>,
}

impl Interleaver {
    pub fn new(px_per_lens: f64) -> Result<Self> {
        if !px_per_lens.is_finite() || px_per_lens <= 0.0 {
            return Err(LenticularError::InvalidSettings(format!(
                "pixels per lens must be positive, got {px_per_lens}"
            )));
        }
        if px_per_lens.fract() != 0.0 {
            tracing::warn!(
                "{:.3} px per lens is not integral; lenses will not repeat the same split",
                px_per_lens
            );
        }
        Ok(Self {
            px_per_lens,
            mapping: ColumnMapping::default(),
            width: None,
        })
    }

    pub fn from_print(settings: &PrintSettings) -> Result<Self> {
        Self::new(settings.px_per_lens())
    }

    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }

    /// Crop the output to `width` columns instead of the full source width
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn px_per_lens(&self) -> f64 {
        self.px_per_lens
    }

    pub fn mapping(&self) -> ColumnMapping {
        self.mapping
    }

    /// Source view for every output column
    pub fn column_views(&self, width: u32, view_count: usize) -> Vec<usize> {
        (0..width)
            .map(|x| self.mapping.select(x, view_count, self.px_per_lens))
            .collect()
    }

    /// Interleave `views`, ordered by camera index.
    ///
    /// Fails before producing anything if the views disagree in size or colour type.
    pub fn interleave(&self, views: &[DynamicImage]) -> Result<DynamicImage> {
        if views.is_empty() {
            return Err(LenticularError::EmptySourceSet(PathBuf::new()));
        }
        let (source_width, height) = check_uniform(views)?;
        let width = self.width.unwrap_or(source_width);
        if width > source_width {
            return Err(LenticularError::WidthExceedsSource {
                width,
                source_width,
            });
        }

        let plan: Vec<ColumnSource> = self
            .column_views(width, views.len())
            .into_iter()
            .zip(0..)
            .map(|(view, column)| ColumnSource { view, column })
            .collect();

        tracing::debug!(
            "Interleaving {} views into {}x{} ({} mapping, {} px per lens)",
            views.len(),
            width,
            height,
            self.mapping,
            self.px_per_lens
        );
        assemble_columns(views, &plan, height)
    }

    /// Load a rendered set, interleave it and write `lenticular.<ext>` next to it
    pub fn interleave_set(&self, set: &RenderedImageSet) -> Result<PathBuf> {
        if set.is_empty() {
            return Err(LenticularError::EmptySourceSet(set.dir().to_path_buf()));
        }
        let views = set.load()?;
        let image = self.interleave(&views)?;
        let path = lenticular_path(set.dir(), set.extension());
        write_atomic(&image, &path, set.format())?;
        tracing::info!(
            "Wrote {} ({} views, {}x{})",
            path.display(),
            views.len(),
            image.width(),
            image.height()
        );
        Ok(path)
    }
}
