//! Lenticular Interleaving
//!
//! Recombines one rendered frame per rig camera into a single raster for printing
//! behind a lenticular lens sheet.
//!
//! - **print**: physical print settings and the render resolution they imply
//! - **interleave**: column-to-view mapping and the [`Interleaver`]
//! - **image_set**: discovery and loading of rendered frames by camera index
//! - **stereo**: side-by-side composition of a left/right pair
//! - **output**: atomic writes of the composed raster
//!
//! Every output pixel is a verbatim copy of the pixel at the same position in the
//! selected source view. Nothing is blended or resampled.

pub mod compose;
pub mod error;
pub mod image_set;
pub mod interleave;
pub mod output;
pub mod print;
pub mod stereo;

pub use error::{LenticularError, Result};
pub use image_set::{RenderedFrame, RenderedImageSet};
pub use interleave::{ColumnMapping, Interleaver};
pub use output::{lenticular_path, write_atomic, LENTICULAR_STEM};
pub use print::{
    compute_render_resolution, PrintSettings, RenderResolution, CM_PER_INCH, DEFAULT_DPI,
    DEFAULT_LPI, DEFAULT_PRINT_HEIGHT_CM, DEFAULT_PRINT_WIDTH_CM,
};
pub use stereo::compose_stereo_pair;
