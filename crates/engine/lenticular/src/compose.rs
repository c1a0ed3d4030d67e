//! Column-wise raster assembly
//!
//! Interleaving and stereo composition both build an output image column by column,
//! each column copied verbatim from one column of one source. A [`ColumnSource`]
//! plan describes that mapping; [`assemble_columns`] runs it for any colour type the
//! `image` crate decodes to.

use crate::error::{LenticularError, Result};
use image::{DynamicImage, ImageBuffer, Pixel};

/// Output column taken from `column` of source view `view`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSource {
    pub view: usize,
    pub column: u32,
}

/// Check that every view has the first view's dimensions and colour type
pub fn check_uniform(views: &[DynamicImage]) -> Result<(u32, u32)> {
    let Some(first) = views.first() else {
        return Err(LenticularError::UnsupportedFormat(
            "no source views".to_string(),
        ));
    };
    let expected = (first.width(), first.height());
    for (index, view) in views.iter().enumerate().skip(1) {
        let found = (view.width(), view.height());
        if found != expected {
            return Err(LenticularError::DimensionMismatch {
                index,
                expected,
                found,
            });
        }
        if view.color() != first.color() {
            return Err(LenticularError::FormatMismatch {
                index,
                expected: format!("{:?}", first.color()),
                found: format!("{:?}", view.color()),
            });
        }
    }
    Ok(expected)
}

fn assemble_buffers<P>(
    views: &[&ImageBuffer<P, Vec<P::Subpixel>>],
    plan: &[ColumnSource],
    height: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
{
    ImageBuffer::from_fn(plan.len() as u32, height, |x, y| {
        let source = plan[x as usize];
        *views[source.view].get_pixel(source.column, y)
    })
}

macro_rules! assemble_variant {
    ($variant:ident, $views:expr, $plan:expr, $height:expr) => {{
        let buffers = $views
            .iter()
            .enumerate()
            .map(|(index, view)| match view {
                DynamicImage::$variant(buffer) => Ok(buffer),
                other => Err(LenticularError::FormatMismatch {
                    index,
                    expected: stringify!($variant).to_string(),
                    found: format!("{:?}", other.color()),
                }),
            })
            .collect::<Result<Vec<_>>>()?;
        DynamicImage::$variant(assemble_buffers(&buffers, $plan, $height))
    }};
}

/// Build a `plan.len() x height` image from the views.
///
/// Views must share one colour type and every planned column must exist in its view.
pub fn assemble_columns(
    views: &[DynamicImage],
    plan: &[ColumnSource],
    height: u32,
) -> Result<DynamicImage> {
    let Some(first) = views.first() else {
        return Err(LenticularError::UnsupportedFormat(
            "no source views".to_string(),
        ));
    };

    let image = match first {
        DynamicImage::ImageLuma8(_) => assemble_variant!(ImageLuma8, views, plan, height),
        DynamicImage::ImageLumaA8(_) => assemble_variant!(ImageLumaA8, views, plan, height),
        DynamicImage::ImageRgb8(_) => assemble_variant!(ImageRgb8, views, plan, height),
        DynamicImage::ImageRgba8(_) => assemble_variant!(ImageRgba8, views, plan, height),
        DynamicImage::ImageLuma16(_) => assemble_variant!(ImageLuma16, views, plan, height),
        DynamicImage::ImageLumaA16(_) => assemble_variant!(ImageLumaA16, views, plan, height),
        DynamicImage::ImageRgb16(_) => assemble_variant!(ImageRgb16, views, plan, height),
        DynamicImage::ImageRgba16(_) => assemble_variant!(ImageRgba16, views, plan, height),
        DynamicImage::ImageRgb32F(_) => assemble_variant!(ImageRgb32F, views, plan, height),
        DynamicImage::ImageRgba32F(_) => assemble_variant!(ImageRgba32F, views, plan, height),
        other => {
            return Err(LenticularError::UnsupportedFormat(format!(
                "{:?}",
                other.color()
            )))
        }
    };
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb};

    type Rgb16Image = ImageBuffer<Rgb<u16>, Vec<u16>>;

    #[test]
    fn test_sixteen_bit_channels_survive() {
        let view = Rgb16Image::from_fn(2, 1, |x, _| image::Rgb([x as u16 * 1000 + 7, 65535, 1]));
        let views = vec![DynamicImage::ImageRgb16(view)];
        let plan = [
            ColumnSource { view: 0, column: 1 },
            ColumnSource { view: 0, column: 0 },
        ];

        let out = assemble_columns(&views, &plan, 1).unwrap().into_rgb16();
        assert_eq!(out.get_pixel(0, 0).0, [1007, 65535, 1]);
        assert_eq!(out.get_pixel(1, 0).0, [7, 65535, 1]);
    }

    #[test]
    fn test_mixed_colour_types_rejected() {
        let views = vec![
            DynamicImage::ImageLuma8(GrayImage::from_pixel(2, 2, Luma([1]))),
            DynamicImage::new_rgb8(2, 2),
        ];
        assert!(matches!(
            check_uniform(&views),
            Err(LenticularError::FormatMismatch { index: 1, .. })
        ));
        let plan = [ColumnSource { view: 1, column: 0 }];
        assert!(matches!(
            assemble_columns(&views, &plan, 2),
            Err(LenticularError::FormatMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_size_mismatch_reported_with_index() {
        let views = vec![
            DynamicImage::new_rgb8(4, 2),
            DynamicImage::new_rgb8(4, 2),
            DynamicImage::new_rgb8(4, 3),
        ];
        match check_uniform(&views) {
            Err(LenticularError::DimensionMismatch {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(expected, (4, 2));
                assert_eq!(found, (4, 3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
