//! Side-by-side stereo pairs

use crate::compose::{assemble_columns, ColumnSource};
use crate::error::{LenticularError, Result};
use image::DynamicImage;

/// Place `left` and `right` next to each other, row by row.
///
/// Both halves must have the same size and colour type. The result is twice as wide.
pub fn compose_stereo_pair(left: &DynamicImage, right: &DynamicImage) -> Result<DynamicImage> {
    let (width, height) = (left.width(), left.height());
    if (right.width(), right.height()) != (width, height) {
        return Err(LenticularError::SizeMismatch {
            left: (width, height),
            right: (right.width(), right.height()),
        });
    }
    if left.color() != right.color() {
        return Err(LenticularError::FormatMismatch {
            index: 1,
            expected: format!("{:?}", left.color()),
            found: format!("{:?}", right.color()),
        });
    }

    let plan: Vec<ColumnSource> = (0..width)
        .map(|column| ColumnSource { view: 0, column })
        .chain((0..width).map(|column| ColumnSource { view: 1, column }))
        .collect();
    assemble_columns(&[left.clone(), right.clone()], &plan, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_rows_are_left_then_right() {
        let left = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 2, |x, y| {
            Rgb([x as u8, y as u8, 0])
        }));
        let right = DynamicImage::ImageRgb8(RgbImage::from_fn(2, 2, |x, y| {
            Rgb([x as u8, y as u8, 255])
        }));

        let pair = compose_stereo_pair(&left, &right).unwrap().into_rgb8();
        assert_eq!(pair.dimensions(), (4, 2));
        for y in 0..2 {
            let row: Vec<[u8; 3]> = (0..4).map(|x| pair.get_pixel(x, y).0).collect();
            let y = y as u8;
            assert_eq!(
                row,
                vec![[0, y, 0], [1, y, 0], [0, y, 255], [1, y, 255]]
            );
        }
    }

    #[test]
    fn test_size_mismatch() {
        let left = DynamicImage::new_rgb8(4, 3);
        let right = DynamicImage::new_rgb8(3, 4);
        assert!(matches!(
            compose_stereo_pair(&left, &right),
            Err(LenticularError::SizeMismatch {
                left: (4, 3),
                right: (3, 4)
            })
        ));
    }
}
