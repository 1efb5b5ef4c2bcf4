//! Corner-aligned bilinear upscaling.

use crate::heightfield::{FieldError, HeightField};

/// Resample `src` into a field `factor`× larger on each axis.
///
/// The coordinate mapping uses `(w-1)/(new_w-1)` so the four outer corners
/// of source and destination coincide exactly; every interior destination
/// cell is a bilinear sample of the source.
pub fn scale(src: &HeightField, factor: usize) -> Result<HeightField, FieldError> {
    let width = src.width.checked_mul(factor).ok_or(FieldError::TooLarge {
        width: src.width,
        height: src.height,
        max: crate::heightfield::MAX_CELLS,
    })?;
    let height = src.height.checked_mul(factor).ok_or(FieldError::TooLarge {
        width: src.width,
        height: src.height,
        max: crate::heightfield::MAX_CELLS,
    })?;
    let mut dst = HeightField::new(width, height)?;

    // Degenerate axes (a single destination column/row) pin to the origin.
    let scale_x = if width > 1 { (src.width - 1) as f64 / (width - 1) as f64 } else { 0.0 };
    let scale_y = if height > 1 { (src.height - 1) as f64 / (height - 1) as f64 } else { 0.0 };

    for y in 0..height {
        for x in 0..width {
            dst.data[y * width + x] = src.sample_bilinear(x as f64 * scale_x, y as f64 * scale_y);
        }
    }
    Ok(dst)
}
