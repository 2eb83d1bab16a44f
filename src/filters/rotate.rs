//! Arbitrary-angle rotation about the grid centre.
//!
//! Rotation is pull-based: for each destination pixel (x, y) the source
//! coordinate is found by rotating (x, y) by `angle` around
//! (width / 2, height / 2). The source coordinate is converted to an index by
//! truncation toward zero (not rounding) and the pixel is copied unchanged,
//! i.e. nearest-neighbour without interpolation. Destinations whose source
//! falls outside the grid are filled with 0.
//!
//! The output always has the input's dimensions, so a 90° rotation of a
//! non-square grid crops and pads rather than swapping width and height.

use ndarray::{Array2, ArrayView2};

use crate::error::{ImgProcError, Result};

/// Angle in degrees used when the caller does not pick one.
pub const DEFAULT_ROTATE_ANGLE: f64 = -90.0;

/// Background value for destinations with no source pixel.
const FILL: f64 = 0.0;

/// Rotate a luma grid by `angle` degrees.
///
/// # Arguments
/// * `input` - Luma grid (height, width)
/// * `angle` - Rotation in degrees; must be finite
///
/// # Returns
/// Rotated grid (height, width) - same dimensions
pub fn rotate_nearest(input: ArrayView2<f64>, angle: f64) -> Result<Array2<f64>> {
    if !angle.is_finite() {
        return Err(ImgProcError::param("angle", format!("{angle} is not finite")));
    }

    let (height, width) = input.dim();
    let radians = angle.to_radians();
    let cos_val = radians.cos();
    let sin_val = radians.sin();

    let w = width as f64;
    let h = height as f64;

    log::debug!("rotate {height}x{width} by {angle} degrees");

    Ok(Array2::from_shape_fn((height, width), |(y, x)| {
        let fx = x as f64;
        let fy = y as f64;
        // `as` truncates toward zero
        let src_x = ((fx - w / 2.0) * cos_val - (fy - h / 2.0) * sin_val + w / 2.0) as i64;
        let src_y = ((fx - w / 2.0) * sin_val + (fy - h / 2.0) * cos_val + h / 2.0) as i64;

        if (0..width as i64).contains(&src_x) && (0..height as i64).contains(&src_y) {
            input[[src_y as usize, src_x as usize]]
        } else {
            FILL
        }
    }))
}
