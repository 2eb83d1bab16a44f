//! Horizontal edge detection ("contour").
//!
//! Every row is replaced by the absolute differences of neighbouring pixels,
//! `out[j - 1] = |row[j] - row[j - 1]|`. Rows are independent of each other:
//! there is no vertical coupling. The grid loses one column; a grid with zero
//! or one column becomes zero columns wide.

use ndarray::{Array2, ArrayView2};

/// Compute the horizontal absolute-difference gradient.
///
/// # Arguments
/// * `input` - Luma grid (height, width)
///
/// # Returns
/// Grid of shape (height, width - 1)
pub fn horizontal_gradient(input: ArrayView2<f64>) -> Array2<f64> {
    let (height, width) = input.dim();
    let out_w = width.saturating_sub(1);

    log::debug!("horizontal gradient {height}x{width} -> {height}x{out_w}");

    Array2::from_shape_fn((height, out_w), |(y, x)| {
        (input[[y, x]] - input[[y, x + 1]]).abs()
    })
}
