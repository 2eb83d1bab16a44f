//! Stylize filters: binary threshold ("segment").

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::{ImgProcError, Result};

/// Threshold used when the caller does not pick one.
pub const DEFAULT_THRESHOLD: f64 = 128.0;

/// Apply a binary threshold.
///
/// Pixels >= `threshold` become 255, all others 0. Dimensions are unchanged.
///
/// # Arguments
/// * `input` - Luma grid (height, width)
/// * `threshold` - Cut-off value; must not be NaN
pub fn threshold(input: ArrayView2<f64>, threshold: f64) -> Result<Array2<f64>> {
    if threshold.is_nan() {
        return Err(ImgProcError::param("threshold", "must not be NaN"));
    }

    let (height, width) = input.dim();
    log::debug!("threshold {height}x{width} at {threshold}");

    if width == 0 {
        return Ok(Array2::zeros((height, width)));
    }

    let mut out = vec![0.0f64; height * width];
    out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            *cell = if input[[y, x]] >= threshold { 255.0 } else { 0.0 };
        }
    });

    Array2::from_shape_vec((height, width), out).map_err(|e| ImgProcError::input(e.to_string()))
}
