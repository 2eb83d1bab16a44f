//! Grayscale conversion and export helpers.
//!
//! Uses the ITU-R BT.601 luma weights (0.2989, 0.5870, 0.1140), the same
//! weights matplotlib-based tooling applies when flattening RGB input.
//!
//! ## Value Range
//!
//! Conversion output is `f64` and is **not** rounded: fractional intensities
//! are kept so that blur and contour operate on the exact luma values. The
//! only place values are clamped to 0-255 is [`gray_to_u8`], the export
//! boundary.

use ndarray::{Array2, ArrayView2, ArrayView3};

use crate::error::{ImgProcError, Result};

/// ITU-R BT.601 luma coefficients
pub const LUMA_R: f64 = 0.2989;
pub const LUMA_G: f64 = 0.5870;
pub const LUMA_B: f64 = 0.1140;

// ============================================================================
// RGB -> Gray
// ============================================================================

/// Convert an RGB(A) image to a single-channel luma grid.
///
/// # Arguments
/// * `input` - 3D array view of shape (height, width, channels), channels >= 3.
///   Only the first three channels are read; alpha is ignored.
///
/// # Returns
/// Grid of shape (height, width) with `0.2989*R + 0.5870*G + 0.1140*B`
pub fn rgb_to_gray<T>(input: ArrayView3<T>) -> Result<Array2<f64>>
where
    T: Copy + Into<f64>,
{
    let (height, width, channels) = input.dim();
    if channels < 3 {
        return Err(ImgProcError::input(format!(
            "expected at least 3 channels, got {channels}"
        )));
    }

    Ok(Array2::from_shape_fn((height, width), |(y, x)| {
        let r: f64 = input[[y, x, 0]].into();
        let g: f64 = input[[y, x, 1]].into();
        let b: f64 = input[[y, x, 2]].into();
        LUMA_R * r + LUMA_G * g + LUMA_B * b
    }))
}

/// Convert a flat interleaved RGB(A) buffer to a luma grid.
///
/// # Arguments
/// * `data` - Interleaved samples, length = height * width * channels
/// * `height`, `width`, `channels` - Buffer layout, channels >= 3
pub fn rgb_slice_to_gray<T>(
    data: &[T],
    height: usize,
    width: usize,
    channels: usize,
) -> Result<Array2<f64>>
where
    T: Copy + Into<f64>,
{
    let expected = height * width * channels;
    if data.len() != expected {
        return Err(ImgProcError::input(format!(
            "buffer holds {} samples, {height}x{width}x{channels} needs {expected}",
            data.len()
        )));
    }
    let view = ArrayView3::from_shape((height, width, channels), data)
        .map_err(|e| ImgProcError::input(e.to_string()))?;
    rgb_to_gray(view)
}

// ============================================================================
// Export
// ============================================================================

/// Convert a luma grid to display bytes: clamp to 0-255, then truncate.
pub fn gray_to_u8(input: ArrayView2<f64>) -> Array2<u8> {
    input.mapv(|v| v.clamp(0.0, 255.0) as u8)
}
