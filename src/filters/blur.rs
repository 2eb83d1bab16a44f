//! Box blur over a luma grid.
//!
//! The blur is a *valid* convolution: an output pixel is only produced where
//! the whole `level x level` window fits inside the input, so an H x W grid
//! becomes (H - level + 1) x (W - level + 1). There is no padding and no
//! wraparound.
//!
//! Each output value is the window sum floor-divided by `level²`. Windows are
//! summed row by row in reading order so results are bit-identical to the
//! reference tooling, including for fractional luma input.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::{ImgProcError, Result};

/// Window size used when the caller does not pick one.
pub const DEFAULT_BLUR_LEVEL: usize = 16;

/// Floor division with the same rounding behaviour as Python's float `//`.
#[inline]
fn floor_div(a: f64, b: f64) -> f64 {
    let m = a % b;
    let mut div = (a - m) / b;
    if m != 0.0 && ((b < 0.0) != (m < 0.0)) {
        div -= 1.0;
    }
    if div == 0.0 {
        return 0.0_f64.copysign(a / b);
    }
    let mut floored = div.floor();
    if div - floored > 0.5 {
        floored += 1.0;
    }
    floored
}

/// Check that a `level x level` window fits in a grid of the given size.
pub fn validate_blur_level(level: usize, height: usize, width: usize) -> Result<()> {
    if level == 0 {
        return Err(ImgProcError::param("level", "must be at least 1"));
    }
    let max = height.min(width);
    if level > max {
        return Err(ImgProcError::param(
            "level",
            format!("{level} does not fit a {height}x{width} grid (max {max})"),
        ));
    }
    Ok(())
}

/// Apply a valid box blur.
///
/// # Arguments
/// * `input` - Luma grid (height, width)
/// * `level` - Window edge length, 1 <= level <= min(height, width)
///
/// # Returns
/// Blurred grid of shape (height - level + 1, width - level + 1)
pub fn box_blur_valid(input: ArrayView2<f64>, level: usize) -> Result<Array2<f64>> {
    let (height, width) = input.dim();
    validate_blur_level(level, height, width)?;

    let out_h = height - level + 1;
    let out_w = width - level + 1;
    let area = (level * level) as f64;

    log::debug!("box blur {height}x{width} level={level} -> {out_h}x{out_w}");

    let mut out = vec![0.0f64; out_h * out_w];
    out.par_chunks_mut(out_w).enumerate().for_each(|(i, row)| {
        for (j, cell) in row.iter_mut().enumerate() {
            let window = input.slice(ndarray::s![i..i + level, j..j + level]);
            let mut total = 0.0f64;
            for window_row in window.rows() {
                let mut row_sum = 0.0f64;
                for &v in window_row {
                    row_sum += v;
                }
                total += row_sum;
            }
            *cell = floor_div(total, area);
        }
    });

    Array2::from_shape_vec((out_h, out_w), out).map_err(|e| ImgProcError::input(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_level_one_is_identity_on_integers() {
        let img = array![[1.0, 2.0, 3.0], [4.0, 5.0, 255.0]];
        let out = box_blur_valid(img.view(), 1).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_level_one_floors_fractions() {
        let img = array![[1.5, 3.25]];
        let out = box_blur_valid(img.view(), 1).unwrap();
        assert_eq!(out, array![[1.0, 3.0]]);
    }

    #[test]
    fn test_level_two_on_3x3() {
        let img = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let out = box_blur_valid(img.view(), 2).unwrap();
        // (1+2+4+5)/4 = 3, (2+3+5+6)/4 = 4, ...
        assert_eq!(out, array![[3.0, 4.0], [6.0, 7.0]]);
    }

    #[test]
    fn test_output_shape_shrinks() {
        let img = Array2::<f64>::zeros((10, 7));
        let out = box_blur_valid(img.view(), 4).unwrap();
        assert_eq!(out.dim(), (7, 4));
    }

    #[test]
    fn test_average_is_floored_not_rounded() {
        let img = array![[0.5, 1.5], [2.25, 3.0]];
        // sum 7.25 / 4 = 1.8125
        let out = box_blur_valid(img.view(), 2).unwrap();
        assert_eq!(out, array![[1.0]]);
    }

    #[test]
    fn test_level_three_on_3x4() {
        let img = array![
            [10.0, 20.0, 30.0, 40.0],
            [50.0, 60.0, 70.0, 80.0],
            [90.0, 100.0, 110.0, 120.0]
        ];
        let out = box_blur_valid(img.view(), 3).unwrap();
        assert_eq!(out, array![[60.0, 70.0]]);
    }

    #[test]
    fn test_level_zero_rejected() {
        let img = Array2::<f64>::zeros((3, 3));
        assert!(box_blur_valid(img.view(), 0).unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_level_larger_than_grid_rejected() {
        let img = Array2::<f64>::zeros((3, 5));
        assert!(box_blur_valid(img.view(), 4).unwrap_err().is_invalid_parameter());
        assert!(box_blur_valid(img.view(), 3).is_ok());
    }

    #[test]
    fn test_floor_div_matches_python() {
        assert_eq!(floor_div(7.0, 2.0), 3.0);
        assert_eq!(floor_div(-7.0, 2.0), -4.0);
        assert_eq!(floor_div(8.0, 4.0), 2.0);
        assert_eq!(floor_div(0.0, 4.0), 0.0);
    }
}
