//! WebAssembly exports for the grayscale filters.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Grids cross the boundary as flat row-major `Float64Array`s plus their
//! width and height. Filters that change the grid size (blur, contour,
//! concat) return the new buffer only; the caller derives the new size:
//! - blur: (width - level + 1) x (height - level + 1)
//! - contour: (width - 1) x height
//! - concat: see [`crate::filters::compose::concat`]

use ndarray::Array2;
use wasm_bindgen::prelude::*;

use crate::error::ImgProcError;
use crate::filters::noise::SimpleRng;
use crate::grid::PixelGrid;

fn to_js(err: ImgProcError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn grid_from_flat(data: &[f64], width: usize, height: usize) -> Result<PixelGrid, JsValue> {
    Array2::from_shape_vec((height, width), data.to_vec())
        .map(PixelGrid::from_array)
        .map_err(|e| JsValue::from_str(&format!("Invalid dimensions: {e}")))
}

fn flat(grid: PixelGrid) -> Vec<f64> {
    grid.into_array().into_raw_vec_and_offset().0
}

// ============================================================================
// Conversion
// ============================================================================

/// Convert interleaved RGB/RGBA bytes to a luma grid.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `channels` - 3 for RGB, 4 for RGBA
#[wasm_bindgen]
pub fn rgb_to_gray_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
) -> Result<Vec<f64>, JsValue> {
    let grid = PixelGrid::from_rgb_slice(data, height, width, channels).map_err(to_js)?;
    Ok(flat(grid))
}

/// Convert a luma grid to display bytes (clamped to 0-255).
#[wasm_bindgen]
pub fn gray_to_u8_wasm(data: &[f64], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let grid = grid_from_flat(data, width, height)?;
    Ok(grid.to_u8().into_raw_vec_and_offset().0)
}

// ============================================================================
// Filters
// ============================================================================

#[wasm_bindgen]
pub fn blur_wasm(data: &[f64], width: usize, height: usize, level: usize) -> Result<Vec<f64>, JsValue> {
    let mut grid = grid_from_flat(data, width, height)?;
    grid.blur(level).map_err(to_js)?;
    Ok(flat(grid))
}

#[wasm_bindgen]
pub fn contour_wasm(data: &[f64], width: usize, height: usize) -> Result<Vec<f64>, JsValue> {
    let mut grid = grid_from_flat(data, width, height)?;
    grid.contour();
    Ok(flat(grid))
}

#[wasm_bindgen]
pub fn rotate_wasm(data: &[f64], width: usize, height: usize, angle: f64) -> Result<Vec<f64>, JsValue> {
    let mut grid = grid_from_flat(data, width, height)?;
    grid.rotate(angle).map_err(to_js)?;
    Ok(flat(grid))
}

/// Salt-and-pepper noise, deterministic for a given `seed`.
#[wasm_bindgen]
pub fn salt_n_pepper_wasm(
    data: &[f64],
    width: usize,
    height: usize,
    amount: f64,
    seed: u64,
) -> Result<Vec<f64>, JsValue> {
    let mut grid = grid_from_flat(data, width, height)?;
    grid.salt_n_pepper(amount, &mut SimpleRng::new(seed)).map_err(to_js)?;
    Ok(flat(grid))
}

/// Join two grids; `direction` is `"horizontal"` or `"vertical"`.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn concat_wasm(
    first: &[f64],
    first_width: usize,
    first_height: usize,
    second: &[f64],
    second_width: usize,
    second_height: usize,
    direction: &str,
) -> Result<Vec<f64>, JsValue> {
    let mut grid = grid_from_flat(first, first_width, first_height)?;
    let other = grid_from_flat(second, second_width, second_height)?;
    grid.concat_named(&other, direction).map_err(to_js)?;
    Ok(flat(grid))
}

#[wasm_bindgen]
pub fn segment_wasm(data: &[f64], width: usize, height: usize, threshold: f64) -> Result<Vec<f64>, JsValue> {
    let mut grid = grid_from_flat(data, width, height)?;
    grid.segment(threshold).map_err(to_js)?;
    Ok(flat(grid))
}
