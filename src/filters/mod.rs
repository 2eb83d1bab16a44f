//! Filter modules for grayscale image processing.
//!
//! ## Grid Format
//!
//! Every filter works on a single-channel luma grid stored as
//! `ndarray::Array2<f64>` of shape (height, width), row-major, so that
//! `grid[[y, x]]` is the intensity at row y, column x. Values are nominally in
//! 0-255 but are kept as unclamped floats between filters; clamping happens
//! only on export ([`grayscale::gray_to_u8`]).
//!
//! ## Architecture
//!
//! - **Pure** - Filters read an `ArrayView2` and return a new `Array2`; the
//!   caller decides whether to replace its grid. Only noise mutates in place.
//! - **Validated up front** - Parameters are checked before any work, so an
//!   `Err` means nothing was produced.
//! - **Thread-safe** - Rayon parallelises the per-row loops of blur and threshold.
//!
//! ## Filter Categories
//!
//! - **Conversion**: rgb_to_gray, gray_to_u8
//! - **Blur**: box_blur_valid (shrinking, floor average)
//! - **Edge detection**: horizontal_gradient
//! - **Geometry**: rotate_nearest, concat
//! - **Noise**: salt_and_pepper
//! - **Stylize**: threshold

pub mod grayscale;
pub mod blur;
pub mod edge;
pub mod rotate;
pub mod noise;
pub mod compose;
pub mod stylize;
