//! Grayscale image filters.
//!
//! A small pipeline of filters over a single-channel luma grid, with Python
//! bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Decoded images enter as RGB or RGBA samples (height, width, 3|4) in any
//! numeric type convertible to `f64` and are reduced to luma with
//! `0.2989*R + 0.5870*G + 0.1140*B`. From then on the working image is an
//! [`ndarray::Array2<f64>`] wrapped in [`PixelGrid`]. Fractional values are
//! kept between filters; [`PixelGrid::to_u8`] clamps to 0-255 for display.
//!
//! ## Filter Architecture
//! Filters may change the grid's dimensions: blur and contour shrink it,
//! concat grows it. Each filter validates its parameters first and either
//! replaces the grid's data completely or leaves it untouched.
//!
//! ```
//! use imgproc_rust::{PixelGrid, SimpleRng};
//!
//! let rgb = ndarray::Array3::<u8>::from_elem((32, 32, 3), 90);
//! let mut grid = PixelGrid::from_rgb(rgb.view())?;
//! grid.blur(4)?
//!     .rotate(-90.0)?
//!     .salt_n_pepper(0.02, &mut SimpleRng::new(7))?
//!     .segment(128.0)?;
//! let bytes = grid.to_u8();
//! assert_eq!(bytes.dim(), (29, 29));
//! # Ok::<(), imgproc_rust::ImgProcError>(())
//! ```

pub mod error;
pub mod filters;
pub mod grid;
pub mod logger;
pub mod pipeline;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{ImgProcError, Result};
pub use filters::compose::Direction;
pub use filters::noise::{NoiseRng, SimpleRng};
pub use grid::PixelGrid;
pub use pipeline::{FilterOp, Pipeline};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use std::time::{SystemTime, UNIX_EPOCH};

    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::error::ImgProcError;
    use crate::filters::blur::DEFAULT_BLUR_LEVEL;
    use crate::filters::noise::{SimpleRng, DEFAULT_NOISE_AMOUNT};
    use crate::filters::rotate::DEFAULT_ROTATE_ANGLE;
    use crate::filters::stylize::DEFAULT_THRESHOLD;
    use crate::grid::PixelGrid;
    use crate::pipeline::Pipeline;

    impl From<ImgProcError> for PyErr {
        fn from(err: ImgProcError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    fn clock_seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// Grayscale working image.
    ///
    /// Construct from a decoded (H, W, C) float array with C >= 3, or with
    /// `PixelGrid.from_u8` for byte images. Filter methods modify the grid
    /// in place.
    #[pyclass(name = "PixelGrid")]
    pub struct PyPixelGrid {
        inner: PixelGrid,
    }

    #[pymethods]
    impl PyPixelGrid {
        #[new]
        fn new(image: PyReadonlyArray3<'_, f64>) -> PyResult<Self> {
            let inner = PixelGrid::from_rgb(image.as_array())?;
            Ok(PyPixelGrid { inner })
        }

        #[staticmethod]
        fn from_u8(image: PyReadonlyArray3<'_, u8>) -> PyResult<Self> {
            let inner = PixelGrid::from_rgb(image.as_array())?;
            Ok(PyPixelGrid { inner })
        }

        #[getter]
        fn rows(&self) -> usize {
            self.inner.rows()
        }

        #[getter]
        fn cols(&self) -> usize {
            self.inner.cols()
        }

        /// Valid box blur with floor average; the grid shrinks by level - 1.
        #[pyo3(signature = (blur_level=DEFAULT_BLUR_LEVEL as i64))]
        fn blur(&mut self, blur_level: i64) -> PyResult<()> {
            let level = usize::try_from(blur_level).map_err(|_| {
                ImgProcError::InvalidParameter {
                    name: "level",
                    reason: format!("{blur_level} is negative"),
                }
            })?;
            self.inner.blur(level)?;
            Ok(())
        }

        fn contour(&mut self) {
            self.inner.contour();
        }

        #[pyo3(signature = (angle=DEFAULT_ROTATE_ANGLE))]
        fn rotate(&mut self, angle: f64) -> PyResult<()> {
            self.inner.rotate(angle)?;
            Ok(())
        }

        /// Salt-and-pepper noise. Pass `seed` for reproducible output.
        #[pyo3(signature = (amount=DEFAULT_NOISE_AMOUNT, seed=None))]
        fn salt_n_pepper(&mut self, amount: f64, seed: Option<u64>) -> PyResult<()> {
            let mut rng = SimpleRng::new(seed.unwrap_or_else(clock_seed));
            self.inner.salt_n_pepper(amount, &mut rng)?;
            Ok(())
        }

        #[pyo3(signature = (other, direction="horizontal"))]
        fn concat(&mut self, other: PyRef<'_, PyPixelGrid>, direction: &str) -> PyResult<()> {
            self.inner.concat_named(&other.inner, direction)?;
            Ok(())
        }

        #[pyo3(signature = (threshold=DEFAULT_THRESHOLD))]
        fn segment(&mut self, threshold: f64) -> PyResult<()> {
            self.inner.segment(threshold)?;
            Ok(())
        }

        /// Run a JSON pipeline, e.g. `[{"op": "blur", "level": 4}]`.
        #[pyo3(signature = (json, other=None, seed=None))]
        fn apply_pipeline(
            &mut self,
            json: &str,
            other: Option<PyRef<'_, PyPixelGrid>>,
            seed: Option<u64>,
        ) -> PyResult<()> {
            let pipeline = Pipeline::from_json(json)?;
            let mut rng = SimpleRng::new(seed.unwrap_or_else(clock_seed));
            let partner = other.as_ref().map(|o| &o.inner);
            pipeline.run(&mut self.inner, &mut rng, partner)?;
            Ok(())
        }

        /// Copy the grid out as a float (H, W) array.
        fn to_numpy<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<f64>> {
            self.inner.view().to_owned().into_pyarray(py)
        }

        /// Copy the grid out as a uint8 (H, W) array, clamped to 0-255.
        fn to_u8<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray2<u8>> {
            self.inner.to_u8().into_pyarray(py)
        }
    }

    /// ImgProc Rust extension module
    #[pymodule]
    pub fn imgproc_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PyPixelGrid>()?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::imgproc_rust;
