//! [`PixelGrid`], the owned working image that filters are applied to.

use ndarray::{Array2, ArrayView2, ArrayView3};

use crate::error::{ImgProcError, Result};
use crate::filters::blur::box_blur_valid;
use crate::filters::compose::{concat, Direction};
use crate::filters::edge::horizontal_gradient;
use crate::filters::grayscale::{gray_to_u8, rgb_slice_to_gray, rgb_to_gray};
use crate::filters::noise::{salt_and_pepper, NoiseRng};
use crate::filters::rotate::rotate_nearest;
use crate::filters::stylize::threshold;

/// An owned, mutable grayscale image.
///
/// Filters replace the grid's data with their result and return `&mut Self`
/// so calls can be chained:
///
/// ```
/// # use imgproc_rust::PixelGrid;
/// let mut grid = PixelGrid::from_gray_rows(vec![vec![10.0; 8]; 8])?;
/// grid.blur(2)?.contour().segment(128.0)?;
/// assert_eq!((grid.rows(), grid.cols()), (7, 6));
/// # Ok::<(), imgproc_rust::ImgProcError>(())
/// ```
///
/// A filter that returns `Err` leaves the grid exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelGrid {
    data: Array2<f64>,
}

impl PixelGrid {
    /// Wrap an existing luma array.
    pub fn from_array(data: Array2<f64>) -> Self {
        PixelGrid { data }
    }

    /// Build a grid from decoded RGB(A) samples of shape (rows, cols, channels).
    pub fn from_rgb<T>(rgb: ArrayView3<T>) -> Result<Self>
    where
        T: Copy + Into<f64>,
    {
        Ok(PixelGrid {
            data: rgb_to_gray(rgb)?,
        })
    }

    /// Build a grid from a flat interleaved RGB(A) buffer.
    pub fn from_rgb_slice<T>(data: &[T], rows: usize, cols: usize, channels: usize) -> Result<Self>
    where
        T: Copy + Into<f64>,
    {
        Ok(PixelGrid {
            data: rgb_slice_to_gray(data, rows, cols, channels)?,
        })
    }

    /// Build a grid from rows of intensities that are already gray.
    ///
    /// Fails with `InvalidInput` if the rows differ in length.
    pub fn from_gray_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ImgProcError::input(format!(
                "row {y} has {} values, row 0 has {width}",
                row.len()
            )));
        }
        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        let data = Array2::from_shape_vec((height, width), flat)
            .map_err(|e| ImgProcError::input(e.to_string()))?;
        Ok(PixelGrid { data })
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn into_array(self) -> Array2<f64> {
        self.data
    }

    /// Copy the grid out as nested rows, `rows[y][x]`.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.rows().into_iter().map(|r| r.to_vec()).collect()
    }

    /// Export for display: clamp to 0-255 and truncate to bytes.
    pub fn to_u8(&self) -> Array2<u8> {
        gray_to_u8(self.data.view())
    }

    /// Valid box blur; the grid shrinks to (rows - level + 1) x (cols - level + 1).
    pub fn blur(&mut self, level: usize) -> Result<&mut Self> {
        self.data = box_blur_valid(self.data.view(), level)?;
        Ok(self)
    }

    /// Horizontal edge gradient; the grid loses one column.
    pub fn contour(&mut self) -> &mut Self {
        self.data = horizontal_gradient(self.data.view());
        self
    }

    /// Nearest-neighbour rotation by `angle` degrees about the centre.
    pub fn rotate(&mut self, angle: f64) -> Result<&mut Self> {
        self.data = rotate_nearest(self.data.view(), angle)?;
        Ok(self)
    }

    /// Scatter `floor(rows * cols * amount)` black/white pixels using `rng`.
    pub fn salt_n_pepper<R: NoiseRng + ?Sized>(&mut self, amount: f64, rng: &mut R) -> Result<&mut Self> {
        salt_and_pepper(&mut self.data, amount, rng)?;
        Ok(self)
    }

    /// Join `other` to this grid along `direction`; `other` is only read.
    pub fn concat(&mut self, other: &PixelGrid, direction: Direction) -> &mut Self {
        self.data = concat(self.data.view(), other.data.view(), direction);
        self
    }

    /// [`concat`](Self::concat) with the direction given by name.
    pub fn concat_named(&mut self, other: &PixelGrid, direction: &str) -> Result<&mut Self> {
        let direction: Direction = direction.parse()?;
        Ok(self.concat(other, direction))
    }

    /// Binary threshold: 255 where value >= `threshold`, else 0.
    pub fn segment(&mut self, threshold_value: f64) -> Result<&mut Self> {
        self.data = threshold(self.data.view(), threshold_value)?;
        Ok(self)
    }
}

impl From<Array2<f64>> for PixelGrid {
    fn from(data: Array2<f64>) -> Self {
        PixelGrid::from_array(data)
    }
}
