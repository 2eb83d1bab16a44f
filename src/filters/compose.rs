//! Two-grid concatenation.
//!
//! Places a second grid to the right of (horizontal) or below (vertical) the
//! first. When the grids differ along the other axis the output takes the
//! larger extent and positions neither grid covers are filled with 0.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::ImgProcError;

/// Background value for positions outside both source grids.
const GAP_FILL: f64 = 0.0;

/// Axis along which two grids are joined.
///
/// Names are matched case-insensitively with surrounding spaces ignored, both
/// through [`FromStr`] and when deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Direction {
    /// Side by side: widths add up.
    #[default]
    Horizontal,
    /// Stacked: heights add up.
    Vertical,
}

impl FromStr for Direction {
    type Err = ImgProcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" => Ok(Direction::Horizontal),
            "vertical" => Ok(Direction::Vertical),
            other => Err(ImgProcError::param(
                "direction",
                format!("`{other}` is not one of `horizontal`, `vertical`"),
            )),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = ImgProcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Direction> for String {
    fn from(direction: Direction) -> Self {
        direction.to_string()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Horizontal => f.write_str("horizontal"),
            Direction::Vertical => f.write_str("vertical"),
        }
    }
}

#[inline]
fn get_or_fill(grid: &ArrayView2<f64>, y: usize, x: usize) -> f64 {
    grid.get([y, x]).copied().unwrap_or(GAP_FILL)
}

/// Join `first` and `second` along `direction`.
///
/// # Returns
/// * Horizontal: (max(h1, h2), w1 + w2)
/// * Vertical: (h1 + h2, max(w1, w2))
pub fn concat(first: ArrayView2<f64>, second: ArrayView2<f64>, direction: Direction) -> Array2<f64> {
    let (h1, w1) = first.dim();
    let (h2, w2) = second.dim();

    let shape = match direction {
        Direction::Horizontal => (h1.max(h2), w1 + w2),
        Direction::Vertical => (h1 + h2, w1.max(w2)),
    };

    log::debug!(
        "concat {direction} {h1}x{w1} + {h2}x{w2} -> {}x{}",
        shape.0,
        shape.1
    );

    Array2::from_shape_fn(shape, |(y, x)| match direction {
        Direction::Horizontal if x < w1 => get_or_fill(&first, y, x),
        Direction::Horizontal => get_or_fill(&second, y, x - w1),
        Direction::Vertical if y < h1 => get_or_fill(&first, y, x),
        Direction::Vertical => get_or_fill(&second, y - h1, x),
    })
}
