//! Filters as data: named operations and ordered pipelines.
//!
//! A [`FilterOp`] can be parsed from a short caption such as `"Blur"` or
//! `"salt and pepper"` (parameters take their defaults), or deserialized from
//! JSON with explicit parameters:
//!
//! ```json
//! [{"op": "blur", "level": 4}, {"op": "rotate"}, {"op": "segment", "threshold": 100}]
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ImgProcError, Result};
use crate::filters::blur::DEFAULT_BLUR_LEVEL;
use crate::filters::compose::Direction;
use crate::filters::noise::{NoiseRng, DEFAULT_NOISE_AMOUNT};
use crate::filters::rotate::DEFAULT_ROTATE_ANGLE;
use crate::filters::stylize::DEFAULT_THRESHOLD;
use crate::grid::PixelGrid;

fn default_level() -> i64 {
    DEFAULT_BLUR_LEVEL as i64
}

fn default_angle() -> f64 {
    DEFAULT_ROTATE_ANGLE
}

fn default_amount() -> f64 {
    DEFAULT_NOISE_AMOUNT
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

/// One filter invocation with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterOp {
    Blur {
        #[serde(default = "default_level")]
        level: i64,
    },
    Contour,
    Rotate {
        #[serde(default = "default_angle")]
        angle: f64,
    },
    SaltNPepper {
        #[serde(default = "default_amount")]
        amount: f64,
    },
    Concat {
        #[serde(default)]
        direction: Direction,
    },
    Segment {
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

impl FilterOp {
    pub fn name(&self) -> &'static str {
        match self {
            FilterOp::Blur { .. } => "blur",
            FilterOp::Contour => "contour",
            FilterOp::Rotate { .. } => "rotate",
            FilterOp::SaltNPepper { .. } => "salt_n_pepper",
            FilterOp::Concat { .. } => "concat",
            FilterOp::Segment { .. } => "segment",
        }
    }

    /// Whether this operation needs a second image.
    pub fn needs_partner(&self) -> bool {
        matches!(self, FilterOp::Concat { .. })
    }

    /// Apply this operation to `grid`.
    ///
    /// `partner` is the second image for `concat` and is ignored otherwise.
    pub fn apply<R: NoiseRng + ?Sized>(
        &self,
        grid: &mut PixelGrid,
        rng: &mut R,
        partner: Option<&PixelGrid>,
    ) -> Result<()> {
        match *self {
            FilterOp::Blur { level } => {
                let level = usize::try_from(level)
                    .map_err(|_| ImgProcError::param("level", format!("{level} is negative")))?;
                grid.blur(level)?;
            }
            FilterOp::Contour => {
                grid.contour();
            }
            FilterOp::Rotate { angle } => {
                grid.rotate(angle)?;
            }
            FilterOp::SaltNPepper { amount } => {
                grid.salt_n_pepper(amount, rng)?;
            }
            FilterOp::Concat { direction } => {
                let other = partner
                    .ok_or_else(|| ImgProcError::param("partner", "concat needs a second image"))?;
                grid.concat(other, direction);
            }
            FilterOp::Segment { threshold } => {
                grid.segment(threshold)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterOp::Blur { level } => write!(f, "blur(level={level})"),
            FilterOp::Contour => f.write_str("contour"),
            FilterOp::Rotate { angle } => write!(f, "rotate(angle={angle})"),
            FilterOp::SaltNPepper { amount } => write!(f, "salt_n_pepper(amount={amount})"),
            FilterOp::Concat { direction } => write!(f, "concat(direction={direction})"),
            FilterOp::Segment { threshold } => write!(f, "segment(threshold={threshold})"),
        }
    }
}

impl FromStr for FilterOp {
    type Err = ImgProcError;

    /// Parse a caption; case, surrounding spaces and `_`/`-`/space separators are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect();
        match key.as_str() {
            "blur" => Ok(FilterOp::Blur {
                level: default_level(),
            }),
            "contour" => Ok(FilterOp::Contour),
            "rotate" => Ok(FilterOp::Rotate {
                angle: DEFAULT_ROTATE_ANGLE,
            }),
            "saltandpepper" | "saltnpepper" => Ok(FilterOp::SaltNPepper {
                amount: DEFAULT_NOISE_AMOUNT,
            }),
            "concat" => Ok(FilterOp::Concat {
                direction: Direction::default(),
            }),
            "segment" => Ok(FilterOp::Segment {
                threshold: DEFAULT_THRESHOLD,
            }),
            _ => Err(ImgProcError::param(
                "filter",
                format!("unknown filter `{}`", s.trim()),
            )),
        }
    }
}

/// An ordered list of filter operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pipeline {
    ops: Vec<FilterOp>,
}

impl Pipeline {
    pub fn new(ops: Vec<FilterOp>) -> Self {
        Pipeline { ops }
    }

    /// Load a pipeline from a JSON array of operations.
    ///
    /// An unrecognised concat direction is reported as `InvalidParameter`,
    /// the same as [`PixelGrid::concat_named`]; other malformed input is `Json`.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Vec<serde_json::Value> = serde_json::from_str(json)?;
        raw.into_iter()
            .map(|value| -> Result<FilterOp> {
                if let Some(direction) = value.get("direction").and_then(serde_json::Value::as_str) {
                    direction.parse::<Direction>()?;
                }
                Ok(serde_json::from_value(value)?)
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn ops(&self) -> &[FilterOp] {
        &self.ops
    }

    pub fn push(&mut self, op: FilterOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Run every operation in order.
    ///
    /// Stops at the first failing step and returns [`ImgProcError::Step`]; the
    /// grid then holds the result of the last step that succeeded.
    pub fn run<R: NoiseRng + ?Sized>(
        &self,
        grid: &mut PixelGrid,
        rng: &mut R,
        partner: Option<&PixelGrid>,
    ) -> Result<()> {
        for (index, op) in self.ops.iter().enumerate() {
            log::debug!("pipeline step {index}: {op}");
            op.apply(grid, rng, partner).map_err(|source| ImgProcError::Step {
                index,
                op: op.to_string(),
                source: Box::new(source),
            })?;
        }
        log::info!(
            "pipeline of {} steps done, grid is {}x{}",
            self.ops.len(),
            grid.rows(),
            grid.cols()
        );
        Ok(())
    }
}

impl FromIterator<FilterOp> for Pipeline {
    fn from_iter<I: IntoIterator<Item = FilterOp>>(iter: I) -> Self {
        Pipeline::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::noise::SimpleRng;

    #[test]
    fn test_parse_captions() {
        assert_eq!("Blur".parse::<FilterOp>().unwrap(), FilterOp::Blur { level: 16 });
        assert_eq!(" contour ".parse::<FilterOp>().unwrap(), FilterOp::Contour);
        assert_eq!(
            "Salt and pepper".parse::<FilterOp>().unwrap(),
            FilterOp::SaltNPepper { amount: 0.02 }
        );
        assert_eq!(
            "salt_n_pepper".parse::<FilterOp>().unwrap(),
            FilterOp::SaltNPepper { amount: 0.02 }
        );
        assert_eq!(
            "ROTATE".parse::<FilterOp>().unwrap(),
            FilterOp::Rotate { angle: -90.0 }
        );
        assert!("sharpen".parse::<FilterOp>().unwrap_err().is_invalid_parameter());
    }

    #[test]
    fn test_json_defaults() {
        let p = Pipeline::from_json(
            r#"[{"op":"blur"},{"op":"concat","direction":"vertical"},{"op":"segment","threshold":100}]"#,
        )
        .unwrap();
        assert_eq!(
            p.ops(),
            &[
                FilterOp::Blur { level: 16 },
                FilterOp::Concat {
                    direction: Direction::Vertical
                },
                FilterOp::Segment { threshold: 100.0 },
            ]
        );
    }

    #[test]
    fn test_json_unknown_direction_is_invalid_parameter() {
        let err = Pipeline::from_json(r#"[{"op":"concat","direction":"diagonal"}]"#).unwrap_err();
        assert!(err.is_invalid_parameter());
        assert!(matches!(err, ImgProcError::InvalidParameter { name: "direction", .. }));
    }

    #[test]
    fn test_json_direction_ignores_case() {
        let p = Pipeline::from_json(r#"[{"op":"concat","direction":" Vertical "}]"#).unwrap();
        assert_eq!(
            p.ops(),
            &[FilterOp::Concat {
                direction: Direction::Vertical
            }]
        );
    }

    #[test]
    fn test_json_malformed_is_json_error() {
        let err = Pipeline::from_json(r#"[{"op":"blur","level":"big"}]"#).unwrap_err();
        assert!(matches!(err, ImgProcError::Json(_)));
    }

    #[test]
    fn test_negative_level_is_invalid_parameter() {
        let mut grid = PixelGrid::from_gray_rows(vec![vec![1.0; 3]; 3]).unwrap();
        let err = FilterOp::Blur { level: -2 }
            .apply(&mut grid, &mut SimpleRng::new(0), None)
            .unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_concat_without_partner_fails() {
        let mut grid = PixelGrid::from_gray_rows(vec![vec![1.0]]).unwrap();
        let op = FilterOp::Concat {
            direction: Direction::Horizontal,
        };
        assert!(op.needs_partner());
        let err = op.apply(&mut grid, &mut SimpleRng::new(0), None).unwrap_err();
        assert!(err.is_invalid_parameter());
    }

    #[test]
    fn test_run_reports_failing_step() {
        let pipeline: Pipeline = vec![
            FilterOp::Contour,
            FilterOp::Blur { level: 5 },
            FilterOp::Segment { threshold: 1.0 },
        ]
        .into_iter()
        .collect();
        let mut grid = PixelGrid::from_gray_rows(vec![vec![0.0, 4.0, 4.0]; 3]).unwrap();

        let err = pipeline.run(&mut grid, &mut SimpleRng::new(0), None).unwrap_err();

        match err {
            ImgProcError::Step { index, .. } => assert_eq!(index, 1),
            other => panic!("unexpected error {other:?}"),
        }
        // contour applied, blur rejected
        assert_eq!(grid.to_rows(), vec![vec![4.0, 0.0]; 3]);
    }

    #[test]
    fn test_json_round_trip_of_config() {
        let mut p = Pipeline::default();
        p.push(FilterOp::Rotate { angle: 45.0 }).push(FilterOp::Contour);
        let back = Pipeline::from_json(&p.to_json().unwrap()).unwrap();
        assert_eq!(back, p);
        assert_eq!(back.len(), 2);
    }
}
