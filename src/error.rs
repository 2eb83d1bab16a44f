//! Error type shared by every filter and by [`PixelGrid`](crate::PixelGrid).

/// Errors returned by grid construction, filters and pipelines.
///
/// A filter that returns an error leaves the grid it was called on untouched.
#[derive(thiserror::Error, Debug)]
pub enum ImgProcError {
    /// Construction input is malformed (ragged rows, missing channels, wrong buffer length).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    /// A filter parameter is outside the range the filter accepts.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("pipeline step {index} ({op}) failed: {source}")]
    Step {
        index: usize,
        op: String,
        #[source]
        source: Box<ImgProcError>,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ImgProcError {
    pub(crate) fn input(reason: impl Into<String>) -> Self {
        ImgProcError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub(crate) fn param(name: &'static str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("rejected parameter {name}: {reason}");
        ImgProcError::InvalidParameter { name, reason }
    }

    /// True for [`ImgProcError::InvalidParameter`], including one wrapped in a pipeline step.
    pub fn is_invalid_parameter(&self) -> bool {
        match self {
            ImgProcError::InvalidParameter { .. } => true,
            ImgProcError::Step { source, .. } => source.is_invalid_parameter(),
            _ => false,
        }
    }

    /// True for [`ImgProcError::InvalidInput`], including one wrapped in a pipeline step.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            ImgProcError::InvalidInput { .. } => true,
            ImgProcError::Step { source, .. } => source.is_invalid_input(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ImgProcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_parameter() {
        let err = ImgProcError::InvalidParameter {
            name: "level",
            reason: "must be at least 1".into(),
        };
        assert_eq!(err.to_string(), "invalid parameter `level`: must be at least 1");
        assert!(err.is_invalid_parameter());
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_step_error_unwraps_kind() {
        let err = ImgProcError::Step {
            index: 2,
            op: "blur".into(),
            source: Box::new(ImgProcError::input("ragged")),
        };
        assert!(err.is_invalid_input());
        assert!(err.to_string().starts_with("pipeline step 2 (blur) failed"));
    }
}
