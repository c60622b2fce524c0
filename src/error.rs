//! Error types for the estimation engine
//!
//! Every failure is a deterministic consequence of bad input or a bad dataset,
//! so nothing here is retried. Loaders and binaries wrap these in `anyhow`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimationError {
    #[error("unknown crop '{0}'")]
    UnknownCrop(String),

    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// Parameter outside its declared range, or NaN/infinite
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// Least squares needs at least 2 historical observations
    #[error("crop '{crop}' has {observations} historical observation(s), need at least 2")]
    InsufficientHistory { crop: String, observations: usize },

    #[error("invalid dataset: {0}")]
    InvalidDataset(String),

    #[error("least-squares solve failed: {0}")]
    Solver(String),
}

pub type Result<T> = std::result::Result<T, EstimationError>;

impl EstimationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EstimationError::InvalidInput { field, reason: reason.into() }
    }
}

/// Reject NaN/infinite values and values outside `[min, max]`.
pub(crate) fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(EstimationError::invalid(field, format!("{} is not a finite number", value)));
    }
    if value < min || value > max {
        return Err(EstimationError::invalid(
            field,
            format!("{} is outside [{}, {}]", value, min, max),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        assert_eq!(check_range("x", 5.0, 1.0, 10.0), Ok(5.0));
        assert_eq!(check_range("x", 1.0, 1.0, 10.0), Ok(1.0));
        assert!(matches!(
            check_range("x", 0.5, 1.0, 10.0),
            Err(EstimationError::InvalidInput { field: "x", .. })
        ));
        assert!(check_range("x", f64::NAN, 1.0, 10.0).is_err());
        assert!(check_range("x", f64::INFINITY, 1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_messages() {
        let err = EstimationError::InsufficientHistory { crop: "oats".into(), observations: 1 };
        assert_eq!(err.to_string(), "crop 'oats' has 1 historical observation(s), need at least 2");
        assert_eq!(EstimationError::UnknownRegion("mars".into()).to_string(), "unknown region 'mars'");
    }
}
