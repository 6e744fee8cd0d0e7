//! Error types for shape and tuning validation.
//!
//! Both are raised when an actor is assembled, never in the middle of a tick.

use thiserror::Error;

/// An actor body that cannot be queried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("body extents must be positive, got ({x}, {y})")]
    NonPositiveExtents { x: f32, y: f32 },

    #[error("body {field} is not finite")]
    NonFinite { field: &'static str },
}

/// A tuning value outside the range the motion code relies on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuningError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be negative (a downward speed or acceleration), got {value}")]
    NotNegative { field: &'static str, value: f32 },

    #[error("{field} is not finite")]
    NonFinite { field: &'static str },
}

pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<f32, TuningError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TuningError::NonFinite { field })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if require_finite(field, value)? < 0.0 {
        return Err(TuningError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if require_finite(field, value)? <= 0.0 {
        return Err(TuningError::NotPositive { field, value });
    }
    Ok(())
}

pub(crate) fn require_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if require_finite(field, value)? >= 0.0 {
        return Err(TuningError::NotNegative { field, value });
    }
    Ok(())
}
