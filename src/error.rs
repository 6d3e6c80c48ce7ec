//! Error taxonomy for the synthesis pipeline.
//!
//! Only genuine input-contract violations surface as errors. Degenerate but
//! valid data — an empty pool category, a cluster count above the point
//! count, a two-place route, an unknown category label — degrades to a
//! documented fallback inside the stage that hits it.

use thiserror::Error;

use crate::pool::error::PoolError;

/// Errors surfaced to the caller of the synthesis pipeline.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// The request failed the input-shape contract before Stage 1 ran.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A coordinate fell outside the valid latitude/longitude ranges.
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// A pool collaborator failed while serving the request.
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// Configuration could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SynthesisError {
    /// Create an input-shape error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        SynthesisError::InvalidRequest(message.into())
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        SynthesisError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_request_display() {
        let err = SynthesisError::invalid_request("trip must span at least one day");
        assert!(err.to_string().contains("at least one day"));
    }

    #[test]
    fn test_invalid_coordinate_display() {
        let err = SynthesisError::InvalidCoordinate {
            latitude: 95.0,
            longitude: 10.0,
        };
        assert!(err.to_string().contains("95"));
    }

    #[test]
    fn test_pool_error_converts() {
        let pool_err = PoolError::unavailable("connection refused", true);
        let err: SynthesisError = pool_err.into();
        assert!(matches!(err, SynthesisError::Pool(_)));
    }
}
