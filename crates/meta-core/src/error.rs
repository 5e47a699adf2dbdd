//! Error types for meta-analysis
//!
//! Provides a unified error type for all meta-analysis crates.

use thiserror::Error;

/// Core error type for meta-analytic computations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Invalid study summary statistics (non-positive SD, too few subjects)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Pooling inputs for which heterogeneity or weights are undefined
    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    /// The fail-safe loop did not cross the significance boundary
    #[error("Did not converge after {iterations} iterations (last p-value {p_value})")]
    NonConvergent { iterations: usize, p_value: f64 },

    /// Numerical computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a pooling run with too few studies
    pub fn insufficient_studies(expected: usize, actual: usize) -> Self {
        Self::DegenerateInput(format!(
            "at least {expected} studies are required, got {actual}"
        ))
    }

    /// Create an error for size mismatch
    pub fn size_mismatch(expected: usize, actual: usize, context: &str) -> Self {
        Self::DegenerateInput(format!(
            "Size mismatch in {context}: expected {expected}, got {actual}"
        ))
    }

    /// Create an error for NaN/Inf values
    pub fn non_finite(context: &str) -> Self {
        Self::Computation(format!("{context} contains NaN or infinite values"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidParameter("alpha must be in (0, 1)".to_string());
        assert_eq!(err.to_string(), "Invalid parameter: alpha must be in (0, 1)");

        let err = Error::InvalidInput("standard deviation must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: standard deviation must be positive"
        );

        let err = Error::DegenerateInput("weights must be positive".to_string());
        assert_eq!(err.to_string(), "Degenerate input: weights must be positive");

        let err = Error::NonConvergent {
            iterations: 10,
            p_value: 0.01,
        };
        assert_eq!(
            err.to_string(),
            "Did not converge after 10 iterations (last p-value 0.01)"
        );
    }

    #[test]
    fn test_error_helper_functions() {
        let err = Error::insufficient_studies(2, 1);
        assert!(matches!(err, Error::DegenerateInput(_)));
        assert_eq!(
            err.to_string(),
            "Degenerate input: at least 2 studies are required, got 1"
        );

        let err = Error::size_mismatch(3, 2, "weights");
        assert_eq!(
            err.to_string(),
            "Degenerate input: Size mismatch in weights: expected 3, got 2"
        );

        let err = Error::non_finite("effect sizes");
        assert_eq!(
            err.to_string(),
            "Computation error: effect sizes contains NaN or infinite values"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();

        match err {
            Error::Io(_) => assert!(err.to_string().contains("file not found")),
            _ => panic!("Wrong error type"),
        }
    }

    #[test]
    fn test_error_from_anyhow() {
        let err: Error = anyhow::anyhow!("custom error message").into();
        assert!(matches!(err, Error::Other(_)));
        assert!(err.to_string().contains("custom error message"));
    }
}
