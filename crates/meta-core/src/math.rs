//! Mathematical utilities shared across the meta-analysis crates
//!
//! Rounding for display values, plain left-to-right sums, and the standard
//! normal tail probabilities used for significance testing.

use crate::{Error, Result};

/// Two-sided 95% critical value of the standard normal distribution.
///
/// The conventional two-decimal value, not the exact quantile 1.959964.
pub const Z_95: f64 = 1.96;

/// Round `value` to `places` decimal places, ties to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Format a value for report texts.
///
/// Whole numbers keep one decimal (`0.0`, `-2.0`) so that rounded
/// statistics always read as decimals.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Left-to-right sum of a slice.
pub fn sum(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, &v| acc + v)
}

/// Left-to-right sum of pairwise products.
///
/// Callers validate that both slices have equal length.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| acc + x * y)
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(sum(values) / values.len() as f64)
    }
}

/// Check that every value is finite.
pub fn ensure_finite(values: &[f64], context: &str) -> Result<()> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::non_finite(context));
    }
    Ok(())
}

/// Normal distribution utilities
pub mod normal {
    use crate::{Error, Result};
    use statrs::distribution::{ContinuousCDF, Normal};

    fn standard() -> Result<Normal> {
        Normal::new(0.0, 1.0).map_err(|e| {
            Error::Computation(format!("Failed to create normal distribution: {}", e))
        })
    }

    /// Cumulative distribution function of the standard normal distribution
    pub fn cdf(x: f64) -> Result<f64> {
        Ok(standard()?.cdf(x))
    }

    /// Two-sided p-value `2 * (1 - Φ(|z|))` for a z statistic
    pub fn two_sided_p_value(z: f64) -> Result<f64> {
        if z.is_nan() {
            return Err(Error::non_finite("z statistic"));
        }
        Ok(2.0 * (1.0 - cdf(z.abs())?))
    }
}
