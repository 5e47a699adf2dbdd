//! Core types for meta-analysis
//!
//! This crate holds what every stage of the meta-analysis pipeline shares:
//! the unified [`Error`] type and the numeric helpers in [`math`] (rounding,
//! plain left-to-right sums and standard normal tail probabilities).
//!
//! # Example
//!
//! ```rust
//! use meta_core::math::{normal, round_to};
//!
//! let p = normal::two_sided_p_value(2.5).unwrap();
//! assert_eq!(round_to(p, 3), 0.012);
//! ```

pub mod error;
pub mod math;

pub use error::{Error, Result};
pub use math::Z_95;
