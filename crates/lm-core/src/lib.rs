//! lm-core: stable foundation for labmeasure.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - uncertainty (Uncertainty, Measurement, first-order propagation)
//! - units (uom SI types, SI prefixes, physical constants)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod uncertainty;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{LmError, LmResult};
pub use numeric::*;
pub use uncertainty::{Measurement, Uncertainty};
pub use units::{SiPrefix, constants, si_prefix_for};
