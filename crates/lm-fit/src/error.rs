//! Error types for regression.

use lm_core::LmError;
use thiserror::Error;

/// Errors that can occur while fitting a line.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("Invalid input: {0}")]
    Input(#[from] LmError),

    /// All x-values coincide, so no slope is determined.
    #[error("Degenerate fit: x-values do not spread (max - min = {spread})")]
    Degenerate { spread: f64 },

    #[error(
        "Convergence failed: slope still changing by {rel_change:e} after {iterations} iterations"
    )]
    NotConverged { iterations: usize, rel_change: f64 },
}

pub type FitResult<T> = Result<T, FitError>;
