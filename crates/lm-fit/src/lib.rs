//! Weighted linear regression for laboratory data.
//!
//! This crate fits `y = g·x + b` by inverse-variance weighted least squares.
//! Uncertainty on x is handled by a fixed-point iteration that folds it into
//! an effective y-uncertainty using the current slope.

pub mod dataset;
pub mod error;
pub mod linreg;
pub mod plot;

pub use dataset::Dataset2D;
pub use error::{FitError, FitResult};
pub use linreg::{FitConfig, RegressionResult, effective_dy, lin_yerr, linreg, linreg_iter};
pub use plot::{
    AxisScale, DataSeries, LineSeries, PlotConfig, PlotSink, RecordingSink, linreg_plot,
};
