//! lm-stats: sample statistics and agreement metrics.
//!
//! Provides:
//! - mean, empirical standard deviation and standard deviation of the mean
//! - inverse-variance weighted mean
//! - sigma deviation between two values
//! - chi-square and reduced chi-square

pub mod agreement;
pub mod basics;

pub use agreement::{
    SigmaDeviation, chi_square, chi_square_reduced, sigma, sigma_deviation, sigma_deviation_list,
    sigma_deviation_of,
};
pub use basics::{mean, mean_measurement, std_dev_empirical, std_dev_of_mean, weighted_mean};
