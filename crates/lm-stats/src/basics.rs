//! Mean and dispersion of a sample.

use lm_core::{
    LmError, LmResult, MIN_UNCERTAINTY, Measurement, Real, Uncertainty, ensure_all_finite,
    ensure_min_len, ensure_same_len,
};

/// Arithmetic mean of a non-empty sample.
pub fn mean(sample: &[Real]) -> LmResult<Real> {
    ensure_min_len(sample, 1, "mean")?;
    ensure_all_finite(sample, "sample")?;
    Ok(sample.iter().sum::<Real>() / sample.len() as Real)
}

/// Empirical standard deviation, `sqrt(Σ(xᵢ − x̄)² / (n − 1))`.
pub fn std_dev_empirical(sample: &[Real]) -> LmResult<Real> {
    ensure_min_len(sample, 2, "empirical standard deviation")?;
    let m = mean(sample)?;
    let sq: Real = sample.iter().map(|x| (x - m).powi(2)).sum();
    Ok((sq / (sample.len() - 1) as Real).sqrt())
}

/// Standard deviation of the mean, `std_dev_empirical / sqrt(n)`.
pub fn std_dev_of_mean(sample: &[Real]) -> LmResult<Real> {
    let s = std_dev_empirical(sample)?;
    Ok(s / (sample.len() as Real).sqrt())
}

/// Sample mean with the standard deviation of the mean attached.
pub fn mean_measurement(sample: &[Real]) -> LmResult<Measurement> {
    Ok(Measurement {
        value: mean(sample)?,
        uncertainty: Uncertainty::Known(std_dev_of_mean(sample)?),
    })
}

/// Inverse-variance weighted mean.
///
/// Zero uncertainties are floored at [`MIN_UNCERTAINTY`], so an exact
/// point dominates the result.
pub fn weighted_mean(values: &[Real], uncertainties: &[Real]) -> LmResult<Measurement> {
    ensure_min_len(values, 1, "weighted mean")?;
    ensure_same_len(values.len(), uncertainties.len(), "weighted mean uncertainties")?;
    ensure_all_finite(values, "weighted mean values")?;

    let mut sw = 0.0;
    let mut swx = 0.0;
    for (&x, &dx) in values.iter().zip(uncertainties) {
        let sigma = Uncertainty::known(dx)?.weight_sigma(MIN_UNCERTAINTY);
        let w = sigma.powi(-2);
        sw += w;
        swx += w * x;
    }
    if !(sw.is_finite() && sw > 0.0) {
        return Err(LmError::NonFinite {
            what: "sum of weights",
            value: sw,
        });
    }
    Ok(Measurement {
        value: swx / sw,
        uncertainty: Uncertainty::Known(sw.sqrt().recip()),
    })
}
