//! Agreement between measured and expected values.

use core::fmt;

use lm_core::{LmError, LmResult, Measurement, Real, ensure_same_len};
use tracing::warn;

/// Distance between two values in units of their combined uncertainty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SigmaDeviation {
    /// The values are identical.
    Zero,
    /// The values differ but carry no uncertainty to normalize by.
    Infinite,
    Finite(Real),
}

impl SigmaDeviation {
    /// Decimal places shown for a finite deviation.
    ///
    /// Small deviations get enough places for their first significant digit.
    pub fn display_digits(sigma: Real) -> usize {
        if sigma < 0.95 {
            sigma.log10().floor().abs() as usize
        } else if sigma < 3.95 {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for SigmaDeviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Zero => write!(f, "0σ"),
            Self::Infinite => write!(f, "∞σ"),
            Self::Finite(s) => write!(f, "{:.*}σ", Self::display_digits(s), s),
        }
    }
}

/// Numeric sigma deviation between `v1 ± dv1` and `v2 ± dv2`.
pub fn sigma(v1: Real, dv1: Real, v2: Real, dv2: Real) -> SigmaDeviation {
    let num = (v1 - v2).abs();
    let den = dv1.hypot(dv2);
    if num == 0.0 {
        SigmaDeviation::Zero
    } else if den == 0.0 {
        SigmaDeviation::Infinite
    } else {
        SigmaDeviation::Finite(num / den)
    }
}

/// `"<name>: <σ>σ"` for two values and their uncertainties.
///
/// Pass `0.0` for `dv2` when the second value is a reference without
/// uncertainty.
pub fn sigma_deviation(name: &str, v1: Real, dv1: Real, v2: Real, dv2: Real) -> String {
    format!("{}: {}", name, sigma(v1, dv1, v2, dv2))
}

/// [`sigma_deviation`] for two measurements.
pub fn sigma_deviation_of(name: &str, a: Measurement, b: Measurement) -> String {
    sigma_deviation(name, a.value, a.sigma(), b.value, b.sigma())
}

/// Element-wise sigma deviations, one `"<σ>σ"` cell per pair.
///
/// `dv2` may be omitted for exact reference values.
pub fn sigma_deviation_list(
    v1: &[Real],
    dv1: &[Real],
    v2: &[Real],
    dv2: Option<&[Real]>,
) -> LmResult<Vec<String>> {
    ensure_same_len(v1.len(), dv1.len(), "sigma deviation uncertainties")?;
    ensure_same_len(v1.len(), v2.len(), "sigma deviation references")?;
    if let Some(dv2) = dv2 {
        ensure_same_len(v1.len(), dv2.len(), "sigma deviation reference uncertainties")?;
    }
    Ok((0..v1.len())
        .map(|i| {
            let d2 = dv2.map_or(0.0, |d| d[i]);
            sigma(v1[i], dv1[i], v2[i], d2).to_string()
        })
        .collect())
}

/// χ² = Σ (oᵢ − eᵢ)² / (d_oᵢ² + d_eᵢ²).
///
/// A term whose difference is exactly zero contributes nothing, whatever its
/// uncertainty. A non-zero difference with zero combined uncertainty makes
/// the sum infinite.
pub fn chi_square(
    observed: &[Real],
    d_observed: &[Real],
    expected: &[Real],
    d_expected: Option<&[Real]>,
) -> LmResult<Real> {
    ensure_same_len(observed.len(), d_observed.len(), "chi square observed uncertainties")?;
    ensure_same_len(observed.len(), expected.len(), "chi square expected values")?;
    if let Some(de) = d_expected {
        ensure_same_len(expected.len(), de.len(), "chi square expected uncertainties")?;
    }

    let mut chi2 = 0.0;
    for i in 0..observed.len() {
        let diff = observed[i] - expected[i];
        if diff == 0.0 {
            continue;
        }
        let de = d_expected.map_or(0.0, |d| d[i]);
        let var = d_observed[i].powi(2) + de.powi(2);
        if var == 0.0 {
            warn!(index = i, diff, "chi square term without uncertainty");
        }
        chi2 += diff.powi(2) / var;
    }
    Ok(chi2)
}

/// χ² divided by the degrees of freedom, by default the number of expected values.
pub fn chi_square_reduced(
    observed: &[Real],
    d_observed: &[Real],
    expected: &[Real],
    d_expected: Option<&[Real]>,
    dof: Option<usize>,
) -> LmResult<Real> {
    let dof = dof.unwrap_or(expected.len());
    if dof == 0 {
        return Err(LmError::InvalidArg {
            what: "degrees of freedom must be positive",
        });
    }
    Ok(chi_square(observed, d_observed, expected, d_expected)? / dof as Real)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_values_are_zero_sigma() {
        for v in [0.0, 1.5, -3.0e8] {
            assert_eq!(sigma_deviation("x", v, 0.0, v, 0.0), "x: 0σ");
        }
    }

    #[test]
    fn differing_exact_values_are_infinite() {
        assert_eq!(sigma_deviation("x", 1.0, 0.0, 2.0, 0.0), "x: ∞σ");
    }

    #[test]
    fn digit_count_follows_magnitude() {
        // 1.0 / 5 = 0.2 -> one decimal place
        assert_eq!(sigma_deviation("a", 1.0, 5.0, 0.0, 0.0), "a: 0.2σ");
        // 0.05 -> two places
        assert_eq!(sigma_deviation("a", 0.05, 1.0, 0.0, 0.0), "a: 0.05σ");
        // 3 / sqrt(3² + 4²) = 0.6
        assert_eq!(sigma_deviation("a", 3.0, 3.0, 0.0, 4.0), "a: 0.6σ");
        // 2.34 -> one place
        assert_eq!(sigma_deviation("a", 2.34, 1.0, 0.0, 0.0), "a: 2.3σ");
        // 12.6 -> no places
        assert_eq!(sigma_deviation("a", 12.6, 1.0, 0.0, 0.0), "a: 13σ");
    }

    #[test]
    fn measurement_overload_matches() {
        let a = Measurement::new(10.0, 1.0).unwrap();
        let b = Measurement::exact(12.0);
        assert_eq!(sigma_deviation_of("f", a, b), "f: 2.0σ");
    }

    #[test]
    fn deviation_list_cells() {
        let cells =
            sigma_deviation_list(&[1.0, 2.0, 3.0], &[1.0, 0.0, 1.0], &[1.0, 3.0, 1.0], None)
                .unwrap();
        assert_eq!(cells, vec!["0σ", "∞σ", "2.0σ"]);
        assert!(sigma_deviation_list(&[1.0], &[1.0], &[1.0, 2.0], None).is_err());
    }

    #[test]
    fn chi_square_of_perfect_match_is_zero() {
        let o = [1.0, 2.0, 3.0];
        assert_eq!(chi_square(&o, &[0.1, 0.0, 5.0], &o, None).unwrap(), 0.0);
        assert_eq!(
            chi_square(&o, &[0.0, 0.0, 0.0], &o, Some(&[0.0, 0.0, 0.0])).unwrap(),
            0.0
        );
    }

    #[test]
    fn chi_square_sums_normalized_residuals() {
        let chi2 = chi_square(&[1.0, 2.0], &[1.0, 0.5], &[2.0, 2.0], Some(&[0.0, 0.0])).unwrap();
        assert_eq!(chi2, 1.0);
        let chi2 = chi_square(&[1.0, 3.0], &[1.0, 0.5], &[2.0, 2.0], None).unwrap();
        assert_eq!(chi2, 5.0);
    }

    #[test]
    fn chi_square_rejects_length_mismatch() {
        assert!(matches!(
            chi_square(&[1.0, 2.0], &[1.0], &[1.0, 2.0], None),
            Err(LmError::LengthMismatch { .. })
        ));
        assert!(chi_square(&[1.0], &[1.0], &[1.0], Some(&[1.0, 1.0])).is_err());
    }

    #[test]
    fn reduced_chi_square_dof() {
        let o = [1.0, 3.0];
        let e = [2.0, 2.0];
        let d = [1.0, 0.5];
        assert_eq!(chi_square_reduced(&o, &d, &e, None, None).unwrap(), 2.5);
        assert_eq!(chi_square_reduced(&o, &d, &e, None, Some(1)).unwrap(), 5.0);
        assert!(chi_square_reduced(&o, &d, &e, None, Some(0)).is_err());
    }
}
