use crate::LmError;

/// Scalar type of every measured quantity.
pub type Real = f64;

/// Smallest uncertainty used as a weight denominator in place of an exact zero.
pub const MIN_UNCERTAINTY: Real = 1e-80;

/// Absolute and relative bounds for comparing computed results.
///
/// Two values agree when they are within `abs` of each other or within
/// `rel` of the larger magnitude.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tol.abs.max(tol.rel * scale)
}

/// Pass `v` through unless it is NaN or infinite.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, LmError> {
    match v.is_finite() {
        true => Ok(v),
        false => Err(LmError::NonFinite { what, value: v }),
    }
}

/// Check every element of a slice is finite.
pub fn ensure_all_finite(values: &[Real], what: &'static str) -> Result<(), LmError> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

/// Require at least `required` elements.
pub fn ensure_min_len(values: &[Real], required: usize, what: &'static str) -> Result<(), LmError> {
    if values.len() < required {
        return Err(LmError::TooFewPoints {
            what,
            required,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Require two paired sequences to have the same length.
pub fn ensure_same_len(expected: usize, actual: usize, what: &'static str) -> Result<(), LmError> {
    if expected != actual {
        return Err(LmError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// Square root of the sum of squares.
pub fn quadrature(parts: &[Real]) -> Real {
    parts.iter().map(|p| p * p).sum::<Real>().sqrt()
}

/// Decimal exponent of the leading digit, `floor(log10(|v|))`.
///
/// Returns `None` for zero and non-finite values.
pub fn decimal_exponent(v: Real) -> Option<i32> {
    if v == 0.0 || !v.is_finite() {
        return None;
    }
    Some(v.abs().log10().floor() as i32)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn decimal_exponent_matches_scale(m in 1.5f64..9.5, k in -30i32..30, neg in any::<bool>()) {
            let v = if neg { -m } else { m } * 10f64.powi(k);
            prop_assert_eq!(decimal_exponent(v), Some(k));
        }

        #[test]
        fn quadrature_bounds_each_part(parts in prop::collection::vec(-1e6f64..1e6, 1..10)) {
            let q = quadrature(&parts);
            for p in &parts {
                prop_assert!(q >= p.abs() * (1.0 - 1e-12));
            }
        }
    }
}
