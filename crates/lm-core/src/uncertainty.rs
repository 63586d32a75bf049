//! Measured values and their standard uncertainties.
//!
//! Propagation assumes independent, normally distributed errors and first
//! order (linear) error propagation:
//! - sums and differences add absolute uncertainties in quadrature
//! - products and quotients add relative uncertainties in quadrature
//!
//! Formulas for anything more involved are written by the caller with
//! [`Measurement::map`].

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{LmError, LmResult};
use crate::numeric::{MIN_UNCERTAINTY, Real};

/// Standard uncertainty attached to a value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Uncertainty {
    /// No uncertainty is attached (exact or unknown).
    #[default]
    Absent,
    /// A standard deviation, finite and `>= 0`.
    Known(Real),
}

impl Uncertainty {
    /// Validated constructor for a known standard deviation.
    pub fn known(sigma: Real) -> LmResult<Self> {
        if !sigma.is_finite() {
            return Err(LmError::NonFinite {
                what: "uncertainty",
                value: sigma,
            });
        }
        if sigma < 0.0 {
            return Err(LmError::InvalidArg {
                what: "uncertainty must be non-negative",
            });
        }
        Ok(Self::Known(sigma))
    }

    /// The standard deviation, with `Absent` read as zero.
    pub fn sigma(self) -> Real {
        match self {
            Self::Absent => 0.0,
            Self::Known(s) => s,
        }
    }

    /// The standard deviation if one is known and non-zero.
    ///
    /// Both `Absent` and a measured `Known(0.0)` carry no spread to format
    /// or normalize by.
    pub fn nonzero(self) -> Option<Real> {
        match self {
            Self::Known(s) if s != 0.0 => Some(s),
            _ => None,
        }
    }

    /// Standard deviation usable as an inverse-variance weight denominator.
    pub fn weight_sigma(self, floor: Real) -> Real {
        match self.nonzero() {
            Some(s) => s,
            None => floor,
        }
    }

    pub fn is_absent(self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Combine two independent uncertainties in quadrature.
    ///
    /// Stays `Absent` only when both sides are absent.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (Self::Absent, Self::Absent) => Self::Absent,
            (a, b) => Self::Known(a.sigma().hypot(b.sigma())),
        }
    }

    fn scale(self, factor: Real) -> Self {
        match self {
            Self::Absent => Self::Absent,
            Self::Known(s) => Self::Known((s * factor).abs()),
        }
    }
}

impl From<Option<Real>> for Uncertainty {
    fn from(v: Option<Real>) -> Self {
        match v {
            Some(s) => Self::Known(s.abs()),
            None => Self::Absent,
        }
    }
}

/// A value paired with its standard uncertainty.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Measurement {
    pub value: Real,
    #[cfg_attr(feature = "serde", serde(default))]
    pub uncertainty: Uncertainty,
}

impl Measurement {
    /// A measured value with standard deviation `sigma`.
    pub fn new(value: Real, sigma: Real) -> LmResult<Self> {
        if !value.is_finite() {
            return Err(LmError::NonFinite {
                what: "measurement value",
                value,
            });
        }
        Ok(Self {
            value,
            uncertainty: Uncertainty::known(sigma)?,
        })
    }

    /// A value without attached uncertainty.
    pub const fn exact(value: Real) -> Self {
        Self {
            value,
            uncertainty: Uncertainty::Absent,
        }
    }

    pub fn sigma(&self) -> Real {
        self.uncertainty.sigma()
    }

    /// Relative uncertainty `σ / |value|`.
    pub fn relative(&self) -> Option<Real> {
        if self.value == 0.0 {
            return None;
        }
        Some(self.sigma() / self.value.abs())
    }

    /// Propagate through a one-argument function given its derivative at `value`.
    pub fn map(self, f: impl FnOnce(Real) -> Real, derivative: Real) -> Self {
        Self {
            value: f(self.value),
            uncertainty: self.uncertainty.scale(derivative),
        }
    }

    /// Multiply by an exact factor.
    pub fn scale(self, factor: Real) -> Self {
        Self {
            value: self.value * factor,
            uncertainty: self.uncertainty.scale(factor),
        }
    }

    /// `value^exponent`, with σ scaled by `|exponent · value^(exponent-1)|`.
    pub fn powf(self, exponent: Real) -> Self {
        let d = exponent * self.value.powf(exponent - 1.0);
        self.map(|v| v.powf(exponent), d)
    }

    pub fn sqrt(self) -> Self {
        self.powf(0.5)
    }

    /// Natural logarithm; σ becomes the relative uncertainty.
    pub fn ln(self) -> Self {
        let d = 1.0 / self.value;
        self.map(Real::ln, d)
    }

    pub fn exp(self) -> Self {
        let e = self.value.exp();
        self.map(|_| e, e)
    }

    /// Inverse-variance weight, flooring a zero σ at [`MIN_UNCERTAINTY`].
    pub fn weight(&self) -> Real {
        self.uncertainty.weight_sigma(MIN_UNCERTAINTY).powi(-2)
    }
}

impl From<Real> for Measurement {
    fn from(value: Real) -> Self {
        Self::exact(value)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.uncertainty {
            Uncertainty::Absent => write!(f, "{}", self.value),
            Uncertainty::Known(s) => write!(f, "{} ± {}", self.value, s),
        }
    }
}

impl Neg for Measurement {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            value: -self.value,
            uncertainty: self.uncertainty,
        }
    }
}

impl Add for Measurement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
            uncertainty: self.uncertainty.combine(rhs.uncertainty),
        }
    }
}

impl Sub for Measurement {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for Measurement {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        // σ_ab = |a|σ_b ⊕ |b|σ_a, which stays valid when either value is zero.
        let value = self.value * rhs.value;
        let uncertainty = self
            .uncertainty
            .scale(rhs.value)
            .combine(rhs.uncertainty.scale(self.value));
        Self { value, uncertainty }
    }
}

impl Div for Measurement {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        let value = self.value / rhs.value;
        let uncertainty = self
            .uncertainty
            .scale(1.0 / rhs.value)
            .combine(rhs.uncertainty.scale(value / rhs.value));
        Self { value, uncertainty }
    }
}

impl Mul<Real> for Measurement {
    type Output = Self;

    fn mul(self, rhs: Real) -> Self {
        self.scale(rhs)
    }
}

impl Div<Real> for Measurement {
    type Output = Self;

    fn div(self, rhs: Real) -> Self {
        self.scale(1.0 / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{Tolerances, nearly_equal};

    fn close(a: Real, b: Real) -> bool {
        nearly_equal(a, b, Tolerances::default())
    }

    #[test]
    fn known_rejects_negative_and_nan() {
        assert!(Uncertainty::known(-1.0).is_err());
        assert!(Uncertainty::known(Real::NAN).is_err());
        assert_eq!(Uncertainty::known(0.0).unwrap(), Uncertainty::Known(0.0));
    }

    #[test]
    fn zero_and_absent_have_no_spread() {
        assert_eq!(Uncertainty::Absent.nonzero(), None);
        assert_eq!(Uncertainty::Known(0.0).nonzero(), None);
        assert_eq!(Uncertainty::Known(0.2).nonzero(), Some(0.2));
        assert_eq!(Uncertainty::Known(0.0).weight_sigma(1e-80), 1e-80);
    }

    #[test]
    fn sum_adds_in_quadrature() {
        let a = Measurement::new(1.0, 0.3).unwrap();
        let b = Measurement::new(2.0, 0.4).unwrap();
        let s = a + b;
        assert!(close(s.value, 3.0));
        assert!(close(s.sigma(), 0.5));
        let d = b - a;
        assert!(close(d.value, 1.0));
        assert!(close(d.sigma(), 0.5));
    }

    #[test]
    fn product_adds_relative_in_quadrature() {
        // 5 % and 10 % relative -> sqrt(0.05² + 0.1²) relative
        let r = Measurement::new(1000.0, 50.0).unwrap();
        let c = Measurement::new(470e-9, 47e-9).unwrap();
        let tau = r * c;
        let rel = (0.05_f64.powi(2) + 0.1_f64.powi(2)).sqrt();
        assert!(close(tau.value, 470e-6));
        assert!(close(tau.relative().unwrap(), rel));

        let q = r / c;
        assert!(close(q.relative().unwrap(), rel));
    }

    #[test]
    fn exact_operands_stay_absent() {
        let a = Measurement::exact(2.0);
        let b = Measurement::exact(3.0);
        assert!((a * b).uncertainty.is_absent());
        assert!((a + b).uncertainty.is_absent());
        let c = Measurement::new(1.0, 0.1).unwrap();
        assert_eq!((a * c).uncertainty, Uncertainty::Known(0.2));
    }

    #[test]
    fn ln_gives_relative_uncertainty() {
        let a = Measurement::new(4.0, 0.2).unwrap();
        let l = a.ln();
        assert!(close(l.value, 4.0_f64.ln()));
        assert!(close(l.sigma(), 0.05));
    }

    #[test]
    fn powf_and_sqrt() {
        let a = Measurement::new(4.0, 0.4).unwrap();
        let sq = a.powf(2.0);
        assert!(close(sq.value, 16.0));
        assert!(close(sq.sigma(), 3.2));
        let rt = a.sqrt();
        assert!(close(rt.value, 2.0));
        assert!(close(rt.sigma(), 0.1));
    }

    #[test]
    fn weight_floors_zero_sigma() {
        let exact = Measurement::exact(1.0);
        assert!(exact.weight().is_infinite() || exact.weight() > 1e150);
        let m = Measurement::new(1.0, 0.5).unwrap();
        assert!(close(m.weight(), 4.0));
    }
}
