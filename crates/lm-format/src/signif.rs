//! Significant-digit rendering of a value with its uncertainty.
//!
//! The uncertainty keeps two significant digits when its leading digit is 1
//! or 2 and one digit otherwise. The value is rounded to the last digit the
//! uncertainty resolves. Both are written in scientific notation, e.g.
//! `1.234e1 ± 1.2e-2`.

use lm_core::{Real, Uncertainty, decimal_exponent};

/// Scientific notation with `digits` places after the decimal point.
pub fn sci(v: Real, digits: usize) -> String {
    format!("{:.*e}", digits, v)
}

/// Compact rendering with six significant digits and trailing zeros removed.
///
/// Plain decimal notation is used for decimal exponents in `[-4, 6)`,
/// scientific notation otherwise.
pub fn general(v: Real) -> String {
    const PRECISION: i32 = 6;

    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Exponent after rounding to PRECISION digits, so 999999.5 counts as 1e6.
    let rounded = sci(v, (PRECISION - 1) as usize);
    let (mantissa, exp) = split_exponent(&rounded);
    if (-4..PRECISION).contains(&exp) {
        let decimals = (PRECISION - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, v)).to_string()
    } else {
        format!("{}e{}", strip_zeros(mantissa), exp)
    }
}

fn split_exponent(s: &str) -> (&str, i32) {
    match s.split_once('e') {
        Some((m, e)) => (m, e.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn leading_digit(s: &str) -> u32 {
    s.chars().find_map(|c| c.to_digit(10)).unwrap_or(0)
}

/// How a value/uncertainty pair is rendered, before it is turned into text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignificantLayout {
    /// Value to print; zero when the value is suppressed.
    pub shown_value: Real,
    /// Decimal places of the value mantissa.
    pub value_digits: usize,
    /// Uncertainty after the 9 -> 10 rollover correction.
    pub uncertainty: Real,
    /// Whether the uncertainty keeps a second significant digit.
    pub two_digit_uncertainty: bool,
}

impl SignificantLayout {
    /// Digit layout for `value ± uncertainty`, `uncertainty > 0` and finite.
    pub fn new(value: Real, uncertainty: Real) -> Self {
        let mut err = uncertainty;

        // 0.096 prints as 9.6e-2 with one decimal but 1e-1 with none: the
        // rounded uncertainty has rolled over into the next decade.
        let zero_place = sci(err, 0);
        if sci(err, 1).starts_with('9') && zero_place.starts_with('1') {
            err = zero_place.parse().unwrap_or(err);
        }

        let round2 = leading_digit(&sci(err, 1)) <= 2;
        let extra = usize::from(round2);

        let err_exp = decimal_exponent(err).unwrap_or(0);
        let expdiff = decimal_exponent(value).map(|e| e - err_exp);

        let (shown_value, value_digits) = match expdiff {
            Some(d) if d >= 0 => (value, d as usize + extra),
            // One decade below a two-digit uncertainty, the value still
            // shows its single digit at the uncertainty's first place.
            Some(-1) if round2 => (value, 0),
            _ => (0.0, 0),
        };

        Self {
            shown_value,
            value_digits,
            uncertainty: err,
            two_digit_uncertainty: round2,
        }
    }

    pub fn value_str(&self) -> String {
        sci(self.shown_value, self.value_digits)
    }

    pub fn uncertainty_str(&self) -> String {
        sci(self.uncertainty, usize::from(self.two_digit_uncertainty))
    }
}

/// `"<value> ± <uncertainty>"` with significant digits matched to the
/// uncertainty, or just the compact value when there is no spread.
pub fn signval(value: Real, uncertainty: Uncertainty) -> String {
    let Some(err) = uncertainty.nonzero() else {
        return general(value);
    };
    if !err.is_finite() || !value.is_finite() {
        return format!("{} ± {}", general(value), general(err));
    }
    let layout = SignificantLayout::new(value, err);
    format!("{} ± {}", layout.value_str(), layout.uncertainty_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sv(v: Real, e: Real) -> String {
        signval(v, Uncertainty::Known(e))
    }

    #[test]
    fn general_matches_compact_notation() {
        assert_eq!(general(0.0), "0");
        assert_eq!(general(1.0), "1");
        assert_eq!(general(110.0), "110");
        assert_eq!(general(0.5), "0.5");
        assert_eq!(general(123456.0), "123456");
        assert_eq!(general(1234567.0), "1.23457e6");
        assert_eq!(general(0.0001), "0.0001");
        assert_eq!(general(0.00001234), "1.234e-5");
        assert_eq!(general(-2.5), "-2.5");
        assert_eq!(general(Real::NAN), "nan");
    }

    #[test]
    fn zero_or_absent_uncertainty_has_no_suffix() {
        assert_eq!(signval(3.25, Uncertainty::Absent), "3.25");
        assert_eq!(signval(3.25, Uncertainty::Known(0.0)), "3.25");
        assert!(!signval(47e-9, Uncertainty::Absent).contains('±'));
    }

    #[test]
    fn leading_one_or_two_keeps_two_digits() {
        assert_eq!(sv(9.81234, 0.012), "9.812e0 ± 1.2e-2");
        assert_eq!(sv(9.81234, 0.025), "9.812e0 ± 2.5e-2");
        assert_eq!(sv(123.456, 1.5), "1.235e2 ± 1.5e0");
    }

    #[test]
    fn leading_three_to_nine_keeps_one_digit() {
        assert_eq!(sv(9.81234, 0.03), "9.81e0 ± 3e-2");
        assert_eq!(sv(9.81234, 0.087), "9.81e0 ± 9e-2");
        assert_eq!(sv(470e-9, 47e-9), "4.7e-7 ± 5e-8");
    }

    #[test]
    fn nine_rolling_over_to_ten_is_two_digit() {
        // 0.097 -> 1e-1, leading digit 1
        assert_eq!(sv(2.3456, 0.097), "2.35e0 ± 1.0e-1");
        // 0.094 stays at leading digit 9
        assert_eq!(sv(2.3456, 0.094), "2.35e0 ± 9e-2");
    }

    #[test]
    fn value_below_uncertainty_is_suppressed() {
        // expdiff = -2: value hidden
        assert_eq!(sv(0.012, 5.0), "0e0 ± 5e0");
        // expdiff = -1 with one-digit uncertainty: hidden
        assert_eq!(sv(0.4, 5.0), "0e0 ± 5e0");
        // expdiff = -1 with two-digit uncertainty: one digit survives
        assert_eq!(sv(0.4, 1.5), "4e-1 ± 1.5e0");
        // expdiff = -2 with two-digit uncertainty: hidden
        assert_eq!(sv(0.04, 1.5), "0e0 ± 1.5e0");
    }

    #[test]
    fn zero_value_is_rendered_as_suppressed() {
        assert_eq!(sv(0.0, 0.2), "0e0 ± 2.0e-1");
    }

    #[test]
    fn negative_values_keep_sign() {
        assert_eq!(sv(-9.81234, 0.03), "-9.81e0 ± 3e-2");
    }

    #[test]
    fn layout_digits() {
        let l = SignificantLayout::new(123.456, 0.5);
        assert_eq!(l.value_digits, 3);
        assert!(!l.two_digit_uncertainty);
        let l = SignificantLayout::new(123.456, 0.15);
        assert_eq!(l.value_digits, 4);
        assert!(l.two_digit_uncertainty);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn uncertainty_digit_count(mantissa in 1.0_f64..9.94, exp in -12_i32..12) {
            let err = mantissa * 10f64.powi(exp);
            let s = signval(1.0e3, Uncertainty::Known(err));
            let (_, err_str) = s.split_once(" ± ").unwrap();
            let (m, _) = err_str.split_once('e').unwrap();
            let digits = m.chars().filter(|c| c.is_ascii_digit()).count();
            let lead = m.chars().next().unwrap().to_digit(10).unwrap();
            if lead <= 2 {
                prop_assert_eq!(digits, 2);
            } else {
                prop_assert_eq!(digits, 1);
            }
        }

        #[test]
        fn reparsing_the_value_is_stable(
            value in -1.0e6_f64..1.0e6,
            mantissa in 1.0_f64..9.9,
            exp in -4_i32..3,
        ) {
            let err = mantissa * 10f64.powi(exp);
            let first = signval(value, Uncertainty::Known(err));
            let (value_str, _) = first.split_once(" ± ").unwrap();
            let parsed: f64 = value_str.parse().unwrap();
            // Rounding up into the next decade adds a digit, e.g. 9.96 -> 1.0e1.
            prop_assume!(parsed == 0.0 || decimal_exponent(parsed) == decimal_exponent(value));
            let second = signval(parsed, Uncertainty::Known(err));
            prop_assert_eq!(first, second);
        }
    }
}
