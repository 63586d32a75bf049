//! Named report lines: single values, value lists and values with units.

use lm_core::{LmResult, Measurement, Real, SiPrefix, Uncertainty, ensure_same_len, si_prefix_for};

use crate::signif::signval;

/// `"<name>: <value> ± <uncertainty>"`.
pub fn format_value(name: &str, value: Real, uncertainty: Uncertainty) -> String {
    format!("{}: {}", name, signval(value, uncertainty))
}

/// [`format_value`] for a [`Measurement`].
pub fn format_measurement(name: &str, m: &Measurement) -> String {
    format_value(name, m.value, m.uncertainty)
}

/// The name on its own line, then one indented line per value.
///
/// Without uncertainties every value is rendered in compact form.
pub fn format_list(name: &str, values: &[Real], uncertainties: Option<&[Real]>) -> LmResult<String> {
    let cells = list_cells(values, uncertainties)?;
    let mut out = format!("{}:", name);
    for cell in cells {
        out.push_str("\n ");
        out.push_str(&cell);
    }
    Ok(out)
}

/// Formatted value strings for a list, one per element.
pub fn list_cells(values: &[Real], uncertainties: Option<&[Real]>) -> LmResult<Vec<String>> {
    if let Some(errs) = uncertainties {
        ensure_same_len(values.len(), errs.len(), "list uncertainties")?;
    }
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let u = match uncertainties {
                Some(errs) => Uncertainty::known(errs[i])?,
                None => Uncertainty::Absent,
            };
            Ok(signval(v, u))
        })
        .collect()
}

/// Value and uncertainty followed by a unit.
///
/// With `prefix`, both are rescaled to the engineering SI prefix that puts
/// the value in `[1, 1000)`.
pub fn with_unit(value: Real, uncertainty: Uncertainty, unit: &str, prefix: bool) -> String {
    let p = if prefix {
        si_prefix_for(value)
    } else {
        SiPrefix::NONE
    };
    let scaled = Measurement { value, uncertainty }.scale(1.0 / p.factor());
    let body = signval(scaled.value, scaled.uncertainty);
    let unit = format!("{}{}", p.symbol, unit);
    if unit.is_empty() {
        body
    } else if scaled.uncertainty.nonzero().is_some() {
        format!("({}) {}", body, unit)
    } else {
        format!("{} {}", body, unit)
    }
}

/// `"<name>: <value> ± <uncertainty> <unit>"` with optional SI prefix.
pub fn format_value_unit(
    name: &str,
    value: Real,
    uncertainty: Uncertainty,
    unit: &str,
    prefix: bool,
) -> String {
    format!("{}: {}", name, with_unit(value, uncertainty, unit, prefix))
}
