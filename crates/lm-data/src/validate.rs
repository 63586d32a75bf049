//! Sheet validation logic.

use crate::schema::{ChiSquareDef, FitDef, ListDef, QuantityDef, SampleDef, Sheet};
use std::collections::HashSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Empty name in {context}")]
    EmptyName { context: String },

    #[error("Length mismatch in {name}: {field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        name: String,
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid value: {name}.{field} = {value} ({reason})")]
    InvalidValue {
        name: String,
        field: String,
        value: String,
        reason: String,
    },
}

pub fn validate_sheet(sheet: &Sheet) -> Result<(), ValidationError> {
    sheet
        .fit_config
        .validate()
        .map_err(|e| ValidationError::InvalidValue {
            name: sheet.name.clone(),
            field: "fit_config".to_string(),
            value: format!("{:?}", sheet.fit_config),
            reason: e.to_string(),
        })?;

    check_names("quantities", sheet.quantities.iter().map(|q| &q.name))?;
    check_names("lists", sheet.lists.iter().map(|l| &l.name))?;
    check_names("samples", sheet.samples.iter().map(|s| &s.name))?;
    check_names("fits", sheet.fits.iter().map(|f| &f.name))?;
    check_names("comparisons", sheet.comparisons.iter().map(|c| &c.name))?;
    check_names("chi_squares", sheet.chi_squares.iter().map(|c| &c.name))?;

    for q in &sheet.quantities {
        validate_quantity(q)?;
    }
    for l in &sheet.lists {
        validate_list(l)?;
    }
    for s in &sheet.samples {
        validate_sample(s)?;
    }
    for f in &sheet.fits {
        validate_fit(f)?;
    }
    for c in &sheet.comparisons {
        finite(&c.name, "value", c.value)?;
        finite(&c.name, "reference", c.reference)?;
        uncertainty(&c.name, "uncertainty", c.uncertainty)?;
        uncertainty(&c.name, "reference_uncertainty", c.reference_uncertainty)?;
    }
    for c in &sheet.chi_squares {
        validate_chi_square(c)?;
    }
    Ok(())
}

fn check_names<'a>(
    context: &str,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName {
                context: context.to_string(),
            });
        }
        if !seen.insert(name) {
            return Err(ValidationError::DuplicateName {
                name: name.clone(),
                context: context.to_string(),
            });
        }
    }
    Ok(())
}

fn finite(name: &str, field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            name: name.to_string(),
            field: field.to_string(),
            value: v.to_string(),
            reason: "must be finite".to_string(),
        })
    }
}

fn uncertainty(name: &str, field: &str, v: f64) -> Result<(), ValidationError> {
    finite(name, field, v)?;
    if v < 0.0 {
        return Err(ValidationError::InvalidValue {
            name: name.to_string(),
            field: field.to_string(),
            value: v.to_string(),
            reason: "uncertainty must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn same_len(name: &str, field: &str, expected: usize, actual: usize) -> Result<(), ValidationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ValidationError::LengthMismatch {
            name: name.to_string(),
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

fn all_finite(name: &str, field: &str, values: &[f64]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|&v| finite(name, field, v))
}

fn all_uncertainties(name: &str, field: &str, values: &[f64]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|&v| uncertainty(name, field, v))
}

fn validate_quantity(q: &QuantityDef) -> Result<(), ValidationError> {
    finite(&q.name, "value", q.value)?;
    if let Some(u) = q.uncertainty {
        uncertainty(&q.name, "uncertainty", u)?;
    }
    Ok(())
}

fn validate_list(l: &ListDef) -> Result<(), ValidationError> {
    all_finite(&l.name, "values", &l.values)?;
    if let Some(u) = &l.uncertainties {
        same_len(&l.name, "uncertainties", l.values.len(), u.len())?;
        all_uncertainties(&l.name, "uncertainties", u)?;
    }
    Ok(())
}

fn validate_sample(s: &SampleDef) -> Result<(), ValidationError> {
    all_finite(&s.name, "values", &s.values)?;
    if s.values.len() < 2 {
        return Err(ValidationError::InvalidValue {
            name: s.name.clone(),
            field: "values".to_string(),
            value: s.values.len().to_string(),
            reason: "a sample needs at least 2 readings".to_string(),
        });
    }
    Ok(())
}

fn validate_fit(f: &FitDef) -> Result<(), ValidationError> {
    let n = f.x.len();
    same_len(&f.name, "y", n, f.y.len())?;
    same_len(&f.name, "dy", n, f.dy.len())?;
    all_finite(&f.name, "x", &f.x)?;
    all_finite(&f.name, "y", &f.y)?;
    all_uncertainties(&f.name, "dy", &f.dy)?;
    if let Some(dx) = &f.dx {
        same_len(&f.name, "dx", n, dx.len())?;
        all_uncertainties(&f.name, "dx", dx)?;
    }
    let [start, end] = f.range.unwrap_or([0, n]);
    if start > end || end > n || end - start < 2 {
        return Err(ValidationError::InvalidValue {
            name: f.name.clone(),
            field: "range".to_string(),
            value: format!("[{}, {}]", start, end),
            reason: format!("must select at least 2 of {} points", n),
        });
    }
    Ok(())
}

fn validate_chi_square(c: &ChiSquareDef) -> Result<(), ValidationError> {
    let n = c.expected.len();
    same_len(&c.name, "observed", n, c.observed.len())?;
    same_len(&c.name, "d_observed", n, c.d_observed.len())?;
    all_finite(&c.name, "observed", &c.observed)?;
    all_finite(&c.name, "expected", &c.expected)?;
    all_uncertainties(&c.name, "d_observed", &c.d_observed)?;
    if let Some(de) = &c.d_expected {
        same_len(&c.name, "d_expected", n, de.len())?;
        all_uncertainties(&c.name, "d_expected", de)?;
    }
    if c.dof == Some(0) {
        return Err(ValidationError::InvalidValue {
            name: c.name.clone(),
            field: "dof".to_string(),
            value: "0".to_string(),
            reason: "degrees of freedom must be positive".to_string(),
        });
    }
    Ok(())
}
