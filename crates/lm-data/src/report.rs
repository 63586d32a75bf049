//! Evaluation of a sheet into printable results.

use core::fmt;

use lm_core::{Measurement, Uncertainty};
use lm_fit::{Dataset2D, RegressionResult, linreg};
use lm_format::{Column, Table, format_measurement, format_value_unit, general};
use serde::Serialize;
use tracing::debug;

use crate::DataResult;
use crate::schema::{ChiSquareDef, FitDef, Sheet};

/// Fitted line of one sheet entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSummary {
    pub name: String,
    pub points: usize,
    pub result: RegressionResult,
}

impl FitSummary {
    pub fn lines(&self) -> Vec<String> {
        let r = &self.result;
        let mut lines = vec![
            format_measurement(&format!("{} slope", self.name), &r.slope()),
            format_measurement(&format!("{} intercept", self.name), &r.intercept()),
        ];
        if r.iterations > 0 {
            lines.push(format!(
                "{} iterations: {} ({} points)",
                self.name, r.iterations, self.points
            ));
        }
        lines
    }
}

/// Machine-readable form of a fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitRecord {
    pub name: String,
    pub points: usize,
    pub iterations: usize,
    pub slope: Measurement,
    pub intercept: Measurement,
}

impl From<&FitSummary> for FitRecord {
    fn from(fit: &FitSummary) -> Self {
        Self {
            name: fit.name.clone(),
            points: fit.points,
            iterations: fit.result.iterations,
            slope: fit.result.slope(),
            intercept: fit.result.intercept(),
        }
    }
}

/// Everything a sheet asks for, already formatted where possible.
#[derive(Debug, Clone, Default)]
pub struct SheetReport {
    pub name: String,
    pub quantities: Vec<String>,
    pub table: Option<Table>,
    pub samples: Vec<String>,
    pub fits: Vec<FitSummary>,
    pub comparisons: Vec<String>,
    pub chi_squares: Vec<String>,
}

impl SheetReport {
    pub fn fit_records(&self) -> Vec<FitRecord> {
        self.fits.iter().map(FitRecord::from).collect()
    }

    /// Fits as a pretty-printed JSON array of [`FitRecord`]s.
    pub fn fits_json(&self) -> DataResult<String> {
        Ok(serde_json::to_string_pretty(&self.fit_records())?)
    }
}

impl fmt::Display for SheetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        let fit_lines: Vec<String> = self.fits.iter().flat_map(FitSummary::lines).collect();
        for block in [
            &self.quantities,
            &self.samples,
            &fit_lines,
            &self.comparisons,
            &self.chi_squares,
        ] {
            if block.is_empty() {
                continue;
            }
            writeln!(f)?;
            for line in block {
                writeln!(f, "{}", line)?;
            }
        }
        if let Some(table) = &self.table {
            writeln!(f)?;
            write!(f, "{}", table)?;
        }
        Ok(())
    }
}

fn fit_entry(def: &FitDef, sheet: &Sheet) -> DataResult<FitSummary> {
    let mut data = Dataset2D::new(def.x.clone(), def.y.clone(), def.dy.clone())?;
    if let Some(dx) = &def.dx {
        data = data.with_dx(dx.clone())?;
    }
    if let Some([start, end]) = def.range {
        data = data.select(start..end)?;
    }
    let result = linreg(&data, &sheet.fit_config)?;
    debug!(fit = %def.name, slope = result.slope, intercept = result.intercept, "sheet fit");
    Ok(FitSummary {
        name: def.name.clone(),
        points: data.len(),
        result,
    })
}

fn chi_square_entry(def: &ChiSquareDef) -> DataResult<String> {
    let d_expected = def.d_expected.as_deref();
    let chi2 = lm_stats::chi_square(&def.observed, &def.d_observed, &def.expected, d_expected)?;
    let reduced = lm_stats::chi_square_reduced(
        &def.observed,
        &def.d_observed,
        &def.expected,
        d_expected,
        def.dof,
    )?;
    Ok(format!(
        "{}: χ² = {}, χ²_red = {}",
        def.name,
        general(chi2),
        general(reduced)
    ))
}

/// Compute every entry of a validated sheet.
pub fn evaluate_sheet(sheet: &Sheet) -> DataResult<SheetReport> {
    let quantities = sheet
        .quantities
        .iter()
        .map(|q| {
            format_value_unit(
                &q.name,
                q.value,
                Uncertainty::from(q.uncertainty),
                &q.unit.unit,
                q.unit.prefix,
            )
        })
        .collect();

    let table = if sheet.lists.is_empty() {
        None
    } else {
        let mut table = Table::default();
        for l in &sheet.lists {
            table.push(Column::from_values(
                &l.name,
                &l.unit.unit,
                &l.values,
                l.uncertainties.as_deref(),
                l.unit.prefix,
            )?);
        }
        Some(table)
    };

    let mut samples = Vec::with_capacity(sheet.samples.len());
    for s in &sheet.samples {
        let m = lm_stats::mean_measurement(&s.values)?;
        samples.push(format_value_unit(
            &s.name,
            m.value,
            m.uncertainty,
            &s.unit.unit,
            s.unit.prefix,
        ));
    }

    let fits = sheet
        .fits
        .iter()
        .map(|f| fit_entry(f, sheet))
        .collect::<DataResult<Vec<_>>>()?;

    let comparisons = sheet
        .comparisons
        .iter()
        .map(|c| {
            lm_stats::sigma_deviation(
                &c.name,
                c.value,
                c.uncertainty,
                c.reference,
                c.reference_uncertainty,
            )
        })
        .collect();

    let chi_squares = sheet
        .chi_squares
        .iter()
        .map(chi_square_entry)
        .collect::<DataResult<Vec<_>>>()?;

    Ok(SheetReport {
        name: sheet.name.clone(),
        quantities,
        table,
        samples,
        fits,
        comparisons,
        chi_squares,
    })
}
