//! Plain-text tables of formatted columns.

use core::fmt;

use lm_core::{LmResult, Real, Uncertainty, ensure_same_len};

use crate::report::with_unit;

/// One table column: a header and its cells, top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    pub header: String,
    pub cells: Vec<String>,
}

impl Column {
    pub fn new(header: impl Into<String>, cells: Vec<String>) -> Self {
        Self {
            header: header.into(),
            cells,
        }
    }

    /// Column of values with optional uncertainties and unit.
    ///
    /// The header reads `"<name> [<unit>]"`; with `prefix` every cell carries
    /// its own SI prefix.
    pub fn from_values(
        name: &str,
        unit: &str,
        values: &[Real],
        uncertainties: Option<&[Real]>,
        prefix: bool,
    ) -> LmResult<Self> {
        if let Some(errs) = uncertainties {
            ensure_same_len(values.len(), errs.len(), "column uncertainties")?;
        }
        let mut cells = Vec::with_capacity(values.len());
        for (i, &v) in values.iter().enumerate() {
            let u = match uncertainties {
                Some(errs) => Uncertainty::known(errs[i])?,
                None => Uncertainty::Absent,
            };
            // The unit lives in the header unless a per-cell prefix is needed.
            let cell = if prefix {
                with_unit(v, u, unit, true)
            } else {
                with_unit(v, u, "", false)
            };
            cells.push(cell);
        }
        let header = if unit.is_empty() || prefix {
            name.to_string()
        } else {
            format!("{} [{}]", name, unit)
        };
        Ok(Self::new(header, cells))
    }

    fn width(&self) -> usize {
        self.cells
            .iter()
            .map(|c| c.chars().count())
            .chain(std::iter::once(self.header.chars().count()))
            .max()
            .unwrap_or(0)
    }
}

/// Columns rendered side by side, separated by `" | "`.
///
/// Shorter columns are padded with empty cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn push(&mut self, column: Column) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.columns.iter().map(|c| c.cells.len()).max().unwrap_or(0)
    }

    fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize]) -> fmt::Result {
        let mut line = String::new();
        for (i, (cell, &w)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str(" | ");
            }
            line.push_str(cell);
            let pad = w.saturating_sub(cell.chars().count());
            line.extend(std::iter::repeat_n(' ', pad));
        }
        writeln!(f, "{}", line.trim_end())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return Ok(());
        }
        let widths: Vec<usize> = self.columns.iter().map(Column::width).collect();

        let headers: Vec<&str> = self.columns.iter().map(|c| c.header.as_str()).collect();
        Self::write_row(f, &headers, &widths)?;

        let rule_len = widths.iter().sum::<usize>() + 3 * (widths.len() - 1);
        writeln!(f, "{}", "-".repeat(rule_len))?;

        for row in 0..self.row_count() {
            let cells: Vec<&str> = self
                .columns
                .iter()
                .map(|c| c.cells.get(row).map_or("", String::as_str))
                .collect();
            Self::write_row(f, &cells, &widths)?;
        }
        Ok(())
    }
}
