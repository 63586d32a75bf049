//! lm-format: report rendering for measured values.
//!
//! Values are printed with as many significant digits as their uncertainty
//! justifies. Single values, lists, values with SI units and whole text
//! tables are supported.

pub mod report;
pub mod signif;
pub mod table;

pub use report::{
    format_list, format_measurement, format_value, format_value_unit, list_cells, with_unit,
};
pub use signif::{SignificantLayout, general, sci, signval};
pub use table::{Column, Table};
