//! lm-data: measurement sheet format, validation and evaluation.

pub mod report;
pub mod schema;
pub mod validate;

pub use report::{FitRecord, FitSummary, SheetReport, evaluate_sheet};
pub use schema::*;
pub use validate::{ValidationError, validate_sheet};

use std::path::Path;
use tracing::info;

pub type DataResult<T> = Result<T, DataError>;

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Input error: {0}")]
    Input(#[from] lm_core::LmError),

    #[error("Fit error: {0}")]
    Fit(#[from] lm_fit::FitError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_yaml(content: &str) -> DataResult<Sheet> {
    let sheet: Sheet = serde_yaml::from_str(content)?;
    validate_sheet(&sheet)?;
    Ok(sheet)
}

pub fn parse_json(content: &str) -> DataResult<Sheet> {
    let sheet: Sheet = serde_json::from_str(content)?;
    validate_sheet(&sheet)?;
    Ok(sheet)
}

pub fn load_yaml(path: &Path) -> DataResult<Sheet> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml(&content)
}

pub fn load_json(path: &Path) -> DataResult<Sheet> {
    let content = std::fs::read_to_string(path)?;
    parse_json(&content)
}

/// Load a sheet, choosing JSON for a `.json` extension and YAML otherwise.
pub fn load(path: &Path) -> DataResult<Sheet> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let sheet = if is_json {
        load_json(path)?
    } else {
        load_yaml(path)?
    };
    info!(
        path = %path.display(),
        sheet = %sheet.name,
        fits = sheet.fits.len(),
        "loaded measurement sheet"
    );
    Ok(sheet)
}
