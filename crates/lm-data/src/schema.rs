//! Measurement sheet schema definitions.

use lm_fit::FitConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub fit_config: FitConfig,
    #[serde(default)]
    pub quantities: Vec<QuantityDef>,
    #[serde(default)]
    pub lists: Vec<ListDef>,
    #[serde(default)]
    pub samples: Vec<SampleDef>,
    #[serde(default)]
    pub fits: Vec<FitDef>,
    #[serde(default)]
    pub comparisons: Vec<ComparisonDef>,
    #[serde(default)]
    pub chi_squares: Vec<ChiSquareDef>,
}

/// Display settings shared by every printed entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UnitDef {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub unit: String,
    #[serde(default)]
    pub prefix: bool,
}

/// A single value with optional uncertainty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuantityDef {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
    #[serde(flatten)]
    pub unit: UnitDef,
}

/// A column of values, one uncertainty per value if given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListDef {
    pub name: String,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainties: Option<Vec<f64>>,
    #[serde(flatten)]
    pub unit: UnitDef,
}

/// Repeated readings reduced to mean ± standard deviation of the mean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SampleDef {
    pub name: String,
    pub values: Vec<f64>,
    #[serde(flatten)]
    pub unit: UnitDef,
}

/// Straight-line fit over paired data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FitDef {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub dy: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dx: Option<Vec<f64>>,
    /// Half-open index range `[start, end)` of the points to fit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<[usize; 2]>,
}

/// Sigma deviation of a value from a reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonDef {
    pub name: String,
    pub value: f64,
    #[serde(default)]
    pub uncertainty: f64,
    pub reference: f64,
    #[serde(default)]
    pub reference_uncertainty: f64,
}

/// Chi-square of observed against expected values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChiSquareDef {
    pub name: String,
    pub observed: Vec<f64>,
    pub d_observed: Vec<f64>,
    pub expected: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_expected: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dof: Option<usize>,
}
