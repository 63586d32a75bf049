//! Paired x/y data with per-point uncertainties.

use std::ops::Range;

use lm_core::{LmError, Real, Uncertainty, ensure_all_finite, ensure_min_len, ensure_same_len};

use crate::error::FitResult;

/// Points `(x, y)` with y-uncertainty `dy` and optional x-uncertainty `dx`.
///
/// All sequences have the same length, at least two points, finite values
/// and non-negative uncertainties.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset2D {
    x: Vec<Real>,
    y: Vec<Real>,
    dy: Vec<Real>,
    dx: Option<Vec<Real>>,
}

fn check_uncertainties(values: &[Real]) -> Result<(), LmError> {
    for &v in values {
        Uncertainty::known(v)?;
    }
    Ok(())
}

impl Dataset2D {
    pub fn new(x: Vec<Real>, y: Vec<Real>, dy: Vec<Real>) -> FitResult<Self> {
        ensure_min_len(&x, 2, "regression")?;
        ensure_same_len(x.len(), y.len(), "regression y")?;
        ensure_same_len(x.len(), dy.len(), "regression dy")?;
        ensure_all_finite(&x, "regression x")?;
        ensure_all_finite(&y, "regression y")?;
        check_uncertainties(&dy)?;
        Ok(Self { x, y, dy, dx: None })
    }

    /// Attach x-uncertainties, switching the fit to the iterative path.
    pub fn with_dx(mut self, dx: Vec<Real>) -> FitResult<Self> {
        ensure_same_len(self.x.len(), dx.len(), "regression dx")?;
        check_uncertainties(&dx)?;
        self.dx = Some(dx);
        Ok(self)
    }

    /// The points with indices in `range`, e.g. to fit only the linear part.
    pub fn select(&self, range: Range<usize>) -> FitResult<Self> {
        if range.end > self.len() || range.start > range.end {
            return Err(LmError::InvalidArg {
                what: "fit range outside dataset",
            }
            .into());
        }
        let dx = self.dx.as_ref().map(|d| d[range.clone()].to_vec());
        let sub = Self::new(
            self.x[range.clone()].to_vec(),
            self.y[range.clone()].to_vec(),
            self.dy[range].to_vec(),
        )?;
        match dx {
            Some(dx) => sub.with_dx(dx),
            None => Ok(sub),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[Real] {
        &self.x
    }

    pub fn y(&self) -> &[Real] {
        &self.y
    }

    pub fn dy(&self) -> &[Real] {
        &self.dy
    }

    pub fn dx(&self) -> Option<&[Real]> {
        self.dx.as_deref()
    }
}
