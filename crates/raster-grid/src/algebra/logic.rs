//! Logical operators and conditional selection.

use tracing::trace;

use super::{combine, truth, zip_cells, NoDataPolicy};
use crate::error::Result;
use crate::grid::Grid;

impl Grid {
    /// 1 where both cells are positive, 0 elsewhere.
    pub fn and(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Raw, |a, b| Some(truth(a > 0.0 && b > 0.0)))
    }

    /// 1 where either cell is positive, 0 elsewhere.
    pub fn or(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Raw, |a, b| Some(truth(a > 0.0 || b > 0.0)))
    }

    pub fn and_scalar(&self, value: f32) -> Result<Grid> {
        self.and(&Grid::scalar(value))
    }

    pub fn or_scalar(&self, value: f32) -> Result<Grid> {
        self.or(&Grid::scalar(value))
    }

    /// Select `then` where this condition grid equals 1, `otherwise` elsewhere.
    ///
    /// Constant branches are first laid out on the condition's geometry. The
    /// three grids are then reconciled to the union of their extents. NoData
    /// in the condition, or in the selected branch, yields NoData.
    pub fn if_then_else(&self, then: &Grid, otherwise: &Grid) -> Result<Grid> {
        if let Some(condition) = self.constant_value() {
            trace!(condition, "Constant condition selects a whole branch");
            return Ok(match self.substitute(condition) {
                Some(c) if c == 1.0 => then.clone(),
                Some(_) => otherwise.clone(),
                None => self.clone(),
            });
        }

        let then = then.allocate_like(self);
        let otherwise = otherwise.allocate_like(self);
        zip_cells(
            &[self, then.as_ref(), otherwise.as_ref()],
            NoDataPolicy::Propagate,
            |v| match v[0] {
                Some(c) if c == 1.0 => v[1],
                Some(_) => v[2],
                None => None,
            },
        )
    }
}
