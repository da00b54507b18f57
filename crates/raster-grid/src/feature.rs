//! Burning vector features into grids.
//!
//! Geometry handling lives outside the engine. A feature only has to say
//! which cells it touches and with what weight.

use tracing::debug;

use crate::error::Result;
use crate::grid::Grid;

/// One weighted touch of a feature on a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellContribution {
    /// Point inside the touched cell.
    pub x: f64,
    pub y: f64,
    /// Share of the feature in this cell, e.g. the length of a line segment.
    pub weight: f64,
}

impl CellContribution {
    pub fn new(x: f64, y: f64, weight: f64) -> Self {
        Self { x, y, weight }
    }
}

/// A geometry that can report its length-weighted cell contributions.
pub trait FeatureRasterizer {
    /// Contributions of this feature to the cells of `grid`.
    ///
    /// Contributions outside the grid are allowed and ignored when burning.
    fn cell_contributions(&self, grid: &Grid) -> Vec<CellContribution>;
}

impl Grid {
    /// Add `value * weight` to every cell the feature touches.
    ///
    /// NoData cells count as zero. Returns the number of contributions that
    /// landed inside the grid. Cached min/max are refreshed.
    pub fn burn_feature<F>(&mut self, feature: &F, value: f32) -> Result<usize>
    where
        F: FeatureRasterizer + ?Sized,
    {
        let contributions = feature.cell_contributions(self);
        let mut burned = 0;
        for contribution in &contributions {
            if self.cell_at(contribution.x, contribution.y).is_none() {
                continue;
            }
            let amount = (value as f64 * contribution.weight) as f32;
            self.add_value(contribution.x, contribution.y, amount)?;
            burned += 1;
        }

        if burned > 0 {
            self.recompute_min_max()?;
        }
        debug!(
            contributions = contributions.len(),
            burned,
            "Burned feature into grid"
        );
        Ok(burned)
    }
}
