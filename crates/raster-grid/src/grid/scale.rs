//! Resolution changes by integer factors.
//!
//! Scaling up buckets fine cells into coarse cells by their centers and
//! reduces each bucket with a [`ScaleUpMethod`]. Scaling down spreads every
//! coarse cell over the fine cells it contains.

use raster_common::{approx_eq, Extent};
use tracing::debug;

use super::window::{snap_ceil, snap_floor};
use super::Grid;
use crate::error::{RasterError, Result};
use crate::types::{ScaleDownMethod, ScaleUpMethod};

/// Integer ratio `coarse / fine`, or a geometry error when there is none.
fn integer_factor(coarse: f64, fine: f64) -> Result<usize> {
    if !(coarse.is_finite() && coarse > 0.0) {
        return Err(RasterError::geometry(format!(
            "cell size must be positive, got {}",
            coarse
        )));
    }
    let ratio = coarse / fine;
    let rounded = ratio.round();
    if rounded < 1.0 || !approx_eq(ratio, rounded) {
        return Err(RasterError::geometry(format!(
            "cell size {} is not an integer multiple of {}",
            coarse, fine
        )));
    }
    Ok(rounded as usize)
}

/// Equality that also matches two NaNs.
fn same_value(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Reduce the values gathered for one coarse cell.
fn reduce(values: &mut [f32], method: ScaleUpMethod) -> f32 {
    match method {
        ScaleUpMethod::Minimum => values.iter().copied().fold(f32::INFINITY, f32::min),
        ScaleUpMethod::Maximum => values.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        ScaleUpMethod::Sum => values.iter().map(|v| *v as f64).sum::<f64>() as f32,
        ScaleUpMethod::Mean => {
            let sum: f64 = values.iter().map(|v| *v as f64).sum();
            (sum / values.len() as f64) as f32
        }
        ScaleUpMethod::Median => {
            values.sort_by(|a, b| a.total_cmp(b));
            values[(values.len() - 1) / 2]
        }
        ScaleUpMethod::MostOccurring | ScaleUpMethod::Boundary => {
            values.sort_by(|a, b| a.total_cmp(b));
            let mut best = values[0];
            let mut best_count = 0;
            let mut start = 0;
            while start < values.len() {
                let mut end = start + 1;
                while end < values.len() && same_value(values[end], values[start]) {
                    end += 1;
                }
                // strictly greater keeps the smallest value on ties
                if end - start > best_count {
                    best = values[start];
                    best_count = end - start;
                }
                start = end;
            }
            best
        }
    }
}

impl Grid {
    /// Aggregate to a coarser `cell_size`, an integer multiple of the current one.
    ///
    /// `clip` restricts the source before aggregation. `align` anchors the
    /// coarse lattice at its left and top edges instead of the grid's own.
    /// Coarse cells without contributing values are NoData.
    pub fn scale_up(
        &self,
        cell_size: f64,
        method: ScaleUpMethod,
        clip: Option<&Extent>,
        align: Option<&Extent>,
    ) -> Result<Grid> {
        if self.is_constant() {
            return Ok(self.clone());
        }
        let factor_x = integer_factor(cell_size, self.cell_size_x)?;
        let factor_y = integer_factor(cell_size, self.cell_size_y)?;

        let clipped;
        let source = match clip {
            Some(extent) => {
                clipped = self
                    .clip(extent)?
                    .ok_or_else(|| RasterError::no_overlap(extent, self.extent))?;
                clipped.as_ref()
            }
            None => self,
        };

        let anchor = align.copied().unwrap_or(source.extent);
        let extent = &source.extent;
        let target_extent = Extent {
            left: anchor.left + snap_floor((extent.left - anchor.left) / cell_size) * cell_size,
            right: anchor.left + snap_ceil((extent.right - anchor.left) / cell_size) * cell_size,
            top: anchor.top - snap_floor((anchor.top - extent.top) / cell_size) * cell_size,
            bottom: anchor.top - snap_ceil((anchor.top - extent.bottom) / cell_size) * cell_size,
        };

        debug!(
            from = self.cell_size_x,
            to = cell_size,
            factor_x,
            factor_y,
            method = %method,
            extent = %target_extent,
            "Scaling grid up"
        );

        let mut target = Grid::new(target_extent, cell_size, cell_size, self.no_data)?;
        target.calculation_value = self.calculation_value;
        target.interval = self.interval;

        let mut buckets: Vec<Vec<f32>> = vec![Vec::new(); target.len()];
        let values = source.values()?;
        for row in 0..source.rows {
            let y = source.cell_center_y(row);
            for column in 0..source.columns {
                let value = values[row * source.columns + column];
                if source.is_no_data(value) && !method.counts_no_data() {
                    continue;
                }
                if let Some(index) = target.index_at(source.cell_center_x(column), y) {
                    buckets[index].push(value);
                }
            }
        }

        let no_data = target.no_data;
        let reduced = buckets
            .iter_mut()
            .map(|bucket| {
                if bucket.is_empty() {
                    no_data
                } else {
                    reduce(bucket, method)
                }
            })
            .collect();

        target.set_values(reduced);
        target.recompute_min_max()?;
        Ok(target)
    }

    /// Refine to a smaller `cell_size` that divides the current one.
    ///
    /// `Block` copies each coarse value into its fine cells. `Divide` spreads
    /// it evenly over them. NoData stays NoData.
    pub fn scale_down(&self, cell_size: f64, method: ScaleDownMethod) -> Result<Grid> {
        if self.is_constant() {
            return Ok(self.clone());
        }
        let factor_x = integer_factor(self.cell_size_x, cell_size)?;
        let factor_y = integer_factor(self.cell_size_y, cell_size)?;

        debug!(
            from = self.cell_size_x,
            to = cell_size,
            method = %method,
            "Scaling grid down"
        );

        let mut target = Grid::new(self.extent, cell_size, cell_size, self.no_data)?;
        target.calculation_value = self.calculation_value;
        target.interval = self.interval;

        let divisor = (factor_x * factor_y) as f32;
        let source = self.values()?;
        let mut values = Vec::with_capacity(target.len());
        for row in 0..target.rows {
            let source_row = (row / factor_y).min(self.rows.saturating_sub(1));
            for column in 0..target.columns {
                let source_column = (column / factor_x).min(self.columns.saturating_sub(1));
                let value = source[source_row * self.columns + source_column];
                values.push(match method {
                    _ if self.is_no_data(value) => value,
                    ScaleDownMethod::Block => value,
                    ScaleDownMethod::Divide => value / divisor,
                });
            }
        }

        target.set_values(values);
        target.recompute_min_max()?;
        Ok(target)
    }
}
