//! Extent reconciliation: snapping, windowing, clipping and enlarging.
//!
//! Every operation here is expressed through [`Grid::window`], which copies
//! cells onto a target extent that lies on the grid's cell lattice.

use std::borrow::Cow;

use raster_common::{approx_eq, Extent};
use tracing::debug;

use super::Grid;
use crate::error::{RasterError, Result};

/// Floor that treats values within rounding noise of an integer as that integer.
pub(crate) fn snap_floor(v: f64) -> f64 {
    let rounded = v.round();
    if approx_eq(v, rounded) {
        rounded
    } else {
        v.floor()
    }
}

/// Ceil counterpart of [`snap_floor`].
pub(crate) fn snap_ceil(v: f64) -> f64 {
    let rounded = v.round();
    if approx_eq(v, rounded) {
        rounded
    } else {
        v.ceil()
    }
}

fn is_whole(v: f64) -> bool {
    approx_eq(v, v.round())
}

impl Grid {
    /// Push the edges of `extent` outward onto this grid's cell lattice.
    ///
    /// The lattice is anchored at the left and top edges.
    pub fn snap_extent(&self, extent: &Extent) -> Extent {
        let left = self.extent.left;
        let top = self.extent.top;
        let (cx, cy) = (self.cell_size_x, self.cell_size_y);

        Extent {
            left: left + snap_floor((extent.left - left) / cx) * cx,
            right: left + snap_ceil((extent.right - left) / cx) * cx,
            top: top - snap_floor((top - extent.top) / cy) * cy,
            bottom: top - snap_ceil((top - extent.bottom) / cy) * cy,
        }
    }

    /// Whether every edge of `extent` lies on this grid's cell lattice.
    pub fn is_aligned(&self, extent: &Extent) -> bool {
        let left = self.extent.left;
        let top = self.extent.top;
        is_whole((extent.left - left) / self.cell_size_x)
            && is_whole((extent.right - left) / self.cell_size_x)
            && is_whole((top - extent.top) / self.cell_size_y)
            && is_whole((top - extent.bottom) / self.cell_size_y)
    }

    /// Copy this grid onto a cell-aligned `target` extent.
    ///
    /// Cells of `target` not covered by this grid get `fill`, or NoData when
    /// no fill is given. Cached min/max are recomputed.
    pub fn window(&self, target: &Extent, fill: Option<f32>) -> Result<Grid> {
        if self.is_constant() {
            return Err(RasterError::invalid_operation(
                "a constant grid has no cell lattice to window",
            ));
        }
        if !self.is_aligned(target) {
            return Err(RasterError::geometry(format!(
                "extent {} is not aligned to the {}x{} cells of grid {}",
                target, self.cell_size_x, self.cell_size_y, self.extent
            )));
        }

        let mut result = Grid::new(*target, self.cell_size_x, self.cell_size_y, self.no_data)?;
        result.calculation_value = self.calculation_value;
        result.interval = self.interval;

        let column_offset = ((target.left - self.extent.left) / self.cell_size_x).round() as i64;
        let row_offset = ((self.extent.top - target.top) / self.cell_size_y).round() as i64;

        let source = self.values()?;
        let mut values = vec![fill.unwrap_or(self.no_data); result.len()];
        for row in 0..result.rows {
            let source_row = row as i64 + row_offset;
            if source_row < 0 || source_row as usize >= self.rows {
                continue;
            }
            for column in 0..result.columns {
                let source_column = column as i64 + column_offset;
                if source_column < 0 || source_column as usize >= self.columns {
                    continue;
                }
                values[row * result.columns + column] =
                    source[source_row as usize * self.columns + source_column as usize];
            }
        }

        result.set_values(values);
        result.recompute_min_max()?;
        Ok(result)
    }

    /// Restrict the grid to its overlap with `extent`.
    ///
    /// The overlap is snapped outward to whole cells. Returns `None` when
    /// there is no overlap, and the grid itself, borrowed, when `extent`
    /// already contains it.
    pub fn clip(&self, extent: &Extent) -> Result<Option<Cow<'_, Grid>>> {
        if self.is_constant() || extent.contains(&self.extent) {
            return Ok(Some(Cow::Borrowed(self)));
        }

        let Some(overlap) = self.extent.intersection(extent) else {
            return Ok(None);
        };

        let target = self.snap_extent(&overlap);
        if target.is_empty() {
            // a sliver within rounding noise of an edge
            return Ok(None);
        }
        debug!(
            from = %self.extent,
            to = %target,
            "Clipping grid"
        );
        Ok(Some(Cow::Owned(self.window(&target, None)?)))
    }

    /// Set every cell whose center lies inside `extent` to NoData, keeping
    /// the full extent.
    pub fn clip_inverted(&self, extent: &Extent) -> Result<Grid> {
        if self.is_constant() {
            return Err(RasterError::invalid_operation(
                "cannot cut a hole into a constant grid",
            ));
        }

        let mut result = self.clone();
        let (columns, rows, no_data) = (self.columns, self.rows, self.no_data);
        let centers_x: Vec<f64> = (0..columns).map(|c| self.cell_center_x(c)).collect();
        let centers_y: Vec<f64> = (0..rows).map(|r| self.cell_center_y(r)).collect();

        let values = result.values_mut()?;
        for (row, y) in centers_y.iter().enumerate() {
            for (column, x) in centers_x.iter().enumerate() {
                if extent.contains_point(*x, *y) {
                    values[row * columns + column] = no_data;
                }
            }
        }

        result.recompute_min_max()?;
        Ok(result)
    }

    /// Grow the grid to the union of its extent and a cell-aligned `extent`.
    ///
    /// New cells get `fill`, or NoData. Returns the grid itself, borrowed,
    /// when no growth is needed.
    pub fn enlarge(&self, extent: &Extent, fill: Option<f32>) -> Result<Cow<'_, Grid>> {
        if self.is_constant() {
            return Ok(Cow::Borrowed(self));
        }
        if !self.is_aligned(extent) {
            return Err(RasterError::geometry(format!(
                "cannot enlarge {} to {}: extents are not cell-aligned",
                self.extent, extent
            )));
        }

        let union = self.extent.union(extent);
        if self.extent.contains(&union) {
            return Ok(Cow::Borrowed(self));
        }

        debug!(from = %self.extent, to = %union, "Enlarging grid");
        Ok(Cow::Owned(self.window(&union, fill)?))
    }
}
