//! Constant grids: one value standing for an unbounded extent.
//!
//! Scalars in grid expressions are wrapped in constant grids so the algebra
//! only ever sees grid-op-grid. A constant grid has a single cell over
//! [`CONSTANT_EXTENT`] and never materializes a value matrix.

use std::borrow::Cow;

use raster_common::Extent;

use super::{Cells, Grid, DEFAULT_NO_DATA};

/// Cell size of a constant grid; also its width and height.
pub const CONSTANT_CELL_SIZE: f64 = 1.0e8;

/// Extent covered by a constant grid.
pub const CONSTANT_EXTENT: Extent = Extent {
    left: -5.0e7,
    bottom: -5.0e7,
    right: 5.0e7,
    top: 5.0e7,
};

impl Grid {
    /// A constant grid with the default NoData value.
    pub fn constant(value: f32) -> Self {
        Self::constant_with_no_data(value, DEFAULT_NO_DATA)
    }

    /// A constant grid with an explicit NoData value.
    pub fn constant_with_no_data(value: f32, no_data: f32) -> Self {
        let mut grid = Self {
            columns: 1,
            rows: 1,
            cell_size_x: CONSTANT_CELL_SIZE,
            cell_size_y: CONSTANT_CELL_SIZE,
            extent: CONSTANT_EXTENT,
            no_data,
            calculation_value: None,
            min: value,
            max: value,
            interval: None,
            cells: Cells::Constant(value),
            source: None,
        };
        grid.refresh_min_max_from_fill(value);
        grid
    }

    /// Scalar operand for grid expressions. Only NaN counts as undefined.
    pub fn scalar(value: f32) -> Self {
        Self::constant_with_no_data(value, f32::NAN)
    }

    /// The value of a constant grid.
    pub fn constant_value(&self) -> Option<f32> {
        match self.cells {
            Cells::Constant(value) => Some(value),
            Cells::Dense(_) => None,
        }
    }

    /// Whether a header with this geometry encodes a constant grid.
    pub(crate) fn is_constant_geometry(
        columns: usize,
        rows: usize,
        cell_size_x: f64,
        cell_size_y: f64,
        threshold: f64,
    ) -> bool {
        columns == 1 && rows == 1 && cell_size_x >= threshold && cell_size_y >= threshold
    }

    /// Lay a constant grid out as a dense grid with the geometry of `template`.
    ///
    /// A constant holding its own NoData value becomes `template`'s NoData.
    /// Dense grids are returned as they are.
    pub fn allocate_like<'a>(&'a self, template: &Grid) -> Cow<'a, Grid> {
        match self.cells {
            Cells::Constant(value) => {
                let fill = if self.is_no_data(value) {
                    template.no_data
                } else {
                    value
                };
                let mut grid = template.like(fill);
                grid.calculation_value = self.calculation_value;
                Cow::Owned(grid)
            }
            Cells::Dense(_) => Cow::Borrowed(self),
        }
    }

    /// Rebuild a constant grid with a new value.
    pub(crate) fn with_constant(&self, value: f32) -> Grid {
        let mut grid = Self::constant_with_no_data(value, self.no_data);
        grid.interval = self.interval;
        grid
    }
}
