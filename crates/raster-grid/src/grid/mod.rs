//! The primary raster type.
//!
//! A [`Grid`] is a rectangular matrix of `f32` cells laid over an
//! [`Extent`], stored row-major with row 0 at the top edge. Cells are either
//! a dense matrix, possibly not yet loaded from its backing file, or a single
//! constant value standing for an unbounded extent.

mod constant;
mod interpolation;
mod scale;
mod window;

pub use constant::{CONSTANT_CELL_SIZE, CONSTANT_EXTENT};

use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use raster_common::{approx_eq, Extent};
use tracing::trace;

use crate::error::{RasterError, Result};
use crate::types::{GridInfo, VerticalInterval};

/// NoData value used when none is given.
pub const DEFAULT_NO_DATA: f32 = -9999.0;

/// Added before flooring a fractional cell offset so that coordinates on a
/// cell edge land in the cell to their right or below.
const INDEX_EPSILON: f64 = 1e-9;

/// Storage behind a grid.
#[derive(Debug, Clone)]
pub(crate) enum Cells {
    /// Row-major matrix. Empty until loaded from the source or allocated.
    Dense(OnceCell<Vec<f32>>),
    /// One value covering the whole extent.
    Constant(f32),
}

/// Backing file of a lazily loaded grid.
#[derive(Debug, Clone)]
pub(crate) struct LazySource {
    pub(crate) path: PathBuf,
    /// Extent requested at read time, if it differs from the on-disk extent.
    pub(crate) requested: Option<Extent>,
}

/// A gridded raster with NoData handling.
#[derive(Debug, Clone)]
pub struct Grid {
    pub(crate) columns: usize,
    pub(crate) rows: usize,
    pub(crate) cell_size_x: f64,
    pub(crate) cell_size_y: f64,
    pub(crate) extent: Extent,
    pub(crate) no_data: f32,
    pub(crate) calculation_value: Option<f32>,
    pub(crate) min: f32,
    pub(crate) max: f32,
    pub(crate) interval: Option<VerticalInterval>,
    pub(crate) cells: Cells,
    pub(crate) source: Option<LazySource>,
}

/// Number of cells needed to cover `length` with cells of `cell_size`.
///
/// Ratios within rounding noise of a whole number are not rounded up.
pub(crate) fn cell_count(length: f64, cell_size: f64) -> usize {
    if length <= 0.0 {
        return 0;
    }
    let ratio = length / cell_size;
    let rounded = ratio.round();
    if approx_eq(ratio, rounded) {
        rounded as usize
    } else {
        ratio.ceil() as usize
    }
}

fn check_cell_size(cell_size_x: f64, cell_size_y: f64) -> Result<()> {
    let valid = |c: f64| c.is_finite() && c > 0.0;
    if !valid(cell_size_x) || !valid(cell_size_y) {
        return Err(RasterError::geometry(format!(
            "cell sizes must be positive, got {} x {}",
            cell_size_x, cell_size_y
        )));
    }
    Ok(())
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    /// A grid without cells.
    pub fn empty() -> Self {
        Self {
            columns: 0,
            rows: 0,
            cell_size_x: 1.0,
            cell_size_y: 1.0,
            extent: Extent::new(0.0, 0.0, 0.0, 0.0),
            no_data: DEFAULT_NO_DATA,
            calculation_value: None,
            min: DEFAULT_NO_DATA,
            max: DEFAULT_NO_DATA,
            interval: None,
            cells: Cells::Dense(OnceCell::with_value(Vec::new())),
            source: None,
        }
    }

    /// A grid covering `extent` whose cells are allocated, filled with
    /// NoData, on first access.
    pub fn new(extent: Extent, cell_size_x: f64, cell_size_y: f64, no_data: f32) -> Result<Self> {
        check_cell_size(cell_size_x, cell_size_y)?;
        if extent.width() < 0.0 || extent.height() < 0.0 {
            return Err(RasterError::geometry(format!("inverted extent {}", extent)));
        }

        Ok(Self {
            columns: cell_count(extent.width(), cell_size_x),
            rows: cell_count(extent.height(), cell_size_y),
            cell_size_x,
            cell_size_y,
            extent,
            no_data,
            calculation_value: None,
            min: no_data,
            max: no_data,
            interval: None,
            cells: Cells::Dense(OnceCell::new()),
            source: None,
        })
    }

    /// A grid covering `extent` with every cell allocated and set to `value`.
    pub fn filled(
        extent: Extent,
        cell_size_x: f64,
        cell_size_y: f64,
        no_data: f32,
        value: f32,
    ) -> Result<Self> {
        let mut grid = Self::new(extent, cell_size_x, cell_size_y, no_data)?;
        grid.cells = Cells::Dense(OnceCell::with_value(vec![value; grid.len()]));
        grid.refresh_min_max_from_fill(value);
        Ok(grid)
    }

    /// A grid over `extent` holding `values` (row-major, top row first).
    pub fn from_values(
        extent: Extent,
        cell_size_x: f64,
        cell_size_y: f64,
        no_data: f32,
        values: Vec<f32>,
    ) -> Result<Self> {
        let mut grid = Self::new(extent, cell_size_x, cell_size_y, no_data)?;
        if values.len() != grid.len() {
            return Err(RasterError::geometry(format!(
                "{} values supplied for a {}x{} grid",
                values.len(),
                grid.columns,
                grid.rows
            )));
        }
        grid.cells = Cells::Dense(OnceCell::with_value(values));
        grid.recompute_min_max()?;
        Ok(grid)
    }

    /// Same geometry, NoData and vertical interval as `self`, every cell set
    /// to `value`.
    pub(crate) fn like(&self, value: f32) -> Grid {
        let mut grid = self.with_values(vec![value; self.len()]);
        grid.refresh_min_max_from_fill(value);
        grid
    }

    /// Same geometry, NoData and vertical interval as `self`, holding
    /// `values`. Cached min/max are left for the caller to refresh.
    pub(crate) fn with_values(&self, values: Vec<f32>) -> Grid {
        debug_assert_eq!(values.len(), self.len());
        Grid {
            columns: self.columns,
            rows: self.rows,
            cell_size_x: self.cell_size_x,
            cell_size_y: self.cell_size_y,
            extent: self.extent,
            no_data: self.no_data,
            calculation_value: None,
            min: self.no_data,
            max: self.no_data,
            interval: self.interval,
            cells: Cells::Dense(OnceCell::with_value(values)),
            source: None,
        }
    }

    fn refresh_min_max_from_fill(&mut self, value: f32) {
        let bound = if self.is_no_data(value) { self.no_data } else { value };
        self.min = bound;
        self.max = bound;
    }

    // Geometry

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cell_size_x(&self) -> f64 {
        self.cell_size_x
    }

    pub fn cell_size_y(&self) -> f64 {
        self.cell_size_y
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// True when both grids share dimensions, cell sizes and extent.
    pub fn same_geometry(&self, other: &Grid) -> bool {
        self.columns == other.columns
            && self.rows == other.rows
            && approx_eq(self.cell_size_x, other.cell_size_x)
            && approx_eq(self.cell_size_y, other.cell_size_y)
            && self.extent.approx_eq(&other.extent)
    }

    // NoData

    pub fn no_data(&self) -> f32 {
        self.no_data
    }

    /// Change the NoData sentinel. Cell values are left untouched.
    pub fn set_no_data(&mut self, no_data: f32) {
        self.no_data = no_data;
    }

    /// NoData test that also matches a NaN sentinel.
    pub fn is_no_data(&self, value: f32) -> bool {
        value == self.no_data || (value.is_nan() && self.no_data.is_nan())
    }

    /// Value substituted for NoData cells during calculations.
    pub fn calculation_value(&self) -> Option<f32> {
        self.calculation_value
    }

    pub fn set_calculation_value(&mut self, value: Option<f32>) {
        self.calculation_value = value;
    }

    /// Apply the calculation-value substitution to a raw cell value.
    ///
    /// `None` means the cell is NoData and no substitute is configured.
    pub fn substitute(&self, raw: f32) -> Option<f32> {
        if self.is_no_data(raw) {
            self.calculation_value
        } else {
            Some(raw)
        }
    }

    // Statistics and metadata

    /// Cached minimum of the non-NoData cells.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Cached maximum of the non-NoData cells.
    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn vertical_interval(&self) -> Option<VerticalInterval> {
        self.interval
    }

    pub fn set_vertical_interval(&mut self, interval: Option<VerticalInterval>) {
        self.interval = interval;
    }

    /// Path of the file the values are loaded from, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_ref().map(|s| s.path.as_path())
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.cells, Cells::Constant(_))
    }

    /// True when cell values are in memory. Constant grids always are.
    pub fn is_loaded(&self) -> bool {
        match &self.cells {
            Cells::Dense(cell) => cell.get().is_some(),
            Cells::Constant(_) => true,
        }
    }

    /// True when a dense value matrix has been materialized.
    pub fn has_value_matrix(&self) -> bool {
        matches!(&self.cells, Cells::Dense(cell) if cell.get().is_some())
    }

    /// Summary of geometry and cached statistics.
    pub fn info(&self) -> GridInfo {
        GridInfo {
            columns: self.columns,
            rows: self.rows,
            cell_size_x: self.cell_size_x,
            cell_size_y: self.cell_size_y,
            extent: self.extent,
            no_data: self.no_data,
            min: self.min,
            max: self.max,
            vertical_interval: self.interval,
            constant: self.is_constant(),
            loaded: self.is_loaded(),
        }
    }

    // Addressing

    /// Column containing `x`. May be negative or past the last column.
    pub fn column_index(&self, x: f64) -> i64 {
        ((x - self.extent.left) / self.cell_size_x + INDEX_EPSILON).floor() as i64
    }

    /// Row containing `y`, counted from the top edge. May be out of range.
    pub fn row_index(&self, y: f64) -> i64 {
        ((self.extent.top - y) / self.cell_size_y + INDEX_EPSILON).floor() as i64
    }

    pub fn cell_center_x(&self, column: usize) -> f64 {
        self.extent.left + (column as f64 + 0.5) * self.cell_size_x
    }

    pub fn cell_center_y(&self, row: usize) -> f64 {
        self.extent.top - (row as f64 + 0.5) * self.cell_size_y
    }

    /// `(row, column)` of the cell containing the point, if inside the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let column = self.column_index(x);
        let row = self.row_index(y);
        if column < 0 || row < 0 || column as usize >= self.columns || row as usize >= self.rows {
            return None;
        }
        Some((row as usize, column as usize))
    }

    /// Offset into the value matrix of the cell containing the point.
    pub(crate) fn index_at(&self, x: f64, y: f64) -> Option<usize> {
        self.cell_at(x, y)
            .map(|(row, column)| self.flat_index(row, column))
    }

    fn flat_index(&self, row: usize, column: usize) -> usize {
        match self.cells {
            Cells::Constant(_) => 0,
            Cells::Dense(_) => row * self.columns + column,
        }
    }

    // Values

    /// Cell values in row-major order, loading them if needed.
    pub fn values(&self) -> Result<&[f32]> {
        match &self.cells {
            Cells::Constant(value) => Ok(std::slice::from_ref(value)),
            Cells::Dense(cell) => cell
                .get_or_try_init(|| self.load_values())
                .map(|values| values.as_slice()),
        }
    }

    /// Load values now if they are not already in memory.
    pub fn ensure_loaded(&self) -> Result<()> {
        self.values().map(|_| ())
    }

    /// Mutable access to the value matrix.
    ///
    /// Once values are handed out for mutation the grid no longer mirrors
    /// its backing file, so the file link is dropped.
    pub fn values_mut(&mut self) -> Result<&mut [f32]> {
        self.ensure_loaded()?;
        self.source = None;
        match &mut self.cells {
            Cells::Dense(cell) => cell
                .get_mut()
                .map(|values| values.as_mut_slice())
                .ok_or_else(|| RasterError::invalid_operation("grid values are not loaded")),
            Cells::Constant(_) => Err(RasterError::invalid_operation(
                "constant grid cells cannot be modified individually",
            )),
        }
    }

    /// Swap in a complete value matrix for this geometry.
    pub(crate) fn set_values(&mut self, values: Vec<f32>) {
        debug_assert_eq!(values.len(), self.len());
        self.cells = Cells::Dense(OnceCell::with_value(values));
        self.source = None;
    }

    /// Consume the grid, returning its value matrix.
    pub(crate) fn into_values(self) -> Result<Vec<f32>> {
        self.ensure_loaded()?;
        match self.cells {
            Cells::Dense(cell) => Ok(cell.into_inner().unwrap_or_default()),
            Cells::Constant(value) => Ok(vec![value]),
        }
    }

    fn load_values(&self) -> Result<Vec<f32>> {
        match &self.source {
            Some(source) => crate::io::reader::load_source(self, source),
            None => Ok(vec![self.no_data; self.len()]),
        }
    }

    /// Drop loaded values of a file-backed grid.
    ///
    /// The next access reloads them and re-applies the requested extent.
    /// Returns false, and keeps the values, when there is no backing file.
    pub fn release_values(&mut self) -> bool {
        match (&mut self.cells, &self.source) {
            (Cells::Dense(cell), Some(source)) => {
                trace!(path = %source.path.display(), "Releasing grid values");
                cell.take();
                true
            }
            _ => false,
        }
    }

    /// Raw value of the cell at `(row, column)`, `None` when out of range.
    pub fn get_cell(&self, row: usize, column: usize) -> Result<Option<f32>> {
        if row >= self.rows || column >= self.columns {
            return Ok(None);
        }
        let index = self.flat_index(row, column);
        Ok(self.values()?.get(index).copied())
    }

    /// Raw value of the cell containing the point, `None` outside the grid.
    ///
    /// NoData cells report the NoData value.
    pub fn get_value(&self, x: f64, y: f64) -> Result<Option<f32>> {
        match self.index_at(x, y) {
            Some(index) => Ok(self.values()?.get(index).copied()),
            None => Ok(None),
        }
    }

    /// Like [`Grid::get_value`], but NoData cells also report `None`.
    pub fn get_no_data_aware_value(&self, x: f64, y: f64) -> Result<Option<f32>> {
        Ok(self.get_value(x, y)?.filter(|v| !self.is_no_data(*v)))
    }

    /// Value with the calculation-value substitution applied.
    pub fn get_calculation_value(&self, x: f64, y: f64) -> Result<Option<f32>> {
        Ok(self.get_value(x, y)?.and_then(|v| self.substitute(v)))
    }

    /// Write a cell value. Points outside the grid are ignored.
    ///
    /// Cached min/max are not updated; call [`Grid::recompute_min_max`].
    pub fn set_value(&mut self, x: f64, y: f64, value: f32) -> Result<()> {
        self.reject_constant("set a single cell of")?;
        match self.index_at(x, y) {
            Some(index) => self.values_mut()?[index] = value,
            None => trace!(x, y, "Ignoring write outside grid extent"),
        }
        Ok(())
    }

    /// Write a cell by position. Out-of-range positions are ignored.
    pub fn set_cell(&mut self, row: usize, column: usize, value: f32) -> Result<()> {
        self.reject_constant("set a single cell of")?;
        if row < self.rows && column < self.columns {
            let index = self.flat_index(row, column);
            self.values_mut()?[index] = value;
        } else {
            trace!(row, column, "Ignoring write outside grid");
        }
        Ok(())
    }

    /// Add to a cell value; a NoData cell counts as zero.
    pub fn add_value(&mut self, x: f64, y: f64, value: f32) -> Result<()> {
        self.reject_constant("add to a single cell of")?;
        let Some(index) = self.index_at(x, y) else {
            trace!(x, y, "Ignoring addition outside grid extent");
            return Ok(());
        };
        let no_data = self.no_data;
        let cell = &mut self.values_mut()?[index];
        if *cell == no_data || (cell.is_nan() && no_data.is_nan()) {
            *cell = 0.0;
        }
        *cell += value;
        Ok(())
    }

    /// Set every cell to `value`, materializing the matrix if needed.
    pub fn set_all_values(&mut self, value: f32) -> Result<()> {
        match &mut self.cells {
            Cells::Constant(current) => *current = value,
            Cells::Dense(_) => self.values_mut()?.fill(value),
        }
        self.refresh_min_max_from_fill(value);
        Ok(())
    }

    fn reject_constant(&self, action: &str) -> Result<()> {
        if self.is_constant() {
            return Err(RasterError::invalid_operation(format!(
                "cannot {} a constant grid",
                action
            )));
        }
        Ok(())
    }

    // Statistics

    /// Recompute cached min/max over non-NoData cells.
    ///
    /// A grid without valid cells gets NoData for both.
    pub fn recompute_min_max(&mut self) -> Result<()> {
        let (min, max) = {
            let values = self.values()?;
            let mut valid = values.iter().copied().filter(|v| !self.is_no_data(*v));
            match valid.next() {
                Some(first) => valid.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))),
                None => (self.no_data, self.no_data),
            }
        };
        self.min = min;
        self.max = max;
        Ok(())
    }

    /// Number of non-NoData cells.
    pub fn valid_count(&self) -> Result<usize> {
        Ok(self
            .values()?
            .iter()
            .filter(|v| !self.is_no_data(**v))
            .count())
    }

    /// Sum of non-NoData cells.
    pub fn sum(&self) -> Result<f64> {
        Ok(self
            .values()?
            .iter()
            .filter(|v| !self.is_no_data(**v))
            .map(|v| *v as f64)
            .sum())
    }

    /// Mean of non-NoData cells, `None` when there are none.
    pub fn mean(&self) -> Result<Option<f64>> {
        let count = self.valid_count()?;
        if count == 0 {
            return Ok(None);
        }
        Ok(Some(self.sum()? / count as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Grid {
        Grid::from_values(
            Extent::new(0.0, 0.0, 20.0, 20.0),
            10.0,
            10.0,
            -9999.0,
            vec![1.0, 2.0, 3.0, -9999.0],
        )
        .unwrap()
    }

    #[test]
    fn test_cell_count_tolerates_rounding() {
        assert_eq!(cell_count(0.7, 0.1), 7);
        assert_eq!(cell_count(25.0, 10.0), 3);
        assert_eq!(cell_count(20.0, 10.0), 2);
        assert_eq!(cell_count(0.0, 10.0), 0);
    }

    #[test]
    fn test_dimensions_from_extent() {
        let grid = Grid::new(Extent::new(0.0, 0.0, 100.0, 50.0), 10.0, 10.0, -1.0).unwrap();
        assert_eq!(grid.columns(), 10);
        assert_eq!(grid.rows(), 5);
        assert!(!grid.is_loaded());

        assert!(Grid::new(Extent::new(0.0, 0.0, 10.0, 10.0), 0.0, 1.0, -1.0).is_err());
        assert!(Grid::new(Extent::new(10.0, 0.0, 0.0, 10.0), 1.0, 1.0, -1.0).is_err());
    }

    #[test]
    fn test_lazy_allocation_fills_no_data() {
        let grid = Grid::new(Extent::new(0.0, 0.0, 30.0, 30.0), 10.0, 10.0, -1.0).unwrap();
        assert_eq!(grid.values().unwrap(), &[-1.0; 9]);
        assert!(grid.is_loaded());
    }

    #[test]
    fn test_addressing() {
        let grid = two_by_two();
        assert_eq!(grid.column_index(0.0), 0);
        assert_eq!(grid.column_index(9.99), 0);
        assert_eq!(grid.column_index(10.0), 1);
        assert_eq!(grid.column_index(20.0), 2);
        assert_eq!(grid.row_index(20.0), 0);
        assert_eq!(grid.row_index(10.0), 1);
        assert_eq!(grid.row_index(0.0), 2);
        assert_eq!(grid.cell_center_x(1), 15.0);
        assert_eq!(grid.cell_center_y(0), 15.0);

        for row in 0..grid.rows() {
            for column in 0..grid.columns() {
                assert_eq!(grid.row_index(grid.cell_center_y(row)), row as i64);
                assert_eq!(grid.column_index(grid.cell_center_x(column)), column as i64);
            }
        }
    }

    #[test]
    fn test_get_value_out_of_range_is_none() {
        let grid = two_by_two();
        assert_eq!(grid.get_value(5.0, 15.0).unwrap(), Some(1.0));
        assert_eq!(grid.get_value(15.0, 5.0).unwrap(), Some(-9999.0));
        assert_eq!(grid.get_value(20.0, 5.0).unwrap(), None);
        assert_eq!(grid.get_value(-0.1, 5.0).unwrap(), None);
        assert_eq!(grid.get_value(5.0, 0.0).unwrap(), None);
    }

    #[test]
    fn test_no_data_aware_value() {
        let grid = two_by_two();
        assert_eq!(grid.get_no_data_aware_value(15.0, 5.0).unwrap(), None);
        assert_eq!(grid.get_no_data_aware_value(5.0, 5.0).unwrap(), Some(3.0));
    }

    #[test]
    fn test_calculation_value_substitution() {
        let mut grid = two_by_two();
        assert_eq!(grid.get_calculation_value(15.0, 5.0).unwrap(), None);
        grid.set_calculation_value(Some(0.0));
        assert_eq!(grid.get_calculation_value(15.0, 5.0).unwrap(), Some(0.0));
        assert_eq!(grid.substitute(2.0), Some(2.0));
    }

    #[test]
    fn test_nan_no_data_is_recognised() {
        let grid = Grid::from_values(
            Extent::new(0.0, 0.0, 2.0, 1.0),
            1.0,
            1.0,
            f32::NAN,
            vec![f32::NAN, 4.0],
        )
        .unwrap();
        assert!(grid.is_no_data(f32::NAN));
        assert_eq!(grid.valid_count().unwrap(), 1);
        assert_eq!(grid.min(), 4.0);
        assert_eq!(grid.get_no_data_aware_value(0.5, 0.5).unwrap(), None);
    }

    #[test]
    fn test_set_value_leaves_min_max() {
        let mut grid = two_by_two();
        grid.set_value(5.0, 15.0, 100.0).unwrap();
        assert_eq!(grid.get_value(5.0, 15.0).unwrap(), Some(100.0));
        assert_eq!(grid.max(), 3.0);
        grid.recompute_min_max().unwrap();
        assert_eq!(grid.max(), 100.0);

        // outside: ignored
        grid.set_value(500.0, 500.0, 1.0).unwrap();
        grid.set_cell(9, 9, 1.0).unwrap();
    }

    #[test]
    fn test_add_value_resets_no_data() {
        let mut grid = two_by_two();
        grid.add_value(15.0, 5.0, 2.5).unwrap();
        assert_eq!(grid.get_value(15.0, 5.0).unwrap(), Some(2.5));
        grid.add_value(15.0, 5.0, 1.0).unwrap();
        assert_eq!(grid.get_value(15.0, 5.0).unwrap(), Some(3.5));
    }

    #[test]
    fn test_set_all_values() {
        let mut grid = Grid::new(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 10.0, -1.0).unwrap();
        grid.set_all_values(7.0).unwrap();
        assert_eq!(grid.values().unwrap(), &[7.0; 4]);
        assert_eq!((grid.min(), grid.max()), (7.0, 7.0));
    }

    #[test]
    fn test_statistics_skip_no_data() {
        let grid = two_by_two();
        assert_eq!(grid.valid_count().unwrap(), 3);
        assert_eq!(grid.sum().unwrap(), 6.0);
        assert_eq!(grid.mean().unwrap(), Some(2.0));
        assert_eq!((grid.min(), grid.max()), (1.0, 3.0));

        let blank = Grid::new(Extent::new(0.0, 0.0, 1.0, 1.0), 1.0, 1.0, -1.0).unwrap();
        assert_eq!(blank.mean().unwrap(), None);
    }

    #[test]
    fn test_release_without_source_keeps_values() {
        let mut grid = two_by_two();
        assert!(!grid.release_values());
        assert!(grid.is_loaded());
    }

    #[test]
    fn test_from_values_checks_length() {
        let result = Grid::from_values(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 10.0, -1.0, vec![1.0]);
        assert!(matches!(result, Err(RasterError::Geometry(_))));
    }

    #[test]
    fn test_clone_is_deep() {
        let grid = two_by_two();
        let mut copy = grid.clone();
        copy.set_cell(0, 0, 42.0).unwrap();
        assert_eq!(grid.get_cell(0, 0).unwrap(), Some(1.0));
        assert_eq!(copy.get_cell(0, 0).unwrap(), Some(42.0));
    }

    #[test]
    fn test_info_serialises() {
        let mut grid = two_by_two();
        grid.set_vertical_interval(Some(VerticalInterval::new(5.0, 1.0).unwrap()));
        let info = grid.info();
        assert_eq!((info.columns, info.rows), (2, 2));
        assert!(!info.constant);
        assert!(info.loaded);

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["columns"], 2);
        assert_eq!(json["extent"]["right"], 20.0);
        assert_eq!(json["no_data"], -9999.0);
        assert_eq!(json["constant"], false);

        let back: GridInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, info);

        assert!(Grid::constant(3.0).info().constant);
    }
}
