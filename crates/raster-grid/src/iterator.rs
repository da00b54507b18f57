//! Lock-step traversal of several grids.
//!
//! A [`CellIterator`] reconciles the extents of its participants under an
//! [`ExtentPolicy`], then walks the reconciled extent at the finest cell size
//! among them, sampling every participant at each position. The walk starts
//! at the center of the lower-left cell and proceeds row by row upwards.
//!
//! Constant grids cover everything, so they take no part in extent or step
//! reconciliation unless every participant is constant.

use std::ptr;

use raster_common::Extent;

use crate::error::Result;
use crate::grid::{cell_count, Grid};
use crate::types::{ExtentPolicy, SampleMode};

/// Walks several grids at a shared resolution.
///
/// ```
/// use raster_grid::{CellIterator, Extent, ExtentPolicy, Grid};
///
/// let a = Grid::filled(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 10.0, -1.0, 1.0)?;
/// let b = Grid::filled(Extent::new(10.0, 0.0, 30.0, 20.0), 10.0, 10.0, -1.0, 2.0)?;
///
/// let mut cells = CellIterator::new(ExtentPolicy::Minimum);
/// cells.add_grid(Some(&a));
/// cells.add_grid(Some(&b));
///
/// let mut more = cells.reset()?;
/// while more {
///     assert_eq!(cells.get_cell_value(&a), Some(1.0));
///     assert_eq!(cells.get_cell_value(&b), Some(2.0));
///     more = cells.move_next()?;
/// }
/// # Ok::<(), raster_grid::RasterError>(())
/// ```
#[derive(Debug)]
pub struct CellIterator<'a> {
    policy: ExtentPolicy,
    mode: SampleMode,
    clip: Option<Extent>,
    step_override: Option<(f64, f64)>,
    grids: Vec<&'a Grid>,
    extent: Option<Extent>,
    step: (f64, f64),
    columns: usize,
    rows: usize,
    column: usize,
    row: usize,
    started: bool,
    samples: Vec<Option<f32>>,
}

impl<'a> CellIterator<'a> {
    pub fn new(policy: ExtentPolicy) -> Self {
        Self {
            policy,
            mode: SampleMode::default(),
            clip: None,
            step_override: None,
            grids: Vec::new(),
            extent: None,
            step: (0.0, 0.0),
            columns: 0,
            rows: 0,
            column: 0,
            row: 0,
            started: false,
            samples: Vec::new(),
        }
    }

    /// Choose how NoData cells are reported.
    pub fn with_mode(mut self, mode: SampleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Clip the reconciled extent further.
    pub fn with_clip(mut self, clip: Extent) -> Self {
        self.clip = Some(clip);
        self.reconcile();
        self
    }

    /// Walk at a fixed step instead of the finest participant cell size.
    pub fn with_step(mut self, step_x: f64, step_y: f64) -> Self {
        self.step_override = Some((step_x, step_y));
        self.reconcile();
        self
    }

    /// Add a participant. `None` is ignored.
    pub fn add_grid(&mut self, grid: Option<&'a Grid>) {
        if let Some(grid) = grid {
            self.grids.push(grid);
            self.samples.push(None);
            self.reconcile();
        }
    }

    /// Number of participants.
    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }

    /// Reconciled extent, `None` when it is empty.
    pub fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Step in x and y.
    pub fn step_size(&self) -> (f64, f64) {
        self.step
    }

    fn reconcile(&mut self) {
        let dense: Vec<&Grid> = self.grids.iter().copied().filter(|g| !g.is_constant()).collect();
        let participants = if dense.is_empty() {
            self.grids.clone()
        } else {
            dense
        };

        self.extent = None;
        self.columns = 0;
        self.rows = 0;
        let Some(first) = participants.first() else {
            return;
        };

        self.step = self.step_override.unwrap_or_else(|| {
            participants.iter().fold(
                (f64::INFINITY, f64::INFINITY),
                |(x, y), g| (x.min(g.cell_size_x()), y.min(g.cell_size_y())),
            )
        });

        let reconciled = match self.policy {
            ExtentPolicy::First => Some(first.extent()),
            ExtentPolicy::Maximum => Some(
                participants
                    .iter()
                    .skip(1)
                    .fold(first.extent(), |acc, g| acc.union(&g.extent())),
            ),
            ExtentPolicy::Minimum => participants
                .iter()
                .skip(1)
                .try_fold(first.extent(), |acc, g| acc.intersection(&g.extent())),
        };
        let reconciled = match (reconciled, self.clip) {
            (Some(extent), Some(clip)) => extent.intersection(&clip),
            (extent, _) => extent,
        };
        let Some(extent) = reconciled else {
            return;
        };

        // Normalize to whole steps, anchored at the lower-left corner where
        // the walk starts.
        let (step_x, step_y) = self.step;
        self.columns = cell_count(extent.width(), step_x);
        self.rows = cell_count(extent.height(), step_y);
        self.extent = Some(Extent {
            left: extent.left,
            bottom: extent.bottom,
            right: extent.left + self.columns as f64 * step_x,
            top: extent.bottom + self.rows as f64 * step_y,
        });
    }

    /// Move to the center of the lower-left cell.
    ///
    /// Returns false when there is nothing to walk.
    pub fn reset(&mut self) -> Result<bool> {
        self.started = true;
        self.column = 0;
        self.row = 0;
        if self.extent.is_none() || self.columns == 0 || self.rows == 0 {
            return Ok(false);
        }
        self.sample()?;
        Ok(true)
    }

    /// Advance one step in x, wrapping to the next row up at the right edge.
    ///
    /// Returns false once the position leaves the reconciled extent.
    pub fn move_next(&mut self) -> Result<bool> {
        if !self.started {
            return self.reset();
        }
        if self.row >= self.rows {
            return Ok(false);
        }

        self.column += 1;
        if self.column >= self.columns {
            self.column = 0;
            self.row += 1;
        }
        if self.row >= self.rows {
            self.samples.iter_mut().for_each(|s| *s = None);
            return Ok(false);
        }
        self.sample()?;
        Ok(true)
    }

    /// Current position.
    pub fn position(&self) -> (f64, f64) {
        match self.extent {
            Some(extent) => (
                extent.left + (self.column as f64 + 0.5) * self.step.0,
                extent.bottom + (self.row as f64 + 0.5) * self.step.1,
            ),
            None => (f64::NAN, f64::NAN),
        }
    }

    /// Half-open bounds check of the current position.
    pub fn is_inside_extent(&self) -> bool {
        let (x, y) = self.position();
        self.extent.map_or(false, |e| e.contains_point(x, y))
    }

    /// Value sampled for `grid` at the current position.
    ///
    /// Participants are matched by identity, or by backing file. Grids that
    /// were never added report `None`.
    pub fn get_cell_value(&self, grid: &Grid) -> Option<f32> {
        let index = self.grids.iter().position(|g| {
            ptr::eq(*g, grid)
                || matches!((g.source_path(), grid.source_path()), (Some(a), Some(b)) if a == b)
        })?;
        self.samples[index]
    }

    /// Value sampled for the participant added `index`-th.
    pub fn value_at(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied().flatten()
    }

    fn sample(&mut self) -> Result<()> {
        let (x, y) = self.position();
        for (grid, sample) in self.grids.iter().zip(self.samples.iter_mut()) {
            *sample = match self.mode {
                SampleMode::Raw => grid.get_value(x, y)?,
                SampleMode::NoDataAsUndefined => grid.get_no_data_aware_value(x, y)?,
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(extent: Extent, cell_size: f64, value: f32) -> Grid {
        Grid::filled(extent, cell_size, cell_size, -9999.0, value).unwrap()
    }

    #[test]
    fn test_maximum_policy_reconciliation() {
        let a = grid(Extent::new(0.0, 0.0, 100.0, 100.0), 10.0, 1.0);
        let b = grid(Extent::new(50.0, 50.0, 150.0, 150.0), 20.0, 2.0);

        let mut cells = CellIterator::new(ExtentPolicy::Maximum);
        cells.add_grid(Some(&a));
        cells.add_grid(Some(&b));

        assert_eq!(cells.extent(), Some(Extent::new(0.0, 0.0, 150.0, 150.0)));
        assert_eq!(cells.step_size(), (10.0, 10.0));
    }

    #[test]
    fn test_minimum_policy_without_overlap() {
        let a = grid(Extent::new(0.0, 0.0, 10.0, 10.0), 10.0, 1.0);
        let b = grid(Extent::new(20.0, 20.0, 30.0, 30.0), 10.0, 1.0);

        let mut cells = CellIterator::new(ExtentPolicy::Minimum);
        cells.add_grid(Some(&a));
        cells.add_grid(Some(&b));
        assert_eq!(cells.extent(), None);
        assert!(!cells.reset().unwrap());
    }

    #[test]
    fn test_first_policy_and_clip() {
        let a = grid(Extent::new(0.0, 0.0, 40.0, 40.0), 10.0, 1.0);
        let b = grid(Extent::new(-100.0, -100.0, 100.0, 100.0), 5.0, 2.0);

        let mut cells = CellIterator::new(ExtentPolicy::First).with_clip(Extent::new(0.0, 0.0, 20.0, 40.0));
        cells.add_grid(Some(&a));
        cells.add_grid(Some(&b));
        assert_eq!(cells.extent(), Some(Extent::new(0.0, 0.0, 20.0, 40.0)));
        assert_eq!(cells.step_size(), (5.0, 5.0));
    }

    #[test]
    fn test_walk_order_and_count() {
        let a = grid(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 1.0);
        let mut cells = CellIterator::new(ExtentPolicy::First);
        cells.add_grid(Some(&a));

        let mut positions = Vec::new();
        let mut more = cells.reset().unwrap();
        while more {
            assert!(cells.is_inside_extent());
            positions.push(cells.position());
            more = cells.move_next().unwrap();
        }
        assert_eq!(
            positions,
            vec![(5.0, 5.0), (15.0, 5.0), (5.0, 15.0), (15.0, 15.0)]
        );
        assert!(!cells.is_inside_extent());
        assert!(!cells.move_next().unwrap());
    }

    #[test]
    fn test_uneven_union_is_anchored_at_lower_left() {
        // rows [1, 1] over [3, 3]
        let a = Grid::from_values(
            Extent::new(0.0, 0.0, 20.0, 20.0),
            10.0,
            10.0,
            -9999.0,
            vec![1.0, 1.0, 3.0, 3.0],
        )
        .unwrap();
        let b = grid(Extent::new(0.0, 5.0, 20.0, 25.0), 10.0, 0.0);

        let mut cells = CellIterator::new(ExtentPolicy::Maximum);
        cells.add_grid(Some(&a));
        cells.add_grid(Some(&b));
        assert_eq!(cells.extent(), Some(Extent::new(0.0, 0.0, 20.0, 30.0)));

        assert!(cells.reset().unwrap());
        assert_eq!(cells.position(), (5.0, 5.0));
        assert_eq!((cells.value_at(0), cells.value_at(1)), (Some(3.0), None));

        // second row up
        cells.move_next().unwrap();
        assert!(cells.move_next().unwrap());
        assert_eq!(cells.position(), (5.0, 15.0));
        assert_eq!((cells.value_at(0), cells.value_at(1)), (Some(1.0), Some(0.0)));
    }

    #[test]
    fn test_union_samples_outside_as_none() {
        let a = grid(Extent::new(0.0, 0.0, 10.0, 10.0), 10.0, 1.0);
        let b = grid(Extent::new(10.0, 0.0, 20.0, 10.0), 10.0, 2.0);

        let mut cells = CellIterator::new(ExtentPolicy::Maximum);
        cells.add_grid(Some(&a));
        cells.add_grid(Some(&b));

        assert!(cells.reset().unwrap());
        assert_eq!((cells.value_at(0), cells.value_at(1)), (Some(1.0), None));
        assert!(cells.move_next().unwrap());
        assert_eq!((cells.value_at(0), cells.value_at(1)), (None, Some(2.0)));
        assert!(!cells.move_next().unwrap());
    }

    #[test]
    fn test_sample_modes() {
        let mut a = grid(Extent::new(0.0, 0.0, 10.0, 10.0), 10.0, 1.0);
        a.set_all_values(-9999.0).unwrap();

        let mut raw = CellIterator::new(ExtentPolicy::First);
        raw.add_grid(Some(&a));
        raw.reset().unwrap();
        assert_eq!(raw.get_cell_value(&a), Some(-9999.0));

        let mut aware = CellIterator::new(ExtentPolicy::First).with_mode(SampleMode::NoDataAsUndefined);
        aware.add_grid(Some(&a));
        aware.reset().unwrap();
        assert_eq!(aware.get_cell_value(&a), None);
    }

    #[test]
    fn test_constants_do_not_widen_extent() {
        let a = grid(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 1.0);
        let c = Grid::constant(5.0);

        let mut cells = CellIterator::new(ExtentPolicy::Maximum);
        cells.add_grid(Some(&c));
        cells.add_grid(None);
        cells.add_grid(Some(&a));
        assert_eq!(cells.grid_count(), 2);
        assert_eq!(cells.extent(), Some(a.extent()));
        assert_eq!(cells.step_size(), (10.0, 10.0));

        cells.reset().unwrap();
        assert_eq!(cells.get_cell_value(&c), Some(5.0));
    }

    #[test]
    fn test_unknown_grid_is_undefined() {
        let a = grid(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 1.0);
        let other = grid(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 1.0);
        let mut cells = CellIterator::new(ExtentPolicy::First);
        cells.add_grid(Some(&a));
        cells.reset().unwrap();
        assert_eq!(cells.get_cell_value(&other), None);
    }
}
