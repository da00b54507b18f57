//! Value replacement.

use raster_common::ValueRange;

use crate::error::Result;
use crate::grid::Grid;
use crate::iterator::CellIterator;
use crate::types::{ExtentPolicy, SampleMode};

/// Equality that also matches two NaNs.
fn same_value(a: f32, b: f32) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl Grid {
    /// Replace every cell equal to `old` with `new`. Both may be NoData.
    pub fn replace_value(&self, old: f32, new: f32) -> Result<Grid> {
        self.replace_matching(|v| same_value(v, old), new)
    }

    /// Replace every cell inside `range` with `new`.
    pub fn replace_range(&self, range: &ValueRange, new: f32) -> Result<Grid> {
        self.replace_matching(|v| range.contains(v), new)
    }

    fn replace_matching<F>(&self, matches: F, new: f32) -> Result<Grid>
    where
        F: Fn(f32) -> bool,
    {
        if let Some(value) = self.constant_value() {
            let value = if matches(value) { new } else { value };
            let mut result = self.with_constant(value);
            result.calculation_value = self.calculation_value;
            return Ok(result);
        }

        let mut result = self.clone();
        for value in result.values_mut()? {
            if matches(*value) {
                *value = new;
            }
        }
        result.recompute_min_max()?;
        Ok(result)
    }

    /// Replace every cell equal to `old` with the value of `source` at the
    /// cell's center. Where `source` is undefined the cell becomes NoData.
    pub fn replace_with_grid(&self, old: f32, source: &Grid) -> Result<Grid> {
        self.replace_at_positions(source, |own, other| {
            same_value(own, old).then_some(other)
        })
    }

    /// Set cells to `new` where `selector` equals `selector_value`.
    ///
    /// Cells where the selector is undefined are left alone.
    pub fn replace_where(&self, selector: &Grid, selector_value: f32, new: f32) -> Result<Grid> {
        self.replace_at_positions(selector, |_, selected| {
            matches!(selected, Some(v) if same_value(v, selector_value)).then_some(Some(new))
        })
    }

    /// Walk this grid's cells alongside `other`.
    ///
    /// `decide` gets the receiver's raw value and the other grid's value, with
    /// NoData collapsed to `None`. It returns `None` to keep the cell, or the
    /// replacement (`Some(None)` meaning NoData).
    fn replace_at_positions<F>(&self, other: &Grid, decide: F) -> Result<Grid>
    where
        F: Fn(f32, Option<f32>) -> Option<Option<f32>>,
    {
        let receiver = self.allocate_like(other);
        let mut result = receiver.as_ref().clone();
        if result.is_constant() {
            // both operands are constants
            let own = result.constant_value().unwrap_or(result.no_data);
            let other_value = other.constant_value().filter(|v| !other.is_no_data(*v));
            if let Some(replacement) = decide(own, other_value) {
                result = result.with_constant(replacement.unwrap_or(result.no_data));
            }
            return Ok(result);
        }

        let no_data = result.no_data;
        let mut updates = Vec::new();
        {
            let mut cells = CellIterator::new(ExtentPolicy::First)
                .with_mode(SampleMode::NoDataAsUndefined)
                .with_step(result.cell_size_x, result.cell_size_y);
            cells.add_grid(Some(receiver.as_ref()));
            cells.add_grid(Some(other));

            let mut more = cells.reset()?;
            while more {
                let (x, y) = cells.position();
                if let (Some(index), Some(own)) = (result.index_at(x, y), receiver.get_value(x, y)?) {
                    if let Some(replacement) = decide(own, cells.value_at(1)) {
                        updates.push((index, replacement.unwrap_or(no_data)));
                    }
                }
                more = cells.move_next()?;
            }
        }

        let values = result.values_mut()?;
        for (index, value) in updates {
            values[index] = value;
        }
        result.recompute_min_max()?;
        Ok(result)
    }
}
