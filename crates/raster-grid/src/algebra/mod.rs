//! NoData-aware grid algebra.
//!
//! Every binary operator funnels through [`combine`], which matches on the
//! pair of storage kinds once:
//!
//! - constant with constant: resolved to a new constant, no iteration
//! - constant with dense: rewritten as a per-cell map over the dense grid
//! - dense with dense, same geometry: index-wise pass
//! - dense with dense, otherwise: a [`CellIterator`] walk over the union
//!
//! Per operand, a NoData cell takes the operand's calculation value when
//! one is set. What happens otherwise depends on the [`NoDataPolicy`].
//! Results that are undefined or not finite become the result's NoData.

mod arithmetic;
mod compare;
mod logic;
mod replace;

use crate::error::Result;
use crate::grid::Grid;
use crate::iterator::CellIterator;
use crate::types::ExtentPolicy;

/// Treatment of NoData operand cells without a calculation value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoDataPolicy {
    /// The operand is undefined and so is the result.
    Propagate,
    /// The literal NoData value takes part in the operation.
    Raw,
}

/// Operand value of a sampled cell under `policy`.
pub(crate) fn operand(grid: &Grid, raw: Option<f32>, policy: NoDataPolicy) -> Option<f32> {
    let raw = raw?;
    if !grid.is_no_data(raw) {
        return Some(raw);
    }
    match (grid.calculation_value(), policy) {
        (Some(value), _) => Some(value),
        (None, NoDataPolicy::Raw) => Some(raw),
        (None, NoDataPolicy::Propagate) => None,
    }
}

fn finite(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite())
}

fn apply<F>(op: &F, a: Option<f32>, b: Option<f32>) -> Option<f32>
where
    F: Fn(f32, f32) -> Option<f32>,
{
    match (a, b) {
        (Some(a), Some(b)) => finite(op(a, b)),
        _ => None,
    }
}

/// Apply `op` cell by cell to `left` and `right`.
pub(crate) fn combine<F>(left: &Grid, right: &Grid, policy: NoDataPolicy, op: F) -> Result<Grid>
where
    F: Fn(f32, f32) -> Option<f32>,
{
    match (left.constant_value(), right.constant_value()) {
        (Some(a), Some(b)) => {
            let value = apply(&op, operand(left, Some(a), policy), operand(right, Some(b), policy));
            Ok(left.with_constant(value.unwrap_or(left.no_data())))
        }
        (Some(a), None) => {
            let a = operand(left, Some(a), policy);
            map_cells(right, policy, |b| apply(&op, a, Some(b)))
        }
        (None, Some(b)) => {
            let b = operand(right, Some(b), policy);
            map_cells(left, policy, |a| apply(&op, Some(a), b))
        }
        (None, None) => zip_cells(&[left, right], policy, |v| apply(&op, v[0], v[1])),
    }
}

/// Apply `f` to every operand value of `grid`.
///
/// Undefined operands skip `f` and yield NoData, as do non-finite results.
pub(crate) fn map_cells<F>(grid: &Grid, policy: NoDataPolicy, f: F) -> Result<Grid>
where
    F: Fn(f32) -> Option<f32>,
{
    let no_data = grid.no_data();
    let eval = |raw: f32| {
        finite(operand(grid, Some(raw), policy).and_then(&f)).unwrap_or(no_data)
    };

    if let Some(value) = grid.constant_value() {
        return Ok(grid.with_constant(eval(value)));
    }

    let values = grid.values()?.iter().map(|raw| eval(*raw)).collect();
    let mut result = grid.with_values(values);
    result.recompute_min_max()?;
    Ok(result)
}

/// Combine dense grids cell by cell.
///
/// `f` receives one operand per grid, `None` where a grid is undefined.
/// Grids sharing the first grid's geometry are paired by index; otherwise
/// the union of all extents is walked with a [`CellIterator`] and results
/// are written by coordinate. The result takes the first grid's NoData.
pub(crate) fn zip_cells<F>(grids: &[&Grid], policy: NoDataPolicy, f: F) -> Result<Grid>
where
    F: Fn(&[Option<f32>]) -> Option<f32>,
{
    let Some(first) = grids.first() else {
        return Ok(Grid::empty());
    };
    let no_data = first.no_data();
    let mut operands = vec![None; grids.len()];

    if grids.iter().all(|g| g.same_geometry(first)) {
        let columns: Vec<&[f32]> = grids.iter().map(|g| g.values()).collect::<Result<_>>()?;
        let values = (0..first.len())
            .map(|i| {
                for (slot, (grid, values)) in operands.iter_mut().zip(grids.iter().zip(&columns)) {
                    *slot = operand(grid, Some(values[i]), policy);
                }
                finite(f(&operands)).unwrap_or(no_data)
            })
            .collect();
        let mut result = first.with_values(values);
        result.recompute_min_max()?;
        return Ok(result);
    }

    let mut cells = CellIterator::new(ExtentPolicy::Maximum);
    for grid in grids {
        cells.add_grid(Some(*grid));
    }
    let Some(extent) = cells.extent() else {
        return Ok(Grid::empty());
    };
    let (step_x, step_y) = cells.step_size();

    let mut result = Grid::new(extent, step_x, step_y, no_data)?;
    result.interval = first.vertical_interval();
    let mut values = vec![no_data; result.len()];

    let mut more = cells.reset()?;
    while more {
        let (x, y) = cells.position();
        if let Some(index) = result.index_at(x, y) {
            for (i, (slot, grid)) in operands.iter_mut().zip(grids).enumerate() {
                *slot = operand(grid, cells.value_at(i), policy);
            }
            if let Some(value) = finite(f(&operands)) {
                values[index] = value;
            }
        }
        more = cells.move_next()?;
    }

    result.set_values(values);
    result.recompute_min_max()?;
    Ok(result)
}

/// 1.0 for true, 0.0 for false.
pub(crate) fn truth(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}
