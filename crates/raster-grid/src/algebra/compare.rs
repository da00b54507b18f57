//! Comparison operators producing 1/0 grids.
//!
//! NoData cells compare with their literal value unless a calculation value
//! is set. The result carries the left operand's NoData, or the dense
//! operand's when the left one is constant.

use raster_common::ValueRange;

use super::{combine, map_cells, truth, NoDataPolicy};
use crate::error::Result;
use crate::grid::Grid;

fn compare<F>(left: &Grid, right: &Grid, test: F) -> Result<Grid>
where
    F: Fn(f32, f32) -> bool,
{
    combine(left, right, NoDataPolicy::Raw, |a, b| Some(truth(test(a, b))))
}

impl Grid {
    pub fn equals(&self, other: &Grid) -> Result<Grid> {
        compare(self, other, |a, b| a == b)
    }

    pub fn not_equals(&self, other: &Grid) -> Result<Grid> {
        compare(self, other, |a, b| a != b)
    }

    pub fn is_greater(&self, other: &Grid) -> Result<Grid> {
        compare(self, other, |a, b| a > b)
    }

    pub fn is_greater_or_equal(&self, other: &Grid) -> Result<Grid> {
        compare(self, other, |a, b| a >= b)
    }

    pub fn is_lesser(&self, other: &Grid) -> Result<Grid> {
        compare(self, other, |a, b| a < b)
    }

    pub fn is_lesser_or_equal(&self, other: &Grid) -> Result<Grid> {
        compare(self, other, |a, b| a <= b)
    }

    pub fn equals_scalar(&self, value: f32) -> Result<Grid> {
        self.equals(&Grid::scalar(value))
    }

    pub fn not_equals_scalar(&self, value: f32) -> Result<Grid> {
        self.not_equals(&Grid::scalar(value))
    }

    pub fn is_greater_scalar(&self, value: f32) -> Result<Grid> {
        self.is_greater(&Grid::scalar(value))
    }

    pub fn is_greater_or_equal_scalar(&self, value: f32) -> Result<Grid> {
        self.is_greater_or_equal(&Grid::scalar(value))
    }

    pub fn is_lesser_scalar(&self, value: f32) -> Result<Grid> {
        self.is_lesser(&Grid::scalar(value))
    }

    pub fn is_lesser_or_equal_scalar(&self, value: f32) -> Result<Grid> {
        self.is_lesser_or_equal(&Grid::scalar(value))
    }

    /// 1 where the cell lies in `range`, 0 elsewhere.
    pub fn in_range(&self, range: &ValueRange) -> Result<Grid> {
        map_cells(self, NoDataPolicy::Raw, |v| Some(truth(range.contains(v))))
    }
}
