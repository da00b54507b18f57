//! Arithmetic operators.

use super::{combine, map_cells, NoDataPolicy};
use crate::error::Result;
use crate::grid::Grid;

impl Grid {
    pub fn add(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Propagate, |a, b| Some(a + b))
    }

    pub fn subtract(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Propagate, |a, b| Some(a - b))
    }

    pub fn multiply(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Propagate, |a, b| Some(a * b))
    }

    /// Division; a zero divisor yields NoData.
    pub fn divide(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Propagate, |a, b| {
            (b != 0.0).then(|| a / b)
        })
    }

    /// `self` raised to the power of `other`.
    pub fn power(&self, other: &Grid) -> Result<Grid> {
        combine(self, other, NoDataPolicy::Propagate, |a, b| Some(a.powf(b)))
    }

    pub fn add_scalar(&self, value: f32) -> Result<Grid> {
        self.add(&Grid::scalar(value))
    }

    pub fn subtract_scalar(&self, value: f32) -> Result<Grid> {
        self.subtract(&Grid::scalar(value))
    }

    /// `value - self`.
    pub fn subtract_from(&self, value: f32) -> Result<Grid> {
        self.transform(Some(-1.0), Some(value))
    }

    pub fn multiply_scalar(&self, value: f32) -> Result<Grid> {
        self.multiply(&Grid::scalar(value))
    }

    pub fn divide_scalar(&self, value: f32) -> Result<Grid> {
        self.divide(&Grid::scalar(value))
    }

    pub fn power_scalar(&self, value: f32) -> Result<Grid> {
        self.power(&Grid::scalar(value))
    }

    /// `a * value + b` for every cell.
    ///
    /// An undefined coefficient poisons the result: every cell and both
    /// min and max become NoData.
    pub fn transform(&self, a: Option<f32>, b: Option<f32>) -> Result<Grid> {
        let (Some(a), Some(b)) = (a, b) else {
            let no_data = self.no_data();
            return Ok(match self.constant_value() {
                Some(_) => self.with_constant(no_data),
                None => self.like(no_data),
            });
        };
        map_cells(self, NoDataPolicy::Propagate, |v| Some(a * v + b))
    }
}

#[cfg(test)]
mod tests {
    use raster_common::Extent;

    use super::*;

    fn grid(values: Vec<f32>) -> Grid {
        Grid::from_values(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 10.0, -9999.0, values).unwrap()
    }

    #[test]
    fn test_no_data_propagates() {
        let a = grid(vec![1.0, 2.0, 3.0, -9999.0]);
        let b = grid(vec![5.0, 5.0, 5.0, 5.0]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.values().unwrap(), &[6.0, 7.0, 8.0, -9999.0]);
        assert_eq!((sum.min(), sum.max()), (6.0, 8.0));
    }

    #[test]
    fn test_calculation_value_substitutes() {
        let mut a = grid(vec![1.0, 2.0, 3.0, -9999.0]);
        a.set_calculation_value(Some(0.0));
        let b = grid(vec![5.0, 5.0, 5.0, 5.0]);
        assert_eq!(a.add(&b).unwrap().get_cell(1, 1).unwrap(), Some(5.0));
    }

    #[test]
    fn test_divide_by_zero_is_no_data() {
        let a = grid(vec![1.0, 2.0, 3.0, 4.0]);
        let b = grid(vec![1.0, 0.0, 2.0, 4.0]);
        let quotient = a.divide(&b).unwrap();
        assert_eq!(quotient.values().unwrap(), &[1.0, -9999.0, 1.5, 1.0]);
    }

    #[test]
    fn test_constant_closure() {
        let three = Grid::constant(3.0);
        let four = Grid::constant(4.0);
        let seven = three.add(&four).unwrap();
        assert_eq!(seven.constant_value(), Some(7.0));
        assert!(!three.has_value_matrix());
        assert!(!four.has_value_matrix());
        assert!(!seven.has_value_matrix());
    }

    #[test]
    fn test_operand_order_with_constants() {
        let a = grid(vec![1.0, 2.0, 4.0, -9999.0]);
        let ten = Grid::constant(10.0);
        let left = ten.subtract(&a).unwrap();
        assert_eq!(left.values().unwrap(), &[9.0, 8.0, 6.0, -9999.0]);
        let right = a.divide(&Grid::constant(2.0)).unwrap();
        assert_eq!(right.values().unwrap(), &[0.5, 1.0, 2.0, -9999.0]);
    }

    #[test]
    fn test_scalar_forms() {
        let a = grid(vec![1.0, 2.0, 3.0, -9999.0]);
        assert_eq!(a.multiply_scalar(2.0).unwrap().values().unwrap(), &[2.0, 4.0, 6.0, -9999.0]);
        assert_eq!(a.subtract_from(10.0).unwrap().values().unwrap(), &[9.0, 8.0, 7.0, -9999.0]);
        assert_eq!(a.power_scalar(2.0).unwrap().values().unwrap(), &[1.0, 4.0, 9.0, -9999.0]);
        // NaN scalar is undefined
        assert_eq!(a.add_scalar(f32::NAN).unwrap().valid_count().unwrap(), 0);
    }

    #[test]
    fn test_transform_poisoned() {
        let a = grid(vec![1.0, 2.0, 3.0, 4.0]);
        let poisoned = a.transform(None, Some(1.0)).unwrap();
        assert_eq!(poisoned.valid_count().unwrap(), 0);
        assert_eq!((poisoned.min(), poisoned.max()), (-9999.0, -9999.0));

        let scaled = a.transform(Some(2.0), Some(1.0)).unwrap();
        assert_eq!(scaled.values().unwrap(), &[3.0, 5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_non_finite_power_is_no_data() {
        let a = grid(vec![-8.0, 4.0, 1.0, 0.0]);
        let root = a.power_scalar(0.5).unwrap();
        assert_eq!(root.get_cell(0, 0).unwrap(), Some(-9999.0));
        assert_eq!(root.get_cell(0, 1).unwrap(), Some(2.0));
    }

    #[test]
    fn test_mismatched_extents_use_union() {
        let a = Grid::filled(Extent::new(0.0, 0.0, 20.0, 10.0), 10.0, 10.0, -1.0, 1.0).unwrap();
        let b = Grid::filled(Extent::new(10.0, 0.0, 30.0, 10.0), 5.0, 5.0, -2.0, 2.0).unwrap();
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.extent(), Extent::new(0.0, 0.0, 30.0, 10.0));
        assert_eq!(sum.cell_size_x(), 5.0);
        assert_eq!(sum.no_data(), -1.0);
        // only where both are defined
        assert_eq!(sum.get_value(12.5, 2.5).unwrap(), Some(3.0));
        assert_eq!(sum.get_value(2.5, 2.5).unwrap(), Some(-1.0));
        assert_eq!(sum.get_value(27.5, 7.5).unwrap(), Some(-1.0));
        assert_eq!(sum.valid_count().unwrap(), 4);
    }
}
