//! End-to-end algebra scenarios across dense and constant grids.

use raster_grid::{Extent, Grid, ValueRange};
use test_utils::{assert_approx_eq, create_grid_with_no_data, init_test_logging};

fn a() -> Grid {
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
fn test_is_greater_scenario() {
    init_test_logging();
    let result = a().is_greater_scalar(2.0).unwrap();
    assert_eq!(result.values().unwrap(), &[0.0, 0.0, 1.0, 0.0]);
    assert!(result.same_geometry(&a()));
}

#[test]
fn test_no_data_propagates_through_addition() {
    let b = Grid::filled(Extent::new(0.0, 0.0, 20.0, 20.0), 10.0, 10.0, -1.0, 5.0).unwrap();
    let sum = a().add(&b).unwrap();
    assert_eq!(sum.values().unwrap(), &[6.0, 7.0, 8.0, -9999.0]);
    assert_eq!(sum.no_data(), -9999.0);
    assert_eq!((sum.min(), sum.max()), (6.0, 8.0));
}

#[test]
fn test_division_by_zero_is_no_data() {
    let b = Grid::from_values(
        Extent::new(0.0, 0.0, 20.0, 20.0),
        10.0,
        10.0,
        -9999.0,
        vec![0.0, 4.0, 1.0, 1.0],
    )
    .unwrap();
    let quotient = a().divide(&b).unwrap();
    assert_eq!(quotient.values().unwrap(), &[-9999.0, 0.5, 3.0, -9999.0]);
    assert!(quotient.values().unwrap().iter().all(|v| v.is_finite()));
}

#[test]
fn test_constant_closure() {
    let three = Grid::constant(3.0);
    let four = Grid::constant(4.0);
    let seven = three.add(&four).unwrap();

    assert_eq!(seven.constant_value(), Some(7.0));
    assert!(!seven.has_value_matrix());
    assert!(!three.has_value_matrix());
    assert!(!four.has_value_matrix());
}

#[test]
fn test_clip_idempotence() {
    let grid = a();
    let all = grid.clip(&Extent::new(-5.0, -5.0, 25.0, 25.0)).unwrap().unwrap();
    assert!(std::ptr::eq(all.as_ref(), &grid));

    let extent = Extent::new(0.0, 0.0, 10.0, 20.0);
    let once = grid.clip(&extent).unwrap().unwrap().into_owned();
    let twice = once.clip(&extent).unwrap().unwrap().into_owned();
    assert_eq!(once.extent(), twice.extent());
    assert_eq!(once.values().unwrap(), twice.values().unwrap());
    assert_eq!(once.values().unwrap(), &[1.0, 3.0]);
}

#[test]
fn test_expression_chain() {
    // (a * 2 + 1) where a in [1, 3), else 0
    let grid = Grid::from_values(
        Extent::new(0.0, 0.0, 30.0, 20.0),
        10.0,
        10.0,
        -9999.0,
        create_grid_with_no_data(3, 2, -9999.0, 4),
    )
    .unwrap();
    // [-9999, 2, 3, 4, -9999, 6]
    let scaled = grid.transform(Some(2.0), Some(1.0)).unwrap();
    let mask = grid.in_range(&ValueRange::new(1.0, 3.0, true, false)).unwrap();
    let result = mask.if_then_else(&scaled, &Grid::constant(0.0)).unwrap();
    assert_eq!(result.values().unwrap(), &[0.0, 5.0, 0.0, 0.0, 0.0, 0.0]);
}

#[test]
fn test_mixed_resolution_subtraction() {
    let coarse = Grid::filled(Extent::new(0.0, 0.0, 20.0, 20.0), 20.0, 20.0, -9999.0, 10.0).unwrap();
    let fine = Grid::from_values(
        Extent::new(0.0, 0.0, 20.0, 20.0),
        10.0,
        10.0,
        -9999.0,
        vec![1.0, 2.0, 3.0, 4.0],
    )
    .unwrap();
    let diff = coarse.subtract(&fine).unwrap();
    assert_eq!((diff.columns(), diff.rows()), (2, 2));
    assert_eq!(diff.values().unwrap(), &[9.0, 8.0, 7.0, 6.0]);
    assert_approx_eq!(diff.sum().unwrap(), 30.0, 1e-9);
}

#[test]
fn test_calculation_value_fills_no_data() {
    let mut grid = a();
    grid.set_calculation_value(Some(0.0));
    let sum = grid.add_scalar(1.0).unwrap();
    assert_eq!(sum.values().unwrap(), &[2.0, 3.0, 4.0, 1.0]);
}

#[test]
fn test_addition_over_vertically_offset_grids() {
    // rows [1, 1] over [3, 3]
    let lower = Grid::from_values(
        Extent::new(0.0, 0.0, 20.0, 20.0),
        10.0,
        10.0,
        -9999.0,
        vec![1.0, 1.0, 3.0, 3.0],
    )
    .unwrap();
    let upper = Grid::filled(Extent::new(0.0, 5.0, 20.0, 25.0), 10.0, 10.0, -9999.0, 0.0).unwrap();

    let sum = lower.add(&upper).unwrap();
    assert_eq!(sum.extent(), Extent::new(0.0, 0.0, 20.0, 30.0));
    assert_eq!(sum.rows(), 3);
    assert_eq!(
        sum.values().unwrap(),
        &[-9999.0, -9999.0, 1.0, 1.0, -9999.0, -9999.0]
    );
}
