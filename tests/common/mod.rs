//! Shared fixtures for integration tests

#![allow(dead_code)]

use pandrs_aggstats::{Column, DataFrame};

/// `g = [A, A, B]`, `x = [1, 2, 5]`
pub fn simple_frame() -> DataFrame {
    let mut df = DataFrame::new();
    df.add_column("g", Column::from(vec!["A", "A", "B"])).unwrap();
    df.add_column("x", Column::from(vec![1.0, 2.0, 5.0])).unwrap();
    df
}

/// Two key columns, an integer value column and a float column with gaps
///
/// Groups by (site, year): (east, 2021), (north, 2020), (north, 2021),
/// (south, 2020).
pub fn measurements() -> DataFrame {
    let mut df = DataFrame::new();
    df.add_column(
        "site",
        Column::from(vec!["north", "south", "north", "south", "north", "south", "east"]),
    )
    .unwrap();
    df.add_column("year", Column::from(vec![2020i64, 2020, 2021, 2020, 2020, 2020, 2021]))
        .unwrap();
    df.add_column("count", Column::from(vec![3i64, 4, 5, 6, 7, 8, 9]))
        .unwrap();
    df.add_column(
        "temp",
        Column::from(vec![
            Some(10.0),
            None,
            Some(12.0),
            Some(20.0),
            Some(14.0),
            Some(f64::NAN),
            None,
        ]),
    )
    .unwrap();
    df
}

/// Assert two float slices are equal, treating NaN as equal to NaN
pub fn assert_floats_eq(actual: &[f64], expected: &[f64]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: {:?} vs {:?}",
        actual,
        expected
    );
    for (a, e) in actual.iter().zip(expected) {
        if e.is_nan() {
            assert!(a.is_nan(), "expected NaN, got {} in {:?}", a, actual);
        } else {
            approx::assert_abs_diff_eq!(*a, *e, epsilon = 1e-4);
        }
    }
}
