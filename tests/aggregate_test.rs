mod common;

use std::collections::HashSet;

use common::{assert_floats_eq, measurements, simple_frame};
use pandrs_aggstats::{
    aggregate, AggregateOptions, Collapse, Column, ColumnLabel, ColumnType, DataFrame, Error,
    KeyValue,
};

fn key(s: &str) -> Vec<KeyValue> {
    vec![KeyValue::Str(s.to_string())]
}

#[test]
fn test_defaults_on_simple_frame() {
    let df = simple_frame();
    let result = aggregate(&df, &AggregateOptions::new(["g"])).unwrap();

    assert_eq!(result.n_rows(), 2);
    assert_eq!(result.index().keys(), &[key("A"), key("B")]);
    assert_eq!(result.column_names(), vec!["x", "x_SE", "size"]);
    assert_floats_eq(result.column("x").unwrap(), &[1.5, 5.0]);
    assert_floats_eq(result.column("size").unwrap(), &[2.0, 1.0]);
    assert!(result.column("x_std").is_none());
    assert!(result.column("x_count").is_none());
}

#[test]
fn test_standard_error_with_std_kept() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"])
        .confidence(Some(0.95))
        .drop_std(false);
    let result = aggregate(&df, &opts).unwrap();

    assert_eq!(result.column_names(), vec!["x", "x_std", "x_SE", "size"]);
    let std_a = 0.5f64.sqrt();
    assert_floats_eq(result.column("x_std").unwrap(), &[std_a, f64::NAN]);
    // t(0.975, df=1) = 12.7062
    assert_floats_eq(
        result.column("x_SE").unwrap(),
        &[std_a * 12.706_204_736, f64::NAN],
    );
}

#[test]
fn test_no_confidence_means_no_standard_error() {
    let df = measurements();
    let opts = AggregateOptions::new(["site", "year"])
        .confidence(None)
        .drop_std(false)
        .drop_count(false);
    let result = aggregate(&df, &opts).unwrap();

    assert!(result.column_names().iter().all(|n| !n.contains("SE")));
    assert_eq!(
        result.column_names(),
        vec!["count", "count_std", "count_count", "temp", "temp_std", "temp_count", "size"]
    );
}

#[test]
fn test_dropped_std_without_confidence_leaves_no_std() {
    let df = measurements();
    let opts = AggregateOptions::new(["site", "year"]).confidence(None);
    let result = aggregate(&df, &opts).unwrap();

    assert_eq!(result.column_names(), vec!["count", "temp", "size"]);
}

#[test]
fn test_group_count_matches_distinct_keys() {
    let df = measurements();
    let result = aggregate(&df, &AggregateOptions::new(["site", "year"])).unwrap();

    assert_eq!(result.n_rows(), 4);
    let distinct: HashSet<&Vec<KeyValue>> = result.index().keys().iter().collect();
    assert_eq!(distinct.len(), 4);
    assert_eq!(
        result.index().keys()[0],
        vec![KeyValue::Str("east".into()), KeyValue::Int(2021)]
    );
    assert_eq!(
        result.index().keys()[3],
        vec![KeyValue::Str("south".into()), KeyValue::Int(2020)]
    );
}

#[test]
fn test_missing_values_are_skipped() {
    let df = measurements();
    let opts = AggregateOptions::new(["site", "year"])
        .drop_std(false)
        .drop_count(false);
    let result = aggregate(&df, &opts).unwrap();

    // east has no temperature at all
    assert_floats_eq(result.column("temp").unwrap(), &[f64::NAN, 12.0, 12.0, 20.0]);
    assert_floats_eq(result.column("temp_count").unwrap(), &[0.0, 2.0, 1.0, 1.0]);
    assert_floats_eq(
        result.column("temp_std").unwrap(),
        &[f64::NAN, 8.0f64.sqrt(), f64::NAN, f64::NAN],
    );
    assert_floats_eq(
        result.column("temp_SE").unwrap(),
        &[f64::NAN, 8.0f64.sqrt() * 12.706_204_736, f64::NAN, f64::NAN],
    );

    assert_floats_eq(result.column("count").unwrap(), &[9.0, 5.0, 5.0, 6.0]);
    assert_floats_eq(
        result.column("count_SE").unwrap(),
        &[f64::NAN, 8.0f64.sqrt() * 12.706_204_736, f64::NAN, 2.0 * 4.302_652_73],
    );
}

#[test]
fn test_size_comes_from_first_value_column() {
    let df = measurements();

    let result = aggregate(&df, &AggregateOptions::new(["site", "year"])).unwrap();
    assert_floats_eq(result.column("size").unwrap(), &[1.0, 2.0, 1.0, 3.0]);

    let opts = AggregateOptions::new(["site", "year"]).value_columns(["temp", "count"]);
    let result = aggregate(&df, &opts).unwrap();
    assert_floats_eq(result.column("size").unwrap(), &[0.0, 2.0, 1.0, 1.0]);
    assert_eq!(result.column_names(), vec!["temp", "count", "temp_SE", "count_SE", "size"]);
}

#[test]
fn test_custom_size_name_and_no_size() {
    let df = simple_frame();

    let opts = AggregateOptions::new(["g"])
        .confidence(None)
        .global_size_column_name(Some("n"));
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.column_names(), vec!["x", "n"]);

    let opts = AggregateOptions::new(["g"])
        .confidence(None)
        .global_size_column_name(None);
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.column_names(), vec!["x"]);
}

#[test]
fn test_collapse_with_custom_separator() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"]).collapse(Collapse::WithSeparator(".".to_string()));
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.column_names(), vec!["x", "x.SE", "size"]);

    let opts = AggregateOptions::new(["g"]).name_separator("__");
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.column_names(), vec!["x", "x__SE", "size"]);
}

#[test]
fn test_empty_drop_list_keeps_mean_suffix() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"]).drop_statistics_list(Vec::<String>::new());
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.column_names(), vec!["x_mean", "x_SE", "size_mean"]);
}

#[test]
fn test_drop_list_can_strip_other_statistics() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"]).drop_statistics_list(["SE", "median"]);
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.column_names(), vec!["x_mean", "x", "size_mean"]);
}

#[test]
fn test_no_collapse_swapped_levels() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"]).collapse(Collapse::NoCollapse);
    let result = aggregate(&df, &opts).unwrap();

    assert_eq!(
        result.column_labels(),
        &[
            ColumnLabel::Pair("x".into(), "mean".into()),
            ColumnLabel::Pair("x".into(), "SE".into()),
            ColumnLabel::Pair("size".into(), "mean".into()),
        ]
    );
    assert_floats_eq(result.pair_column("x", "mean").unwrap(), &[1.5, 5.0]);
    assert!(result.column("x").is_none());
}

#[test]
fn test_no_collapse_natural_levels() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"])
        .collapse(Collapse::NoCollapse)
        .swap_level_on_no_collapse(false);
    let result = aggregate(&df, &opts).unwrap();

    assert_eq!(
        result.column_labels(),
        &[
            ColumnLabel::Pair("mean".into(), "x".into()),
            ColumnLabel::Pair("SE".into(), "x".into()),
            ColumnLabel::Pair("mean".into(), "size".into()),
        ]
    );
    assert_eq!(
        result.value(&key("A"), &ColumnLabel::Pair("mean".into(), "size".into())),
        Some(2.0)
    );
}

#[test]
fn test_reaggregation_keeps_group_set() {
    let df = measurements();
    let opts = AggregateOptions::new(["site", "year"]).confidence(None);
    let first = aggregate(&df, &opts).unwrap();

    let materialized = first.to_dataframe().unwrap();
    let second = aggregate(&materialized, &opts.clone().value_columns(["count", "temp"])).unwrap();

    assert_eq!(first.index().keys(), second.index().keys());
    assert_floats_eq(second.column("size").unwrap(), &[1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_missing_columns() {
    let df = simple_frame();

    let err = aggregate(&df, &AggregateOptions::new(["h"])).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(name) if name == "h"));

    let opts = AggregateOptions::new(["g"]).value_columns(["y"]);
    let err = aggregate(&df, &opts).unwrap_err();
    assert!(matches!(err, Error::ColumnNotFound(name) if name == "y"));
}

#[test]
fn test_invalid_confidence() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"]).confidence(Some(1.0));
    assert!(matches!(aggregate(&df, &opts), Err(Error::InvalidValue(_))));
}

#[test]
fn test_string_value_column_rejected() {
    let mut df = simple_frame();
    df.add_column("label", Column::from(vec!["p", "q", "r"])).unwrap();

    let err = aggregate(&df, &AggregateOptions::new(["g"])).unwrap_err();
    assert!(matches!(
        err,
        Error::ColumnTypeMismatch { found: ColumnType::String, .. }
    ));

    let opts = AggregateOptions::new(["g"]).value_columns(["x"]);
    assert!(aggregate(&df, &opts).is_ok());
}

#[test]
fn test_name_collisions_are_errors() {
    let mut df = DataFrame::new();
    df.add_column("g", Column::from(vec![1i64, 1, 2])).unwrap();
    df.add_column("a", Column::from(vec![1.0, 2.0, 3.0])).unwrap();
    df.add_column("a_SE", Column::from(vec![1.0, 2.0, 3.0])).unwrap();
    assert!(matches!(
        aggregate(&df, &AggregateOptions::new(["g"])),
        Err(Error::DuplicateColumnName(name)) if name == "a_SE"
    ));

    let mut df = DataFrame::new();
    df.add_column("g", Column::from(vec![1i64, 1, 2])).unwrap();
    df.add_column("size", Column::from(vec![1.0, 2.0, 3.0])).unwrap();
    assert!(matches!(
        aggregate(&df, &AggregateOptions::new(["g"])),
        Err(Error::DuplicateColumnName(_))
    ));
}

#[test]
fn test_size_name_clashing_with_group_column() {
    let df = simple_frame();
    let opts = AggregateOptions::new(["g"]).global_size_column_name(Some("g"));
    assert!(matches!(
        aggregate(&df, &opts),
        Err(Error::DuplicateColumnName(name)) if name == "g"
    ));

    let mut df = DataFrame::new();
    df.add_column("x_SE", Column::from(vec!["A", "A", "B"])).unwrap();
    df.add_column("x", Column::from(vec![1.0, 2.0, 5.0])).unwrap();
    assert!(matches!(
        aggregate(&df, &AggregateOptions::new(["x_SE"])),
        Err(Error::DuplicateColumnName(name)) if name == "x_SE"
    ));
}

#[test]
fn test_standard_errors_follow_other_statistics() {
    let mut df = simple_frame();
    df.add_column("y", Column::from(vec![2.0, 4.0, 6.0])).unwrap();
    let opts = AggregateOptions::new(["g"]).drop_std(false);
    let result = aggregate(&df, &opts).unwrap();

    assert_eq!(
        result.column_names(),
        vec!["x", "x_std", "y", "y_std", "x_SE", "y_SE", "size"]
    );
    assert_floats_eq(result.column("y").unwrap(), &[3.0, 6.0]);
}

#[test]
fn test_signed_zero_keys_form_one_group() {
    let mut df = DataFrame::new();
    df.add_column("g", Column::from(vec![0.0, -0.0, 1.0])).unwrap();
    df.add_column("x", Column::from(vec![1.0, 3.0, 5.0])).unwrap();

    let result = aggregate(&df, &AggregateOptions::new(["g"]).confidence(None)).unwrap();
    assert_eq!(result.n_rows(), 2);
    assert_eq!(
        result.index().keys(),
        &[vec![KeyValue::Float(0.0)], vec![KeyValue::Float(1.0)]]
    );
    assert_floats_eq(result.column("x").unwrap(), &[2.0, 5.0]);
    assert_floats_eq(result.column("size").unwrap(), &[2.0, 1.0]);
}

#[test]
fn test_empty_table() {
    let mut df = DataFrame::new();
    df.add_column("g", Column::from(Vec::<String>::new())).unwrap();
    df.add_column("x", Column::from(Vec::<f64>::new())).unwrap();

    let result = aggregate(&df, &AggregateOptions::new(["g"])).unwrap();
    assert_eq!(result.n_rows(), 0);
    assert_eq!(result.column_names(), vec!["x", "x_SE", "size"]);
    assert!(result.column("x").unwrap().is_empty());
    assert_eq!(result.to_json().unwrap(), "[]");
}

#[test]
fn test_missing_keys_dropped_by_default() {
    let mut df = DataFrame::new();
    df.add_column("g", Column::from(vec![Some("a"), None, Some("a"), None]))
        .unwrap();
    df.add_column("x", Column::from(vec![1i64, 2, 3, 4])).unwrap();

    let opts = AggregateOptions::new(["g"]).confidence(None);
    let result = aggregate(&df, &opts).unwrap();
    assert_eq!(result.n_rows(), 1);
    assert_floats_eq(result.column("x").unwrap(), &[2.0]);

    let result = aggregate(&df, &opts.clone().drop_na_groups(false)).unwrap();
    assert_eq!(result.n_rows(), 2);
    assert_eq!(result.index().keys()[1], vec![KeyValue::NA]);
    assert_floats_eq(result.column("x").unwrap(), &[2.0, 3.0]);
}

#[test]
fn test_boolean_values_average_as_fractions() {
    let mut df = DataFrame::new();
    df.add_column("g", Column::from(vec![true, true, false, true])).unwrap();
    df.add_column("hit", Column::from(vec![true, false, false, true]))
        .unwrap();

    let opts = AggregateOptions::new(["g"]).confidence(None);
    let result = df.stats_agg(&opts).unwrap();
    assert_eq!(
        result.index().keys(),
        &[vec![KeyValue::Bool(false)], vec![KeyValue::Bool(true)]]
    );
    assert_floats_eq(result.column("hit").unwrap(), &[0.0, 2.0 / 3.0]);
}

#[test]
fn test_input_is_not_mutated() {
    let df = measurements();
    let before = df.clone();
    aggregate(&df, &AggregateOptions::new(["site"])).unwrap();
    assert_eq!(df.column_names(), before.column_names());
    assert_eq!(df.column("temp").unwrap().len(), before.column("temp").unwrap().len());
}
