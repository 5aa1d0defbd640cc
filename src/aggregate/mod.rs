//! Grouped statistics with flattened column naming
//!
//! `aggregate` computes per-group mean, sample standard deviation, count and
//! a t-scaled standard error for each value column, then reshapes the
//! (statistic, value column) labels into plain names such as `x`, `x_SE`
//! and `size`.

mod frame;
mod options;

pub use frame::{AggregatedFrame, ColumnLabel};
pub use options::{AggregateOptions, Collapse};

use std::collections::HashSet;

use log::{debug, trace};

use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::groupby::DataFrameGroupBy;
use crate::index::{GroupIndex, LevelMap};
use crate::stats::{self, GroupSummary, Statistic};

/// Aggregate `df` according to `options`
///
/// Columns come out in the order they are produced: the kept mean/std/count
/// labels of each value column in turn, then the standard errors of every
/// value column, then the size column. With `drop_std(false)` and value
/// columns `x` and `y` this gives `x, x_std, y, y_std, x_SE, y_SE, size`.
///
/// # Example
/// ```rust
/// use pandrs_aggstats::{aggregate, AggregateOptions, Column, DataFrame};
///
/// let mut df = DataFrame::new();
/// df.add_column("g", Column::from(vec!["A", "A", "B"])).unwrap();
/// df.add_column("x", Column::from(vec![1.0, 2.0, 5.0])).unwrap();
///
/// let result = aggregate(&df, &AggregateOptions::new(["g"]).confidence(None)).unwrap();
/// assert_eq!(result.column_names(), vec!["x", "size"]);
/// assert_eq!(result.column("x").unwrap(), &[1.5, 5.0]);
/// assert_eq!(result.column("size").unwrap(), &[2.0, 1.0]);
/// ```
pub fn aggregate(df: &DataFrame, options: &AggregateOptions) -> Result<AggregatedFrame> {
    options.validate()?;
    let value_columns = resolve_value_columns(df, options)?;
    let statistics = options.statistics_to_compute();
    debug!(
        "aggregating {:?} by {:?} computing {:?}",
        value_columns, options.group_columns, statistics
    );

    let groups = DataFrameGroupBy::new(df, &options.group_columns, options.drop_na_groups)?;
    trace!("{} groups", groups.group_count());

    // statistic -> value column -> per-group values
    let mut table: LevelMap<Vec<f64>> = LevelMap::new();
    for column in &value_columns {
        let summaries: Vec<GroupSummary> = groups
            .numeric_values(column)?
            .iter()
            .map(|values| stats::describe_group(values))
            .collect();
        for statistic in &statistics {
            let values = summaries.iter().map(|s| summary_value(s, *statistic)).collect();
            table.insert(statistic.name(), column, values)?;
        }
    }

    if let Some(confidence) = options.confidence {
        for column in &value_columns {
            let se = standard_errors(&table, column, confidence)?;
            table.insert(Statistic::StandardError.name(), column, se)?;
        }
    }

    if let Some(size_name) = &options.global_size_column_name {
        let counts = table
            .get(Statistic::Count.name(), &value_columns[0])
            .cloned()
            .ok_or_else(|| missing_statistic(Statistic::Count, &value_columns[0]))?;
        table.insert(Statistic::Mean.name(), size_name, counts)?;
    }

    if options.drop_count && table.remove_outer(Statistic::Count.name()) {
        trace!("dropped count columns");
    }
    if options.drop_std && table.remove_outer(Statistic::Std.name()) {
        trace!("dropped std columns");
    }

    let (labels, data) = relabel(table, options)?;
    // result columns share one namespace with the grouping columns on export
    if let Some(clash) = labels
        .iter()
        .map(ColumnLabel::flat_name)
        .find(|name| options.group_columns.contains(name))
    {
        return Err(Error::DuplicateColumnName(clash));
    }
    let index = GroupIndex::new(
        groups.by().to_vec(),
        groups.key_types().to_vec(),
        groups.keys().to_vec(),
    )?;
    AggregatedFrame::new(index, labels, data)
}

impl DataFrame {
    /// Grouped mean/std/count/standard error, see [`aggregate`]
    pub fn stats_agg(&self, options: &AggregateOptions) -> Result<AggregatedFrame> {
        aggregate(self, options)
    }
}

fn resolve_value_columns(df: &DataFrame, options: &AggregateOptions) -> Result<Vec<String>> {
    for name in &options.group_columns {
        if !df.contains_column(name) {
            return Err(Error::ColumnNotFound(name.clone()));
        }
    }

    let columns: Vec<String> = match &options.value_columns {
        Some(columns) => {
            for name in columns {
                if !df.contains_column(name) {
                    return Err(Error::ColumnNotFound(name.clone()));
                }
            }
            columns.clone()
        }
        None => df
            .column_names()
            .iter()
            .filter(|name| !options.group_columns.contains(*name))
            .cloned()
            .collect(),
    };

    if columns.is_empty() {
        return Err(Error::InvalidInput(
            "no value columns to aggregate".to_string(),
        ));
    }
    Ok(columns)
}

fn summary_value(summary: &GroupSummary, statistic: Statistic) -> f64 {
    match statistic {
        Statistic::Mean => summary.mean,
        Statistic::Std => summary.std,
        Statistic::Count => summary.count as f64,
        Statistic::StandardError => f64::NAN,
    }
}

fn missing_statistic(statistic: Statistic, column: &str) -> Error {
    Error::ColumnNotFound(format!("({}, {})", statistic, column))
}

fn standard_errors(table: &LevelMap<Vec<f64>>, column: &str, confidence: f64) -> Result<Vec<f64>> {
    let std = table
        .get(Statistic::Std.name(), column)
        .ok_or_else(|| missing_statistic(Statistic::Std, column))?;
    let count = table
        .get(Statistic::Count.name(), column)
        .ok_or_else(|| missing_statistic(Statistic::Count, column))?;
    Ok(std
        .iter()
        .zip(count)
        .map(|(&s, &n)| stats::standard_error(s, n as usize, confidence))
        .collect())
}

/// Turn the statistic-outer table into final labels
fn relabel(
    table: LevelMap<Vec<f64>>,
    options: &AggregateOptions,
) -> Result<(Vec<ColumnLabel>, Vec<Vec<f64>>)> {
    let separator = match options.collapse.separator(&options.name_separator) {
        Some(sep) => sep,
        None => {
            let table = if options.swap_level_on_no_collapse {
                table.swap_levels()
            } else {
                table
            };
            return Ok(table
                .into_triples()
                .into_iter()
                .map(|(outer, inner, values)| (ColumnLabel::Pair(outer, inner), values))
                .unzip());
        }
    };

    let mut seen = HashSet::new();
    let mut labels = Vec::with_capacity(table.len());
    let mut data = Vec::with_capacity(table.len());
    for (column, statistic, values) in table.swap_levels().into_triples() {
        let name = flatten_name(&column, &statistic, separator, &options.drop_statistics_list);
        if !seen.insert(name.clone()) {
            return Err(Error::DuplicateColumnName(name));
        }
        labels.push(ColumnLabel::Flat(name));
        data.push(values);
    }
    Ok((labels, data))
}

/// `column + separator + statistic`, trailing separators trimmed, then each
/// `separator + dropped` suffix removed
fn flatten_name(column: &str, statistic: &str, separator: &str, drop_list: &[String]) -> String {
    let joined = format!("{}{}{}", column, separator, statistic);
    let mut name = joined.trim_end_matches(separator).to_string();
    for dropped in drop_list {
        let fragment = format!("{}{}", separator, dropped);
        if name.ends_with(&fragment) {
            name.truncate(name.len() - fragment.len());
        }
    }
    name
}
