//! Result of a grouped aggregation

use std::fmt::{self, Display};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::column::Column;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::groupby::KeyValue;
use crate::index::GroupIndex;
use crate::io;
use crate::na::NA;

/// Label of an aggregated column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnLabel {
    /// Flattened name such as `x_SE`
    Flat(String),
    /// Two-level label `(outer, inner)`
    Pair(String, String),
}

impl ColumnLabel {
    /// Single-string form; pairs are joined with `_`
    pub fn flat_name(&self) -> String {
        match self {
            ColumnLabel::Flat(name) => name.clone(),
            ColumnLabel::Pair(outer, inner) => format!("{}_{}", outer, inner),
        }
    }
}

impl Display for ColumnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLabel::Flat(name) => write!(f, "{}", name),
            ColumnLabel::Pair(outer, inner) => write!(f, "({}, {})", outer, inner),
        }
    }
}

/// One row per group, one f64 column per (value column, statistic) label
#[derive(Debug, Clone)]
pub struct AggregatedFrame {
    index: GroupIndex,
    labels: Vec<ColumnLabel>,
    data: Vec<Vec<f64>>,
}

impl AggregatedFrame {
    pub(crate) fn new(index: GroupIndex, labels: Vec<ColumnLabel>, data: Vec<Vec<f64>>) -> Result<Self> {
        if labels.len() != data.len() {
            return Err(Error::InvalidInput(format!(
                "{} labels for {} columns",
                labels.len(),
                data.len()
            )));
        }
        for column in &data {
            if column.len() != index.len() {
                return Err(Error::InconsistentRowCount {
                    expected: index.len(),
                    found: column.len(),
                });
            }
        }
        Ok(AggregatedFrame {
            index,
            labels,
            data,
        })
    }

    /// Number of groups
    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of aggregated columns
    pub fn n_columns(&self) -> usize {
        self.labels.len()
    }

    /// Group keys of the rows
    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn column_labels(&self) -> &[ColumnLabel] {
        &self.labels
    }

    /// Column names in single-string form
    pub fn column_names(&self) -> Vec<String> {
        self.labels.iter().map(ColumnLabel::flat_name).collect()
    }

    /// Values of a flattened column
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|l| matches!(l, ColumnLabel::Flat(n) if n == name))
            .map(|pos| self.data[pos].as_slice())
    }

    /// Values of a two-level column
    pub fn pair_column(&self, outer: &str, inner: &str) -> Option<&[f64]> {
        self.labels
            .iter()
            .position(|l| matches!(l, ColumnLabel::Pair(o, i) if o == outer && i == inner))
            .map(|pos| self.data[pos].as_slice())
    }

    /// Value for one group and label
    pub fn value(&self, key: &[KeyValue], label: &ColumnLabel) -> Option<f64> {
        let row = self.index.get_loc(key)?;
        let col = self.labels.iter().position(|l| l == label)?;
        Some(self.data[col][row])
    }

    /// Materialize as a DataFrame: grouping columns first, then the
    /// aggregated columns as Float64 with NaN stored as NA
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut df = DataFrame::new();
        for (name, column) in self.index.to_columns()? {
            df.add_column(name, column)?;
        }
        for (label, values) in self.labels.iter().zip(&self.data) {
            let cells = values
                .iter()
                .map(|&v| if v.is_nan() { NA::NA } else { NA::Value(v) })
                .collect();
            df.add_column(label.flat_name(), Column::Float64(cells))?;
        }
        Ok(df)
    }

    /// Write as CSV (see `to_dataframe` for the layout)
    pub fn to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        io::write_csv(&self.to_dataframe()?, path)
    }

    /// Render as a JSON array of row objects; NaN becomes null
    pub fn to_json(&self) -> Result<String> {
        let mut records = Vec::with_capacity(self.n_rows());
        for (row, key) in self.index.keys().iter().enumerate() {
            let mut record = Map::new();
            for (name, component) in self.index.names().iter().zip(key) {
                record.insert(name.clone(), key_to_json(component));
            }
            for (label, values) in self.labels.iter().zip(&self.data) {
                let value = serde_json::Number::from_f64(values[row])
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                record.insert(label.flat_name(), value);
            }
            records.push(Value::Object(record));
        }
        Ok(serde_json::to_string(&Value::Array(records))?)
    }
}

fn key_to_json(key: &KeyValue) -> Value {
    match key {
        KeyValue::Bool(b) => Value::Bool(*b),
        KeyValue::Int(x) => Value::from(*x),
        KeyValue::Float(x) => serde_json::Number::from_f64(*x)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        KeyValue::Str(s) => Value::String(s.clone()),
        KeyValue::NA => Value::Null,
    }
}
