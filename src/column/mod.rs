//! Typed column storage for DataFrame

use serde::{Deserialize, Serialize};
use num_traits::ToPrimitive;

use crate::error::{Error, Result};
use crate::groupby::KeyValue;
use crate::na::NA;

/// Enumeration identifying the type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Int64,
    Float64,
    String,
    Boolean,
}

impl ColumnType {
    /// Whether values of this type can be aggregated numerically
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnType::String)
    }
}

/// A column of homogeneously typed cells, any of which may be NA
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<NA<i64>>),
    Float64(Vec<NA<f64>>),
    String(Vec<NA<String>>),
    Boolean(Vec<NA<bool>>),
}

impl Column {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::String(v) => v.len(),
            Column::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type of the column
    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Int64(_) => ColumnType::Int64,
            Column::Float64(_) => ColumnType::Float64,
            Column::String(_) => ColumnType::String,
            Column::Boolean(_) => ColumnType::Boolean,
        }
    }

    fn check_bounds(&self, row: usize) -> Result<()> {
        if row >= self.len() {
            return Err(Error::IndexOutOfBounds {
                index: row,
                size: self.len(),
            });
        }
        Ok(())
    }

    /// Whether the cell at `row` is missing
    ///
    /// A NaN in a Float64 column counts as missing.
    pub fn is_na(&self, row: usize) -> Result<bool> {
        self.check_bounds(row)?;
        Ok(match self {
            Column::Int64(v) => v[row].is_na(),
            Column::Float64(v) => match v[row] {
                NA::Value(x) => x.is_nan(),
                NA::NA => true,
            },
            Column::String(v) => v[row].is_na(),
            Column::Boolean(v) => v[row].is_na(),
        })
    }

    /// Numeric value of the cell at `row`
    ///
    /// Returns `Ok(None)` for missing cells. Booleans read as 0.0 / 1.0.
    /// String columns are rejected.
    pub fn numeric_at(&self, row: usize) -> Result<Option<f64>> {
        self.check_bounds(row)?;
        let value = match self {
            Column::Int64(v) => v[row].value().and_then(ToPrimitive::to_f64),
            Column::Float64(v) => v[row].value().copied().filter(|x| !x.is_nan()),
            Column::Boolean(v) => v[row].value().map(|&b| if b { 1.0 } else { 0.0 }),
            Column::String(_) => {
                return Err(Error::InvalidValue(
                    "string column has no numeric values".to_string(),
                ))
            }
        };
        Ok(value)
    }

    /// Present numeric values at the given rows, skipping missing cells
    pub fn numeric_values(&self, rows: &[usize]) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(rows.len());
        for &row in rows {
            if let Some(v) = self.numeric_at(row)? {
                values.push(v);
            }
        }
        Ok(values)
    }

    /// Grouping key component for the cell at `row`
    pub fn key_at(&self, row: usize) -> Result<KeyValue> {
        if self.is_na(row)? {
            return Ok(KeyValue::NA);
        }
        let key = match self {
            Column::Int64(v) => v[row].value().map(|&x| KeyValue::Int(x)),
            Column::Float64(v) => v[row].value().map(|&x| KeyValue::Float(x + 0.0)),
            Column::String(v) => v[row].value().map(|s| KeyValue::Str(s.clone())),
            Column::Boolean(v) => v[row].value().map(|&b| KeyValue::Bool(b)),
        };
        Ok(key.unwrap_or(KeyValue::NA))
    }

    /// Rebuild a column of the given type from grouping key components
    pub fn from_keys(column_type: ColumnType, keys: &[KeyValue]) -> Result<Column> {
        let mismatch = |found: &KeyValue| {
            Error::InvalidValue(format!(
                "key {} does not belong to a {:?} column",
                found, column_type
            ))
        };
        let column = match column_type {
            ColumnType::Int64 => Column::Int64(
                keys.iter()
                    .map(|k| match k {
                        KeyValue::Int(x) => Ok(NA::Value(*x)),
                        KeyValue::NA => Ok(NA::NA),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            ColumnType::Float64 => Column::Float64(
                keys.iter()
                    .map(|k| match k {
                        KeyValue::Float(x) => Ok(NA::Value(*x)),
                        KeyValue::NA => Ok(NA::NA),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            ColumnType::String => Column::String(
                keys.iter()
                    .map(|k| match k {
                        KeyValue::Str(s) => Ok(NA::Value(s.clone())),
                        KeyValue::NA => Ok(NA::NA),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<_>>()?,
            ),
            ColumnType::Boolean => Column::Boolean(
                keys.iter()
                    .map(|k| match k {
                        KeyValue::Bool(b) => Ok(NA::Value(*b)),
                        KeyValue::NA => Ok(NA::NA),
                        other => Err(mismatch(other)),
                    })
                    .collect::<Result<_>>()?,
            ),
        };
        Ok(column)
    }

    /// Text rendering of a cell, empty for NA
    pub fn cell_string(&self, row: usize) -> Result<String> {
        self.check_bounds(row)?;
        let text = match self {
            Column::Int64(v) => v[row].value().map(|x| x.to_string()),
            Column::Float64(v) => v[row].value().map(|x| x.to_string()),
            Column::String(v) => v[row].value().cloned(),
            Column::Boolean(v) => v[row].value().map(|x| x.to_string()),
        };
        Ok(text.unwrap_or_default())
    }
}

macro_rules! impl_column_from {
    ($variant:ident, $t:ty) => {
        impl From<Vec<$t>> for Column {
            fn from(values: Vec<$t>) -> Self {
                Column::$variant(values.into_iter().map(NA::Value).collect())
            }
        }

        impl From<Vec<Option<$t>>> for Column {
            fn from(values: Vec<Option<$t>>) -> Self {
                Column::$variant(values.into_iter().map(NA::from).collect())
            }
        }
    };
}

impl_column_from!(Int64, i64);
impl_column_from!(Float64, f64);
impl_column_from!(Boolean, bool);
impl_column_from!(String, String);

impl From<Vec<&str>> for Column {
    fn from(values: Vec<&str>) -> Self {
        Column::String(values.into_iter().map(|s| NA::Value(s.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for Column {
    fn from(values: Vec<Option<&str>>) -> Self {
        Column::String(
            values
                .into_iter()
                .map(|s| NA::from(s.map(str::to_string)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_nan_is_missing() {
        let col = Column::from(vec![1.0, f64::NAN, 3.0]);
        assert!(!col.is_na(0).unwrap());
        assert!(col.is_na(1).unwrap());
        assert_eq!(col.numeric_values(&[0, 1, 2]).unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_boolean_reads_as_number() {
        let col = Column::from(vec![Some(true), None, Some(false)]);
        assert_eq!(col.numeric_at(0).unwrap(), Some(1.0));
        assert_eq!(col.numeric_at(1).unwrap(), None);
        assert_eq!(col.numeric_at(2).unwrap(), Some(0.0));
    }

    #[test]
    fn test_string_column_is_not_numeric() {
        let col = Column::from(vec!["a", "b"]);
        assert!(col.numeric_at(0).is_err());
        assert!(!col.column_type().is_numeric());
    }

    #[test]
    fn test_keys_round_trip_through_column() {
        let col = Column::from(vec![Some("x"), None]);
        let keys = vec![col.key_at(0).unwrap(), col.key_at(1).unwrap()];
        assert_eq!(keys[1], KeyValue::NA);
        let rebuilt = Column::from_keys(ColumnType::String, &keys).unwrap();
        assert_eq!(rebuilt, col);
    }

    #[test]
    fn test_out_of_bounds() {
        let col = Column::from(vec![1i64]);
        assert!(matches!(
            col.is_na(3),
            Err(Error::IndexOutOfBounds { index: 3, size: 1 })
        ));
    }
}
