//! Grouping of DataFrame rows by the values of one or more key columns

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use log::trace;

use crate::column::ColumnType;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};

/// One component of a grouping key
///
/// Floats compare and hash by their bit pattern under total ordering, so a
/// float key column groups and sorts deterministically. `-0.0` and `0.0` are
/// the same key. `NA` sorts after every value.
#[derive(Debug, Clone)]
pub enum KeyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    NA,
}

impl KeyValue {
    fn rank(&self) -> u8 {
        match self {
            KeyValue::Bool(_) => 0,
            KeyValue::Int(_) => 1,
            KeyValue::Float(_) => 2,
            KeyValue::Str(_) => 3,
            KeyValue::NA => 4,
        }
    }

    pub fn is_na(&self) -> bool {
        matches!(self, KeyValue::NA)
    }
}

fn unsigned_zero(x: f64) -> f64 {
    x + 0.0
}

impl PartialEq for KeyValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for KeyValue {}

impl PartialOrd for KeyValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyValue::Bool(a), KeyValue::Bool(b)) => a.cmp(b),
            (KeyValue::Int(a), KeyValue::Int(b)) => a.cmp(b),
            (KeyValue::Float(a), KeyValue::Float(b)) => {
                unsigned_zero(*a).total_cmp(&unsigned_zero(*b))
            }
            (KeyValue::Str(a), KeyValue::Str(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl Hash for KeyValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            KeyValue::Bool(b) => b.hash(state),
            KeyValue::Int(x) => x.hash(state),
            KeyValue::Float(x) => unsigned_zero(*x).to_bits().hash(state),
            KeyValue::Str(s) => s.hash(state),
            KeyValue::NA => {}
        }
    }
}

impl Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::Bool(b) => write!(f, "{}", b),
            KeyValue::Int(x) => write!(f, "{}", x),
            KeyValue::Float(x) => write!(f, "{}", x),
            KeyValue::Str(s) => write!(f, "{}", s),
            KeyValue::NA => write!(f, "NA"),
        }
    }
}

/// Rows of a DataFrame partitioned by grouping key
///
/// Groups are kept in ascending key order.
#[derive(Debug)]
pub struct DataFrameGroupBy<'a> {
    /// Source DataFrame
    source: &'a DataFrame,
    /// Grouping column names
    by: Vec<String>,
    /// Types of the grouping columns, aligned with `by`
    key_types: Vec<ColumnType>,
    /// Sorted group keys
    keys: Vec<Vec<KeyValue>>,
    /// Row indices per group, aligned with `keys`
    rows: Vec<Vec<usize>>,
}

impl<'a> DataFrameGroupBy<'a> {
    /// Group the rows of `source` by the given columns
    ///
    /// # Arguments
    /// * `by` - grouping column names, in key order
    /// * `drop_na` - skip rows whose key contains a missing value
    pub fn new<S: AsRef<str>>(source: &'a DataFrame, by: &[S], drop_na: bool) -> Result<Self> {
        if by.is_empty() {
            return Err(Error::InvalidInput(
                "at least one grouping column is required".to_string(),
            ));
        }

        let by: Vec<String> = by.iter().map(|s| s.as_ref().to_string()).collect();
        let mut key_columns = Vec::with_capacity(by.len());
        for name in &by {
            key_columns.push(source.column(name)?);
        }
        let key_types = key_columns.iter().map(|c| c.column_type()).collect();

        let mut groups: HashMap<Vec<KeyValue>, Vec<usize>> = HashMap::new();
        let mut skipped = 0usize;
        for row in 0..source.row_count() {
            let key = key_columns
                .iter()
                .map(|c| c.key_at(row))
                .collect::<Result<Vec<_>>>()?;
            if drop_na && key.iter().any(KeyValue::is_na) {
                skipped += 1;
                continue;
            }
            groups.entry(key).or_default().push(row);
        }
        if skipped > 0 {
            trace!("skipped {} rows with missing grouping keys", skipped);
        }

        let mut sorted: Vec<(Vec<KeyValue>, Vec<usize>)> = groups.into_iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        let (keys, rows) = sorted.into_iter().unzip();

        Ok(DataFrameGroupBy {
            source,
            by,
            key_types,
            keys,
            rows,
        })
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.keys.len()
    }

    /// Grouping column names
    pub fn by(&self) -> &[String] {
        &self.by
    }

    /// Types of the grouping columns
    pub fn key_types(&self) -> &[ColumnType] {
        &self.key_types
    }

    /// Group keys in ascending order
    pub fn keys(&self) -> &[Vec<KeyValue>] {
        &self.keys
    }

    /// Row indices of each group, aligned with `keys()`
    pub fn group_rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Number of rows in each group
    pub fn size(&self) -> Vec<usize> {
        self.rows.iter().map(Vec::len).collect()
    }

    /// Present numeric values of `column` for each group
    pub fn numeric_values(&self, column: &str) -> Result<Vec<Vec<f64>>> {
        let col = self.source.column(column)?;
        if !col.column_type().is_numeric() {
            return Err(Error::ColumnTypeMismatch {
                name: column.to_string(),
                expected: ColumnType::Float64,
                found: col.column_type(),
            });
        }
        self.rows
            .iter()
            .map(|rows| col.numeric_values(rows))
            .collect()
    }
}

impl DataFrame {
    /// Group rows by the given columns, dropping rows with missing keys
    pub fn groupby<S: AsRef<str>>(&self, by: &[S]) -> Result<DataFrameGroupBy<'_>> {
        DataFrameGroupBy::new(self, by, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;

    fn frame() -> DataFrame {
        let mut df = DataFrame::new();
        df.add_column("g", Column::from(vec![Some("b"), Some("a"), None, Some("b")]))
            .unwrap();
        df.add_column("h", Column::from(vec![1i64, 2, 3, 1])).unwrap();
        df.add_column("x", Column::from(vec![1.0, 2.0, 3.0, 4.0])).unwrap();
        df
    }

    #[test]
    fn test_groups_are_sorted() {
        let df = frame();
        let gb = df.groupby(&["g"]).unwrap();
        assert_eq!(gb.group_count(), 2);
        assert_eq!(gb.keys()[0], vec![KeyValue::Str("a".into())]);
        assert_eq!(gb.keys()[1], vec![KeyValue::Str("b".into())]);
        assert_eq!(gb.group_rows()[1], vec![0, 3]);
        assert_eq!(gb.size(), vec![1, 2]);
    }

    #[test]
    fn test_na_keys_kept_when_requested() {
        let df = frame();
        let gb = DataFrameGroupBy::new(&df, &["g"], false).unwrap();
        assert_eq!(gb.group_count(), 3);
        assert_eq!(gb.keys()[2], vec![KeyValue::NA]);
    }

    #[test]
    fn test_multi_column_key() {
        let df = frame();
        let gb = df.groupby(&["g", "h"]).unwrap();
        assert_eq!(gb.group_count(), 2);
        let values = gb.numeric_values("x").unwrap();
        assert_eq!(values[1], vec![1.0, 4.0]);
    }

    #[test]
    fn test_missing_group_column() {
        let df = frame();
        assert!(matches!(
            df.groupby(&["nope"]),
            Err(Error::ColumnNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_float_keys_order() {
        assert!(KeyValue::Float(-0.5) < KeyValue::Float(2.0));
        assert!(KeyValue::Int(7) < KeyValue::NA);
    }

    #[test]
    fn test_signed_zero_is_one_key() {
        use std::collections::hash_map::DefaultHasher;

        let hash = |k: &KeyValue| {
            let mut h = DefaultHasher::new();
            k.hash(&mut h);
            h.finish()
        };
        assert_eq!(KeyValue::Float(-0.0), KeyValue::Float(0.0));
        assert_eq!(hash(&KeyValue::Float(-0.0)), hash(&KeyValue::Float(0.0)));
    }
}
