//! DataFrame: an ordered collection of named, row-aligned columns

use std::collections::HashMap;

use crate::column::Column;
use crate::error::{Error, Result};

/// Tabular data with ordered, uniquely named columns of equal length
#[derive(Debug, Clone, Default)]
pub struct DataFrame {
    /// Columns in insertion order
    columns: Vec<Column>,
    /// Column names, aligned with `columns`
    column_names: Vec<String>,
    /// Name to position lookup
    column_indices: HashMap<String, usize>,
    /// Number of rows
    row_count: usize,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column
    ///
    /// The first column fixes the row count; later columns must match it.
    pub fn add_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if self.column_indices.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if !self.columns.is_empty() && column.len() != self.row_count {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count,
                found: column.len(),
            });
        }

        self.row_count = column.len();
        self.column_indices.insert(name.clone(), self.columns.len());
        self.column_names.push(name);
        self.columns.push(column);
        Ok(())
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.column_indices
            .get(name)
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Whether a column with this name exists
    pub fn contains_column(&self, name: &str) -> bool {
        self.column_indices.contains_key(name)
    }

    /// Column names in order
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Copy of this DataFrame restricted to the named columns, in the given order
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<DataFrame> {
        let mut df = DataFrame::new();
        for name in names {
            let name = name.as_ref();
            df.add_column(name, self.column(name)?.clone())?;
        }
        Ok(df)
    }
}
