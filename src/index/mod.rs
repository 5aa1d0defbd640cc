mod multi_index;

pub use multi_index::LevelMap;

use std::collections::HashMap;

use crate::column::{Column, ColumnType};
use crate::error::{Error, Result};
use crate::groupby::KeyValue;

/// Row index of an aggregated frame: one unique key tuple per row
#[derive(Debug, Clone)]
pub struct GroupIndex {
    /// Grouping column names
    names: Vec<String>,
    /// Source types of the grouping columns
    types: Vec<ColumnType>,
    /// Key tuple per row
    keys: Vec<Vec<KeyValue>>,
    /// Key tuple to row position
    map: HashMap<Vec<KeyValue>, usize>,
}

impl GroupIndex {
    /// Build an index, checking tuple arity and uniqueness
    pub fn new(names: Vec<String>, types: Vec<ColumnType>, keys: Vec<Vec<KeyValue>>) -> Result<Self> {
        if names.len() != types.len() {
            return Err(Error::InvalidInput(format!(
                "{} index names but {} index types",
                names.len(),
                types.len()
            )));
        }

        let mut map = HashMap::with_capacity(keys.len());
        for (pos, key) in keys.iter().enumerate() {
            if key.len() != names.len() {
                return Err(Error::InvalidInput(format!(
                    "key at row {} has {} components, expected {}",
                    pos,
                    key.len(),
                    names.len()
                )));
            }
            if map.insert(key.clone(), pos).is_some() {
                let rendered: Vec<String> = key.iter().map(|k| k.to_string()).collect();
                return Err(Error::InvalidInput(format!(
                    "duplicate group key ({})",
                    rendered.join(", ")
                )));
            }
        }

        Ok(GroupIndex {
            names,
            types,
            keys,
            map,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Grouping column names
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Key tuples in row order
    pub fn keys(&self) -> &[Vec<KeyValue>] {
        &self.keys
    }

    /// Row position of a key tuple
    pub fn get_loc(&self, key: &[KeyValue]) -> Option<usize> {
        self.map.get(key).copied()
    }

    /// Materialize the key tuples as one typed column per grouping column
    pub fn to_columns(&self) -> Result<Vec<(String, Column)>> {
        self.names
            .iter()
            .zip(&self.types)
            .enumerate()
            .map(|(level, (name, &column_type))| {
                let level_keys: Vec<KeyValue> =
                    self.keys.iter().map(|k| k[level].clone()).collect();
                Ok((name.clone(), Column::from_keys(column_type, &level_keys)?))
            })
            .collect()
    }
}
