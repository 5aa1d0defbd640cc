use crate::error::{Error, Result};

/// Two-level column labels `(outer, inner)` with a value per label
///
/// Entries keep insertion order. Swapping the levels exchanges the two parts
/// of every label in place, so the column order never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMap<V> {
    entries: Vec<(String, String, V)>,
}

impl<V> Default for LevelMap<V> {
    fn default() -> Self {
        LevelMap {
            entries: Vec::new(),
        }
    }
}

impl<V> LevelMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value under `(outer, inner)`
    ///
    /// An existing pair is an error; labels must stay unique.
    pub fn insert(&mut self, outer: &str, inner: &str, value: V) -> Result<()> {
        if self.get(outer, inner).is_some() {
            return Err(Error::DuplicateColumnName(format!("({}, {})", outer, inner)));
        }
        self.entries
            .push((outer.to_string(), inner.to_string(), value));
        Ok(())
    }

    /// Value stored under `(outer, inner)`
    pub fn get(&self, outer: &str, inner: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(o, i, _)| o == outer && i == inner)
            .map(|(_, _, v)| v)
    }

    /// Whether an outer label is present
    pub fn contains_outer(&self, outer: &str) -> bool {
        self.entries.iter().any(|(o, _, _)| o == outer)
    }

    /// Drop every label under an outer label
    ///
    /// Returns false when the label was absent.
    pub fn remove_outer(&mut self, outer: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(o, _, _)| o != outer);
        self.entries.len() != before
    }

    /// Distinct outer labels by first appearance
    pub fn outer_labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for (outer, _, _) in &self.entries {
            if !labels.contains(&outer.as_str()) {
                labels.push(outer);
            }
        }
        labels
    }

    /// Number of `(outer, inner)` pairs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walk `(outer, inner, value)` in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &V)> {
        self.entries
            .iter()
            .map(|(o, i, v)| (o.as_str(), i.as_str(), v))
    }

    /// Consume into `(outer, inner, value)` triples in column order
    pub fn into_triples(self) -> Vec<(String, String, V)> {
        self.entries
    }

    /// Exchange the outer and inner part of every label
    pub fn swap_levels(self) -> LevelMap<V> {
        LevelMap {
            entries: self
                .entries
                .into_iter()
                .map(|(outer, inner, v)| (inner, outer, v))
                .collect(),
        }
    }
}
