//! Options controlling `aggregate`

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::stats::Statistic;

/// How the two-level (value column, statistic) labels are presented
///
/// In configuration files this is written as `true`, `false` or a separator
/// string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "CollapseRepr", into = "CollapseRepr")]
pub enum Collapse {
    /// Keep two-level labels
    NoCollapse,
    /// Flatten using `AggregateOptions::name_separator`
    #[default]
    Default,
    /// Flatten using the given separator
    WithSeparator(String),
}

impl Collapse {
    /// Separator used for flattening, `None` when labels stay two-level
    ///
    /// An empty separator also leaves the labels two-level.
    pub fn separator<'a>(&'a self, name_separator: &'a str) -> Option<&'a str> {
        let sep = match self {
            Collapse::NoCollapse => return None,
            Collapse::Default => name_separator,
            Collapse::WithSeparator(sep) => sep.as_str(),
        };
        (!sep.is_empty()).then_some(sep)
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum CollapseRepr {
    Flag(bool),
    Separator(String),
}

impl From<CollapseRepr> for Collapse {
    fn from(repr: CollapseRepr) -> Self {
        match repr {
            CollapseRepr::Flag(true) => Collapse::Default,
            CollapseRepr::Flag(false) => Collapse::NoCollapse,
            // an empty separator reads as "off", like a false flag
            CollapseRepr::Separator(sep) if sep.is_empty() => Collapse::NoCollapse,
            CollapseRepr::Separator(sep) => Collapse::WithSeparator(sep),
        }
    }
}

impl From<Collapse> for CollapseRepr {
    fn from(collapse: Collapse) -> Self {
        match collapse {
            Collapse::NoCollapse => CollapseRepr::Flag(false),
            Collapse::Default => CollapseRepr::Flag(true),
            Collapse::WithSeparator(sep) => CollapseRepr::Separator(sep),
        }
    }
}

/// Optional settings are written as a value, or `false` to switch them off
#[derive(Deserialize)]
#[serde(untagged)]
enum ValueOrFlag<T> {
    Flag(bool),
    Value(T),
}

fn value_or_false<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<ValueOrFlag<T>>::deserialize(deserializer)? {
        None | Some(ValueOrFlag::Flag(false)) => Ok(None),
        Some(ValueOrFlag::Flag(true)) => Err(D::Error::custom(
            "expected a value or `false`, found `true`",
        )),
        Some(ValueOrFlag::Value(v)) => Ok(Some(v)),
    }
}

fn serialize_value_or_false<S, T>(
    value: &Option<T>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_bool(false),
    }
}

/// Parameters of a grouped statistics aggregation
///
/// Defaults: `"_"` separator, strip the `mean` suffix, drop std and count,
/// 95% confidence standard error, a `size` column, swap levels when not
/// collapsing, collapse labels, skip rows with missing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateOptions {
    /// Columns whose value tuple identifies a group
    pub group_columns: Vec<String>,
    /// Columns to aggregate; all non-grouping columns when `None`
    pub value_columns: Option<Vec<String>>,
    /// Separator for flattened names
    pub name_separator: String,
    /// Statistic names stripped from flattened names as `separator + name`
    pub drop_statistics_list: Vec<String>,
    /// Drop the standard deviation columns from the result
    pub drop_std: bool,
    /// Drop the count columns from the result
    pub drop_count: bool,
    /// Confidence level for the standard error, none to skip it
    #[serde(
        deserialize_with = "value_or_false",
        serialize_with = "serialize_value_or_false"
    )]
    pub confidence: Option<f64>,
    /// Name of the per-group row count column, none to skip it
    #[serde(
        deserialize_with = "value_or_false",
        serialize_with = "serialize_value_or_false"
    )]
    pub global_size_column_name: Option<String>,
    /// Put value columns on the outer level when not collapsing
    pub swap_level_on_no_collapse: bool,
    /// Label flattening
    pub collapse: Collapse,
    /// Skip rows whose grouping key contains a missing value
    pub drop_na_groups: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        AggregateOptions {
            group_columns: Vec::new(),
            value_columns: None,
            name_separator: "_".to_string(),
            drop_statistics_list: vec![Statistic::Mean.name().to_string()],
            drop_std: true,
            drop_count: true,
            confidence: Some(0.95),
            global_size_column_name: Some("size".to_string()),
            swap_level_on_no_collapse: true,
            collapse: Collapse::Default,
            drop_na_groups: true,
        }
    }
}

impl AggregateOptions {
    /// Default options grouping by the given columns
    pub fn new<I, S>(group_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AggregateOptions {
            group_columns: group_columns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Parse options from a TOML document
    ///
    /// # Example
    /// ```rust
    /// use pandrs_aggstats::{AggregateOptions, Collapse};
    ///
    /// let opts = AggregateOptions::from_toml_str(r#"
    ///     group_columns = ["g"]
    ///     confidence = false
    ///     collapse = "."
    /// "#).unwrap();
    /// assert_eq!(opts.confidence, None);
    /// assert_eq!(opts.collapse, Collapse::WithSeparator(".".to_string()));
    /// assert!(opts.drop_std);
    /// ```
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let options: AggregateOptions = toml::from_str(s)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a JSON document
    pub fn from_json_str(s: &str) -> Result<Self> {
        let options: AggregateOptions =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn value_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    pub fn name_separator(mut self, separator: impl Into<String>) -> Self {
        self.name_separator = separator.into();
        self
    }

    pub fn drop_statistics_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drop_statistics_list = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn drop_std(mut self, drop: bool) -> Self {
        self.drop_std = drop;
        self
    }

    pub fn drop_count(mut self, drop: bool) -> Self {
        self.drop_count = drop;
        self
    }

    pub fn confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn global_size_column_name(mut self, name: Option<&str>) -> Self {
        self.global_size_column_name = name.map(str::to_string);
        self
    }

    pub fn swap_level_on_no_collapse(mut self, swap: bool) -> Self {
        self.swap_level_on_no_collapse = swap;
        self
    }

    pub fn collapse(mut self, collapse: Collapse) -> Self {
        self.collapse = collapse;
        self
    }

    pub fn drop_na_groups(mut self, drop: bool) -> Self {
        self.drop_na_groups = drop;
        self
    }

    /// Statistics the aggregation computes before dropping any
    ///
    /// Mean always. Std when kept or needed for the standard error. Count when
    /// kept, needed for the standard error, or feeding the size column.
    pub fn statistics_to_compute(&self) -> Vec<Statistic> {
        let mut statistics = vec![Statistic::Mean];
        if !self.drop_std || self.confidence.is_some() {
            statistics.push(Statistic::Std);
        }
        if !self.drop_count || self.confidence.is_some() || self.global_size_column_name.is_some()
        {
            statistics.push(Statistic::Count);
        }
        statistics
    }

    /// Check parameters that do not depend on the table
    pub fn validate(&self) -> Result<()> {
        if self.group_columns.is_empty() {
            return Err(Error::InvalidInput(
                "at least one grouping column is required".to_string(),
            ));
        }
        if let Some(conf) = self.confidence {
            if !(conf > 0.0 && conf < 1.0) {
                return Err(Error::InvalidValue(format!(
                    "confidence must lie strictly between 0 and 1, got {}",
                    conf
                )));
            }
        }
        if let Some(values) = &self.value_columns {
            if let Some(overlap) = values.iter().find(|v| self.group_columns.contains(*v)) {
                return Err(Error::InvalidInput(format!(
                    "column '{}' is both a grouping and a value column",
                    overlap
                )));
            }
        }
        Ok(())
    }
}
