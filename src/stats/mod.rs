// Statistics module
//
// Per-group descriptive statistics and the Student's t critical values used
// to turn a standard deviation into a confidence-scaled standard error.

pub mod descriptive;
pub mod inference;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Statistic computed for every (group, value column) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    /// Arithmetic mean
    #[serde(rename = "mean")]
    Mean,
    /// Sample standard deviation (divisor n-1)
    #[serde(rename = "std")]
    Std,
    /// Number of non-missing values
    #[serde(rename = "count")]
    Count,
    /// Standard deviation scaled by a Student's t critical value
    #[serde(rename = "SE")]
    StandardError,
}

impl Statistic {
    /// Label used in column names
    pub fn name(&self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Count => "count",
            Statistic::StandardError => "SE",
        }
    }
}

impl Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean, sample standard deviation and count of one group's values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupSummary {
    /// Number of non-missing values
    pub count: usize,
    /// Mean, NaN when `count == 0`
    pub mean: f64,
    /// Sample standard deviation, NaN when `count < 2`
    pub std: f64,
}

/// Summarize the present values of one group
///
/// # Example
/// ```rust
/// use pandrs_aggstats::stats;
///
/// let summary = stats::describe_group(&[1.0, 2.0, 3.0]);
/// assert_eq!(summary.count, 3);
/// assert_eq!(summary.mean, 2.0);
/// assert_eq!(summary.std, 1.0);
/// ```
pub fn describe_group(values: &[f64]) -> GroupSummary {
    descriptive::describe_group_impl(values)
}

/// Two-sided Student's t critical value
///
/// Inverse survival function of the t distribution at `0.5 * (1 - confidence)`
/// with `df` degrees of freedom. NaN when `df` is not positive or the
/// confidence level lies outside (0, 1).
///
/// # Example
/// ```rust
/// use pandrs_aggstats::stats;
///
/// let t = stats::t_critical(0.95, 4.0);
/// assert!((t - 2.776445).abs() < 1e-4);
/// assert!(stats::t_critical(0.95, 0.0).is_nan());
/// ```
pub fn t_critical(confidence: f64, df: f64) -> f64 {
    inference::t_critical_impl(confidence, df)
}

/// Standard error `std * t_critical(confidence, count - 1)`
pub fn standard_error(std: f64, count: usize, confidence: f64) -> f64 {
    inference::standard_error_impl(std, count, confidence)
}
