// Descriptive statistics

use crate::stats::GroupSummary;

/// Internal implementation of `describe_group`
pub(crate) fn describe_group_impl(data: &[f64]) -> GroupSummary {
    let count = data.len();
    if count == 0 {
        return GroupSummary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
        };
    }

    let mean = data.iter().sum::<f64>() / count as f64;

    // unbiased estimator, undefined for a single observation
    let std = if count > 1 {
        let sum_squared_diff = data.iter().map(|&x| (x - mean).powi(2)).sum::<f64>();
        (sum_squared_diff / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    GroupSummary { count, mean, std }
}
