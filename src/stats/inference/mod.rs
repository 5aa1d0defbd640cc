// =============================================================================
// Confidence scaling
// =============================================================================
//
// The standard error reported per group is the sample standard deviation
// multiplied by the two-sided Student's t critical value with count-1
// degrees of freedom:
//
//     SE = std * isf(0.5 * (1 - confidence), count - 1)
//
// Groups with fewer than two observations have no degrees of freedom left
// and get NaN.
//
// =============================================================================

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Internal implementation of `t_critical`
pub(crate) fn t_critical_impl(confidence: f64, df: f64) -> f64 {
    if !(confidence > 0.0 && confidence < 1.0) || !(df > 0.0) {
        return f64::NAN;
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return f64::NAN,
    };

    // isf(q) = inverse_cdf(1 - q) with q = 0.5 * (1 - confidence)
    let q = 0.5 * (1.0 - confidence);
    t_dist.inverse_cdf(1.0 - q)
}

/// Internal implementation of `standard_error`
pub(crate) fn standard_error_impl(std: f64, count: usize, confidence: f64) -> f64 {
    if count < 2 {
        return f64::NAN;
    }
    std * t_critical_impl(confidence, (count - 1) as f64)
}
