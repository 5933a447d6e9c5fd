//! Pearson correlation between two measurements of the same activity.
//!
//! Values are paired by record position, so an index is dropped from both
//! series whenever either side is unset there.

use serde::{Deserialize, Serialize};

use crate::Measurement;

/// Correlation coefficient between two named measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub measurement_a: String,
    pub measurement_b: String,
    /// Pearson coefficient in [-1, 1]
    pub correlation: f64,
}

/// Pearson correlation coefficient of two equal-length series.
///
/// Returns NaN when the series are shorter than two values, differ in length,
/// or either has zero variance.
///
/// # Example
/// ```rust
/// use fit_summary::pearson_correlation;
///
/// let r = pearson_correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
/// assert!((r - 1.0).abs() < 1e-12);
/// ```
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 || n != y.len() {
        return f64::NAN;
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }

    (cov / denom).clamp(-1.0, 1.0)
}

/// Pair up values where both measurements are set.
///
/// Values are paired by position, so index `i` of each buffer must come from
/// the same record. Callers check that the buffers have equal length.
pub fn aligned_values(a: &Measurement, b: &Measurement) -> (Vec<f64>, Vec<f64>) {
    let len = a.values().len().min(b.values().len());
    let mut xs = Vec::with_capacity(len);
    let mut ys = Vec::with_capacity(len);

    for (&va, &vb) in a.values().iter().zip(b.values()) {
        if a.is_unset(va) || b.is_unset(vb) {
            continue;
        }
        xs.push(va);
        ys.push(vb);
    }

    (xs, ys)
}

/// Correlate two measurements.
///
/// Returns `None` if either has no values, the value buffers differ in length
/// or the coefficient is not a number.
pub fn correlate(a: &Measurement, b: &Measurement) -> Option<Correlation> {
    if a.values().is_empty() || b.values().is_empty() {
        return None;
    }
    // buffers of different lengths were not filled from the same records
    if a.values().len() != b.values().len() {
        return None;
    }

    let (xs, ys) = aligned_values(a, b);
    let correlation = pearson_correlation(&xs, &ys);
    if correlation.is_nan() {
        return None;
    }

    Some(Correlation {
        measurement_a: a.name.clone(),
        measurement_b: b.name.clone(),
        correlation,
    })
}
