//! Streaming statistics for a single named measurement.
//!
//! A [`Measurement`] accepts values one record at a time and keeps every value
//! it was given, including unset ones, so that correlation can later pair
//! values by record position. Statistics are computed once in
//! [`Measurement::finalize`].
//!
//! ## Example
//! ```rust
//! use fit_summary::Measurement;
//!
//! let mut heart_rate = Measurement::new("heart_rate", "1 / minute", 0xFF);
//! heart_rate.add(120.0);
//! heart_rate.add(255.0); // unset
//! heart_rate.add(140.0);
//!
//! let (heart_rate, ok) = heart_rate.finalize();
//! assert!(ok);
//! assert_eq!(heart_rate.mean, 130.0);
//! ```

use serde::{Deserialize, Serialize};

/// Running and finalized statistics for one measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    /// Informational unit label, e.g. "1 / minute"
    pub unit: String,

    pub maximum: f64,
    pub minimum: f64,
    pub median: f64,
    pub mean: f64,
    /// Bessel-corrected sample variance
    pub variance: f64,
    pub standard_deviation: f64,

    /// Values at or above this threshold are unset
    #[serde(skip)]
    sentinel: u64,
    #[serde(skip)]
    count: usize,
    #[serde(skip)]
    sum: f64,
    #[serde(skip)]
    values: Vec<f64>,
}

impl Measurement {
    /// Create an empty accumulator. `minimum` and `maximum` start at the
    /// sentinel, so a measurement without set values reports its sentinel.
    /// The first set value replaces both.
    pub fn new(name: &str, unit: &str, sentinel: u64) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            maximum: sentinel as f64,
            minimum: sentinel as f64,
            median: 0.0,
            mean: 0.0,
            variance: 0.0,
            standard_deviation: 0.0,
            sentinel,
            count: 0,
            sum: 0.0,
            values: Vec::new(),
        }
    }

    /// Sentinel threshold for this measurement.
    pub fn sentinel(&self) -> u64 {
        self.sentinel
    }

    /// Number of set values added so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Every value added, in record order. NaN inputs appear as the sentinel.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Check whether a value counts as "not recorded" for this measurement.
    pub fn is_unset(&self, value: f64) -> bool {
        value.is_nan() || value >= self.sentinel as f64
    }

    /// Add one reading. Unset readings are kept in `values` but do not touch
    /// the running statistics.
    pub fn add(&mut self, value: f64) {
        let value = if value.is_nan() {
            self.sentinel as f64
        } else {
            value
        };

        self.values.push(value);
        if self.is_unset(value) {
            return;
        }

        if self.count == 0 {
            self.maximum = value;
            self.minimum = value;
        }
        self.count += 1;
        self.sum += value;
        if value > self.maximum {
            self.maximum = value;
        }
        if value < self.minimum {
            self.minimum = value;
        }
    }

    /// A measurement needs at least two readings, one of them set, to be
    /// summarized.
    pub fn valid(&self) -> bool {
        self.values.len() > 1 && self.count > 0
    }

    /// Compute mean, median, variance and standard deviation.
    ///
    /// Returns the measurement and `false` if it is too sparse to summarize;
    /// the caller must then leave it out of the output.
    ///
    /// A single set value yields a variance of zero rather than dividing by
    /// `count - 1 == 0`.
    pub fn finalize(mut self) -> (Self, bool) {
        if !self.valid() {
            return (self, false);
        }

        let count = self.count as f64;
        self.mean = self.sum / count;

        let mut set: Vec<f64> = Vec::with_capacity(self.count);
        let mut ss = 0.0;
        let mut compensation = 0.0;
        for &v in &self.values {
            if self.is_unset(v) {
                continue;
            }
            set.push(v);
            let deviation = v - self.mean;
            ss += deviation * deviation;
            compensation += deviation;
        }

        self.variance = if self.count > 1 {
            (ss - compensation * compensation / count) / (count - 1.0)
        } else {
            0.0
        };
        self.standard_deviation = self.variance.sqrt();

        if set.is_empty() {
            return (self, false);
        }

        set.sort_by(|a, b| a.total_cmp(b));
        let mid = set.len() / 2;
        self.median = if set.len() % 2 == 0 {
            // mean of middle two values
            (set[mid - 1] + set[mid]) / 2.0
        } else {
            set[mid]
        };

        (self, true)
    }
}
