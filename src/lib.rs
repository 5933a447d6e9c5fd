//! # FIT Summary
//!
//! Per-activity statistics for decoded fitness-device records.
//!
//! This library provides:
//! - Streaming per-measurement statistics (min, max, mean, median, variance)
//! - Sentinel-aware Pearson correlations between measurement pairs
//! - Distance from the first GPS fix using Vincenty's formula
//!
//! ## Features
//!
//! - **`parallel`** - Summarize independent activities in parallel with rayon
//! - **`fit`** - Decode FIT files into records with fitparser
//! - **`cli`** - `fit-summarize` command-line tool
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use fit_summary::{summarize, ActivityCategory, Record, SummaryConfig};
//!
//! let records: Vec<Record> = [120.0, 255.0, 140.0]
//!     .iter()
//!     .map(|&hr| Record { heart_rate: hr, ..Record::default() })
//!     .collect();
//!
//! let summary = summarize(ActivityCategory::Run, &records, &SummaryConfig::default()).unwrap();
//! let heart_rate = summary.measurement("heart_rate").unwrap();
//! assert_eq!(heart_rate.mean, 130.0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{OptionExt, Result, SummaryError};

// Single-measurement streaming statistics
pub mod measurement;
pub use measurement::Measurement;

// Activity categories and per-category measurement tables
pub mod catalog;
pub use catalog::{ActivityCategory, MeasurementCatalog, MeasurementSpec};

// Record reading and cross-record state
pub mod reader;
pub use reader::{geodesic_distance, read_record, RecordAccumulator};

// Pairwise correlation
pub mod correlation;
pub use correlation::{correlate, pearson_correlation, Correlation};

// Activity summarization
pub mod summary;
#[cfg(feature = "parallel")]
pub use summary::summarize_batch;
pub use summary::{summarize, ActivitySummary, SummaryConfig};

// FIT decoding
#[cfg(feature = "fit")]
pub mod fit;
#[cfg(feature = "fit")]
pub use fit::{decode_activity, DecodedActivity};

// ============================================================================
// Core Types
// ============================================================================

/// A GPS coordinate in degrees. NaN marks a missing coordinate.
///
/// # Example
/// ```
/// use fit_summary::GpsPoint;
/// let point = GpsPoint::new(51.5074, -0.1278); // London
/// assert!(point.has_fix());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GpsPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsPoint {
    /// Create a new GPS point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both coordinates were recorded.
    pub fn has_fix(&self) -> bool {
        !self.latitude.is_nan() && !self.longitude.is_nan()
    }
}

/// One decoded device record, with every field already converted to its
/// canonical unit.
///
/// Unrecorded fields are NaN or the field's sentinel value. Unit
/// conversion happens when records are built, never during summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub timestamp: DateTime<Utc>,
    /// Beats per minute
    pub heart_rate: f64,
    /// Degrees Celsius
    pub temperature: f64,
    /// Meters, already scaled by the decoder
    pub altitude: f64,
    /// Revolutions per minute
    pub cadence: f64,
    /// Centimeters
    pub distance: f64,
    /// Millimeters per second
    pub speed: f64,
    /// Degrees
    pub latitude: f64,
    /// Degrees
    pub longitude: f64,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            timestamp: DateTime::<Utc>::default(),
            heart_rate: f64::NAN,
            temperature: f64::NAN,
            altitude: f64::NAN,
            cadence: f64::NAN,
            distance: f64::NAN,
            speed: f64::NAN,
            latitude: f64::NAN,
            longitude: f64::NAN,
        }
    }
}

impl Record {
    /// Create an empty record at `timestamp`.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Self::default()
        }
    }

    /// Position of this record. May lack a fix.
    pub fn position(&self) -> GpsPoint {
        GpsPoint::new(self.latitude, self.longitude)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gps_point_fix() {
        assert!(GpsPoint::new(51.5074, -0.1278).has_fix());
        assert!(GpsPoint::new(0.0, 0.0).has_fix());
        assert!(!GpsPoint::new(f64::NAN, 0.0).has_fix());
        assert!(!GpsPoint::new(0.0, f64::NAN).has_fix());
    }

    #[test]
    fn test_default_record_is_unrecorded() {
        let record = Record::default();
        assert_eq!(record.timestamp.timestamp(), 0);
        assert!(record.heart_rate.is_nan());
        assert!(!record.position().has_fix());
    }

    #[test]
    fn test_record_at() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let record = Record::at(ts);
        assert_eq!(record.timestamp, ts);
        assert!(record.speed.is_nan());
    }
}
