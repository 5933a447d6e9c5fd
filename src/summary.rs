//! Activity summarization.
//!
//! One call to [`summarize`] is one pass over an activity's records:
//! 1. Select the measurements that apply to the activity category
//! 2. Fold every record through the [`RecordAccumulator`]
//! 3. Finalize each measurement, dropping the ones too sparse to summarize
//! 4. Correlate the configured measurement pairs
//!
//! Nothing is shared between passes, so independent activities can be
//! summarized concurrently (see `summarize_batch` with the `parallel`
//! feature).

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::catalog::MeasurementCatalog;
use crate::correlation::{correlate, Correlation};
use crate::error::{OptionExt, Result, SummaryError};
use crate::{ActivityCategory, Measurement, Record, RecordAccumulator};

/// Measurement pairs correlated by default.
pub const DEFAULT_CORRELATES: &[(&str, &str)] = &[
    ("heart_rate", "cadence"),
    ("heart_rate", "speed"),
    ("cadence", "speed"),
];

/// Per-call summarization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Measurement names to track. Names that do not apply to the
    /// activity category are ignored.
    /// Default: every known measurement
    pub measurements: Vec<String>,

    /// Measurement pairs to correlate, in output order. (a, b) and (b, a)
    /// are separate pairs.
    /// Default: heart_rate/cadence, heart_rate/speed, cadence/speed
    pub correlates: Vec<(String, String)>,

    /// Copied verbatim into the summary, e.g. the device name.
    /// Default: empty
    pub tags: BTreeMap<String, String>,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        let catalog = MeasurementCatalog::all();
        Self {
            measurements: catalog.names().map(str::to_string).collect(),
            correlates: DEFAULT_CORRELATES
                .iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
            tags: BTreeMap::new(),
        }
    }
}

impl SummaryConfig {
    /// Load a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SummaryError::Config {
            message: e.to_string(),
        })
    }

    /// Add a tag, replacing any previous value.
    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }
}

/// Statistical summary of one activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySummary {
    #[serde(rename = "type")]
    pub category: ActivityCategory,
    /// Timestamp of the first record
    pub start_time: DateTime<Utc>,
    /// Timestamp of the last record
    pub end_time: DateTime<Utc>,
    /// Measurements with enough data, in configuration order
    pub measurements: Vec<Measurement>,
    /// Correlations that produced a coefficient, in configuration order
    pub correlations: Vec<Correlation>,
    pub tags: BTreeMap<String, String>,
}

impl ActivitySummary {
    /// Find a finalized measurement by name.
    pub fn measurement(&self, name: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.name == name)
    }

    /// Find the correlation for the ordered pair (a, b).
    pub fn correlation(&self, a: &str, b: &str) -> Option<&Correlation> {
        self.correlations
            .iter()
            .find(|c| c.measurement_a == a && c.measurement_b == b)
    }

    /// Serialize to a JSON string. Non-finite statistics become `null`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Summarize one activity.
///
/// Fails only if `records` is empty. Measurements that end up too sparse and
/// pairs without a coefficient are left out of the result.
pub fn summarize(
    category: ActivityCategory,
    records: &[Record],
    config: &SummaryConfig,
) -> Result<ActivitySummary> {
    let first = records.first().ok_or_no_records()?;
    let last = records.last().ok_or_no_records()?;

    let catalog = MeasurementCatalog::for_category(category);
    let mut measurements: Vec<Measurement> = Vec::with_capacity(config.measurements.len());
    let mut lookup: HashMap<String, usize> = HashMap::with_capacity(config.measurements.len());
    for name in &config.measurements {
        if lookup.contains_key(name) {
            continue;
        }
        if let Some(spec) = catalog.get(name) {
            lookup.insert(name.clone(), measurements.len());
            measurements.push(Measurement::new(name, spec.unit, spec.sentinel));
        }
    }

    let accumulator = records
        .iter()
        .fold(RecordAccumulator::new(), |acc, record| {
            acc.read(record, |name, value| {
                if let Some(&i) = lookup.get(name) {
                    measurements[i].add(value);
                }
            })
        });

    let mut finalized = Vec::with_capacity(measurements.len());
    for measurement in measurements {
        let (measurement, ok) = measurement.finalize();
        if ok {
            finalized.push(measurement);
        } else {
            debug!(
                "[Summary] Dropping sparse measurement '{}' ({} values, {} set)",
                measurement.name,
                measurement.values().len(),
                measurement.count()
            );
        }
    }

    let correlations: Vec<Correlation> = config
        .correlates
        .iter()
        .filter_map(|(a, b)| {
            let ma = finalized.iter().find(|m| &m.name == a)?;
            let mb = finalized.iter().find(|m| &m.name == b)?;
            correlate(ma, mb)
        })
        .collect();

    info!(
        "[Summary] {} activity: {} records, {} measurements, {} correlations, start fix: {}",
        category,
        accumulator.index(),
        finalized.len(),
        correlations.len(),
        accumulator.start_position().is_some()
    );

    Ok(ActivitySummary {
        category,
        start_time: first.timestamp,
        end_time: last.timestamp,
        measurements: finalized,
        correlations,
        tags: config.tags.clone(),
    })
}

/// Summarize independent activities in parallel.
///
/// Each activity gets its own pass; results are returned in input order and
/// nothing is combined across activities.
#[cfg(feature = "parallel")]
pub fn summarize_batch(
    activities: &[(ActivityCategory, Vec<Record>)],
    config: &SummaryConfig,
) -> Vec<Result<ActivitySummary>> {
    activities
        .par_iter()
        .map(|(category, records)| summarize(*category, records, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seconds: i64) -> Record {
        Record::at(DateTime::from_timestamp(1_700_000_000 + seconds, 0).unwrap())
    }

    fn heart_rate_records(values: &[f64]) -> Vec<Record> {
        values
            .iter()
            .enumerate()
            .map(|(i, &hr)| Record {
                heart_rate: hr,
                ..record(i as i64)
            })
            .collect()
    }

    #[test]
    fn test_no_records_is_an_error() {
        let result = summarize(ActivityCategory::Run, &[], &SummaryConfig::default());
        assert!(matches!(result, Err(SummaryError::NoRecords)));
    }

    #[test]
    fn test_heart_rate_summary() {
        let records = heart_rate_records(&[120.0, 255.0, 140.0]);
        let summary = summarize(ActivityCategory::Walk, &records, &SummaryConfig::default()).unwrap();

        let hr = summary.measurement("heart_rate").unwrap();
        assert_eq!(hr.count(), 2);
        assert_eq!(hr.mean, 130.0);
        assert_eq!(hr.minimum, 120.0);
        assert_eq!(hr.maximum, 140.0);
        assert_eq!(hr.values().len(), 3);

        assert_eq!(summary.start_time, records[0].timestamp);
        assert_eq!(summary.end_time, records[2].timestamp);
        assert_eq!(summary.category, ActivityCategory::Walk);
    }

    #[test]
    fn test_unpopulated_measurements_are_absent() {
        let records = heart_rate_records(&[120.0, 130.0, 140.0]);
        let summary = summarize(ActivityCategory::Cycle, &records, &SummaryConfig::default()).unwrap();

        assert_eq!(summary.measurements.len(), 1);
        assert!(summary.measurement("cadence").is_none());
        assert!(summary.correlations.is_empty());
    }

    #[test]
    fn test_category_limits_measurements() {
        let records: Vec<Record> = (0..4)
            .map(|i| Record {
                heart_rate: 100.0 + i as f64,
                cadence: 80.0 + i as f64,
                speed: 2000.0 + i as f64 * 10.0,
                ..record(i)
            })
            .collect();

        let cycle = summarize(ActivityCategory::Cycle, &records, &SummaryConfig::default()).unwrap();
        assert!(cycle.measurement("cadence").is_some());
        assert!(cycle.measurement("speed").is_some());
        assert_eq!(cycle.correlations.len(), 3);

        let run = summarize(ActivityCategory::Run, &records, &SummaryConfig::default()).unwrap();
        assert!(run.measurement("cadence").is_none());
        assert!(run.correlation("heart_rate", "speed").is_some());
        assert!(run.correlation("heart_rate", "cadence").is_none());

        let monitor = summarize(ActivityCategory::Monitor, &records, &SummaryConfig::default()).unwrap();
        assert!(monitor.measurement("speed").is_none());
        assert!(monitor.correlations.is_empty());
    }

    #[test]
    fn test_config_selects_and_orders() {
        let records: Vec<Record> = (0..3)
            .map(|i| Record {
                heart_rate: 100.0 + i as f64,
                temperature: 20.0 - i as f64,
                ..record(i)
            })
            .collect();
        let config = SummaryConfig {
            measurements: vec![
                "temperature".to_string(),
                "heart_rate".to_string(),
                "temperature".to_string(),
                "not_a_measurement".to_string(),
            ],
            correlates: vec![
                ("heart_rate".to_string(), "temperature".to_string()),
                ("temperature".to_string(), "heart_rate".to_string()),
            ],
            tags: BTreeMap::new(),
        }
        .with_tag("device", "edge530");

        let summary = summarize(ActivityCategory::Run, &records, &config).unwrap();
        let names: Vec<&str> = summary.measurements.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["temperature", "heart_rate"]);

        assert_eq!(summary.correlations.len(), 2);
        let c = summary.correlation("heart_rate", "temperature").unwrap();
        assert!((c.correlation + 1.0).abs() < 1e-12);
        assert_eq!(summary.tags.get("device").map(String::as_str), Some("edge530"));
    }

    #[test]
    fn test_config_from_json_defaults() {
        let config = SummaryConfig::from_json(r#"{"tags": {"device": "fenix"}}"#).unwrap();
        assert_eq!(config.measurements, SummaryConfig::default().measurements);
        assert!(config
            .measurements
            .iter()
            .map(String::as_str)
            .eq(MeasurementCatalog::all().names()));
        assert_eq!(config.correlates.len(), 3);
        assert_eq!(config.tags["device"], "fenix");

        let err = SummaryConfig::from_json("{").unwrap_err();
        assert!(matches!(err, SummaryError::Config { .. }));
    }

    #[test]
    fn test_summary_json_shape() {
        let records = heart_rate_records(&[120.0, 140.0]);
        let config = SummaryConfig::default().with_tag("device", "edge530");
        let summary = summarize(ActivityCategory::Cycle, &records, &config).unwrap();

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "cycle");
        assert_eq!(json["measurements"][0]["name"], "heart_rate");
        assert_eq!(json["measurements"][0]["median"], 130.0);
        assert_eq!(json["tags"]["device"], "edge530");
        assert!(json["correlations"].as_array().unwrap().is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_batch_keeps_activities_separate() {
        let activities = vec![
            (ActivityCategory::Run, heart_rate_records(&[100.0, 110.0])),
            (ActivityCategory::Run, Vec::new()),
            (ActivityCategory::Walk, heart_rate_records(&[60.0, 80.0])),
        ];
        let results = summarize_batch(&activities, &SummaryConfig::default());

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().measurement("heart_rate").unwrap().mean, 105.0);
        assert!(matches!(results[1], Err(SummaryError::NoRecords)));
        assert_eq!(results[2].as_ref().unwrap().measurement("heart_rate").unwrap().mean, 70.0);
    }
}
