//! FIT file decoding into summary records.
//!
//! Decoding is done by `fitparser`, which applies the FIT profile's scale and
//! offset. This module only picks the record fields the summarizer reads,
//! converts them to their canonical units and works out the activity
//! category.

use chrono::Utc;
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};
use log::{debug, info};

use crate::error::{Result, SummaryError};
use crate::summary::{summarize, ActivitySummary, SummaryConfig};
use crate::{ActivityCategory, Record};

/// Semicircles to degrees: 180 / 2^31.
const DEGREES_PER_SEMICIRCLE: f64 = 180.0 / 2_147_483_648.0;

/// FIT `sport` enum names for activities without a custom sport name.
const SPORT_ENUMS: &[(&str, ActivityCategory)] = &[
    ("american_football", ActivityCategory::Football),
    ("basketball", ActivityCategory::Basketball),
    ("cycling", ActivityCategory::Cycle),
    ("hiking", ActivityCategory::Hike),
    ("ice_skating", ActivityCategory::Iceskate),
    ("kayaking", ActivityCategory::Kayak),
    ("alpine_skiing", ActivityCategory::Ski),
    ("cross_country_skiing", ActivityCategory::Ski),
    ("snowboarding", ActivityCategory::Snowboard),
    ("soccer", ActivityCategory::Soccer),
    ("stand_up_paddleboarding", ActivityCategory::Paddleboard),
    ("running", ActivityCategory::Run),
    ("swimming", ActivityCategory::Swim),
    ("tennis", ActivityCategory::Tennis),
    ("walking", ActivityCategory::Walk),
];

/// Records and category of one decoded FIT file.
#[derive(Debug, Clone)]
pub struct DecodedActivity {
    pub category: ActivityCategory,
    pub records: Vec<Record>,
}

impl DecodedActivity {
    /// Summarize the decoded records.
    pub fn summarize(&self, config: &SummaryConfig) -> Result<ActivitySummary> {
        summarize(self.category, &self.records, config)
    }
}

/// Decode a FIT file.
pub fn decode_activity(bytes: &[u8]) -> Result<DecodedActivity> {
    let messages = fitparser::from_bytes(bytes).map_err(|e| SummaryError::Decode {
        message: e.to_string(),
    })?;

    let category = category_of(&messages);
    let records: Vec<Record> = messages
        .iter()
        .filter(|m| m.kind() == MesgNum::Record)
        .filter_map(record_from)
        .collect();

    info!(
        "[Fit] Decoded {} messages: {} records, category {}",
        messages.len(),
        records.len(),
        category
    );

    Ok(DecodedActivity { category, records })
}

/// Work out the category from the file type and sport messages.
fn category_of(messages: &[FitDataRecord]) -> ActivityCategory {
    let file_type = messages
        .iter()
        .filter(|m| m.kind() == MesgNum::FileId)
        .find_map(|m| string_field(m, "type"));
    if let Some(file_type) = file_type.as_deref() {
        if file_type.starts_with("monitoring") {
            return ActivityCategory::Monitor;
        }
    }

    // custom sport names take precedence over the sport enum
    let sport_name = messages
        .iter()
        .filter(|m| m.kind() == MesgNum::Sport)
        .find_map(|m| string_field(m, "name"));
    if let Some(name) = sport_name {
        let category = ActivityCategory::from_sport_name(&name);
        if category != ActivityCategory::Unknown {
            return category;
        }
        debug!("[Fit] Unmapped sport name '{}'", name);
    }

    messages
        .iter()
        .filter(|m| matches!(m.kind(), MesgNum::Sport | MesgNum::Session))
        .find_map(|m| string_field(m, "sport"))
        .and_then(|sport| {
            SPORT_ENUMS
                .iter()
                .find(|(name, _)| *name == sport)
                .map(|(_, category)| *category)
        })
        .unwrap_or(ActivityCategory::Unknown)
}

/// Convert one `record` message. Records without a timestamp are skipped.
fn record_from(message: &FitDataRecord) -> Option<Record> {
    let mut timestamp = None;
    let mut record = Record::default();
    let mut altitude_priority = 0;
    let mut speed_priority = 0;

    for field in message.fields() {
        let value = field.value();
        match field.name() {
            "timestamp" => {
                if let Value::Timestamp(ts) = value {
                    timestamp = Some(ts.with_timezone(&Utc));
                }
            }
            "heart_rate" => record.heart_rate = value_to_f64(value),
            "temperature" => record.temperature = value_to_f64(value),
            "cadence" => record.cadence = value_to_f64(value),
            // meters to centimeters
            "distance" => record.distance = value_to_f64(value) * 100.0,
            "enhanced_altitude" => {
                record.altitude = value_to_f64(value);
                altitude_priority = 2;
            }
            "altitude" if altitude_priority < 2 => {
                record.altitude = value_to_f64(value);
                altitude_priority = 1;
            }
            // meters per second to millimeters per second
            "enhanced_speed" => {
                record.speed = value_to_f64(value) * 1000.0;
                speed_priority = 2;
            }
            "speed" if speed_priority < 2 => {
                record.speed = value_to_f64(value) * 1000.0;
                speed_priority = 1;
            }
            "position_lat" => record.latitude = value_to_f64(value) * DEGREES_PER_SEMICIRCLE,
            "position_long" => record.longitude = value_to_f64(value) * DEGREES_PER_SEMICIRCLE,
            _ => {}
        }
    }

    record.timestamp = timestamp?;
    Some(record)
}

fn string_field(message: &FitDataRecord, name: &str) -> Option<String> {
    message
        .fields()
        .iter()
        .find(|f| f.name() == name)
        .and_then(|f| match f.value() {
            Value::String(s) => Some(s.clone()),
            _ => None,
        })
}

/// Numeric FIT value as f64. Non-numeric values are NaN.
fn value_to_f64(value: &Value) -> f64 {
    match value {
        Value::Float32(v) => *v as f64,
        Value::Float64(v) => *v,
        Value::SInt8(v) => *v as f64,
        Value::UInt8(v) => *v as f64,
        Value::UInt8z(v) => *v as f64,
        Value::Byte(v) => *v as f64,
        Value::SInt16(v) => *v as f64,
        Value::UInt16(v) => *v as f64,
        Value::UInt16z(v) => *v as f64,
        Value::SInt32(v) => *v as f64,
        Value::UInt32(v) => *v as f64,
        Value::UInt32z(v) => *v as f64,
        Value::SInt64(v) => *v as f64,
        Value::UInt64(v) => *v as f64,
        Value::UInt64z(v) => *v as f64,
        Value::Array(values) => values.first().map(value_to_f64).unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_conversion() {
        assert_eq!(value_to_f64(&Value::UInt8(142)), 142.0);
        assert_eq!(value_to_f64(&Value::SInt8(-3)), -3.0);
        assert_eq!(value_to_f64(&Value::Float64(2.5)), 2.5);
        assert_eq!(
            value_to_f64(&Value::Array(vec![Value::UInt16(7), Value::UInt16(9)])),
            7.0
        );
        assert!(value_to_f64(&Value::String("cycling".to_string())).is_nan());
    }

    #[test]
    fn test_semicircle_conversion() {
        let semicircles = 613_566_757.0; // ~51.43 degrees
        let degrees = semicircles * DEGREES_PER_SEMICIRCLE;
        assert!((degrees - 51.4286).abs() < 1e-3);
        assert_eq!(2_147_483_648.0 * DEGREES_PER_SEMICIRCLE, 180.0);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let err = decode_activity(b"definitely not a fit file").unwrap_err();
        assert!(matches!(err, SummaryError::Decode { .. }));
    }

    #[test]
    fn test_empty_message_list_is_unknown() {
        assert_eq!(category_of(&[]), ActivityCategory::Unknown);
    }
}
