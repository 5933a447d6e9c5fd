//! Per-record value extraction and cross-record state.
//!
//! [`RecordAccumulator::read`] is a fold step: it takes the accumulator and
//! one record, emits every named scalar for that record through an `add`
//! callback, and returns the advanced accumulator. Derived values that need
//! more than one record (distance from the first GPS fix) live here.

use geo::{Point, VincentyDistance};
use log::debug;

use crate::error::{Result, SummaryError};
use crate::{GpsPoint, Record};

/// Speeds above this are "moving", in mm/s (112 mm/s ~= 0.25 mph).
pub const MOVING_SPEED_THRESHOLD: f64 = 112.0;

/// Records to search for a first position fix before giving up.
pub const POSITION_SEARCH_LIMIT: usize = 60;

/// Geodesic distances are stored in centimeters.
pub const CENTIMETERS_PER_METER: f64 = 100.0;

/// Ellipsoidal distance in meters between two positions (Vincenty's
/// inverse formula on WGS84).
///
/// # Example
/// ```rust
/// use fit_summary::{reader::geodesic_distance, GpsPoint};
///
/// let a = GpsPoint::new(0.0, 0.0);
/// let b = GpsPoint::new(0.01, 0.0);
/// let meters = geodesic_distance(&a, &b).unwrap();
/// assert!((meters - 1105.74).abs() < 1.0);
/// ```
pub fn geodesic_distance(a: &GpsPoint, b: &GpsPoint) -> Result<f64> {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);
    from.vincenty_distance(&to)
        .map_err(|e| SummaryError::Geodesic {
            index: 0,
            message: e.to_string(),
        })
}

/// State carried from one record to the next within a single activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordAccumulator {
    index: usize,
    start_position: Option<GpsPoint>,
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records read so far.
    pub fn index(&self) -> usize {
        self.index
    }

    /// First valid position of the activity, if one was found in time.
    pub fn start_position(&self) -> Option<GpsPoint> {
        self.start_position
    }

    /// Whether the start position search was abandoned.
    pub fn gave_up(&self) -> bool {
        self.index > POSITION_SEARCH_LIMIT && self.start_position.is_none()
    }

    /// Read one record, emitting its values through `add`, and return the
    /// advanced accumulator. A failed distance calculation drops that one
    /// value and never stops the pass.
    pub fn read<F>(mut self, record: &Record, add: F) -> Self
    where
        F: FnMut(&str, f64),
    {
        if let Err(e) = self.try_read(record, geodesic_distance, add) {
            debug!("[Reader] Skipping derived distance: {}", e);
        }
        self
    }

    /// Read one record with an explicit distance function (meters), returning
    /// the distance error instead of swallowing it. The accumulator is
    /// advanced either way.
    pub fn try_read<D, F>(&mut self, record: &Record, distance: D, mut add: F) -> Result<()>
    where
        D: Fn(&GpsPoint, &GpsPoint) -> Result<f64>,
        F: FnMut(&str, f64),
    {
        self.index += 1;

        add("altitude", record.altitude);
        add("cadence", record.cadence);
        add("distance", record.distance);
        add("heart_rate", record.heart_rate);
        add("latitude", record.latitude);
        add("longitude", record.longitude);
        add("speed", record.speed);
        add("temperature", record.temperature);

        if record.speed > MOVING_SPEED_THRESHOLD {
            add("moving_speed", record.speed);
        } else {
            add("moving_speed", f64::NAN);
        }

        // no fix within the search window, stop looking
        if self.gave_up() {
            return Ok(());
        }

        let position = record.position();
        if !position.has_fix() {
            return Ok(());
        }

        let start = match self.start_position {
            Some(start) => start,
            None => {
                self.start_position = Some(position);
                return Ok(());
            }
        };

        let meters = distance(&start, &position).map_err(|e| match e {
            SummaryError::Geodesic { message, .. } => SummaryError::Geodesic {
                index: self.index,
                message,
            },
            other => other,
        })?;
        add("vicenty_distance", meters * CENTIMETERS_PER_METER);

        Ok(())
    }
}

/// Fold one record into the accumulator. See [`RecordAccumulator::read`].
pub fn read_record<F>(accumulator: RecordAccumulator, record: &Record, add: F) -> RecordAccumulator
where
    F: FnMut(&str, f64),
{
    accumulator.read(record, add)
}
