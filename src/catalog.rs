//! Activity categories and the measurements tracked for each of them.
//!
//! Every measurement has a fixed canonical unit and sentinel. Which
//! measurements apply depends on the activity category:
//! - the base set applies to every activity,
//! - the sport set applies to everything except daily monitoring and
//!   all-day tracking,
//! - the cycling set applies to cycling only.
//!
//! ## Example
//! ```rust
//! use fit_summary::{ActivityCategory, MeasurementCatalog};
//!
//! let catalog = MeasurementCatalog::for_category(ActivityCategory::Cycle);
//! assert!(catalog.get("cadence").is_some());
//!
//! let catalog = MeasurementCatalog::for_category(ActivityCategory::Monitor);
//! assert!(catalog.get("speed").is_none());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SummaryError};

/// Unit and sentinel for one measurement name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementSpec {
    pub unit: &'static str,
    /// Raw values at or above this are "not recorded"
    pub sentinel: u64,
}

impl MeasurementSpec {
    const fn new(unit: &'static str, sentinel: u64) -> Self {
        Self { unit, sentinel }
    }
}

/// Measurements present for every activity.
pub const BASE_MEASUREMENTS: &[(&str, MeasurementSpec)] = &[
    ("altitude", MeasurementSpec::new("meter", 0xFFFF_FFFF)),
    ("heart_rate", MeasurementSpec::new("1 / minute", 0xFF)),
    ("temperature", MeasurementSpec::new("degrees Celsius", 0x7F)),
];

/// Measurements present for sport activities.
pub const SPORT_MEASUREMENTS: &[(&str, MeasurementSpec)] = &[
    ("distance", MeasurementSpec::new("centimeter", 0xFFFF_FFFF)),
    ("latitude", MeasurementSpec::new("degrees", 0xFF)),
    ("longitude", MeasurementSpec::new("degrees", 0xFF)),
    ("moving_speed", MeasurementSpec::new("millimeter / second", 0xFFFF_FFFF)),
    ("speed", MeasurementSpec::new("millimeter / second", 0xFFFF_FFFF)),
    ("vicenty_distance", MeasurementSpec::new("centimeter", 0xFFFF_FFFF)),
];

/// Measurements present for cycling only.
pub const CYCLING_MEASUREMENTS: &[(&str, MeasurementSpec)] =
    &[("cadence", MeasurementSpec::new("1 / minute", 0xFF))];

/// Coarse classification of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    /// All-day tracking
    Track,
    Football,
    Basketball,
    Cycle,
    Cooldown,
    Hike,
    Iceskate,
    Kayak,
    /// Mountain biking
    Mountain,
    Openwater,
    Swim,
    Run,
    Paddleboard,
    Ski,
    Snowboard,
    Soccer,
    Strength,
    Tennis,
    Treadmill,
    Walk,
    Yoga,
    /// Background/daily monitoring, the only non-sport category
    Monitor,
    Unknown,
}

/// Sport names reported by devices, including custom activity names.
const SPORT_NAMES: &[(&str, ActivityCategory)] = &[
    ("All-Day Tracking", ActivityCategory::Track),
    ("American Football", ActivityCategory::Football),
    ("Basketball", ActivityCategory::Basketball),
    ("Bike", ActivityCategory::Cycle),
    ("Cooldown", ActivityCategory::Cooldown),
    ("Hike", ActivityCategory::Hike),
    ("Ice Skate", ActivityCategory::Iceskate),
    ("Kayak", ActivityCategory::Kayak),
    ("MTB", ActivityCategory::Mountain),
    ("Open Water", ActivityCategory::Openwater),
    ("Pool Swim", ActivityCategory::Swim),
    ("Run", ActivityCategory::Run),
    ("SUP", ActivityCategory::Paddleboard),
    ("Ski", ActivityCategory::Ski),
    ("Snowboard", ActivityCategory::Snowboard),
    ("Soccer", ActivityCategory::Soccer),
    ("Strength", ActivityCategory::Strength),
    ("Tennis", ActivityCategory::Tennis),
    ("Treadmill", ActivityCategory::Treadmill),
    ("Walk", ActivityCategory::Walk),
    ("Yoga", ActivityCategory::Yoga),
];

const ALL_CATEGORIES: &[ActivityCategory] = &[
    ActivityCategory::Track,
    ActivityCategory::Football,
    ActivityCategory::Basketball,
    ActivityCategory::Cycle,
    ActivityCategory::Cooldown,
    ActivityCategory::Hike,
    ActivityCategory::Iceskate,
    ActivityCategory::Kayak,
    ActivityCategory::Mountain,
    ActivityCategory::Openwater,
    ActivityCategory::Swim,
    ActivityCategory::Run,
    ActivityCategory::Paddleboard,
    ActivityCategory::Ski,
    ActivityCategory::Snowboard,
    ActivityCategory::Soccer,
    ActivityCategory::Strength,
    ActivityCategory::Tennis,
    ActivityCategory::Treadmill,
    ActivityCategory::Walk,
    ActivityCategory::Yoga,
    ActivityCategory::Monitor,
    ActivityCategory::Unknown,
];

impl ActivityCategory {
    /// Map a device sport name to a category. Unrecognized names are
    /// `Unknown`.
    pub fn from_sport_name(name: &str) -> Self {
        SPORT_NAMES
            .iter()
            .find(|(sport, _)| *sport == name)
            .map(|(_, category)| *category)
            .unwrap_or(ActivityCategory::Unknown)
    }

    /// Short label used in summaries, e.g. "cycle".
    pub fn label(&self) -> &'static str {
        match self {
            ActivityCategory::Track => "track",
            ActivityCategory::Football => "football",
            ActivityCategory::Basketball => "basketball",
            ActivityCategory::Cycle => "cycle",
            ActivityCategory::Cooldown => "cooldown",
            ActivityCategory::Hike => "hike",
            ActivityCategory::Iceskate => "iceskate",
            ActivityCategory::Kayak => "kayak",
            ActivityCategory::Mountain => "mountain",
            ActivityCategory::Openwater => "openwater",
            ActivityCategory::Swim => "swim",
            ActivityCategory::Run => "run",
            ActivityCategory::Paddleboard => "paddleboard",
            ActivityCategory::Ski => "ski",
            ActivityCategory::Snowboard => "snowboard",
            ActivityCategory::Soccer => "soccer",
            ActivityCategory::Strength => "strength",
            ActivityCategory::Tennis => "tennis",
            ActivityCategory::Treadmill => "treadmill",
            ActivityCategory::Walk => "walk",
            ActivityCategory::Yoga => "yoga",
            ActivityCategory::Monitor => "monitor",
            ActivityCategory::Unknown => "unknown",
        }
    }

    /// Whether the sport measurement set applies.
    pub fn is_sport(&self) -> bool {
        !matches!(self, ActivityCategory::Monitor | ActivityCategory::Track)
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityCategory {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self> {
        ALL_CATEGORIES
            .iter()
            .copied()
            .find(|c| c.label() == s)
            .ok_or_else(|| SummaryError::UnknownCategory {
                label: s.to_string(),
            })
    }
}

/// The measurements that apply to one activity, with their units and
/// sentinels. Built once per summarization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementCatalog {
    entries: Vec<(&'static str, MeasurementSpec)>,
}

impl MeasurementCatalog {
    /// Select the base, sport and cycling sets that apply to `category`.
    pub fn for_category(category: ActivityCategory) -> Self {
        let mut entries: Vec<(&'static str, MeasurementSpec)> = BASE_MEASUREMENTS.to_vec();
        if category.is_sport() {
            entries.extend_from_slice(SPORT_MEASUREMENTS);
        }
        if category == ActivityCategory::Cycle {
            entries.extend_from_slice(CYCLING_MEASUREMENTS);
        }
        Self { entries }
    }

    /// Every measurement known to any category.
    pub fn all() -> Self {
        let mut entries = BASE_MEASUREMENTS.to_vec();
        entries.extend_from_slice(SPORT_MEASUREMENTS);
        entries.extend_from_slice(CYCLING_MEASUREMENTS);
        Self { entries }
    }

    /// Look up the unit and sentinel for a measurement name.
    pub fn get(&self, name: &str) -> Option<MeasurementSpec> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, spec)| *spec)
    }

    /// Measurement names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
