//! Unified error handling for the fit-summary library.
//!
//! Only precondition failures surface to callers. Per-record failures are
//! reported through [`SummaryError::Geodesic`] and recovered by the summarizer,
//! and sparse data is never an error.

use thiserror::Error;

/// Unified error type for summarization operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SummaryError {
    /// The activity has no records, so it has no start or end timestamp
    #[error("activity contains no records")]
    NoRecords,
    /// A category label that is not one of the known labels
    #[error("unknown activity category '{label}'")]
    UnknownCategory { label: String },
    /// Geodesic distance calculation failed for a single record
    #[error("geodesic distance at record {index}: {message}")]
    Geodesic { index: usize, message: String },
    /// Configuration could not be loaded
    #[error("configuration error: {message}")]
    Config { message: String },
    /// FIT decoding failed
    #[error("decode error: {message}")]
    Decode { message: String },
    /// Summary could not be serialized
    #[error("serialization error: {message}")]
    Serialization { message: String },
}

/// Result type alias for summarization operations.
pub type Result<T> = std::result::Result<T, SummaryError>;

/// Extension trait for converting Option to SummaryError.
pub trait OptionExt<T> {
    /// Convert Option to Result with a no-records error.
    fn ok_or_no_records(self) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_no_records(self) -> Result<T> {
        self.ok_or(SummaryError::NoRecords)
    }
}

impl From<serde_json::Error> for SummaryError {
    fn from(err: serde_json::Error) -> Self {
        SummaryError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SummaryError::Geodesic {
            index: 7,
            message: "failed to converge".to_string(),
        };
        assert!(err.to_string().contains("record 7"));
        assert!(err.to_string().contains("failed to converge"));

        let err = SummaryError::UnknownCategory {
            label: "curling".to_string(),
        };
        assert_eq!(err.to_string(), "unknown activity category 'curling'");
    }

    #[test]
    fn test_option_ext() {
        let none: Option<i32> = None;
        assert_eq!(none.ok_or_no_records(), Err(SummaryError::NoRecords));
        assert_eq!(Some(3).ok_or_no_records(), Ok(3));
    }
}
