//! Traits describing source capabilities and shared error types.

use std::io::Error as IoError;

use serde_json::Error as JsonError;

use crate::model::{CenterRecord, LocationId, RegionMeta};
use crate::schedule::ScheduleError;

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while loading centers from a source.
pub enum PortError {
    /// Reading the source failed.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),
    /// The source payload is not valid JSON for the expected shape.
    #[error("Decode error: {0}")]
    Decode(#[from] JsonError),
    /// A record's schedule text is malformed.
    #[error("Invalid schedule for center {id}: {source}")]
    Schedule {
        /// Record whose schedule failed to parse.
        id: LocationId,
        /// Underlying parse failure.
        source: ScheduleError,
    },
    /// A record carries data that cannot be interpreted.
    #[error("Invalid record {id}: {reason}")]
    InvalidRecord {
        /// Offending record.
        id: LocationId,
        /// What is wrong with it.
        reason: String,
    },
    /// The region has no registered source.
    #[error("Unsupported region")]
    UnsupportedRegion,
}

/// Trait for region-specific sources of recycling center records.
pub trait CenterPort: Send + Sync {
    /// Metadata describing the region handled by this port.
    fn region(&self) -> &RegionMeta;

    /// Load every center record of the region.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the source cannot be read or decoded.
    fn centers(&self) -> Result<Vec<CenterRecord>, PortError>;
}
