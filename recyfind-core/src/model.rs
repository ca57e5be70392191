//! Domain data structures for regions, reference coordinates, and raw center records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier for a region served by one source.
pub struct RegionId(pub String);

impl fmt::Display for RegionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a region and its human-friendly name.
pub struct RegionMeta {
    /// Unique identifier.
    pub id: RegionId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier of a recycling center within its source.
pub struct LocationId(pub String);

impl fmt::Display for LocationId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Reference point in conventional latitude/longitude order.
pub struct Coordinates {
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Raw opening hours for one day as `HHMM` integers (`830`, `1730`).
pub struct DayHours {
    /// Opening time.
    pub open: u32,
    /// Closing time.
    pub close: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Recycling center as delivered by a source, before any derivation.
///
/// Text fields use a single space as the "blank" sentinel upstream; `None`
/// and whitespace-only values are treated the same way.
pub struct CenterRecord {
    /// Source-assigned identifier.
    pub id: LocationId,
    /// Center name.
    pub name: String,
    /// Operating company, appended to the name when present.
    pub company: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Free-text location hint (e.g. "behind the fire station").
    pub location: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Weekday label such as "Mon-Fri".
    pub days: Option<String>,
    /// Weekday hours label such as "8am-5pm".
    pub hours: Option<String>,
    /// Weekend label such as "Sat".
    pub weekend: Option<String>,
    /// Weekend hours label.
    pub weekend_hours: Option<String>,
    /// Weekly schedule text, e.g. `"Mon-Fri 08:00-17:00; Sat 08:00-12:00"`.
    pub schedule: Option<String>,
    /// Per-day hours keyed by Sunday-first day index (`0` is Sunday).
    pub per_day_hours: BTreeMap<u8, DayHours>,
    /// Stored coordinate pair in `[lng, lat]` order.
    pub geometry: [f64; 2],
}

