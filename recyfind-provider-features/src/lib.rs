//! Source reading recycling centers from attribute/geometry feature collections.
//!
//! The payload is the JSON export of a municipal GIS layer:
//!
//! ```json
//! { "features": [ { "attributes": { "ID": 7, "NAME": "...", ... },
//!                   "geometry": [-122.41, 37.77] } ] }
//! ```
//!
//! Attribute names are the layer's truncated column names (`DESCRIPTIO`,
//! `WEEKEND_HO`). Geometry is `[lng, lat]` or an `{x, y}` point, either on the
//! feature or inside its attributes.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use recyfind_core::{
    model::{CenterRecord, DayHours, LocationId, RegionId, RegionMeta},
    plugin::RegionPlugin,
    ports::{CenterPort, PortError},
};

/// Top-level feature collection.
#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

/// Single feature: attribute table row plus its point.
#[derive(Debug, Deserialize)]
struct Feature {
    attributes: Attributes,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Geometry {
    // Stored order is longitude first.
    LngLat([f64; 2]),
    Point { x: f64, y: f64 },
}

impl Geometry {
    fn lng_lat(&self) -> [f64; 2] {
        match *self {
            Self::LngLat(pair) => pair,
            Self::Point { x, y } => [x, y],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Per-day hours, either a seven-slot array with nulls or an object keyed by
/// Sunday-first day index.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HoursTable {
    Slots(Vec<Option<DayHours>>),
    Keyed(BTreeMap<String, DayHours>),
}

#[derive(Debug, Deserialize)]
struct Attributes {
    #[serde(rename = "ID")]
    id: RawId,
    #[serde(rename = "NAME")]
    name: String,
    #[serde(rename = "COMPANY", default)]
    company: Option<String>,
    #[serde(rename = "DESCRIPTIO", default)]
    description: Option<String>,
    #[serde(rename = "LOCATION", default)]
    location: Option<String>,
    #[serde(rename = "ADDRESS", default)]
    address: Option<String>,
    #[serde(rename = "DAYS", default)]
    days: Option<String>,
    #[serde(rename = "HOURS", default)]
    hours: Option<String>,
    #[serde(rename = "WEEKEND", default)]
    weekend: Option<String>,
    #[serde(rename = "WEEKEND_HO", default)]
    weekend_hours: Option<String>,
    #[serde(rename = "SCHEDULE", default)]
    schedule: Option<String>,
    #[serde(rename = "hours", default)]
    per_day_hours: Option<HoursTable>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

/// Where the feature collection text comes from.
#[derive(Debug, Clone)]
pub enum FeatureSource {
    /// JSON file read on every load, so edits are picked up.
    File(PathBuf),
    /// JSON text held in memory.
    Inline(String),
}

/// Center source for a region backed by one feature collection.
pub struct FeatureFilePort {
    meta: RegionMeta,
    source: FeatureSource,
}

impl FeatureFilePort {
    /// Create a port reading the collection from `path`.
    #[must_use]
    pub fn open(meta: RegionMeta, path: impl Into<PathBuf>) -> Self {
        Self {
            meta,
            source: FeatureSource::File(path.into()),
        }
    }

    /// Create a port serving an in-memory collection.
    #[must_use]
    pub fn from_json(meta: RegionMeta, text: impl Into<String>) -> Self {
        Self {
            meta,
            source: FeatureSource::Inline(text.into()),
        }
    }
}

impl CenterPort for FeatureFilePort {
    fn region(&self) -> &RegionMeta {
        &self.meta
    }

    fn centers(&self) -> Result<Vec<CenterRecord>, PortError> {
        let text = match &self.source {
            FeatureSource::File(path) => Cow::Owned(fs::read_to_string(path)?),
            FeatureSource::Inline(text) => Cow::Borrowed(text.as_str()),
        };
        let records = decode_features(&text)?;
        debug!(region = %self.meta.id, count = records.len(), "decoded feature collection");
        Ok(records)
    }
}

/// Decode a feature collection into center records.
///
/// # Errors
///
/// Returns [`PortError::Decode`] for malformed JSON and
/// [`PortError::InvalidRecord`] for a feature without geometry or with an
/// unusable per-day hours key.
pub fn decode_features(text: &str) -> Result<Vec<CenterRecord>, PortError> {
    let collection: FeatureCollection = serde_json::from_str(text)?;
    collection
        .features
        .into_iter()
        .map(into_record)
        .collect()
}

fn into_record(feature: Feature) -> Result<CenterRecord, PortError> {
    let Feature {
        attributes,
        geometry,
    } = feature;

    let id = LocationId(match attributes.id {
        RawId::Number(number) => number.to_string(),
        RawId::Text(text) => text,
    });
    let invalid = |reason: &str| PortError::InvalidRecord {
        id: id.clone(),
        reason: reason.to_owned(),
    };

    let geometry = geometry
        .or(attributes.geometry)
        .ok_or_else(|| invalid("missing geometry"))?
        .lng_lat();

    let per_day_hours: BTreeMap<u8, DayHours> = match attributes.per_day_hours {
        None => BTreeMap::new(),
        Some(HoursTable::Slots(slots)) => slots
            .into_iter()
            .enumerate()
            .filter_map(|(index, hours)| Some((index, hours?)))
            .map(|(index, hours)| {
                u8::try_from(index)
                    .map(|day| (day, hours))
                    .map_err(|_overflow| invalid("too many per-day hours slots"))
            })
            .collect::<Result<_, _>>()?,
        Some(HoursTable::Keyed(keyed)) => keyed
            .into_iter()
            .map(|(key, hours)| {
                key.trim()
                    .parse::<u8>()
                    .map(|day| (day, hours))
                    .map_err(|_parse_error| invalid("per-day hours key is not a day index"))
            })
            .collect::<Result<_, _>>()?,
    };

    Ok(CenterRecord {
        id,
        name: attributes.name,
        company: attributes.company,
        description: attributes.description,
        location: attributes.location,
        address: attributes.address,
        days: attributes.days,
        hours: attributes.hours,
        weekend: attributes.weekend,
        weekend_hours: attributes.weekend_hours,
        schedule: attributes.schedule,
        per_day_hours,
        geometry,
    })
}

/// Build region metadata from an id and display name.
#[must_use]
pub fn region_meta(id: &str, name: &str) -> RegionMeta {
    RegionMeta {
        id: RegionId(id.to_owned()),
        name: name.to_owned(),
    }
}

/// Build the plugin bundle for a region backed by the file at `path`.
#[must_use]
pub fn plugin(meta: RegionMeta, path: impl Into<PathBuf>) -> RegionPlugin {
    let center_port = Arc::new(FeatureFilePort::open(meta.clone(), path));
    RegionPlugin { meta, center_port }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION: &str = r#"{
        "features": [
            {
                "attributes": {
                    "ID": 12,
                    "NAME": "Northgate Recycling",
                    "COMPANY": " ",
                    "DESCRIPTIO": "Cardboard, glass, metals",
                    "ADDRESS": "500 North Rd",
                    "DAYS": "Mon-Fri",
                    "HOURS": "8am-5pm",
                    "WEEKEND": "Sat",
                    "WEEKEND_HO": "9am-noon",
                    "SCHEDULE": "Mon-Fri 08:00-17:00; Sat 09:00-12:00",
                    "hours": [null, {"open": 800, "close": 1700}, null, null, null, null, {"open": 900, "close": 1200}]
                },
                "geometry": [-122.27, 37.80]
            },
            {
                "attributes": {
                    "ID": "south-7",
                    "NAME": "South Depot",
                    "hours": {"3": {"open": 1000, "close": 1400}},
                    "geometry": {"x": -122.3, "y": 37.7}
                }
            }
        ]
    }"#;

    #[test]
    fn decodes_attribute_columns() {
        let records = decode_features(COLLECTION).unwrap();
        assert_eq!(records.len(), 2);

        let north = &records[0];
        assert_eq!(north.id, LocationId("12".to_owned()));
        assert_eq!(north.name, "Northgate Recycling");
        assert_eq!(north.company.as_deref(), Some(" "));
        assert_eq!(north.weekend_hours.as_deref(), Some("9am-noon"));
        assert_eq!(
            north.schedule.as_deref(),
            Some("Mon-Fri 08:00-17:00; Sat 09:00-12:00")
        );
        assert_eq!(north.geometry, [-122.27, 37.80]);
    }

    #[test]
    fn decodes_both_per_day_hours_layouts() {
        let records = decode_features(COLLECTION).unwrap();

        let slots = &records[0].per_day_hours;
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.get(&1), Some(&DayHours { open: 800, close: 1700 }));
        assert_eq!(slots.get(&6), Some(&DayHours { open: 900, close: 1200 }));

        let keyed = &records[1].per_day_hours;
        assert_eq!(keyed.get(&3), Some(&DayHours { open: 1000, close: 1400 }));
    }

    #[test]
    fn reads_point_geometry_from_attributes() {
        let records = decode_features(COLLECTION).unwrap();
        assert_eq!(records[1].id, LocationId("south-7".to_owned()));
        assert_eq!(records[1].geometry, [-122.3, 37.7]);
    }

    #[test]
    fn rejects_feature_without_geometry() {
        let text = r#"{"features": [{"attributes": {"ID": 1, "NAME": "Nowhere"}}]}"#;
        assert!(matches!(
            decode_features(text),
            Err(PortError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_day_keys() {
        let text = r#"{"features": [{
            "attributes": {"ID": 1, "NAME": "X", "hours": {"mon": {"open": 800, "close": 900}}},
            "geometry": [0.0, 0.0]
        }]}"#;
        assert!(matches!(
            decode_features(text),
            Err(PortError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(decode_features("{"), Err(PortError::Decode(_))));
    }

    #[test]
    fn inline_port_serves_its_region() {
        let port = FeatureFilePort::from_json(region_meta("north", "North County"), COLLECTION);
        assert_eq!(port.region().name, "North County");
        assert_eq!(port.centers().unwrap().len(), 2);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let port = FeatureFilePort::open(
            region_meta("gone", "Gone"),
            "/nonexistent/recyfind/centers.json",
        );
        assert!(matches!(port.centers(), Err(PortError::Io(_))));
    }
}
