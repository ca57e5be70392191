//! Presentation helpers for a single recycling center.

use chrono::{Datelike, Timelike};
use tracing::warn;

use crate::clock::{ClockTime, TimeRange};
use crate::model::{CenterRecord, Coordinates, LocationId};
use crate::ports::PortError;
use crate::schedule::{Schedule, sunday_index};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Recycling center with its schedule parsed and per-day hours decoded.
///
/// Immutable after construction; every getter is a pure read.
#[derive(Debug, Clone)]
pub struct Location {
    record: CenterRecord,
    schedule: Schedule,
    per_day: [Option<TimeRange>; 7],
}

impl Location {
    /// Build a location from a raw record.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::Schedule`] when the schedule text is malformed and
    /// [`PortError::InvalidRecord`] when per-day hours use an unknown day index
    /// or an invalid `HHMM` value.
    pub fn new(record: CenterRecord) -> Result<Self, PortError> {
        let schedule = Schedule::parse(record.schedule.as_deref().unwrap_or_default())
            .map_err(|source| {
                warn!(id = %record.id, %source, "rejecting center with malformed schedule");
                PortError::Schedule {
                    id: record.id.clone(),
                    source,
                }
            })?;

        let mut per_day = [None; 7];
        for (&index, hours) in &record.per_day_hours {
            let invalid = |reason: String| PortError::InvalidRecord {
                id: record.id.clone(),
                reason,
            };
            let slot = per_day
                .get_mut(usize::from(index))
                .ok_or_else(|| invalid(format!("day index {index} is out of range")))?;
            let open = ClockTime::from_hhmm(hours.open)
                .ok_or_else(|| invalid(format!("opening time {} is not HHMM", hours.open)))?;
            let close = ClockTime::from_hhmm(hours.close)
                .ok_or_else(|| invalid(format!("closing time {} is not HHMM", hours.close)))?;
            *slot = Some(TimeRange { open, close });
        }

        Ok(Self {
            record,
            schedule,
            per_day,
        })
    }

    /// Source identifier.
    #[must_use]
    pub fn id(&self) -> &LocationId {
        &self.record.id
    }

    /// Bare center name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.record.name
    }

    /// Name followed by `" - {company}"` when the company is not blank.
    #[must_use]
    pub fn full_name(&self) -> String {
        match present(self.record.company.as_deref()) {
            Some(company) => format!("{} - {company}", self.record.name),
            None => self.record.name.clone(),
        }
    }

    /// Whether weekend-specific days are given.
    #[must_use]
    pub fn has_weekend(&self) -> bool {
        present(self.record.weekend.as_deref()).is_some()
    }

    /// Sentence built from the free-text day and hour labels.
    #[must_use]
    pub fn hours_summary(&self) -> String {
        let days = self.record.days.as_deref().unwrap_or_default();
        let hours = self.record.hours.as_deref().unwrap_or_default();
        let summary = format!("Open {days} from {hours}");
        match present(self.record.weekend.as_deref()) {
            Some(weekend) => {
                let weekend_hours = self.record.weekend_hours.as_deref().unwrap_or_default();
                format!("{summary}, {weekend} from {weekend_hours}")
            }
            None => summary,
        }
    }

    /// Per-day hours for the weekday of `date`, if any.
    #[must_use]
    pub fn hours_for<D: Datelike>(&self, date: &D) -> Option<TimeRange> {
        self.per_day
            .get(sunday_index(date.weekday()))
            .copied()
            .flatten()
    }

    /// Formatted opening time for the weekday of `date`.
    #[must_use]
    pub fn open_time<D: Datelike>(&self, date: &D) -> Option<String> {
        self.hours_for(date).map(|range| range.open.to_string())
    }

    /// Formatted closing time for the weekday of `date`.
    #[must_use]
    pub fn close_time<D: Datelike>(&self, date: &D) -> Option<String> {
        self.hours_for(date).map(|range| range.close.to_string())
    }

    /// `"Open today from {open} to {close}"` from the per-day hours, or
    /// `"Closed today"`.
    #[must_use]
    pub fn todays_hours<D: Datelike>(&self, now: &D) -> String {
        match self.hours_for(now) {
            Some(range) => format!("Open today from {} to {}", range.open, range.close),
            None => "Closed today".to_owned(),
        }
    }

    /// Per-day hours check; both boundary minutes count as closed.
    #[must_use]
    pub fn is_open<T: Datelike + Timelike>(&self, now: &T) -> bool {
        self.hours_for(now)
            .is_some_and(|range| range.contains_exclusive(ClockTime::of(now)))
    }

    /// Parsed weekly schedule; empty when the record has none.
    #[must_use]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Merged weekly hours from the schedule text.
    #[must_use]
    pub fn full_hours(&self) -> String {
        self.schedule.full_hours()
    }

    /// Whether the center is open at `now`.
    ///
    /// Uses the schedule when the record has one, otherwise the per-day hours.
    #[must_use]
    pub fn available_at<T: Datelike + Timelike>(&self, now: &T) -> bool {
        if self.schedule.is_empty() {
            self.is_open(now)
        } else {
            self.schedule.open_now(now)
        }
    }

    /// Whether the center opens at all on the weekday of `date`.
    ///
    /// Uses the schedule when the record has one, otherwise the per-day hours.
    #[must_use]
    pub fn available_on<D: Datelike>(&self, date: &D) -> bool {
        if self.schedule.is_empty() {
            self.hours_for(date).is_some()
        } else {
            self.schedule.open_today(date)
        }
    }

    /// Today's hours line, from the schedule when the record has one,
    /// otherwise from the per-day hours.
    #[must_use]
    pub fn hours_today<D: Datelike>(&self, now: &D) -> String {
        if self.schedule.is_empty() {
            self.todays_hours(now)
        } else {
            self.schedule.todays_hours(now)
        }
    }

    /// Free-text description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        present(self.record.description.as_deref())
    }

    /// Free-text location hint.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        present(self.record.location.as_deref())
    }

    /// Street address.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        present(self.record.address.as_deref())
    }

    /// Stored coordinates exactly as the source delivers them: `[lng, lat]`.
    #[must_use]
    pub fn geometry_lng_lat(&self) -> [f64; 2] {
        self.record.geometry
    }

    /// Great-circle distance in miles from `(lat, lng)` to this center.
    #[must_use]
    pub fn distance(&self, lat: f64, lng: f64) -> f64 {
        let [center_lng, center_lat] = self.geometry_lng_lat();
        haversine_miles(lat, lng, center_lat, center_lng)
    }

    /// Great-circle distance in miles from `origin` to this center.
    #[must_use]
    pub fn distance_from(&self, origin: Coordinates) -> f64 {
        self.distance(origin.lat, origin.lng)
    }
}

/// Haversine distance in miles between two latitude/longitude pairs.
#[must_use]
pub fn haversine_miles(lat: f64, lng: f64, other_lat: f64, other_lng: f64) -> f64 {
    let delta_lat = (other_lat - lat).to_radians();
    let delta_lng = (other_lng - lng).to_radians();
    let lat = lat.to_radians();
    let other_lat = other_lat.to_radians();

    let half_chord = (delta_lat / 2.0).sin().powi(2)
        + (delta_lng / 2.0).sin().powi(2) * lat.cos() * other_lat.cos();
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_MILES * angle
}

/// Distance rendered with one decimal, e.g. `"3.2 mi"`.
#[must_use]
pub fn format_distance(miles: f64) -> String {
    format!("{miles:.1} mi")
}

fn present(field: Option<&str>) -> Option<&str> {
    field.filter(|value| !value.trim().is_empty())
}
