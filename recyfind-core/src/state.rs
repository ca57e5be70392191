//! Application state as immutable snapshots advanced by a pure reducer.
//!
//! Every [`Action`] consumes the current [`AppState`] and returns the next one
//! with the filtered center list recomputed.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::location::Location;
use crate::model::{Coordinates, LocationId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Filter on opening status.
pub enum OpenFilter {
    /// Show every center.
    #[default]
    All,
    /// Only centers with hours on the current weekday.
    OpenToday,
    /// Only centers open at the current instant.
    OpenNow,
}

impl OpenFilter {
    /// Next filter in the `All → OpenToday → OpenNow` cycle.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::OpenToday,
            Self::OpenToday => Self::OpenNow,
            Self::OpenNow => Self::All,
        }
    }

    /// Short display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::OpenToday => "open today",
            Self::OpenNow => "open now",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Filter on distance from the active coordinates.
pub enum DistanceFilter {
    /// No distance limit.
    #[default]
    All,
    /// Only centers within the given number of miles.
    Within(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// User-selected filters.
pub struct Filters {
    /// Opening status filter.
    pub open: OpenFilter,
    /// Distance filter.
    pub distance: DistanceFilter,
}

#[derive(Debug)]
/// State transitions understood by [`AppState::reduce`].
pub enum Action {
    /// Replace the full center list.
    CentersLoaded(Vec<Location>),
    /// Change the opening status filter.
    SetOpenFilter(OpenFilter),
    /// Change the distance filter.
    SetDistanceFilter(DistanceFilter),
    /// Select a center by id, or clear the selection.
    SelectCenter(Option<LocationId>),
    /// Set or clear the user's coordinates.
    SetCoordinates(Option<Coordinates>),
    /// Set or clear the fallback coordinates used when the user has none.
    SetDefaultCoordinates(Option<Coordinates>),
    /// Re-evaluate opening filters at a new instant.
    Tick(NaiveDateTime),
}

#[derive(Debug, Clone, Default)]
/// Snapshot of everything the client displays.
pub struct AppState {
    filters: Filters,
    all_centers: Vec<Arc<Location>>,
    recycling_centers: Vec<Arc<Location>>,
    selected_center: Option<LocationId>,
    default_coordinates: Option<Coordinates>,
    coordinates: Option<Coordinates>,
    now: NaiveDateTime,
}

impl AppState {
    /// Empty state evaluated at `now`.
    #[must_use]
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now,
            ..Self::default()
        }
    }

    /// Apply `action` and return the next snapshot.
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::CentersLoaded(centers) => {
                self.all_centers = centers.into_iter().map(Arc::new).collect();
            }
            Action::SetOpenFilter(open) => self.filters.open = open,
            Action::SetDistanceFilter(distance) => self.filters.distance = distance,
            Action::SelectCenter(selected) => self.selected_center = selected,
            Action::SetCoordinates(coordinates) => self.coordinates = coordinates,
            Action::SetDefaultCoordinates(coordinates) => self.default_coordinates = coordinates,
            Action::Tick(now) => self.now = now,
        }

        self.recycling_centers = self.visible_centers();
        if let Some(selected) = &self.selected_center
            && !self
                .recycling_centers
                .iter()
                .any(|center| center.id() == selected)
        {
            self.selected_center = None;
        }

        debug!(
            total = self.all_centers.len(),
            visible = self.recycling_centers.len(),
            "applied state action"
        );
        self
    }

    fn visible_centers(&self) -> Vec<Arc<Location>> {
        let origin = self.origin();
        let mut visible: Vec<(Option<f64>, Arc<Location>)> = self
            .all_centers
            .iter()
            .filter(|center| match self.filters.open {
                OpenFilter::All => true,
                OpenFilter::OpenToday => center.available_on(&self.now),
                OpenFilter::OpenNow => center.available_at(&self.now),
            })
            .map(|center| (origin.map(|point| center.distance_from(point)), Arc::clone(center)))
            .filter(|(distance, _)| match (self.filters.distance, distance) {
                (DistanceFilter::Within(limit), Some(miles)) => *miles <= limit,
                _ => true,
            })
            .collect();

        if origin.is_some() {
            visible.sort_by(|(left, _), (right, _)| {
                left.unwrap_or_default().total_cmp(&right.unwrap_or_default())
            });
        } else {
            visible.sort_by_cached_key(|(_, center)| center.full_name());
        }
        visible.into_iter().map(|(_, center)| center).collect()
    }

    /// Active filters.
    #[must_use]
    pub fn filters(&self) -> Filters {
        self.filters
    }

    /// Every loaded center, unfiltered.
    #[must_use]
    pub fn all_centers(&self) -> &[Arc<Location>] {
        &self.all_centers
    }

    /// Centers passing the filters, nearest first when coordinates are known,
    /// otherwise by full name.
    #[must_use]
    pub fn recycling_centers(&self) -> &[Arc<Location>] {
        &self.recycling_centers
    }

    /// Selected center, if it is still visible.
    #[must_use]
    pub fn selected_center(&self) -> Option<&Arc<Location>> {
        let selected = self.selected_center.as_ref()?;
        self.recycling_centers
            .iter()
            .find(|center| center.id() == selected)
    }

    /// User coordinates.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    /// Fallback coordinates.
    #[must_use]
    pub fn default_coordinates(&self) -> Option<Coordinates> {
        self.default_coordinates
    }

    /// Coordinates used for distances: the user's, else the fallback.
    #[must_use]
    pub fn origin(&self) -> Option<Coordinates> {
        self.coordinates.or(self.default_coordinates)
    }

    /// Distance in miles from the active coordinates to `center`.
    #[must_use]
    pub fn distance_to(&self, center: &Location) -> Option<f64> {
        self.origin().map(|origin| center.distance_from(origin))
    }

    /// Instant the opening filters are evaluated at.
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CenterRecord;
    use chrono::NaiveDate;

    // 2024-01-08 is a Monday.
    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 8)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn center(id: &str, name: &str, schedule: &str, lng: f64, lat: f64) -> Location {
        Location::new(CenterRecord {
            id: LocationId(id.to_owned()),
            name: name.to_owned(),
            schedule: Some(schedule.to_owned()),
            geometry: [lng, lat],
            ..CenterRecord::default()
        })
        .unwrap()
    }

    fn loaded() -> AppState {
        AppState::new(monday_at(10, 0)).reduce(Action::CentersLoaded(vec![
            center("far", "Airport Yard", "Mon-Sun 08:00-17:00", -122.0, 38.0),
            center("near", "Civic Depot", "Mon 13:00-16:00", -122.4194, 37.775),
            center("weekend", "Bayside", "Sat,Sun 09:00-12:00", -122.45, 37.8),
        ]))
    }

    fn ids(state: &AppState) -> Vec<&str> {
        state
            .recycling_centers()
            .iter()
            .map(|center| center.id().0.as_str())
            .collect()
    }

    const HOME: Coordinates = Coordinates {
        lat: 37.7749,
        lng: -122.4194,
    };

    #[test]
    fn sorts_by_name_without_coordinates() {
        let state = loaded();
        assert_eq!(ids(&state), vec!["far", "weekend", "near"]);
        assert_eq!(state.all_centers().len(), 3);
    }

    #[test]
    fn sorts_by_distance_with_coordinates() {
        let state = loaded().reduce(Action::SetCoordinates(Some(HOME)));
        assert_eq!(ids(&state), vec!["near", "weekend", "far"]);
    }

    #[test]
    fn falls_back_to_default_coordinates() {
        let state = loaded().reduce(Action::SetDefaultCoordinates(Some(HOME)));
        assert_eq!(state.origin(), Some(HOME));
        assert_eq!(ids(&state), vec!["near", "weekend", "far"]);

        let user = Coordinates {
            lat: 38.0,
            lng: -122.0,
        };
        let state = state.reduce(Action::SetCoordinates(Some(user)));
        assert_eq!(state.origin(), Some(user));
        assert_eq!(ids(&state).first(), Some(&"far"));
    }

    #[test]
    fn open_filters_use_the_current_instant() {
        let state = loaded().reduce(Action::SetOpenFilter(OpenFilter::OpenToday));
        assert_eq!(ids(&state), vec!["far", "near"]);

        let state = state.reduce(Action::SetOpenFilter(OpenFilter::OpenNow));
        assert_eq!(ids(&state), vec!["far"]);

        let state = state.reduce(Action::Tick(monday_at(14, 0)));
        assert_eq!(ids(&state), vec!["far", "near"]);
    }

    #[test]
    fn distance_filter_needs_coordinates() {
        let state = loaded().reduce(Action::SetDistanceFilter(DistanceFilter::Within(5.0)));
        assert_eq!(state.recycling_centers().len(), 3);

        let state = state.reduce(Action::SetCoordinates(Some(HOME)));
        assert_eq!(ids(&state), vec!["near", "weekend"]);
        assert!(state.distance_to(&state.recycling_centers()[0]).unwrap() < 1.0);
    }

    #[test]
    fn selection_is_cleared_when_filtered_out() {
        let state = loaded().reduce(Action::SelectCenter(Some(LocationId("weekend".to_owned()))));
        assert_eq!(
            state.selected_center().map(|center| center.name()),
            Some("Bayside")
        );

        let state = state.reduce(Action::SetOpenFilter(OpenFilter::OpenToday));
        assert!(state.selected_center().is_none());

        let state = state.reduce(Action::SetOpenFilter(OpenFilter::All));
        assert!(state.selected_center().is_none());
    }

    #[test]
    fn open_filter_cycles() {
        assert_eq!(OpenFilter::All.next(), OpenFilter::OpenToday);
        assert_eq!(OpenFilter::OpenNow.next(), OpenFilter::All);
        assert_eq!(OpenFilter::OpenNow.label(), "open now");
    }
}
