use std::mem;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use recyfind_core::{
    clock::ClockTime,
    model::{Coordinates, RegionId},
    service::RecyclingService,
    state::{Action, AppState, DistanceFilter},
};

/// Distance limits cycled with `d`, in miles.
const DISTANCE_STEPS: [f64; 3] = [5.0, 10.0, 25.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    RegionSelect,
    CenterList,
    CenterDetail,
}

pub(crate) struct App {
    pub service: Arc<RecyclingService>,

    pub screen: Screen,
    pub regions: Vec<(RegionId, String)>,
    pub region_list_index: usize,
    pub selected_region: Option<RegionId>,

    pub state: AppState,
    pub center_list_index: usize,

    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(
        service: Arc<RecyclingService>,
        origin: Option<Coordinates>,
        within: Option<f64>,
    ) -> Self {
        let regions = service.regions();
        let state = AppState::new(Self::clock())
            .reduce(Action::SetDefaultCoordinates(origin))
            .reduce(Action::SetDistanceFilter(
                within.map_or(DistanceFilter::All, DistanceFilter::Within),
            ));
        Self {
            service,
            screen: Screen::RegionSelect,
            regions,
            region_list_index: 0,
            selected_region: None,
            state,
            center_list_index: 0,
            error_message: None,
        }
    }

    pub(crate) fn clock() -> NaiveDateTime {
        Local::now().naive_local()
    }

    /// Advance the state snapshot and keep the cursor inside the visible list.
    pub(crate) fn dispatch(&mut self, action: Action) {
        self.state = mem::take(&mut self.state).reduce(action);
        let visible = self.state.recycling_centers().len();
        self.center_list_index = self.center_list_index.min(visible.saturating_sub(1));
    }

    pub(crate) fn select_current_region(&mut self) -> Option<RegionId> {
        let (id, _name) = self.regions.get(self.region_list_index)?;
        self.selected_region = Some(id.clone());
        Some(id.clone())
    }

    pub(crate) fn region_name(&self) -> &str {
        self.selected_region
            .as_ref()
            .and_then(|selected| self.regions.iter().find(|(id, _)| id == selected))
            .map_or("<no region>", |(_, name)| name.as_str())
    }

    pub(crate) fn open_current_center(&mut self) {
        let Some(center) = self.state.recycling_centers().get(self.center_list_index) else {
            return;
        };
        let id = center.id().clone();
        self.dispatch(Action::SelectCenter(Some(id)));
        if self.state.selected_center().is_some() {
            self.screen = Screen::CenterDetail;
        }
    }

    pub(crate) fn close_center(&mut self) {
        self.dispatch(Action::SelectCenter(None));
        self.screen = Screen::CenterList;
    }

    pub(crate) fn cycle_open_filter(&mut self) {
        let next = self.state.filters().open.next();
        self.dispatch(Action::SetOpenFilter(next));
    }

    pub(crate) fn cycle_distance_filter(&mut self) {
        let next = match self.state.filters().distance {
            DistanceFilter::All => DISTANCE_STEPS.first().copied(),
            DistanceFilter::Within(current) => DISTANCE_STEPS
                .iter()
                .copied()
                .find(|step| *step > current),
        };
        self.dispatch(Action::SetDistanceFilter(
            next.map_or(DistanceFilter::All, DistanceFilter::Within),
        ));
    }

    /// Re-evaluate opening filters when the wall clock moved to a new minute.
    pub(crate) fn refresh_clock(&mut self, force: bool) {
        let now = Self::clock();
        let stale = now.date() != self.state.now().date()
            || ClockTime::of(&now) != ClockTime::of(&self.state.now());
        if force || stale {
            self.dispatch(Action::Tick(now));
        }
    }
}

