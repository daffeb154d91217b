//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_map::prelude::{GeoPoint, MapView, MIN_ZOOM};

use crate::catalog::RESULT_LIMIT;
use crate::filters::FilterState;

/// Map center. Fixed; only the zoom is user-adjustable.
pub const MAP_CENTER: GeoPoint = GeoPoint::new(0.0, 20.0);
pub const INITIAL_ZOOM: u8 = MIN_ZOOM;

/// Animation timing for the header title while a fetch is in flight.
pub const LOADING_ANIM_TICK_MS: u64 = 80;
pub const LOADING_ANIM_CYCLE_TICKS: u32 = 12;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl From<Position> for GeoPoint {
    fn from(position: Position) -> Self {
        GeoPoint::new(position.lat, position.lng)
    }
}

/// One event on the map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Marker {
    pub id: String,
    /// `Magnitude: {mag}, Location: {place}`
    pub label: String,
    pub position: Position,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Filters", label = "Selected", debug_fmt)]
    pub filters: FilterState,

    /// Last successfully loaded marker list. Replaced wholesale, never merged.
    #[debug(skip)]
    pub markers: Vec<Marker>,

    /// Sequence number of the most recently issued fetch.
    #[debug(section = "Fetch", label = "Request #")]
    pub request_seq: u64,

    /// A fetch is in flight. Markers stay on screen meanwhile.
    #[debug(section = "Fetch", label = "Loading")]
    pub loading: bool,

    /// The last applied response hit the result cap.
    #[debug(section = "Fetch", label = "Truncated")]
    pub truncated: bool,

    #[debug(section = "Fetch", label = "Last error", debug_fmt)]
    pub last_error: Option<String>,

    #[debug(section = "Map", label = "Zoom")]
    pub zoom: u8,

    /// Marker whose label is shown in the tooltip.
    #[debug(section = "Map", label = "Selected", debug_fmt)]
    pub selected: Option<usize>,

    // --- Date picker (skipped) ---
    #[debug(skip)]
    pub date_picker_open: bool,

    #[debug(skip)]
    pub date_input: String,

    #[debug(skip)]
    pub date_error: Option<String>,

    #[debug(skip)]
    pub tick_count: u32,

    /// Remaining ticks to finish the current animation cycle after loading
    #[debug(skip)]
    pub loading_anim_ticks_remaining: u32,
}

impl AppState {
    pub fn new(filters: FilterState) -> Self {
        Self {
            filters,
            markers: Vec::new(),
            request_seq: 0,
            loading: false,
            truncated: false,
            last_error: None,
            zoom: INITIAL_ZOOM,
            selected: None,
            date_picker_open: false,
            date_input: String::new(),
            date_error: None,
            tick_count: 0,
            loading_anim_ticks_remaining: 0,
        }
    }

    pub fn loading_anim_active(&self) -> bool {
        self.loading || self.loading_anim_ticks_remaining > 0
    }

    pub fn map_view(&self) -> MapView {
        MapView::new(MAP_CENTER, self.zoom)
    }

    pub fn selected_marker(&self) -> Option<&Marker> {
        self.selected.and_then(|index| self.markers.get(index))
    }

    /// Marker count for the header, `100+` when the cap was hit.
    pub fn count_label(&self) -> String {
        if self.truncated {
            format!("{}+", RESULT_LIMIT)
        } else {
            self.markers.len().to_string()
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(FilterState::today())
    }
}
