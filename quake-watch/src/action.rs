//! Actions, grouped by inferred category

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::filters::EventType;
use crate::state::Marker;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Filter category =====
    /// Pick an event type
    FilterEventTypeSet(EventType),

    /// Advance to the next event type, wrapping around
    FilterEventTypeCycle,

    /// Pick a calendar date
    FilterDateSet(NaiveDate),

    /// Move the date by a number of days
    FilterDateShift(i64),

    /// Jump back to today's local date
    FilterDateToday,

    // ===== Markers category =====
    /// Intent: re-fetch markers for the current filters
    MarkersFetch,

    /// Result: catalog responded for request `seq`
    MarkersDidLoad { seq: u64, markers: Vec<Marker> },

    /// Result: request `seq` failed
    MarkersDidError { seq: u64, error: String },

    // ===== Date picker category =====
    DatePickerOpen,

    DatePickerClose,

    /// Picker text changed
    DatePickerChange(String),

    /// Picker text submitted (Enter)
    DatePickerSubmit(String),

    // ===== Map category =====
    MapZoomIn,

    MapZoomOut,

    // ===== Marker selection (tooltip) =====
    MarkerSelectNext,

    MarkerSelectPrev,

    MarkerSelectClear,

    // ===== UI category =====
    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Periodic tick for loading animation
    Tick,

    /// Exit the application
    Quit,
}
