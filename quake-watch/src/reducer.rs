//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::catalog::{CatalogQuery, RESULT_LIMIT};
use crate::effect::Effect;
use crate::filters::{local_today, parse_date, FilterState};
use crate::state::{AppState, LOADING_ANIM_CYCLE_TICKS};

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Filter actions =====
        Action::FilterEventTypeSet(event_type) => {
            let filters = FilterState::new(event_type, state.filters.date);
            apply_filters(state, filters)
        }

        Action::FilterEventTypeCycle => {
            let filters = FilterState::new(state.filters.event_type.next(), state.filters.date);
            apply_filters(state, filters)
        }

        Action::FilterDateSet(date) => {
            let filters = FilterState::new(state.filters.event_type, date);
            apply_filters(state, filters)
        }

        Action::FilterDateShift(days) => match state.filters.shifted(days) {
            Some(filters) => apply_filters(state, filters),
            None => DispatchResult::unchanged(),
        },

        Action::FilterDateToday => {
            let filters = FilterState::new(state.filters.event_type, local_today());
            apply_filters(state, filters)
        }

        // ===== Marker fetch =====
        Action::MarkersFetch => issue_fetch(state),

        Action::MarkersDidLoad { seq, markers } => {
            if seq != state.request_seq {
                log::debug!(
                    "event=fetch_stale seq={} latest={} count={}",
                    seq,
                    state.request_seq,
                    markers.len()
                );
                return DispatchResult::unchanged();
            }
            state.truncated = markers.len() >= RESULT_LIMIT;
            state.markers = markers;
            state.selected = None;
            state.last_error = None;
            finish_loading(state);
            DispatchResult::changed()
        }

        Action::MarkersDidError { seq, error } => {
            if seq != state.request_seq {
                log::debug!(
                    "event=fetch_stale seq={} latest={} status=error",
                    seq,
                    state.request_seq
                );
                return DispatchResult::unchanged();
            }
            // Markers from the last good response stay on the map.
            state.last_error = Some(error);
            finish_loading(state);
            DispatchResult::changed()
        }

        // ===== Date picker =====
        Action::DatePickerOpen => {
            state.date_picker_open = true;
            state.date_input = state.filters.date_label();
            state.date_error = None;
            DispatchResult::changed()
        }

        Action::DatePickerClose => {
            close_date_picker(state);
            DispatchResult::changed()
        }

        Action::DatePickerChange(input) => {
            state.date_input = input;
            state.date_error = None;
            DispatchResult::changed()
        }

        Action::DatePickerSubmit(input) => match parse_date(&input) {
            Ok(date) => {
                close_date_picker(state);
                let filters = FilterState::new(state.filters.event_type, date);
                let mut result = apply_filters(state, filters);
                result.changed = true;
                result
            }
            Err(err) => {
                state.date_input = input;
                state.date_error = Some(err.to_string());
                DispatchResult::changed()
            }
        },

        // ===== Map =====
        Action::MapZoomIn => zoom(state, 1),

        Action::MapZoomOut => zoom(state, -1),

        // ===== Tooltip selection =====
        Action::MarkerSelectNext => {
            let len = state.markers.len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            state.selected = Some(match state.selected {
                Some(index) => (index + 1) % len,
                None => 0,
            });
            DispatchResult::changed()
        }

        Action::MarkerSelectPrev => {
            let len = state.markers.len();
            if len == 0 {
                return DispatchResult::unchanged();
            }
            state.selected = Some(match state.selected {
                Some(index) => (index + len - 1) % len,
                None => len - 1,
            });
            DispatchResult::changed()
        }

        Action::MarkerSelectClear => {
            if state.selected.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== UI actions =====
        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Tick => {
            if state.loading_anim_active() {
                state.tick_count = state.tick_count.wrapping_add(1);
                if state.loading_anim_ticks_remaining > 0 {
                    state.loading_anim_ticks_remaining -= 1;
                }
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Store new filters and fetch, or do nothing if they did not change.
fn apply_filters(state: &mut AppState, filters: FilterState) -> DispatchResult<Effect> {
    if filters == state.filters {
        return DispatchResult::unchanged();
    }
    state.filters = filters;
    issue_fetch(state)
}

fn issue_fetch(state: &mut AppState) -> DispatchResult<Effect> {
    state.request_seq += 1;
    state.loading = true;
    state.tick_count = 0;
    state.loading_anim_ticks_remaining = 0;
    DispatchResult::changed_with(Effect::FetchMarkers {
        seq: state.request_seq,
        query: CatalogQuery::for_filters(&state.filters),
    })
}

fn finish_loading(state: &mut AppState) {
    state.loading = false;
    state.loading_anim_ticks_remaining = ticks_to_phase_zero(state.tick_count);
}

fn close_date_picker(state: &mut AppState) {
    state.date_picker_open = false;
    state.date_input.clear();
    state.date_error = None;
}

fn zoom(state: &mut AppState, delta: i16) -> DispatchResult<Effect> {
    let zoom = state.map_view().zoom_by(delta).zoom;
    if zoom == state.zoom {
        DispatchResult::unchanged()
    } else {
        state.zoom = zoom;
        DispatchResult::changed()
    }
}

fn ticks_to_phase_zero(tick_count: u32) -> u32 {
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    if tick_count == 0 {
        return cycle;
    }
    let remainder = tick_count % cycle;
    if remainder == 0 { 0 } else { cycle - remainder }
}
