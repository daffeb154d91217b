//! Action and state tests using TestHarness

use chrono::NaiveDate;
use tui_dispatch::testing::*;
use tui_dispatch::{EffectStore, NumericComponentId, assert_emitted, assert_not_emitted};
use quake_watch::{
    action::Action,
    catalog::CatalogQuery,
    components::{Component, QuakeDisplay, QuakeDisplayProps},
    effect::Effect,
    filters::{EventType, FilterState},
    reducer::reducer,
    state::{AppState, Marker, Position},
};

fn new_year_state() -> AppState {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    AppState::new(FilterState::new(EventType::Earthquake, date))
}

fn tokyo() -> Marker {
    Marker {
        id: "us1".into(),
        label: "Magnitude: 5.2, Location: Tokyo, Japan".into(),
        position: Position {
            lat: 35.6,
            lng: 139.6,
        },
    }
}

#[test]
fn test_reducer_initial_fetch() {
    let mut store = EffectStore::new(new_year_state(), reducer);

    assert!(!store.state().loading);

    let result = store.dispatch(Action::MarkersFetch);
    assert!(result.changed, "State should change");
    assert!(store.state().loading);
    assert_eq!(result.effects.len(), 1);
    match &result.effects[0] {
        Effect::FetchMarkers { seq, query } => {
            assert_eq!(*seq, 1);
            assert_eq!(query.params()[1], ("eventtype", "earthquake".to_string()));
            assert_eq!(query.params()[2], ("starttime", "2024-01-01T00:00:00".to_string()));
            assert_eq!(query.params()[3], ("endtime", "2024-01-01T23:59:59".to_string()));
            assert_eq!(query.params()[4], ("limit", "100".to_string()));
        }
    }
}

#[test]
fn test_reducer_markers_load() {
    let mut store = EffectStore::new(new_year_state(), reducer);

    store.dispatch(Action::MarkersFetch);
    store.dispatch(Action::MarkersDidLoad {
        seq: 1,
        markers: vec![tokyo()],
    });

    assert!(!store.state().loading);
    assert_eq!(store.state().markers, vec![tokyo()]);
    assert_eq!(store.state().count_label(), "1");
}

#[test]
fn test_event_type_switch_keeps_window() {
    let mut store = EffectStore::new(new_year_state(), reducer);
    let window = store.state().filters.window();

    let result = store.dispatch(Action::FilterEventTypeSet(EventType::Volcano));

    assert_eq!(result.effects.len(), 1);
    match &result.effects[0] {
        Effect::FetchMarkers { query, .. } => {
            let expected = CatalogQuery::for_filters(&FilterState::new(
                EventType::Volcano,
                window.start.date(),
            ));
            assert_eq!(*query, expected);
            assert_eq!(query.window, window);
        }
    }
}

#[test]
fn test_component_keyboard_events() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = QuakeDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("r", |state, event| {
        let props = QuakeDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::MarkersFetch);
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = QuakeDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("r e q", |state, event| {
        let props = QuakeDisplayProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let did_load = Action::MarkersDidLoad {
        seq: 1,
        markers: Vec::new(),
    };
    let zoom = Action::MapZoomIn;
    let tick = Action::Tick;

    // Categories are inferred from naming convention
    assert_eq!(did_load.category(), Some("markers_did"));
    assert_eq!(zoom.category(), Some("map"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_markers_did());
    assert!(zoom.is_map());
}

#[test]
fn test_harness_emit_and_drain() {
    let mut harness = TestHarness::<(), Action>::new(());

    harness.emit(Action::MarkersFetch);
    harness.emit(Action::FilterEventTypeCycle);
    harness.emit(Action::MarkersDidError {
        seq: 1,
        error: "oops".into(),
    });

    let actions = harness.drain_emitted();
    actions.assert_count(3);
}

#[test]
fn test_assert_emitted_macro() {
    let actions = vec![
        Action::MarkersFetch,
        Action::MarkersDidLoad {
            seq: 1,
            markers: vec![tokyo()],
        },
    ];

    assert_emitted!(actions, Action::MarkersFetch);
    assert_emitted!(actions, Action::MarkersDidLoad { .. });
    assert_not_emitted!(actions, Action::Quit);
    assert_not_emitted!(actions, Action::MarkersDidError { .. });
}

#[test]
fn test_custom_filters() {
    let date = NaiveDate::from_ymd_opt(2011, 3, 11).expect("valid date");
    let state = AppState::new(FilterState::new(EventType::Tsunami, date));

    assert_eq!(state.filters.event_type, EventType::Tsunami);
    assert_eq!(state.filters.date_label(), "2011-03-11");
    assert!(state.markers.is_empty());
    assert_eq!(state.request_seq, 0);
}
