//! Render snapshot tests using RenderHarness

use chrono::NaiveDate;
use tui_dispatch::testing::*;
use quake_watch::{
    components::{
        Component, DatePicker, DatePickerProps, QuakeDisplay, QuakeDisplayProps,
    },
    action::Action,
    filters::{EventType, FilterState},
    state::{AppState, Marker, Position},
};

fn state_for(event_type: EventType) -> AppState {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    AppState::new(FilterState::new(event_type, date))
}

fn render_display(state: &AppState, width: u16, height: u16) -> String {
    let mut render = RenderHarness::new(width, height);
    let mut component = QuakeDisplay::new();
    render.render_to_string_plain(|frame| {
        let props = QuakeDisplayProps {
            state,
            is_focused: true,
        };
        component.render(frame, frame.area(), props);
    })
}

#[test]
fn test_render_empty_map() {
    let output = render_display(&state_for(EventType::Earthquake), 120, 32);

    assert!(output.contains("2024-01-01"), "Should show the date");
    assert!(output.contains("Events 0"), "Should show the count");
    assert!(output.contains("PACIFIC OCEAN"), "Basemap labels are always on");
    assert!(output.contains("AFRICA"));
    assert!(!output.contains('●'), "No markers yet");
}

#[test]
fn test_render_selected_event_type() {
    let output = render_display(&state_for(EventType::Tsunami), 100, 24);

    assert!(output.contains("1 Earthquake"));
    assert!(output.contains("2 Volcano"));
    assert!(output.contains("3 Tsunami"));
}

#[test]
fn test_render_marker_across_antimeridian() {
    // Fiji sits east of the antimeridian; the view wraps to show it.
    let state = AppState {
        markers: vec![Marker {
            id: "us7000fiji".into(),
            label: "Magnitude: 6.1, Location: Fiji region".into(),
            position: Position {
                lat: -17.8,
                lng: -178.4,
            },
        }],
        ..state_for(EventType::Earthquake)
    };

    let output = render_display(&state, 100, 30);
    assert!(output.contains('●'), "Marker should be visible:\n{}", output);
}

#[test]
fn test_render_error_hint() {
    let state = AppState {
        last_error: Some("request failed: operation timed out".into()),
        ..state_for(EventType::Volcano)
    };

    let output = render_display(&state, 100, 24);
    assert!(output.contains("fetch failed"), "Should show failure hint");
    assert!(!output.contains("timed out"), "Details go to the log");
}

#[test]
fn test_render_date_picker() {
    let mut render = RenderHarness::new(80, 24);
    let mut display = QuakeDisplay::new();
    let mut picker = DatePicker::new();

    let state = AppState {
        date_picker_open: true,
        date_input: "2024-01-0".into(),
        ..state_for(EventType::Earthquake)
    };

    let output = render.render_to_string_plain(|frame| {
        let area = frame.area();
        display.render(
            frame,
            area,
            QuakeDisplayProps {
                state: &state,
                is_focused: false,
            },
        );
        picker.render(
            frame,
            area,
            DatePickerProps {
                input: &state.date_input,
                error: None,
                is_focused: true,
                on_change: Action::DatePickerChange,
                on_submit: Action::DatePickerSubmit,
            },
        );
    });

    assert!(output.contains("2024-01-0"));
    assert!(output.contains("esc cancel"));
}
