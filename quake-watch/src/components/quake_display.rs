use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::filter_bar::FILTER_BAR_HEIGHT;
use super::{Component, FilterBar, FilterBarProps, QuakeMap, QuakeMapProps};
use crate::action::Action;
use crate::filters::EventType;
use crate::state::AppState;

/// Props for QuakeDisplay - read-only view of state
pub struct QuakeDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Filter header, map and status bar
#[derive(Default)]
pub struct QuakeDisplay {
    map: QuakeMap,
}

impl QuakeDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `(key, label)` pairs for the status bar. Problems with the last fetch come first.
fn status_hints(state: &AppState) -> Vec<(&'static str, &'static str)> {
    let mut hints = vec![
        ("e", "type"),
        ("d", "date"),
        ("[ ]", "day"),
        ("+/-", "zoom"),
        ("n/p", "inspect"),
        ("r", "refresh"),
        ("q", "quit"),
    ];
    if state.truncated {
        hints.insert(0, ("100+", "truncated"));
    }
    if state.last_error.is_some() {
        hints.insert(0, ("!", "fetch failed"));
    }
    hints
}

impl Component<Action> for QuakeDisplay {
    type Props<'a> = QuakeDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::MarkersFetch),
                KeyCode::Char('e') | KeyCode::Tab => Some(Action::FilterEventTypeCycle),
                KeyCode::Char(c @ '1'..='3') => {
                    let index = c as usize - '1' as usize;
                    EventType::from_index(index).map(Action::FilterEventTypeSet)
                }
                KeyCode::Char('d') => Some(Action::DatePickerOpen),
                KeyCode::Char('[') => Some(Action::FilterDateShift(-1)),
                KeyCode::Char(']') => Some(Action::FilterDateShift(1)),
                KeyCode::Char('t') => Some(Action::FilterDateToday),
                KeyCode::Char('+') | KeyCode::Char('=') => Some(Action::MapZoomIn),
                KeyCode::Char('-') => Some(Action::MapZoomOut),
                KeyCode::Char('n') | KeyCode::Right => Some(Action::MarkerSelectNext),
                KeyCode::Char('p') | KeyCode::Left => Some(Action::MarkerSelectPrev),
                KeyCode::Char('c') => Some(Action::MarkerSelectClear),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => match (*delta).signum() {
                -1 => Some(Action::MapZoomIn),
                1 => Some(Action::MapZoomOut),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: QuakeDisplayProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Min(1),    // Map
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let mut header = FilterBar;
        header.render(
            frame,
            chunks[0],
            FilterBarProps {
                filters: &state.filters,
                count_label: state.count_label(),
                is_loading: state.loading,
                is_animating: state.loading_anim_active(),
                tick_count: state.tick_count,
            },
        );

        self.map.render(
            frame,
            chunks[1],
            QuakeMapProps {
                markers: &state.markers,
                selected: state.selected,
                view: state.map_view(),
            },
        );

        let hints: Vec<_> = status_hints(state)
            .into_iter()
            .map(|(key, label)| StatusBarHint::new(key, label))
            .collect();
        let zoom_level = state.zoom.to_string();
        let zoom = [StatusBarHint::new("zoom", zoom_level.as_str())];
        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[2],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&hints),
                right: StatusBarSection::hints(&zoom),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}
