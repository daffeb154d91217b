use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::filters::{EventType, FilterState};
use crate::state::LOADING_ANIM_CYCLE_TICKS;

pub const TITLE: &str = "QUAKE WATCH";

/// Header rows: title + event type tabs, then date + counts.
pub const FILTER_BAR_HEIGHT: u16 = 2;

const TITLE_COLOR: Color = Color::Rgb(255, 120, 80);
const TITLE_PULSE: [Color; 4] = [
    Color::Rgb(255, 120, 80),
    Color::Rgb(255, 170, 90),
    Color::Rgb(255, 220, 120),
    Color::Rgb(255, 170, 90),
];

pub struct FilterBar;

pub struct FilterBarProps<'a> {
    pub filters: &'a FilterState,
    /// Number of markers, already formatted (`100+` when truncated).
    pub count_label: String,
    pub is_loading: bool,
    pub is_animating: bool,
    pub tick_count: u32,
}

fn title_color(is_animating: bool, tick_count: u32) -> Color {
    if !is_animating {
        return TITLE_COLOR;
    }
    let cycle = LOADING_ANIM_CYCLE_TICKS.max(1);
    let phase = (tick_count % cycle) as usize * TITLE_PULSE.len() / cycle as usize;
    TITLE_PULSE[phase % TITLE_PULSE.len()]
}

fn event_type_tabs(selected: EventType) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (index, event_type) in EventType::ALL.iter().enumerate() {
        let text = format!(" {} {} ", index + 1, event_type.label());
        let style = if *event_type == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(255, 200, 80))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }
    spans
}

impl Component<Action> for FilterBar {
    type Props<'a> = FilterBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let rows = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

        let mut top = vec![
            Span::styled(
                format!(" {} ", TITLE),
                Style::default()
                    .fg(title_color(props.is_animating, props.tick_count))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
        ];
        top.extend(event_type_tabs(props.filters.event_type));
        frame.render_widget(Paragraph::new(Line::from(top)), rows[0]);

        let dim = Style::default().fg(Color::DarkGray);
        let mut bottom = vec![
            Span::styled(" Date ", dim),
            Span::styled("\u{25c2} ", dim),
            Span::styled(
                props.filters.date_label(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" \u{25b8}", dim),
            Span::raw("   "),
            Span::styled("Events ", dim),
            Span::styled(props.count_label, Style::default().fg(Color::White)),
        ];
        if props.is_loading {
            bottom.push(Span::styled("   loading\u{2026}", Style::default().fg(Color::Yellow)));
        }
        frame.render_widget(Paragraph::new(Line::from(bottom)), rows[1]);
    }
}
