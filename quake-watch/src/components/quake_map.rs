use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use tui_map::prelude::{GeoPoint, MapRenderer, MapStyle, MapView};

use super::Component;
use crate::action::Action;
use crate::state::Marker;

const TOOLTIP_HEIGHT: u16 = 3;
/// Height / width ratio of a terminal cell.
const CELL_ASPECT: f64 = 2.0;

pub struct QuakeMap {
    renderer: MapRenderer,
}

pub struct QuakeMapProps<'a> {
    pub markers: &'a [Marker],
    pub selected: Option<usize>,
    pub view: MapView,
}

impl Default for QuakeMap {
    fn default() -> Self {
        Self {
            renderer: MapRenderer::builder()
                .cell_aspect(CELL_ASPECT)
                .style(MapStyle::satellite())
                .build(),
        }
    }
}

impl QuakeMap {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Box next to the marker cell: right of it when there is room, otherwise left;
/// above it when there is room, otherwise below. Clipped to `bounds`.
pub fn tooltip_rect(anchor: (u16, u16), label: &str, bounds: Rect) -> Rect {
    let text_width = u16::try_from(label.chars().count()).unwrap_or(u16::MAX);
    let width = text_width.saturating_add(2).min(bounds.width);
    let height = TOOLTIP_HEIGHT.min(bounds.height);
    let (ax, ay) = anchor;

    let x = if ax.saturating_add(1).saturating_add(width) <= bounds.right() {
        ax + 1
    } else {
        ax.saturating_sub(width).max(bounds.left())
    };
    let y = if ay >= bounds.top().saturating_add(height) {
        ay - height
    } else {
        ay.saturating_add(1).min(bounds.bottom().saturating_sub(height))
    };
    Rect::new(x, y, width, height)
}

impl Component<Action> for QuakeMap {
    type Props<'a> = QuakeMapProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let result = self.renderer.render_base(frame, area, &props.view);
        let points = props.markers.iter().enumerate().map(|(index, marker)| {
            (
                GeoPoint::from(marker.position),
                props.selected == Some(index),
            )
        });
        self.renderer.render_markers(frame, &result, points);

        let Some(marker) = props.selected.and_then(|index| props.markers.get(index)) else {
            return;
        };
        let Some(anchor) = result.marker_cell(marker.position.into()) else {
            return;
        };

        let rect = tooltip_rect(anchor, &marker.label, area);
        frame.render_widget(Clear, rect);
        let tooltip = Paragraph::new(Line::from(marker.label.as_str())).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow))
                .style(Style::default().bg(Color::Rgb(25, 25, 35)).fg(Color::White)),
        );
        frame.render_widget(tooltip, rect);
    }
}
