use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    widgets::canvas::{Canvas, Map, MapResolution},
    Frame,
};

use crate::core::{GeoPoint, MapView, Viewport};
use crate::labels::{labels_in_view, LabelKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextureVariant {
    pub ch: char,
    pub fg: Color,
    pub density: u8,
}

impl TextureVariant {
    pub const fn new(ch: char, fg: Color, density: u8) -> Self {
        Self { ch, fg, density }
    }
}

/// Icon drawn at a marker position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerIcon {
    pub glyph: char,
    pub fg: Color,
    pub modifier: Modifier,
}

impl MarkerIcon {
    pub const fn new(glyph: char, fg: Color) -> Self {
        Self {
            glyph,
            fg,
            modifier: Modifier::empty(),
        }
    }

    pub const fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapStyle {
    pub sea: Color,
    pub texture: [TextureVariant; 3],
    pub coastline: Color,
    pub ocean_label: Style,
    pub continent_label: Style,
    pub marker: MarkerIcon,
    pub selected_marker: MarkerIcon,
    pub labels: bool,
}

impl MapStyle {
    pub fn builder() -> MapStyleBuilder {
        MapStyleBuilder::default()
    }

    /// Dark "satellite" look: deep sea, pale coastlines, red dot markers.
    pub fn satellite() -> Self {
        Self::builder().build()
    }
}

impl Default for MapStyle {
    fn default() -> Self {
        Self::satellite()
    }
}

#[derive(Clone, Debug)]
pub struct MapStyleBuilder {
    style: MapStyle,
}

impl Default for MapStyleBuilder {
    fn default() -> Self {
        let sea = Color::Rgb(8, 24, 48);
        Self {
            style: MapStyle {
                sea,
                texture: [
                    TextureVariant::new('.', adjust_color(sea, 28), 9),
                    TextureVariant::new('~', adjust_color(sea, 20), 14),
                    TextureVariant::new('`', adjust_color(sea, 14), 11),
                ],
                coastline: Color::Rgb(196, 214, 168),
                ocean_label: Style::default()
                    .fg(Color::Rgb(110, 150, 200))
                    .add_modifier(Modifier::ITALIC),
                continent_label: Style::default()
                    .fg(Color::Rgb(235, 235, 220))
                    .add_modifier(Modifier::BOLD),
                marker: MarkerIcon::new('●', Color::Rgb(235, 40, 40)),
                selected_marker: MarkerIcon::new('◉', Color::Rgb(255, 220, 60))
                    .with_modifier(Modifier::BOLD),
                labels: false,
            },
        }
    }
}

impl MapStyleBuilder {
    pub fn labels(mut self, visible: bool) -> Self {
        self.style.labels = visible;
        self
    }

    pub fn build(self) -> MapStyle {
        self.style
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderConfig {
    /// Height / width ratio of a terminal cell.
    pub cell_aspect: f64,
    pub resolution: MapResolution,
    /// Print reference labels even when the style turns them off.
    pub force_labels: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_aspect: 2.0,
            resolution: MapResolution::High,
            force_labels: true,
        }
    }
}

/// Where the basemap landed in the frame; projects points to absolute cells.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapRenderResult {
    pub viewport: Viewport,
    pub origin_x: u16,
    pub origin_y: u16,
}

impl MapRenderResult {
    pub fn marker_cell(&self, point: GeoPoint) -> Option<(u16, u16)> {
        let (x, y) = self.viewport.project(point)?;
        Some((self.origin_x + x, self.origin_y + y))
    }

    pub fn area(&self) -> Rect {
        Rect::new(
            self.origin_x,
            self.origin_y,
            self.viewport.cols,
            self.viewport.rows,
        )
    }
}

#[derive(Clone, Default)]
pub struct MapRendererBuilder {
    config: RenderConfig,
    style: MapStyle,
}

impl MapRendererBuilder {
    pub fn cell_aspect(mut self, value: f64) -> Self {
        self.config.cell_aspect = value;
        self
    }

    pub fn style(mut self, style: MapStyle) -> Self {
        self.style = style;
        self
    }

    pub fn build(self) -> MapRenderer {
        MapRenderer {
            config: self.config,
            style: self.style,
        }
    }
}

#[derive(Clone)]
pub struct MapRenderer {
    config: RenderConfig,
    style: MapStyle,
}

impl MapRenderer {
    pub fn builder() -> MapRendererBuilder {
        MapRendererBuilder::default()
    }

    pub fn labels_visible(&self) -> bool {
        self.style.labels || self.config.force_labels
    }

    /// Paint sea, coastlines and labels for `view` into `area`.
    pub fn render_base(&self, frame: &mut Frame, area: Rect, view: &MapView) -> MapRenderResult {
        let viewport = Viewport::fit(area.width, area.height, view, self.config.cell_aspect);
        let result = MapRenderResult {
            viewport,
            origin_x: area.x,
            origin_y: area.y,
        };
        if area.width == 0 || area.height == 0 {
            return result;
        }

        self.paint_sea(frame.buffer_mut(), area);

        // One canvas pass per world copy; each pass keeps the texture chars and
        // only overwrites cells it draws coastline into.
        for offset in viewport.wrap_offsets() {
            let map = Map {
                resolution: self.config.resolution,
                color: self.style.coastline,
            };
            let canvas = Canvas::default()
                .marker(symbols::Marker::Braille)
                .x_bounds([viewport.west - offset, viewport.east - offset])
                .y_bounds(viewport.y_bounds())
                .background_color(self.style.sea)
                .paint(move |ctx| ctx.draw(&map));
            frame.render_widget(canvas, area);
        }

        if self.labels_visible() {
            self.paint_labels(frame.buffer_mut(), &result);
        }

        result
    }

    /// Draw one icon per visible marker. Selected markers are drawn last so
    /// they stay on top of neighbours sharing a cell. Returns how many markers
    /// landed inside the viewport.
    pub fn render_markers<I>(&self, frame: &mut Frame, result: &MapRenderResult, markers: I) -> usize
    where
        I: IntoIterator<Item = (GeoPoint, bool)>,
    {
        let buf = frame.buffer_mut();
        let mut drawn = 0;
        let mut selected = Vec::new();

        for (point, is_selected) in markers {
            let Some(cell) = result.marker_cell(point) else {
                continue;
            };
            drawn += 1;
            if is_selected {
                selected.push(cell);
            } else {
                paint_icon(buf, cell, self.style.marker);
            }
        }

        for cell in selected {
            paint_icon(buf, cell, self.style.selected_marker);
        }

        drawn
    }

    fn paint_sea(&self, buf: &mut Buffer, area: Rect) {
        let sea = self.style.sea;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                let Some(cell) = buf.cell_mut((x, y)) else {
                    continue;
                };
                let seed = cell_seed(x, y);
                let variant = self.style.texture[(seed % 3) as usize];
                let density = u32::from(variant.density.max(1));
                if (seed / 3) % density == 0 {
                    cell.set_bg(sea).set_fg(variant.fg).set_char(variant.ch);
                } else {
                    cell.set_bg(sea).set_fg(sea).set_char(' ');
                }
            }
        }
    }

    fn paint_labels(&self, buf: &mut Buffer, result: &MapRenderResult) {
        let right = result.origin_x + result.viewport.cols;
        for (label, (x, y)) in labels_in_view(&result.viewport) {
            let style = match label.kind {
                LabelKind::Ocean => self.style.ocean_label,
                LabelKind::Continent => self.style.continent_label,
            };
            let x = result.origin_x + x;
            let y = result.origin_y + y;
            buf.set_stringn(x, y, label.text, usize::from(right - x), style);
        }
    }
}

fn paint_icon(buf: &mut Buffer, (x, y): (u16, u16), icon: MarkerIcon) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(icon.glyph)
            .set_fg(icon.fg)
            .set_style(Style::default().add_modifier(icon.modifier));
    }
}

pub fn adjust_color(color: Color, delta: i16) -> Color {
    match color {
        Color::Rgb(r, g, b) => {
            let clamp = |v: i16| v.clamp(0, 255) as u8;
            Color::Rgb(
                clamp(r as i16 + delta),
                clamp(g as i16 + delta),
                clamp(b as i16 + delta),
            )
        }
        other => other,
    }
}

/// Stable per-cell hash for the sea texture.
pub fn cell_seed(x: u16, y: u16) -> u32 {
    let mut n = (x as u32).wrapping_mul(374_761_393);
    n = n.wrapping_add((y as u32).wrapping_mul(668_265_263));
    n ^= n >> 13;
    n = n.wrapping_mul(1_274_126_177);
    n ^= n >> 16;
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MIN_ZOOM;
    use ratatui::{backend::TestBackend, Terminal};

    fn world_view() -> MapView {
        MapView::new(GeoPoint::new(0.0, 20.0), MIN_ZOOM)
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer.cell((x, y)).map(|c| c.symbol().to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn cell_seed_is_deterministic() {
        assert_eq!(cell_seed(7, 9), cell_seed(7, 9));
        assert_ne!(cell_seed(7, 9), cell_seed(7, 10));
    }

    #[test]
    fn adjust_color_saturates() {
        assert_eq!(adjust_color(Color::Rgb(250, 5, 100), 10), Color::Rgb(255, 15, 110));
        assert_eq!(adjust_color(Color::Rgb(3, 5, 100), -10), Color::Rgb(0, 0, 90));
        assert_eq!(adjust_color(Color::Red, 10), Color::Red);
    }

    #[test]
    fn marker_cell_is_offset_by_origin() {
        let result = MapRenderResult {
            viewport: Viewport::fit(80, 20, &world_view(), 2.0),
            origin_x: 3,
            origin_y: 4,
        };
        assert_eq!(result.marker_cell(GeoPoint::new(0.0, 20.0)), Some((42, 13)));
        assert_eq!(result.area(), Rect::new(3, 4, 80, 20));
    }

    #[test]
    fn render_output_is_deterministic_for_same_inputs() {
        let renderer = MapRenderer::builder().build();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");

        let mut first = MapRenderResult::default();
        terminal
            .draw(|frame| {
                first = renderer.render_base(frame, Rect::new(0, 0, 80, 20), &world_view());
            })
            .expect("draw 1");
        let first_rows: Vec<String> = (0..20).map(|y| row_text(&terminal, y)).collect();

        terminal
            .draw(|frame| {
                let second = renderer.render_base(frame, Rect::new(0, 0, 80, 20), &world_view());
                assert_eq!(first, second);
            })
            .expect("draw 2");
        let second_rows: Vec<String> = (0..20).map(|y| row_text(&terminal, y)).collect();

        assert_eq!(first_rows, second_rows);
    }

    #[test]
    fn cell_aspect_shapes_the_viewport() {
        let tall = MapRenderer::builder().build();
        let square = MapRenderer::builder().cell_aspect(1.0).build();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");

        let mut tall_result = MapRenderResult::default();
        let mut square_result = MapRenderResult::default();
        terminal
            .draw(|frame| {
                tall_result = tall.render_base(frame, Rect::new(0, 0, 80, 20), &world_view());
                square_result = square.render_base(frame, Rect::new(0, 0, 80, 20), &world_view());
            })
            .expect("draw");

        assert_eq!(tall_result.viewport.width_deg(), 360.0);
        assert_eq!(tall_result.viewport.height_deg(), 180.0);
        assert_eq!(square_result.viewport.width_deg(), 720.0);
        assert_eq!(square_result.viewport.height_deg(), 180.0);
    }

    #[test]
    fn labels_are_forced_visible() {
        let style = MapStyle::builder().labels(false).build();
        let renderer = MapRenderer::builder().style(style).build();
        assert!(renderer.labels_visible());

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).expect("terminal");
        let mut result = MapRenderResult::default();
        terminal
            .draw(|frame| {
                result = renderer.render_base(frame, Rect::new(0, 0, 120, 30), &world_view());
            })
            .expect("draw");

        let (_, y) = result
            .marker_cell(GeoPoint::new(5.0, 15.0))
            .expect("africa anchor in view");
        assert!(row_text(&terminal, y).contains("AFRICA"));
    }

    #[test]
    fn markers_are_drawn_with_selected_on_top() {
        let renderer = MapRenderer::builder().build();
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
        let tokyo = GeoPoint::new(35.6, 139.6);
        let lima = GeoPoint::new(-12.0, -77.0);
        let hidden = GeoPoint::new(0.0, 20.0);

        let mut drawn = 0;
        let mut result = MapRenderResult::default();
        terminal
            .draw(|frame| {
                result = renderer.render_base(frame, Rect::new(0, 0, 80, 20), &world_view());
                drawn = renderer.render_markers(
                    frame,
                    &result,
                    [(tokyo, false), (lima, true), (hidden, false), (hidden, true)],
                );
            })
            .expect("draw");

        assert_eq!(drawn, 4);
        let buffer = terminal.backend().buffer();
        let (tx, ty) = result.marker_cell(tokyo).expect("tokyo in view");
        let (lx, ly) = result.marker_cell(lima).expect("lima in view");
        let (hx, hy) = result.marker_cell(hidden).expect("center in view");
        assert_eq!(buffer.cell((tx, ty)).expect("cell").symbol(), "●");
        assert_eq!(buffer.cell((lx, ly)).expect("cell").symbol(), "◉");
        assert_eq!(buffer.cell((hx, hy)).expect("cell").symbol(), "◉");
    }

    #[test]
    fn empty_area_renders_nothing() {
        let renderer = MapRenderer::builder().build();
        let mut terminal = Terminal::new(TestBackend::new(10, 5)).expect("terminal");
        terminal
            .draw(|frame| {
                let result = renderer.render_base(frame, Rect::new(0, 0, 0, 0), &world_view());
                assert_eq!(result.marker_cell(GeoPoint::default()), None);
                assert_eq!(renderer.render_markers(frame, &result, [(GeoPoint::default(), true)]), 0);
            })
            .expect("draw");
    }
}
