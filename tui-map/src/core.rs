/// Lowest zoom level. At this level the whole world fits the viewport.
pub const MIN_ZOOM: u8 = 3;
/// Highest zoom level. Each level halves the visible span.
pub const MAX_ZOOM: u8 = 12;

/// A WGS84 position in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Center and zoom of the map. The zoom is always within `MIN_ZOOM..=MAX_ZOOM`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl MapView {
    pub fn new(center: GeoPoint, zoom: u8) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
        }
    }

    pub fn with_zoom(self, zoom: u8) -> Self {
        Self::new(self.center, zoom)
    }

    /// Step the zoom by `delta` levels, saturating at the bounds.
    pub fn zoom_by(self, delta: i16) -> Self {
        let zoom = (self.zoom as i16 + delta).clamp(MIN_ZOOM as i16, MAX_ZOOM as i16);
        Self::new(self.center, zoom as u8)
    }

    /// Magnification relative to `MIN_ZOOM`.
    pub fn scale(&self) -> f64 {
        2f64.powi(i32::from(self.zoom.saturating_sub(MIN_ZOOM)))
    }
}

/// Geographic bounds of a `cols` x `rows` cell area.
///
/// Longitudes are not normalized: a viewport centered near the antimeridian can
/// extend past +/-180 and `project` wraps points into it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub west: f64,
    pub east: f64,
    pub south: f64,
    pub north: f64,
}

impl Viewport {
    /// Fit the view into an area. `cell_aspect` is the height / width ratio of a
    /// terminal cell; degrees per cell are the same on both axes after
    /// correcting for it.
    pub fn fit(cols: u16, rows: u16, view: &MapView, cell_aspect: f64) -> Self {
        let center = view.center;
        if cols == 0 || rows == 0 {
            return Self {
                cols,
                rows,
                west: center.lng,
                east: center.lng,
                south: center.lat,
                north: center.lat,
            };
        }

        let aspect = if cell_aspect > 0.0 { cell_aspect } else { 1.0 };
        let world_fit = (360.0 / f64::from(cols)).max(180.0 / (f64::from(rows) * aspect));
        let deg_per_col = world_fit / view.scale();
        let half_w = deg_per_col * f64::from(cols) / 2.0;
        let half_h = deg_per_col * f64::from(rows) * aspect / 2.0;

        Self {
            cols,
            rows,
            west: center.lng - half_w,
            east: center.lng + half_w,
            south: center.lat - half_h,
            north: center.lat + half_h,
        }
    }

    pub fn x_bounds(&self) -> [f64; 2] {
        [self.west, self.east]
    }

    pub fn y_bounds(&self) -> [f64; 2] {
        [self.south, self.north]
    }

    pub fn width_deg(&self) -> f64 {
        self.east - self.west
    }

    pub fn height_deg(&self) -> f64 {
        self.north - self.south
    }

    /// Cell (relative to the area origin) showing `point`, if visible.
    ///
    /// Uses the same truncating mapping as the canvas label placement so icons
    /// and labels line up.
    pub fn project(&self, point: GeoPoint) -> Option<(u16, u16)> {
        let width = self.width_deg();
        let height = self.height_deg();
        if self.cols == 0 || self.rows == 0 || width <= 0.0 || height <= 0.0 {
            return None;
        }
        if !point.lat.is_finite() || !point.lng.is_finite() {
            return None;
        }
        if point.lat < self.south || point.lat > self.north {
            return None;
        }

        [0.0, -360.0, 360.0].into_iter().find_map(|offset| {
            let lng = point.lng + offset;
            if lng < self.west || lng > self.east {
                return None;
            }
            let x = ((lng - self.west) * f64::from(self.cols - 1) / width) as u16;
            let y = ((self.north - point.lat) * f64::from(self.rows - 1) / height) as u16;
            Some((x, y))
        })
    }

    /// Longitude offsets at which a copy of the `[-180, 180]` world overlaps the
    /// viewport. `0.0` comes first when it applies.
    pub fn wrap_offsets(&self) -> Vec<f64> {
        [0.0, -360.0, 360.0]
            .into_iter()
            .filter(|offset| {
                let west = -180.0 + offset;
                let east = 180.0 + offset;
                east > self.west && west < self.east
            })
            .collect()
    }
}
