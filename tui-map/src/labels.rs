use crate::core::{GeoPoint, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Ocean,
    Continent,
}

/// A named reference place printed on the basemap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapLabel {
    pub text: &'static str,
    pub position: GeoPoint,
    pub kind: LabelKind,
}

impl MapLabel {
    const fn ocean(text: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            text,
            position: GeoPoint::new(lat, lng),
            kind: LabelKind::Ocean,
        }
    }

    const fn continent(text: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            text,
            position: GeoPoint::new(lat, lng),
            kind: LabelKind::Continent,
        }
    }
}

/// Label anchors are the left edge of the text.
pub const REFERENCE_LABELS: &[MapLabel] = &[
    MapLabel::ocean("PACIFIC OCEAN", 5.0, -150.0),
    MapLabel::ocean("ATLANTIC OCEAN", 22.0, -50.0),
    MapLabel::ocean("INDIAN OCEAN", -22.0, 65.0),
    MapLabel::ocean("SOUTHERN OCEAN", -60.0, 10.0),
    MapLabel::ocean("ARCTIC OCEAN", 80.0, -10.0),
    MapLabel::continent("NORTH AMERICA", 45.0, -110.0),
    MapLabel::continent("SOUTH AMERICA", -15.0, -65.0),
    MapLabel::continent("EUROPE", 52.0, 10.0),
    MapLabel::continent("AFRICA", 5.0, 15.0),
    MapLabel::continent("ASIA", 50.0, 85.0),
    MapLabel::continent("OCEANIA", -25.0, 125.0),
    MapLabel::continent("ANTARCTICA", -80.0, 20.0),
];

/// Labels whose anchor is visible in the viewport, with the projected cell.
pub fn labels_in_view(viewport: &Viewport) -> impl Iterator<Item = (&'static MapLabel, (u16, u16))> + '_ {
    REFERENCE_LABELS
        .iter()
        .filter_map(move |label| viewport.project(label.position).map(|cell| (label, cell)))
}
