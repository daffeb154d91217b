pub use crate::core::{GeoPoint, MapView, Viewport, MAX_ZOOM, MIN_ZOOM};
pub use crate::labels::{labels_in_view, LabelKind, MapLabel, REFERENCE_LABELS};

#[cfg(feature = "ratatui")]
pub use crate::render::{
    adjust_color, cell_seed, MapRenderResult, MapRenderer, MapRendererBuilder, MapStyle,
    MapStyleBuilder, MarkerIcon, RenderConfig, TextureVariant,
};
