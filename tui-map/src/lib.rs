//! World basemap for terminal UIs.
//!
//! `core` holds the projection math and has no rendering dependency, `labels`
//! the reference places printed on the map, and `render` (behind the `ratatui`
//! feature) paints the basemap and marker icons into a frame.

pub mod core;
pub mod labels;
pub mod prelude;
#[cfg(feature = "ratatui")]
pub mod render;
