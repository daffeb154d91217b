//! Quake Watch - map of one day of USGS catalog events
//!
//! This library exposes the application's modules for testing.

pub mod action;
pub mod catalog;
pub mod components;
pub mod effect;
pub mod filters;
pub mod logging;
pub mod reducer;
pub mod state;
