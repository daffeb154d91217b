pub mod date_picker;
pub mod filter_bar;
pub mod quake_display;
pub mod quake_map;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use date_picker::{DatePicker, DatePickerProps};
pub use filter_bar::{FilterBar, FilterBarProps};
pub use quake_display::{QuakeDisplay, QuakeDisplayProps};
pub use quake_map::{QuakeMap, QuakeMapProps};
