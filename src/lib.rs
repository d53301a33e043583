//! Snip a region of the screen, send it to an analysis service and show the
//! verdict in a floating panel.

pub mod analysis;
pub mod app;
pub mod capture;
pub mod hotkeys;
pub mod ui;
