//! Capture module: screen capture, session detection and snip geometry
//!
//! This module provides abstractions over the xcap library for capturing the
//! primary screen and turning a user selection into an encoded crop.

pub mod desktop;
pub mod region;
pub mod screen;

pub use desktop::DesktopSession;
pub use region::{crop_image, encode_png_data_url, snip_to_data_url, CropRegion, PixelRect};
pub use screen::{capture_primary_monitor, CaptureResult, MonitorInfo};

/// Errors produced while capturing or cropping the screen
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("Failed to access screen: {0}")]
    Xcap(#[from] xcap::XCapError),

    #[error("No monitors available")]
    NoMonitor,

    #[error("No capture in progress")]
    NoCapture,

    #[error("No region selected")]
    NoSelection,

    #[error("Snip region lies outside the captured image")]
    EmptyCrop,

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}
