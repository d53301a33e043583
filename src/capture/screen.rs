//! Screen capture module using xcap library
//!
//! Captures the primary monitor as an `RgbaImage` in physical pixels, together
//! with the monitor geometry needed to map logical selections onto it.

use image::RgbaImage;
use log::{debug, warn};
use xcap::Monitor;

use super::CaptureError;

/// Information about a monitor
#[derive(Debug, Clone)]
pub struct MonitorInfo {
    pub id: u32,
    pub name: String,
    pub x: i32,
    pub y: i32,
    /// Logical width in screen points
    pub width: u32,
    /// Logical height in screen points
    pub height: u32,
    pub is_primary: bool,
    pub scale_factor: f32,
}

impl MonitorInfo {
    fn from_xcap(monitor: &Monitor) -> Result<Self, CaptureError> {
        Ok(Self {
            id: monitor.id()?,
            name: monitor.name()?,
            x: monitor.x()?,
            y: monitor.y()?,
            width: monitor.width()?,
            height: monitor.height()?,
            is_primary: monitor.is_primary()?,
            scale_factor: monitor.scale_factor().unwrap_or(1.0),
        })
    }

    /// Logical size of the monitor as floating point
    pub fn logical_size(&self) -> (f64, f64) {
        (self.width as f64, self.height as f64)
    }
}

/// Result of a screen capture operation
pub struct CaptureResult {
    pub image: RgbaImage,
    pub monitor_info: MonitorInfo,
}

/// Get all available monitors
pub fn get_all_monitors() -> Result<Vec<MonitorInfo>, CaptureError> {
    let monitors = Monitor::all()?;

    let infos = monitors
        .iter()
        .map(MonitorInfo::from_xcap)
        .collect::<Result<Vec<_>, _>>()?;

    if infos.is_empty() {
        Err(CaptureError::NoMonitor)
    } else {
        Ok(infos)
    }
}

fn find_primary(monitors: &[Monitor]) -> Option<&Monitor> {
    monitors
        .iter()
        .find(|m| m.is_primary().unwrap_or(false))
        .or(monitors.first())
}

/// Get the primary monitor (or the first one if none is flagged primary)
pub fn get_primary_monitor() -> Result<MonitorInfo, CaptureError> {
    let monitors = Monitor::all()?;
    let monitor = find_primary(&monitors).ok_or(CaptureError::NoMonitor)?;
    MonitorInfo::from_xcap(monitor)
}

/// Capture the primary monitor
pub fn capture_primary_monitor() -> Result<CaptureResult, CaptureError> {
    let monitors = Monitor::all()?;
    let monitor = find_primary(&monitors).ok_or(CaptureError::NoMonitor)?;

    let monitor_info = MonitorInfo::from_xcap(monitor)?;
    let image = monitor.capture_image()?;

    if image.width() < monitor_info.width || image.height() < monitor_info.height {
        warn!(
            "Capture {}x{} is smaller than logical monitor size {}x{}",
            image.width(),
            image.height(),
            monitor_info.width,
            monitor_info.height
        );
    }

    debug!(
        "Captured monitor '{}' ({}x{} px, scale {})",
        monitor_info.name,
        image.width(),
        image.height(),
        monitor_info.scale_factor
    );

    Ok(CaptureResult {
        image,
        monitor_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_all_monitors() {
        // This test may fail in CI environments without display
        if let Ok(monitors) = get_all_monitors() {
            assert!(!monitors.is_empty());
            for monitor in &monitors {
                println!(
                    "Monitor: {} ({}x{}) at ({}, {})",
                    monitor.name, monitor.width, monitor.height, monitor.x, monitor.y
                );
            }
        }
    }

    #[test]
    fn test_get_primary_monitor() {
        // This test may fail in CI environments without display
        if let Ok(monitor) = get_primary_monitor() {
            assert!(monitor.width > 0);
            assert!(monitor.height > 0);
            let (w, h) = monitor.logical_size();
            assert_eq!(w, monitor.width as f64);
            assert_eq!(h, monitor.height as f64);
        }
    }
}
