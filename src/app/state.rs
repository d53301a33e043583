//! Application state types
//!
//! This module contains the core state for the snip → analyze → show cycle.

use image::RgbaImage;

use crate::analysis::AnalysisResult;
use crate::app::config::Config;
use crate::app::shortcuts::ShortcutConfig;
use crate::capture::{snip_to_data_url, CaptureError, CaptureResult, CropRegion};

/// Where the app is in the snip cycle
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Nothing in progress, panel shows the placeholder
    #[default]
    Idle,
    /// Overlay is up and the user is dragging a region
    Selecting,
    /// Snip sent, waiting for the backend
    Analyzing,
    /// A result is on screen
    Showing,
}

/// A rectangular selection during capture, in overlay coordinates
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl Selection {
    /// Create a new selection with the given start point
    pub fn new(start_x: f64, start_y: f64) -> Self {
        Self {
            start_x,
            start_y,
            end_x: start_x,
            end_y: start_y,
        }
    }

    /// Update the end point of the selection
    pub fn update_end(&mut self, end_x: f64, end_y: f64) {
        self.end_x = end_x;
        self.end_y = end_y;
    }

    /// Get the selection as a normalized region (positive width/height)
    pub fn region(&self) -> CropRegion {
        CropRegion::from_corners(self.start_x, self.start_y, self.end_x, self.end_y)
    }
}

/// The cropped snip handed to the panel and the backend
#[derive(Debug, Clone)]
pub struct SnipPayload {
    pub image: RgbaImage,
    pub data_url: String,
    /// Region in logical coordinates, after clamping to the minimum size
    pub crop: CropRegion,
}

/// Main application state
pub struct AppState {
    pub config: Config,
    pub shortcuts: ShortcutConfig,
    pub phase: Phase,
    /// Frozen full-screen capture shown under the overlay
    pub capture: Option<CaptureResult>,
    pub selection: Option<Selection>,
    pub last_snip: Option<SnipPayload>,
    pub result: Option<AnalysisResult>,
    /// Bumped on every new snip or reset so late results can be discarded
    generation: u64,
    /// Generation of the request still waiting on the backend
    pending: Option<u64>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shortcuts: ShortcutConfig::new(),
            phase: Phase::Idle,
            capture: None,
            selection: None,
            last_snip: None,
            result: None,
            generation: 0,
            pending: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Enter selection mode over a fresh capture
    pub fn begin_selecting(&mut self, capture: CaptureResult) {
        self.capture = Some(capture);
        self.selection = None;
        self.phase = Phase::Selecting;
    }

    pub fn is_selecting(&self) -> bool {
        self.phase == Phase::Selecting
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }

    /// Whether a snip is still waiting on the backend
    pub fn is_analyzing(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a new selection at the given point
    pub fn start_selection(&mut self, x: f64, y: f64) {
        self.selection = Some(Selection::new(x, y));
    }

    /// Update the current selection end point
    pub fn update_selection(&mut self, end_x: f64, end_y: f64) {
        if let Some(ref mut sel) = self.selection {
            sel.update_end(end_x, end_y);
        }
    }

    /// Leave selection mode without snipping. A request still in flight
    /// keeps the panel loading; otherwise the previous result, if any, stays.
    pub fn cancel_selection(&mut self) {
        self.capture = None;
        self.selection = None;
        self.phase = if self.pending.is_some() {
            Phase::Analyzing
        } else if self.result.is_some() {
            Phase::Showing
        } else {
            Phase::Idle
        };
    }

    /// Crop the capture to the current selection and move to `Analyzing`.
    ///
    /// `logical_size` is the size of the surface the selection was drawn on.
    /// Returns the payload and the generation the result must be tagged with.
    pub fn finish_snip(
        &mut self,
        logical_size: (f64, f64),
    ) -> Result<(SnipPayload, u64), CaptureError> {
        let Some(selection) = self.selection.take() else {
            self.cancel_selection();
            return Err(CaptureError::NoSelection);
        };
        let capture = self.capture.take().ok_or(CaptureError::NoCapture)?;
        let min_size = self.config.snip.min_size;

        let crop = selection.region().clamped_to(min_size);
        let snipped = snip_to_data_url(&capture.image, crop, logical_size, min_size);

        let (image, data_url) = match snipped {
            Ok(ok) => ok,
            Err(e) => {
                self.cancel_selection();
                return Err(e);
            }
        };

        let payload = SnipPayload {
            image,
            data_url,
            crop,
        };

        self.generation += 1;
        self.pending = Some(self.generation);
        self.phase = Phase::Analyzing;
        self.result = None;
        self.last_snip = Some(payload.clone());

        Ok((payload, self.generation))
    }

    /// Store a backend result if it belongs to the latest snip.
    ///
    /// A result arriving while the overlay is up for another snip is kept
    /// and shown once that selection is cancelled.
    pub fn apply_result(&mut self, generation: u64, result: AnalysisResult) -> bool {
        if self.pending != Some(generation) {
            return false;
        }
        self.pending = None;
        self.result = Some(result);
        if self.phase != Phase::Selecting {
            self.phase = Phase::Showing;
        }
        true
    }

    /// Close the current result and return to idle
    pub fn reset(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.phase = Phase::Idle;
        self.capture = None;
        self.selection = None;
        self.last_snip = None;
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MonitorInfo;

    fn fake_capture(width: u32, height: u32, scale: u32) -> CaptureResult {
        CaptureResult {
            image: RgbaImage::new(width * scale, height * scale),
            monitor_info: MonitorInfo {
                id: 1,
                name: "test".to_string(),
                x: 0,
                y: 0,
                width,
                height,
                is_primary: true,
                scale_factor: scale as f32,
            },
        }
    }

    #[test]
    fn test_selection_region_normalized() {
        let mut sel = Selection::new(100.0, 100.0);
        sel.update_end(40.0, 160.0);
        assert_eq!(sel.region(), CropRegion::new(40.0, 100.0, 60.0, 60.0));
    }

    #[test]
    fn test_finish_snip_scales_to_capture() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(800, 600, 2));
        state.start_selection(10.0, 20.0);
        state.update_selection(110.0, 70.0);

        let (payload, generation) = state.finish_snip((800.0, 600.0)).unwrap();
        assert_eq!(payload.image.dimensions(), (200, 100));
        assert_eq!(payload.crop, CropRegion::new(10.0, 20.0, 100.0, 50.0));
        assert_eq!(generation, 1);
        assert_eq!(state.phase, Phase::Analyzing);
        assert!(state.capture.is_none());
    }

    #[test]
    fn test_tiny_snip_is_clamped() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(5.0, 5.0);

        let (payload, _) = state.finish_snip((100.0, 100.0)).unwrap();
        assert_eq!(payload.image.dimensions(), (10, 10));
    }

    #[test]
    fn test_stale_result_is_ignored() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, first) = state.finish_snip((100.0, 100.0)).unwrap();

        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, second) = state.finish_snip((100.0, 100.0)).unwrap();

        assert!(!state.apply_result(first, AnalysisResult::default()));
        assert!(state.apply_result(second, AnalysisResult::default()));
        assert_eq!(state.phase, Phase::Showing);
    }

    #[test]
    fn test_reset_discards_pending_result() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, generation) = state.finish_snip((100.0, 100.0)).unwrap();

        state.reset();
        assert!(!state.apply_result(generation, AnalysisResult::default()));
        assert_eq!(state.phase, Phase::Idle);
        assert!(state.last_snip.is_none());
    }

    #[test]
    fn test_cancel_keeps_previous_result() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, generation) = state.finish_snip((100.0, 100.0)).unwrap();
        state.apply_result(generation, AnalysisResult::connection_failed());

        state.begin_selecting(fake_capture(100, 100, 1));
        state.cancel_selection();
        assert_eq!(state.phase, Phase::Showing);
        assert!(state.result.is_some());
    }

    #[test]
    fn test_result_survives_cancelled_resnip() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, generation) = state.finish_snip((100.0, 100.0)).unwrap();

        state.begin_selecting(fake_capture(100, 100, 1));
        assert!(state.is_analyzing());

        assert!(state.apply_result(generation, AnalysisResult::connection_failed()));
        assert_eq!(state.phase, Phase::Selecting);
        assert!(!state.is_analyzing());

        state.cancel_selection();
        assert_eq!(state.phase, Phase::Showing);
        assert_eq!(state.result, Some(AnalysisResult::connection_failed()));
    }

    #[test]
    fn test_cancelled_resnip_goes_back_to_loading() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, generation) = state.finish_snip((100.0, 100.0)).unwrap();

        state.begin_selecting(fake_capture(100, 100, 1));
        state.cancel_selection();
        assert_eq!(state.phase, Phase::Analyzing);

        assert!(state.apply_result(generation, AnalysisResult::default()));
        assert_eq!(state.phase, Phase::Showing);
    }

    #[test]
    fn test_result_is_applied_once() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(0.0, 0.0);
        let (_, generation) = state.finish_snip((100.0, 100.0)).unwrap();

        assert!(state.apply_result(generation, AnalysisResult::default()));
        assert!(!state.apply_result(generation, AnalysisResult::connection_failed()));
        assert_eq!(state.result, Some(AnalysisResult::default()));
    }

    #[test]
    fn test_finish_without_drag_is_rejected() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        assert!(!state.has_selection());

        assert!(matches!(
            state.finish_snip((100.0, 100.0)),
            Err(CaptureError::NoSelection)
        ));
        assert_eq!(state.phase, Phase::Idle);
        assert_eq!(state.generation(), 0);
        assert!(state.last_snip.is_none());
    }

    #[test]
    fn test_finish_without_capture_fails() {
        let mut state = AppState::default();
        state.start_selection(0.0, 0.0);
        assert!(matches!(
            state.finish_snip((100.0, 100.0)),
            Err(CaptureError::NoCapture)
        ));
    }

    #[test]
    fn test_selection_outside_capture_fails() {
        let mut state = AppState::default();
        state.begin_selecting(fake_capture(100, 100, 1));
        state.start_selection(150.0, 150.0);
        state.update_selection(180.0, 180.0);

        assert!(matches!(
            state.finish_snip((100.0, 100.0)),
            Err(CaptureError::EmptyCrop)
        ));
        assert_eq!(state.phase, Phase::Idle);
    }
}
