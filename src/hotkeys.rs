//! Global hotkey handling for snipcheck.
//!
//! Alt+V starts a snip and Alt+Space shows or hides the panel, even while
//! another application has focus. Uses rdev for cross-platform global key
//! listening; events are forwarded to the GTK main loop over a channel.

use log::{debug, error, info};
use rdev::{listen, Event, EventType, Key};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::sync::mpsc::UnboundedSender;

/// A hotkey chord that was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// Alt+V
    StartSnip,
    /// Alt+Space
    TogglePanel,
}

/// Tracks modifier state across raw key events and recognizes chords
#[derive(Debug, Default)]
pub struct HotkeyTracker {
    alt_held: bool,
}

impl HotkeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one raw event; returns a hotkey when a chord completes
    pub fn handle(&mut self, event_type: &EventType) -> Option<HotkeyEvent> {
        match event_type {
            EventType::KeyPress(Key::Alt) | EventType::KeyPress(Key::AltGr) => {
                self.alt_held = true;
                None
            }
            EventType::KeyRelease(Key::Alt) | EventType::KeyRelease(Key::AltGr) => {
                self.alt_held = false;
                None
            }
            EventType::KeyPress(key) if self.alt_held => match key {
                Key::KeyV => Some(HotkeyEvent::StartSnip),
                Key::Space => Some(HotkeyEvent::TogglePanel),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Owns the background listener thread
pub struct HotkeyManager {
    stop_flag: Arc<AtomicBool>,
    listener_thread: Option<JoinHandle<()>>,
}

impl Default for HotkeyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HotkeyManager {
    pub fn new() -> Self {
        HotkeyManager {
            stop_flag: Arc::new(AtomicBool::new(false)),
            listener_thread: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.listener_thread.is_some()
    }

    /// Start listening for global hotkeys, sending each one on `sender`.
    ///
    /// Returns an error if the listener is already running.
    pub fn start(&mut self, sender: UnboundedSender<HotkeyEvent>) -> Result<(), String> {
        if self.listener_thread.is_some() {
            return Err("Hotkey listener already running".to_string());
        }

        self.stop_flag.store(false, Ordering::SeqCst);
        let stop_flag = self.stop_flag.clone();

        let handle = thread::Builder::new()
            .name("hotkeys".to_string())
            .spawn(move || {
                let mut tracker = HotkeyTracker::new();
                let callback = move |event: Event| {
                    if stop_flag.load(Ordering::SeqCst) {
                        return;
                    }

                    if let Some(hotkey) = tracker.handle(&event.event_type) {
                        debug!("Hotkey pressed: {:?}", hotkey);
                        if sender.send(hotkey).is_err() {
                            stop_flag.store(true, Ordering::SeqCst);
                        }
                    }
                };

                // Blocks until error; on macOS this needs Accessibility permissions
                if let Err(e) = listen(callback) {
                    error!("Hotkey listener error: {:?}", e);
                }
            })
            .map_err(|e| format!("Failed to spawn hotkey thread: {}", e))?;

        info!("Global hotkeys active: Alt+V (snip), Alt+Space (toggle panel)");
        self.listener_thread = Some(handle);
        Ok(())
    }

    /// Stop forwarding hotkeys.
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);
        // rdev's listen() can't be interrupted; the thread lives until exit
        self.listener_thread = None;
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        self.stop();
    }
}
