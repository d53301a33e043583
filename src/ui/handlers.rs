use gtk::glib;
use gtk4 as gtk;
use log::{debug, error, info, warn};

use gtk::{EventControllerKey, GestureDrag};
use gtk4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::analysis::{AnalysisClient, AnalysisResult};
use crate::app::{Action, AppState, Phase};
use crate::capture::capture_primary_monitor;
use crate::hotkeys::HotkeyEvent;
use crate::ui::clipboard::ClipboardManager;
use crate::ui::overlay::{image_to_pixbuf, OverlayComponents};
use crate::ui::panel::{self, PanelComponents};
use crate::ui::shortcuts::show_shortcuts_dialog;

/// Time given to the compositor to unmap our windows before capturing
const HIDE_SETTLE_DELAY: Duration = Duration::from_millis(200);

pub struct UiComponents {
    pub panel: PanelComponents,
    pub overlay: OverlayComponents,
}

/// Non-GTK services the UI talks to
pub struct Services {
    pub runtime: tokio::runtime::Handle,
    pub client: AnalysisClient,
}

/// Drives the snip → analyze → show cycle from UI events
#[derive(Clone)]
pub struct Controller {
    state: Rc<RefCell<AppState>>,
    ui: Rc<UiComponents>,
    services: Rc<Services>,
}

impl Controller {
    pub fn new(state: Rc<RefCell<AppState>>, ui: Rc<UiComponents>, services: Rc<Services>) -> Self {
        Self { state, ui, services }
    }

    /// Hide our windows, capture the primary monitor and show the overlay
    pub fn start_snip(&self) {
        if self.state.borrow().is_selecting() {
            debug!("Snip already in progress");
            self.ui.overlay.window.present();
            return;
        }

        self.ui.panel.window.set_visible(false);
        self.ui.overlay.window.set_visible(false);

        let context = glib::MainContext::default();
        while context.pending() {
            context.iteration(false);
        }
        std::thread::sleep(HIDE_SETTLE_DELAY);

        match capture_primary_monitor() {
            Ok(result) => {
                *self.ui.overlay.backdrop.borrow_mut() = Some(image_to_pixbuf(&result.image));
                self.state.borrow_mut().begin_selecting(result);

                self.ui.overlay.window.fullscreen();
                self.ui.overlay.window.present();
                self.ui.overlay.drawing_area.queue_draw();
            }
            Err(e) => {
                error!("Failed to capture screen: {}", e);
                self.ui.panel.window.present();
            }
        }
    }

    fn hide_overlay(&self) {
        self.ui.overlay.window.unfullscreen();
        self.ui.overlay.window.set_visible(false);
        *self.ui.overlay.backdrop.borrow_mut() = None;
    }

    /// Abort the current selection and bring the panel back
    pub fn cancel_snip(&self) {
        if !self.state.borrow().is_selecting() {
            return;
        }
        debug!("Snip cancelled");
        self.state.borrow_mut().cancel_selection();
        self.hide_overlay();
        self.ui.panel.window.present();
    }

    /// Crop the selection and send it for analysis
    pub fn complete_snip(&self) {
        let logical_size = {
            let s = self.state.borrow();
            if !s.is_selecting() {
                return;
            }
            let da = &self.ui.overlay.drawing_area;
            match (da.width(), da.height(), s.capture.as_ref()) {
                (w, h, _) if w > 0 && h > 0 => (w as f64, h as f64),
                (_, _, Some(capture)) => capture.monitor_info.logical_size(),
                _ => (0.0, 0.0),
            }
        };

        self.hide_overlay();

        let finished = self.state.borrow_mut().finish_snip(logical_size);
        let (payload, generation) = match finished {
            Ok(ok) => ok,
            Err(e) => {
                error!("Snip Processing Failed: {}", e);
                return;
            }
        };

        info!(
            "Snipped {:.0}x{:.0} at ({:.0}, {:.0}), {}x{} px",
            payload.crop.width,
            payload.crop.height,
            payload.crop.x,
            payload.crop.y,
            payload.image.width(),
            payload.image.height()
        );

        let panel_window = &self.ui.panel.window;
        if panel_window.is_minimized() {
            panel_window.unminimize();
        }
        panel_window.present();

        let delay = Duration::from_millis(self.state.borrow().config.snip.panel_delay_ms);
        let this = self.clone();
        glib::timeout_add_local_once(delay, move || {
            if this.state.borrow().generation() != generation {
                return;
            }
            panel::show_loading(&this.ui.panel, &payload);
            this.request_analysis(payload.data_url, generation);
        });
    }

    fn request_analysis(&self, data_url: String, generation: u64) {
        let client = self.services.client.clone();
        let handle = self
            .services
            .runtime
            .spawn(async move { client.analyze(&data_url).await });

        let this = self.clone();
        glib::spawn_future_local(async move {
            let result = handle.await.unwrap_or_else(|e| {
                error!("Analysis task failed: {}", e);
                AnalysisResult::connection_failed()
            });

            let applied = this.state.borrow_mut().apply_result(generation, result.clone());
            if applied {
                panel::show_result(&this.ui.panel, &result);
            } else {
                debug!("Dropping stale result for snip #{}", generation);
            }
        });
    }

    /// Close the current verdict and go back to the placeholder
    pub fn close_result(&self) {
        self.state.borrow_mut().reset();
        self.show_idle();
    }

    pub fn show_idle(&self) {
        let label = self
            .state
            .borrow()
            .shortcuts
            .get_shortcut_label(Action::StartSnip);
        panel::show_idle(&self.ui.panel, &label);
    }

    pub fn toggle_panel(&self) {
        let window = &self.ui.panel.window;
        if window.is_visible() {
            window.set_visible(false);
        } else {
            window.present();
        }
    }

    pub fn handle_action(&self, action: Action) {
        debug!("Action: {:?}", action);
        let phase = self.state.borrow().phase;
        match action {
            Action::StartSnip => self.start_snip(),
            Action::TogglePanel => self.toggle_panel(),
            Action::Confirm if phase == Phase::Selecting => {
                if self.state.borrow().has_selection() {
                    self.complete_snip();
                } else {
                    debug!("Nothing selected yet");
                }
            }
            Action::Cancel if phase == Phase::Selecting => self.cancel_snip(),
            Action::Cancel => self.ui.panel.window.set_visible(false),
            Action::ClosePanel => self.close_result(),
            Action::Confirm => {}
        }
    }

    pub fn handle_hotkey(&self, event: HotkeyEvent) {
        match event {
            HotkeyEvent::StartSnip => self.handle_action(Action::StartSnip),
            HotkeyEvent::TogglePanel => self.handle_action(Action::TogglePanel),
        }
    }
}

fn connect_drag_handlers(controller: &Controller) {
    let drag = GestureDrag::new();

    drag.connect_drag_begin({
        let controller = controller.clone();
        move |_, x, y| {
            let mut s = controller.state.borrow_mut();
            if s.is_selecting() {
                s.start_selection(x, y);
                drop(s);
                controller.ui.overlay.drawing_area.queue_draw();
            }
        }
    });

    drag.connect_drag_update({
        let controller = controller.clone();
        move |gesture, offset_x, offset_y| {
            if let Some((start_x, start_y)) = gesture.start_point() {
                let mut s = controller.state.borrow_mut();
                if s.is_selecting() {
                    s.update_selection(start_x + offset_x, start_y + offset_y);
                    drop(s);
                    controller.ui.overlay.drawing_area.queue_draw();
                }
            }
        }
    });

    drag.connect_drag_end({
        let controller = controller.clone();
        move |gesture, offset_x, offset_y| {
            if let Some((start_x, start_y)) = gesture.start_point() {
                let mut s = controller.state.borrow_mut();
                if !s.is_selecting() {
                    return;
                }
                s.update_selection(start_x + offset_x, start_y + offset_y);
                drop(s);
                controller.complete_snip();
            }
        }
    });

    controller.ui.overlay.drawing_area.add_controller(drag);
}

fn connect_key_handlers(controller: &Controller, window: &impl IsA<gtk::Widget>) {
    let keys = EventControllerKey::new();
    keys.connect_key_pressed({
        let controller = controller.clone();
        move |_, key, _, modifiers| {
            let action = controller.state.borrow().shortcuts.get_action(key, modifiers);
            match action {
                Some(action) => {
                    controller.handle_action(action);
                    glib::Propagation::Stop
                }
                None => glib::Propagation::Proceed,
            }
        }
    });
    window.add_controller(keys);
}

fn connect_panel_buttons(controller: &Controller) {
    let panel = &controller.ui.panel;

    panel.snip_btn.connect_clicked({
        let controller = controller.clone();
        move |_| controller.start_snip()
    });

    panel.close_btn.connect_clicked({
        let controller = controller.clone();
        move |_| controller.close_result()
    });

    panel.shortcuts_btn.connect_clicked({
        let controller = controller.clone();
        move |_| show_shortcuts_dialog(&controller.state, &controller.ui.panel.window)
    });

    panel.copy_preview_btn.connect_clicked({
        let controller = controller.clone();
        move |btn| {
            if let Some(snip) = controller.state.borrow().last_snip.as_ref() {
                ClipboardManager::from_widget(btn).copy_image(&image_to_pixbuf(&snip.image));
                info!("Snip copied to clipboard");
            }
        }
    });

    // Closing the panel only hides it; the app keeps listening for hotkeys
    panel.window.connect_close_request(|window| {
        window.set_visible(false);
        glib::Propagation::Stop
    });

    controller.ui.overlay.window.connect_close_request({
        let controller = controller.clone();
        move |_| {
            controller.cancel_snip();
            glib::Propagation::Stop
        }
    });
}

/// Forward global hotkeys into the controller on the main loop
pub fn attach_hotkey_receiver(controller: &Controller, mut receiver: UnboundedReceiver<HotkeyEvent>) {
    let controller = controller.clone();
    glib::spawn_future_local(async move {
        while let Some(event) = receiver.recv().await {
            controller.handle_hotkey(event);
        }
        warn!("Hotkey channel closed");
    });
}

pub fn connect_all_handlers(controller: &Controller) {
    debug!("Initializing UI handlers");
    connect_drag_handlers(controller);
    connect_key_handlers(controller, &controller.ui.overlay.window);
    connect_key_handlers(controller, &controller.ui.panel.window);
    connect_panel_buttons(controller);
}
