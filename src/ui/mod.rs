pub mod clipboard;
pub mod handlers;
pub mod overlay;
pub mod panel;
pub mod shortcuts;
pub mod style;

pub use handlers::{Controller, Services, UiComponents};

use gtk4 as gtk;
use libadwaita as adw;

use adw::prelude::*;
use gtk::gio;
use log::{info, warn};
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{AppState, Config};
use crate::capture::DesktopSession;
use crate::hotkeys::HotkeyManager;

/// Everything `build_ui` needs from `main`
pub struct Startup {
    pub config: Config,
    pub services: Rc<Services>,
    pub session: DesktopSession,
}

pub fn build_ui(app: &adw::Application, startup: &Startup) {
    style::load_css();

    let state = Rc::new(RefCell::new(AppState::new(startup.config.clone())));

    let panel = panel::create_panel(app);
    let overlay = overlay::create_overlay(app, &state);
    let ui = Rc::new(UiComponents { panel, overlay });

    let controller = Controller::new(state.clone(), ui.clone(), startup.services.clone());
    handlers::connect_all_handlers(&controller);
    controller.show_idle();

    install_quit_action(app);
    start_hotkeys(app, &controller, startup);

    ui.panel.window.present();
}

fn install_quit_action(app: &adw::Application) {
    let quit = gio::SimpleAction::new("quit", None);
    quit.connect_activate({
        let app = app.clone();
        move |_, _| app.quit()
    });
    app.add_action(&quit);
    app.set_accels_for_action("app.quit", &["<Control>q"]);
}

fn start_hotkeys(app: &adw::Application, controller: &Controller, startup: &Startup) {
    if !startup.config.hotkeys.enabled {
        info!("Global hotkeys disabled in config");
        return;
    }

    if !startup.session.supports_global_hotkeys() {
        warn!(
            "Global hotkeys are not available on {}; use the in-window shortcuts instead",
            startup.session
        );
        return;
    }

    let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
    let mut manager = HotkeyManager::new();
    if let Err(e) = manager.start(sender) {
        warn!("Could not start hotkey listener: {}", e);
        return;
    }
    handlers::attach_hotkey_receiver(controller, receiver);

    // Keep the listener alive as long as the application
    let manager = RefCell::new(Some(manager));
    app.connect_shutdown(move |_| {
        if let Some(mut manager) = manager.borrow_mut().take() {
            manager.stop();
        }
    });
}
