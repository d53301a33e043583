use adw::prelude::*;
use gtk4 as gtk;
use libadwaita as adw;
use std::cell::RefCell;
use std::rc::Rc;

use crate::app::{Action, AppState};

pub fn show_shortcuts_dialog(state: &Rc<RefCell<AppState>>, parent: &impl IsA<gtk::Window>) {
    let window = adw::PreferencesWindow::builder()
        .transient_for(parent)
        .modal(true)
        .title("Keyboard Shortcuts")
        .default_width(400)
        .default_height(420)
        .build();

    let page = adw::PreferencesPage::new();
    window.add(&page);

    let hotkeys_enabled = state.borrow().config.hotkeys.enabled;
    let global_title = if hotkeys_enabled {
        "Global"
    } else {
        "Global (disabled in config)"
    };
    let group_global = adw::PreferencesGroup::builder().title(global_title).build();
    add_action_row(state, &group_global, Action::StartSnip);
    add_action_row(state, &group_global, Action::TogglePanel);
    page.add(&group_global);

    let group_snip = adw::PreferencesGroup::builder().title("Snipping").build();
    add_action_row(state, &group_snip, Action::Confirm);
    add_action_row(state, &group_snip, Action::Cancel);
    page.add(&group_snip);

    let group_panel = adw::PreferencesGroup::builder().title("Panel").build();
    add_action_row(state, &group_panel, Action::ClosePanel);
    page.add(&group_panel);

    window.present();
}

fn add_action_row(state: &Rc<RefCell<AppState>>, group: &adw::PreferencesGroup, action: Action) {
    let shortcut_label = state.borrow().shortcuts.get_shortcut_label(action);

    let row = adw::ActionRow::builder().title(action.label()).build();

    let shortcut = gtk::Label::builder()
        .label(shortcut_label.as_str())
        .valign(gtk::Align::Center)
        .build();
    shortcut.add_css_class("dim-label");

    row.add_suffix(&shortcut);
    group.add(&row);
}
