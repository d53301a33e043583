use gtk::gdk;
use gtk4 as gtk;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    StartSnip,
    TogglePanel,
    Cancel,
    Confirm,
    ClosePanel,
}

impl Action {
    pub fn label(&self) -> &str {
        match self {
            Action::StartSnip => "Start a New Snip",
            Action::TogglePanel => "Show / Hide Panel",
            Action::Cancel => "Cancel Snip",
            Action::Confirm => "Confirm Selection",
            Action::ClosePanel => "Close Result",
        }
    }

    pub fn all() -> [Action; 5] {
        [
            Action::StartSnip,
            Action::TogglePanel,
            Action::Cancel,
            Action::Confirm,
            Action::ClosePanel,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: gdk::Key,
    pub modifiers: gdk::ModifierType,
}

/// Key bindings active while one of the app's windows has focus
#[derive(Debug, Clone)]
pub struct ShortcutConfig {
    bindings: HashMap<Action, Shortcut>,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        let mut bindings = HashMap::new();

        // Same chords as the global hotkeys
        bindings.insert(
            Action::StartSnip,
            Shortcut {
                key: gdk::Key::v,
                modifiers: gdk::ModifierType::ALT_MASK,
            },
        );
        bindings.insert(
            Action::TogglePanel,
            Shortcut {
                key: gdk::Key::space,
                modifiers: gdk::ModifierType::ALT_MASK,
            },
        );

        bindings.insert(
            Action::Cancel,
            Shortcut {
                key: gdk::Key::Escape,
                modifiers: gdk::ModifierType::empty(),
            },
        );
        bindings.insert(
            Action::Confirm,
            Shortcut {
                key: gdk::Key::Return,
                modifiers: gdk::ModifierType::empty(),
            },
        );
        bindings.insert(
            Action::ClosePanel,
            Shortcut {
                key: gdk::Key::w,
                modifiers: gdk::ModifierType::CONTROL_MASK,
            },
        );

        Self { bindings }
    }
}

impl ShortcutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_action(&self, key: gdk::Key, modifiers: gdk::ModifierType) -> Option<Action> {
        // Filter out irrelevant modifiers like NumLock/CapsLock/ScrollLock
        let mask = gdk::ModifierType::CONTROL_MASK
            | gdk::ModifierType::SHIFT_MASK
            | gdk::ModifierType::ALT_MASK
            | gdk::ModifierType::SUPER_MASK
            | gdk::ModifierType::META_MASK;

        let clean_mods = modifiers & mask;
        let key = key.to_lower();

        for (action, shortcut) in &self.bindings {
            if shortcut.key == key && shortcut.modifiers == clean_mods {
                return Some(*action);
            }

            // Handle Keypad Enter as alias for Return
            if *action == Action::Confirm
                && key == gdk::Key::KP_Enter
                && shortcut.key == gdk::Key::Return
                && shortcut.modifiers == clean_mods
            {
                return Some(*action);
            }
        }
        None
    }

    pub fn get_shortcut_label(&self, action: Action) -> String {
        if let Some(sc) = self.bindings.get(&action) {
            return gtk::accelerator_get_label(sc.key, sc.modifiers).to_string();
        }
        String::new()
    }
}
