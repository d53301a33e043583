//! Application module
//!
//! This module contains the core application state, configuration and
//! in-window shortcuts.

pub mod config;
pub mod shortcuts;
mod state;

pub use config::Config;
pub use shortcuts::{Action, ShortcutConfig};
pub use state::{AppState, Phase, Selection, SnipPayload};
