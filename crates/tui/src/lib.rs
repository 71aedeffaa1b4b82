//! # LeadDash TUI Library
//!
//! Terminal rendition of the dashboard's notification surface: a header with
//! a bell and unread badge, and a slide-in panel listing notifications with
//! mark-read, delete, clear and start-tour actions.
//!
//! ## Architecture
//!
//! Components handle keys and render themselves; they report intents as
//! `Effect`s which `App` applies to the notification store. All derived state
//! (badge, relative ages) is recomputed from the store on every frame.

mod app;
mod ui;

use anyhow::Result;
use leaddash_util::{NotificationStore, UserPreferences};

pub use app::{App, Effect, TourCallback};
pub use ui::components::badge_label;

/// Runs the TUI until the user quits.
///
/// # Errors
///
/// Returns an error when the terminal cannot be put into raw mode or drawn to.
pub fn run(store: NotificationStore, preferences: UserPreferences, on_start_tour: TourCallback) -> Result<()> {
    ui::runtime::run_app(App::new(store, preferences, on_start_tour))
}
