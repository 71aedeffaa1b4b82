//! Application state for the LeadDash TUI.
//!
//! `App` owns the notification store, the panel's local UI state and the
//! styling preference. Components never touch the store directly: they return
//! [`Effect`]s and `App::apply_effects` turns each one into a store operation.

use chrono::{DateTime, Utc};
use leaddash_types::Notification;
use leaddash_util::{NotificationStore, UserPreferences};
use tracing::{info, warn};

use crate::ui::components::notifications::NotificationPanelState;
use crate::ui::theme::{self, Theme};

/// Callback invoked when the user starts the guided tour from a notification.
pub type TourCallback = Box<dyn FnMut(&Notification)>;

/// User intents produced by components and applied by [`App`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    TogglePanel,
    ClosePanel,
    MarkRead(String),
    MarkAllRead,
    Delete(String),
    ClearAll,
    /// Start the guided tour from the `tour` notification with this id.
    StartTour(String),
    ToggleDarkMode,
    Quit,
}

pub struct App {
    pub store: NotificationStore,
    pub panel: NotificationPanelState,
    pub preferences: UserPreferences,
    pub theme: Box<dyn Theme>,
    /// One-line feedback shown in the body, replaced by the next action.
    pub status: Option<String>,
    pub should_quit: bool,
    on_start_tour: TourCallback,
}

impl App {
    pub fn new(store: NotificationStore, preferences: UserPreferences, on_start_tour: TourCallback) -> Self {
        let theme = theme::load(preferences.dark_mode());
        Self {
            store,
            panel: NotificationPanelState::default(),
            preferences,
            theme,
            status: None,
            should_quit: false,
            on_start_tour,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.store.now()
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    pub fn apply_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            self.apply_effect(effect);
        }
    }

    pub fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::TogglePanel => self.panel.toggle(),
            Effect::ClosePanel => self.panel.close(),
            Effect::MarkRead(id) => self.store.mark_read(&id),
            Effect::MarkAllRead => {
                self.store.mark_all_read();
                self.status = Some("All notifications marked as read".to_string());
            }
            Effect::Delete(id) => self.store.delete(&id),
            Effect::ClearAll => {
                self.store.clear_all();
                self.status = Some("Notifications cleared".to_string());
            }
            Effect::StartTour(id) => self.start_tour(&id),
            Effect::ToggleDarkMode => self.toggle_dark_mode(),
            Effect::Quit => self.should_quit = true,
        }
        self.panel.clamp_selection(self.store.notifications().len());
        if let Some(error) = self.store.last_persistence_error() {
            self.status = Some(format!("Changes not saved: {error}"));
        }
    }

    fn start_tour(&mut self, id: &str) {
        let Some(notification) = self.store.get(id).filter(|notification| notification.kind.offers_tour()).cloned() else {
            warn!(id, "Ignoring start-tour request for a notification without a tour");
            return;
        };
        self.store.mark_read(id);
        self.panel.close();
        info!(id, "Starting guided tour");
        (self.on_start_tour)(&notification);
        self.status = Some("Guided tour started".to_string());
    }

    fn toggle_dark_mode(&mut self) {
        let enabled = !self.preferences.dark_mode();
        if let Err(error) = self.preferences.set_dark_mode(enabled) {
            warn!(error = %error, "Failed to persist dark mode preference");
        }
        self.theme = theme::load(self.preferences.dark_mode());
    }
}
