//! Notification panel wiring.

mod notifications_component;
mod state;

pub use notifications_component::NotificationsComponent;
pub use state::NotificationPanelState;
