pub mod component;
pub mod header;
pub mod notifications;

pub(crate) use component::Component;
pub use header::{HeaderComponent, badge_label};
pub use notifications::NotificationsComponent;
