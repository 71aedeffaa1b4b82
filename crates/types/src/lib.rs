//! Shared type definitions for LeadDash.

pub mod notification;

pub use notification::{Notification, NotificationKind, ParseNotificationKindError, unread_count};
