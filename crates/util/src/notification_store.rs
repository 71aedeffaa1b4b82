//! Client-local notification store.
//!
//! [`NotificationStore`] owns the ordered notification collection shown in the
//! dashboard's notification panel and mirrors it into a [`BlobStore`] under a
//! single key. Every mutation rewrites the whole collection; there are no
//! incremental writes. All operations run synchronously and assume a single
//! writer: a second process writing the same blob silently wins.
//!
//! Persistence failures during mutations never reach the caller. The change
//! still applies in memory, the failure is logged, and the message is kept
//! in [`NotificationStore::last_persistence_error`].

use std::env;
use std::sync::Arc;

use chrono::{DateTime, Duration, SubsecRound, Utc};
use leaddash_types::{Notification, NotificationKind, unread_count};
use tracing::{debug, error, warn};

use crate::blob_store::{BlobStore, BlobStoreError};

/// Key of the persisted notification blob.
pub const NOTIFICATIONS_KEY: &str = "leaddash.notifications";

/// Key written when the seed set is first generated.
pub const INITIALIZED_MARKER_KEY: &str = "leaddash.notifications.initialized";

/// Environment variable selecting the [`ReseedPolicy`] (`true` or `false`).
pub const RESEED_AFTER_CLEAR_ENV: &str = "LEADDASH_RESEED_AFTER_CLEAR";

/// Source of "now" for seeding and new notifications.
pub type Clock = fn() -> DateTime<Utc>;

/// What [`NotificationStore::load`] does when the blob is absent after the
/// seed set has already been generated once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReseedPolicy {
    /// Re-seed whenever the blob is absent, including after an explicit clear.
    #[default]
    Always,
    /// Only seed the very first time; a cleared store stays empty.
    StayEmpty,
}

impl ReseedPolicy {
    /// Read the policy from `LEADDASH_RESEED_AFTER_CLEAR`, defaulting to [`ReseedPolicy::Always`].
    pub fn from_env() -> Self {
        match env::var(RESEED_AFTER_CLEAR_ENV) {
            Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
                "false" | "0" | "no" | "off" => Self::StayEmpty,
                "" | "true" | "1" | "yes" | "on" => Self::Always,
                other => {
                    warn!(value = other, "Unrecognized {RESEED_AFTER_CLEAR_ENV} value; re-seeding after clear");
                    Self::Always
                }
            },
            Err(_) => Self::Always,
        }
    }
}

/// Builds the fixed onboarding set, newest first, all unread.
pub fn seed_notifications(now: DateTime<Utc>) -> Vec<Notification> {
    let now = now.trunc_subsecs(3);
    vec![
        Notification::new(
            "welcome",
            NotificationKind::Welcome,
            "Welcome to LeadDash!",
            "Your workspace is ready. Start by importing or creating your first lead.",
            now,
        ),
        Notification::new(
            "tour",
            NotificationKind::Tour,
            "Take the guided tour",
            "See how leads, campaigns and quick actions fit together in two minutes.",
            now - Duration::minutes(2),
        ),
        Notification::new(
            "release-notes",
            NotificationKind::Update,
            "What's new",
            "Lead scoring, bulk campaign sends and a dark theme are now available.",
            now - Duration::hours(1),
        ),
    ]
}

/// Ordered notification collection backed by a blob store.
pub struct NotificationStore {
    backend: Arc<dyn BlobStore>,
    notifications: Vec<Notification>,
    policy: ReseedPolicy,
    clock: Clock,
    last_persistence_error: Option<String>,
}

impl NotificationStore {
    /// Create a store with an empty in-memory collection. Call [`Self::load`]
    /// to pull persisted state, or use [`Self::open`].
    pub fn new(backend: Arc<dyn BlobStore>) -> Self {
        Self {
            backend,
            notifications: Vec::new(),
            policy: ReseedPolicy::default(),
            clock: Utc::now,
            last_persistence_error: None,
        }
    }

    /// Create a store and load it immediately.
    pub fn open(backend: Arc<dyn BlobStore>, policy: ReseedPolicy) -> Self {
        let mut store = Self::new(backend).with_policy(policy);
        store.load();
        store
    }

    pub fn with_policy(mut self, policy: ReseedPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn policy(&self) -> ReseedPolicy {
        self.policy
    }

    /// Current time according to the store clock.
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Replace the in-memory collection with the persisted one.
    ///
    /// An absent blob yields the seed set (persisted before returning) unless
    /// the policy is [`ReseedPolicy::StayEmpty`] and the store was seeded
    /// before. A blob that fails to parse is treated as absent.
    pub fn load(&mut self) -> &[Notification] {
        match self.read_blob() {
            Some(notifications) => {
                self.notifications = notifications;
            }
            None if self.policy == ReseedPolicy::StayEmpty && self.was_seeded() => {
                debug!("Notification blob absent after clear; staying empty");
                self.notifications = Vec::new();
            }
            None => self.reseed(),
        }
        &self.notifications
    }

    /// Serialize `notifications` and overwrite the persisted blob.
    pub fn save(&self, notifications: &[Notification]) -> Result<(), BlobStoreError> {
        let payload = serde_json::to_string(notifications)?;
        self.backend.set(NOTIFICATIONS_KEY, payload)
    }

    /// Records in display order, newest first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|notification| notification.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    /// Number of unread records in the current collection.
    pub fn unread(&self) -> usize {
        unread_count(&self.notifications)
    }

    /// Message of the most recent failed write, cleared by the next successful one.
    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    /// Mark the record with `id` as read. Unknown ids are ignored.
    pub fn mark_read(&mut self, id: &str) {
        let Some(notification) = self.notifications.iter_mut().find(|notification| notification.id == id) else {
            debug!(id, "mark_read ignored unknown notification");
            return;
        };
        if notification.read {
            return;
        }
        notification.read = true;
        debug!(id, "Marked notification read");
        self.persist();
    }

    /// Mark every record as read.
    pub fn mark_all_read(&mut self) {
        for notification in &mut self.notifications {
            notification.read = true;
        }
        debug!(count = self.notifications.len(), "Marked all notifications read");
        self.persist();
    }

    /// Remove the record with `id`. Unknown ids are ignored.
    pub fn delete(&mut self, id: &str) {
        let Some(position) = self.notifications.iter().position(|notification| notification.id == id) else {
            debug!(id, "delete ignored unknown notification");
            return;
        };
        self.notifications.remove(position);
        debug!(id, "Deleted notification");
        self.persist();
    }

    /// Empty the collection and remove the persisted blob.
    ///
    /// Under [`ReseedPolicy::StayEmpty`] the initialization marker is written
    /// as well, so the next load stays empty even when the cleared blob was
    /// never seeded by this store.
    pub fn clear_all(&mut self) {
        self.notifications.clear();
        match self.backend.remove(NOTIFICATIONS_KEY) {
            Ok(()) => {
                self.last_persistence_error = None;
                debug!("Cleared all notifications");
            }
            Err(err) => self.record_failure(err),
        }
        if self.policy == ReseedPolicy::StayEmpty {
            self.mark_initialized();
        }
    }

    /// Prepend a new unread record and return its identifier.
    pub fn push(&mut self, kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> String {
        let created_at = self.now().trunc_subsecs(3);
        let id = self.unique_id(&format!("{}-{}", kind, created_at.timestamp_millis()));
        self.notifications
            .insert(0, Notification::new(id.clone(), kind, title, message, created_at));
        debug!(id = %id, kind = %kind, "Added notification");
        self.persist();
        id
    }

    fn unique_id(&self, base: &str) -> String {
        if self.get(base).is_none() {
            return base.to_string();
        }
        (1..)
            .map(|suffix| format!("{base}-{suffix}"))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_else(|| base.to_string())
    }

    fn reseed(&mut self) {
        self.notifications = seed_notifications(self.now());
        debug!(count = self.notifications.len(), "Seeded default notifications");
        self.persist();
        self.mark_initialized();
    }

    fn mark_initialized(&self) {
        if let Err(err) = self.backend.set(INITIALIZED_MARKER_KEY, "true".to_string()) {
            warn!(error = %err, "Failed to persist notification initialization marker");
        }
    }

    fn was_seeded(&self) -> bool {
        match self.backend.get(INITIALIZED_MARKER_KEY) {
            Ok(marker) => marker.is_some(),
            Err(err) => {
                warn!(error = %err, "Failed to read notification initialization marker");
                false
            }
        }
    }

    fn read_blob(&self) -> Option<Vec<Notification>> {
        let content = match self.backend.get(NOTIFICATIONS_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(err) => {
                error!(error = %err, "Failed to read notification blob; treating as absent");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Notification>>(&content) {
            Ok(notifications) => Some(dedupe_by_id(notifications)),
            Err(err) => {
                warn!(error = %err, "Malformed notification blob; re-seeding");
                None
            }
        }
    }

    fn persist(&mut self) {
        match self.save(&self.notifications) {
            Ok(()) => self.last_persistence_error = None,
            Err(err) => self.record_failure(err),
        }
    }

    fn record_failure(&mut self, err: BlobStoreError) {
        error!(error = %err, "Failed to persist notifications; keeping in-memory state");
        self.last_persistence_error = Some(err.to_string());
    }
}

/// Keeps the first occurrence of each identifier.
fn dedupe_by_id(notifications: Vec<Notification>) -> Vec<Notification> {
    let mut unique: Vec<Notification> = Vec::with_capacity(notifications.len());
    for notification in notifications {
        if unique.iter().any(|existing| existing.id == notification.id) {
            warn!(id = %notification.id, "Dropping duplicate notification id from persisted blob");
            continue;
        }
        unique.push(notification);
    }
    unique
}
