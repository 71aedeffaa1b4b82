use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use leaddash_types::{Notification, NotificationKind, unread_count};
use leaddash_util::blob_store::{BlobStore, InMemoryBlobStore, JsonFileBlobStore, open_or_in_memory};
use leaddash_util::notification_store::{NOTIFICATIONS_KEY, NotificationStore, ReseedPolicy, seed_notifications};
use leaddash_util::relative_age;
use proptest::prelude::*;
use tempfile::tempdir;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap()
}

fn open_store(backend: Arc<dyn BlobStore>, policy: ReseedPolicy) -> NotificationStore {
    let mut store = NotificationStore::new(backend).with_policy(policy).with_clock(fixed_now);
    store.load();
    store
}

fn empty_store() -> NotificationStore {
    let mut store = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::Always);
    store.clear_all();
    store
}

fn ids(store: &NotificationStore) -> Vec<String> {
    store.notifications().iter().map(|notification| notification.id.clone()).collect()
}

#[test]
fn fresh_seed_has_three_unread_and_mark_read_decrements() {
    let mut store = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::Always);
    assert_eq!(unread_count(store.notifications()), 3);

    let first_id = store.notifications()[0].id.clone();
    store.mark_read(&first_id);
    assert_eq!(unread_count(store.notifications()), 2);
}

#[test]
fn mark_read_on_empty_collection_is_a_no_op() {
    let mut store = empty_store();
    store.mark_read("nonexistent");
    assert!(store.is_empty());
    assert!(store.last_persistence_error().is_none());
}

#[test]
fn mark_all_read_zeroes_unread_count_even_when_empty() {
    let mut seeded = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::Always);
    seeded.mark_all_read();
    assert_eq!(unread_count(seeded.notifications()), 0);

    let mut empty = empty_store();
    empty.mark_all_read();
    assert_eq!(unread_count(empty.notifications()), 0);
}

#[test]
fn delete_is_idempotent() {
    let mut once = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::Always);
    let mut twice = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::Always);

    once.delete("tour");
    twice.delete("tour");
    twice.delete("tour");

    assert_eq!(once.notifications(), twice.notifications());
    assert_eq!(ids(&once), vec!["welcome", "release-notes"]);
}

#[test]
fn load_after_save_round_trips_collection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("storage.json");
    let backend: Arc<dyn BlobStore> = Arc::new(JsonFileBlobStore::new(Some(path.clone())).unwrap());
    let store = NotificationStore::new(backend).with_clock(fixed_now);

    let mut collection = seed_notifications(fixed_now());
    collection[1].read = true;
    collection.push(Notification::new(
        "info-1",
        NotificationKind::Info,
        "Import finished",
        "42 leads imported.",
        fixed_now() - Duration::days(3),
    ));
    store.save(&collection).unwrap();

    let reopened: Arc<dyn BlobStore> = Arc::new(JsonFileBlobStore::new(Some(path)).unwrap());
    let mut reloaded = NotificationStore::new(reopened).with_clock(fixed_now);
    assert_eq!(reloaded.load(), collection.as_slice());

    for (original, restored) in collection.iter().zip(reloaded.notifications()) {
        assert_eq!(
            relative_age(original.created_at, fixed_now()),
            relative_age(restored.created_at, fixed_now())
        );
    }
}

#[test]
fn reload_keeps_age_bucket_for_sub_millisecond_timestamps() {
    let backend: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
    let store = NotificationStore::new(backend.clone()).with_clock(fixed_now);
    let created_at = fixed_now() + Duration::microseconds(500);
    let original = vec![Notification::new("info-1", NotificationKind::Info, "Imported", "", created_at)];
    store.save(&original).unwrap();

    let mut reloaded = NotificationStore::new(backend).with_clock(fixed_now);
    let restored = reloaded.load()[0].created_at;
    assert_eq!(restored, fixed_now());

    for offset_micros in [59_999_700, 60_000_200, 3_600_000_400] {
        let now = fixed_now() + Duration::microseconds(offset_micros);
        assert_eq!(relative_age(created_at, now), relative_age(restored, now));
    }
}

#[test]
fn unreadable_storage_still_serves_a_working_store() {
    let dir = tempdir().unwrap();
    let mut store = open_store(open_or_in_memory(Some(dir.path().to_path_buf())), ReseedPolicy::Always);
    assert_eq!(store.notifications(), seed_notifications(fixed_now()).as_slice());

    store.mark_read("welcome");
    store.delete("tour");
    assert_eq!(ids(&store), vec!["welcome", "release-notes"]);
    assert_eq!(store.unread(), 1);
    assert!(store.last_persistence_error().is_none());
}

#[test]
fn display_order_is_store_order_not_timestamp_order() {
    let backend = Arc::new(InMemoryBlobStore::new());
    let store = NotificationStore::new(backend.clone()).with_clock(fixed_now);
    let older_first = vec![
        Notification::new("old", NotificationKind::Info, "Old", "", fixed_now() - Duration::days(2)),
        Notification::new("new", NotificationKind::Info, "New", "", fixed_now()),
    ];
    store.save(&older_first).unwrap();

    let mut reloaded = NotificationStore::new(backend).with_clock(fixed_now);
    reloaded.load();
    assert_eq!(ids(&reloaded), vec!["old", "new"]);
}

#[test]
fn clear_then_load_reseeds_with_default_policy() {
    let backend: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
    let mut store = open_store(backend.clone(), ReseedPolicy::Always);
    store.mark_all_read();
    store.clear_all();
    assert!(backend.get(NOTIFICATIONS_KEY).unwrap().is_none());

    let reloaded = store.load().to_vec();
    assert_eq!(reloaded, seed_notifications(fixed_now()));
    assert_eq!(reloaded.len(), 3);
    assert!(reloaded.iter().all(|notification| !notification.read));
}

#[test]
fn clear_then_load_stays_empty_with_stay_empty_policy() {
    let backend: Arc<dyn BlobStore> = Arc::new(InMemoryBlobStore::new());
    let mut store = open_store(backend.clone(), ReseedPolicy::StayEmpty);
    assert_eq!(store.notifications().len(), 3);

    store.clear_all();
    assert!(store.load().is_empty());

    let reopened = open_store(backend, ReseedPolicy::StayEmpty);
    assert!(reopened.is_empty());
}

#[test]
fn stay_empty_policy_still_seeds_the_first_time() {
    let store = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::StayEmpty);
    assert_eq!(store.notifications(), seed_notifications(fixed_now()).as_slice());
}

#[test]
fn hour_and_week_boundaries() {
    let now = fixed_now();
    assert_eq!(relative_age(now - Duration::minutes(60), now), "1h ago");

    let week_old = now - Duration::days(7);
    assert!(!relative_age(week_old, now).ends_with("d ago"));
}

#[derive(Debug, Clone)]
enum Operation {
    MarkRead(usize),
    MarkAllRead,
    Delete(usize),
    DeleteUnknown,
    ClearAll,
    Push(NotificationKind),
    Reload,
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0usize..8).prop_map(Operation::MarkRead),
        Just(Operation::MarkAllRead),
        (0usize..8).prop_map(Operation::Delete),
        Just(Operation::DeleteUnknown),
        Just(Operation::ClearAll),
        prop::sample::select(NotificationKind::ALL.to_vec()).prop_map(Operation::Push),
        Just(Operation::Reload),
    ]
}

proptest! {
    #[test]
    fn identifiers_stay_unique(operations in prop::collection::vec(operation_strategy(), 1..40)) {
        let mut store = open_store(Arc::new(InMemoryBlobStore::new()), ReseedPolicy::Always);

        for operation in operations {
            let current = ids(&store);
            match operation {
                Operation::MarkRead(index) => {
                    if let Some(id) = current.get(index) {
                        store.mark_read(id);
                    }
                }
                Operation::MarkAllRead => {
                    store.mark_all_read();
                    prop_assert_eq!(store.unread(), 0);
                }
                Operation::Delete(index) => {
                    if let Some(id) = current.get(index) {
                        store.delete(id);
                        prop_assert!(store.get(id).is_none());
                    }
                }
                Operation::DeleteUnknown => {
                    store.delete("missing");
                    prop_assert_eq!(ids(&store), current.clone());
                }
                Operation::ClearAll => store.clear_all(),
                Operation::Push(kind) => {
                    let id = store.push(kind, "title", "message");
                    prop_assert_eq!(&store.notifications()[0].id, &id);
                }
                Operation::Reload => {
                    store.load();
                }
            }

            let mut sorted = ids(&store);
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), store.notifications().len());
        }
    }
}
