use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use hearth_common::notification::NotificationId;
use hearth_common::store::{NotificationStore, NOTIFICATION_CAPACITY};
use hearth_widget_integration::{ids, numbered};

/// Any run of prepends keeps exactly the most recent ten, newest first.
#[test]
fn prepend_runs_keep_most_recent() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let count = rng.gen_range(0..40);
        let mut store = NotificationStore::new();
        for i in 0..count {
            store.prepend(numbered(i));
            assert!(store.len() <= NOTIFICATION_CAPACITY);
        }
        let expected: Vec<String> = (0..count)
            .rev()
            .take(NOTIFICATION_CAPACITY)
            .map(|i| format!("N{i}"))
            .collect();
        assert_eq!(ids(store.iter()), expected);
    }
}

/// mark_read lowers the unread count by one exactly when the entry was unread.
#[test]
fn mark_read_changes_count_by_at_most_one() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut store = NotificationStore::new();
    for i in 0..NOTIFICATION_CAPACITY {
        store.prepend(numbered(i));
    }
    for _ in 0..200 {
        let id = NotificationId::new(format!("N{}", rng.gen_range(0..15)));
        let before = store.unread_count();
        let was_unread = store.get(&id).map(|n| n.unread).unwrap_or(false);
        let changed = store.mark_read(&id);
        assert_eq!(changed, was_unread);
        assert_eq!(store.unread_count(), before - usize::from(was_unread));
    }
}

/// mark_all_read zeroes the count from any state, and twice is the same as once.
#[test]
fn mark_all_read_from_any_state() {
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let mut store = NotificationStore::new();
        for i in 0..rng.gen_range(0..15) {
            store.prepend(numbered(i));
            if rng.gen_bool(0.3) {
                store.mark_read(&NotificationId::new(format!("N{i}")));
            }
        }
        store.mark_all_read();
        let once = store.clone();
        assert_eq!(store.unread_count(), 0);
        store.mark_all_read();
        assert_eq!(store, once);
    }
}
