use std::collections::VecDeque;

use crate::notification::{Notification, NotificationId};

/// Maximum number of notifications kept. Older entries fall off the tail.
pub const NOTIFICATION_CAPACITY: usize = 10;

/// Bounded, newest-first notification list with read/unread tracking.
///
/// Ids are unique within the list. Entries are only ever removed by
/// capacity overflow on [`prepend`](Self::prepend).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationStore {
    entries: VecDeque<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a newest-first list.
    ///
    /// Duplicate ids keep their first (newest) occurrence, and anything past
    /// capacity is dropped.
    pub fn with_seed(seed: impl IntoIterator<Item = Notification>) -> Self {
        let mut entries: VecDeque<Notification> = VecDeque::with_capacity(NOTIFICATION_CAPACITY);
        for notification in seed {
            if entries.len() == NOTIFICATION_CAPACITY {
                break;
            }
            if entries.iter().any(|n| n.id == notification.id) {
                continue;
            }
            entries.push_back(notification);
        }
        Self { entries }
    }

    /// Insert at the head, evicting from the tail beyond capacity.
    ///
    /// A notification whose id is already listed is a redelivery and is
    /// dropped; the listed entry keeps its position and read state. Returns
    /// whether the notification was added.
    pub fn prepend(&mut self, notification: Notification) -> bool {
        if self.entries.iter().any(|n| n.id == notification.id) {
            return false;
        }
        self.entries.push_front(notification);
        self.entries.truncate(NOTIFICATION_CAPACITY);
        true
    }

    /// Mark one entry read. Returns `true` if it was unread before.
    pub fn mark_read(&mut self, id: &NotificationId) -> bool {
        match self.entries.iter_mut().find(|n| &n.id == id) {
            Some(n) if n.unread => {
                n.unread = false;
                true
            }
            _ => false,
        }
    }

    /// Mark every entry read. Returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for n in self.entries.iter_mut().filter(|n| n.unread) {
            n.unread = false;
            changed += 1;
        }
        changed
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| n.unread).count()
    }

    /// Total number of entries, read or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| &n.id == id)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }
}
