use std::collections::BTreeMap;

/// Document-wide input signals the notification center listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputKind {
    PointerDown,
    KeyDown,
}

/// Handle returned by [`InputBus::listen`], used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

/// Where a pointer-down landed relative to the widget's root element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Inside,
    Outside,
}

/// Registration of global input listeners, supplied by the host.
pub trait InputBus {
    fn listen(&mut self, kind: InputKind) -> ListenerId;

    /// Returns `false` if `id` wasn't registered.
    fn unlisten(&mut self, id: ListenerId) -> bool;

    /// Number of live registrations for `kind`.
    fn active(&self, kind: InputKind) -> usize;
}

/// In-memory [`InputBus`] that only records registrations.
///
/// Events are delivered by whoever drives the widget; this keeps count so
/// duplicate registrations are observable.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: BTreeMap<ListenerId, InputKind>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> usize {
        self.listeners.len()
    }
}

impl InputBus for ListenerRegistry {
    fn listen(&mut self, kind: InputKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, kind);
        id
    }

    fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn active(&self, kind: InputKind) -> usize {
        self.listeners.values().filter(|k| **k == kind).count()
    }
}

/// `true` for the key name browsers report for the escape key.
pub fn is_escape(key: &str) -> bool {
    matches!(key, "Escape" | "Esc")
}

/// Keys that activate a focused notification item.
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}
