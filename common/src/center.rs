use std::time::Duration;

use tracing::{debug, info, trace, warn};

use crate::config::{CenterConfig, DropdownPosition};
use crate::feed::Feed;
use crate::input::{is_activation_key, is_escape, InputBus, InputKind, ListenerId, PointerTarget};
use crate::notification::{ActionId, Notification, NotificationId};
use crate::schedule::{ManualScheduler, Scheduler, TimerToken};
use crate::store::NotificationStore;

/// Open/closed state of the dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// Why the dropdown left `Open`. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Toggle,
    OutsidePointer,
    Escape,
    AutoClose,
    Interaction,
    Overlay,
    Unmount,
}

type ClickHandler = Box<dyn FnMut(&Notification)>;
type ActionHandler = Box<dyn FnMut(&ActionId, &NotificationId)>;

/// Everything acquired on mount, released together on unmount.
#[derive(Debug, Clone, Copy)]
struct Mounted {
    feed_timer: TimerToken,
    pointer: ListenerId,
    key: ListenerId,
}

/// The notification bell: store, feed ingestion and dropdown state machine.
///
/// The host owns the real timers and DOM listeners behind `S` and `I`, and
/// calls back into [`on_timer`](Self::on_timer),
/// [`on_pointer_down`](Self::on_pointer_down) and
/// [`on_key_down`](Self::on_key_down) when they fire. Anything delivered
/// while unmounted is ignored.
///
/// Two timers can be live at once: the repeating feed tick (mount to
/// unmount) and the one-shot auto-close (one open period). Both are
/// cancelled by token as soon as their scope ends, and a token that no
/// longer matches the current scope is ignored if it still arrives.
pub struct NotificationCenter<S: Scheduler, I: InputBus, F: Feed> {
    config: CenterConfig,
    store: NotificationStore,
    state: DropdownState,
    scheduler: S,
    inputs: I,
    feed: F,
    mounted: Option<Mounted>,
    auto_close: Option<TimerToken>,
    feed_degraded: bool,
    on_notification_click: Option<ClickHandler>,
    on_action_click: Option<ActionHandler>,
}

impl<S: Scheduler, I: InputBus, F: Feed> NotificationCenter<S, I, F> {
    pub fn new(
        config: CenterConfig,
        seed: impl IntoIterator<Item = Notification>,
        scheduler: S,
        inputs: I,
        feed: F,
    ) -> Self {
        Self {
            config,
            store: NotificationStore::with_seed(seed),
            state: DropdownState::Closed,
            scheduler,
            inputs,
            feed,
            mounted: None,
            auto_close: None,
            feed_degraded: false,
            on_notification_click: None,
            on_action_click: None,
        }
    }

    /// Called after an item is marked read, before any auto-close.
    pub fn on_notification_click(mut self, handler: impl FnMut(&Notification) + 'static) -> Self {
        self.on_notification_click = Some(Box::new(handler));
        self
    }

    /// Called with `(action_id, notification_id)` when an action button is pressed.
    pub fn on_action_click(
        mut self,
        handler: impl FnMut(&ActionId, &NotificationId) + 'static,
    ) -> Self {
        self.on_action_click = Some(Box::new(handler));
        self
    }

    // ─── Lifecycle ───────────────────────────────────────────────────────

    /// Start the feed interval and register the pointer-down and key-down
    /// listeners. A second call while mounted does nothing.
    pub fn mount(&mut self) {
        if self.mounted.is_some() {
            debug!("Notification center already mounted");
            return;
        }
        let feed_timer = self.scheduler.schedule_repeating(self.config.feed_interval());
        let pointer = self.inputs.listen(InputKind::PointerDown);
        let key = self.inputs.listen(InputKind::KeyDown);
        self.mounted = Some(Mounted {
            feed_timer,
            pointer,
            key,
        });
        info!(
            "Notification center mounted ({} notifications, {} unread)",
            self.store.len(),
            self.store.unread_count()
        );
    }

    /// Release everything [`mount`](Self::mount) acquired and cancel any
    /// pending auto-close. Safe to call repeatedly; only the first call after
    /// a mount does anything.
    pub fn unmount(&mut self) {
        let Some(mounted) = self.mounted.take() else {
            return;
        };
        self.scheduler.cancel(mounted.feed_timer);
        self.inputs.unlisten(mounted.pointer);
        self.inputs.unlisten(mounted.key);
        self.close(CloseReason::Unmount);
        info!("Notification center unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    // ─── Host events ─────────────────────────────────────────────────────

    /// A timer scheduled by this center has fired.
    pub fn on_timer(&mut self, token: TimerToken) {
        let Some(mounted) = self.mounted else {
            trace!("Timer {:?} fired while unmounted, ignoring", token);
            return;
        };
        if token == mounted.feed_timer {
            self.tick();
        } else if self.auto_close == Some(token) {
            self.auto_close = None;
            self.close(CloseReason::AutoClose);
        } else {
            trace!("Stale timer {:?} ignored", token);
        }
    }

    pub fn on_pointer_down(&mut self, target: PointerTarget) {
        if self.is_mounted() && target == PointerTarget::Outside {
            self.close(CloseReason::OutsidePointer);
        }
    }

    pub fn on_key_down(&mut self, key: &str) {
        if self.is_mounted() && is_escape(key) {
            self.close(CloseReason::Escape);
        }
    }

    // ─── Feed ────────────────────────────────────────────────────────────

    /// Poll the feed once. Errors drop the tick and flag the feed as degraded.
    fn tick(&mut self) {
        match self.feed.poll() {
            Ok(Some(notification)) => {
                self.feed_recovered();
                self.ingest(notification);
            }
            Ok(None) => self.feed_recovered(),
            Err(e) => {
                if !self.feed_degraded {
                    warn!("Notification feed degraded: {e}");
                }
                self.feed_degraded = true;
            }
        }
    }

    fn feed_recovered(&mut self) {
        if self.feed_degraded {
            info!("Notification feed recovered");
            self.feed_degraded = false;
        }
    }

    /// Prepend a notification delivered by any source. Redeliveries of a
    /// listed id are ignored; returns whether it was added.
    pub fn ingest(&mut self, notification: Notification) -> bool {
        let id = notification.id.clone();
        let summary = format!("{} ({}): {}", id, notification.kind, notification.title);
        if self.store.prepend(notification) {
            debug!("Notification {summary} admitted");
            true
        } else {
            debug!("Notification {id} already listed, redelivery ignored");
            false
        }
    }

    // ─── User gestures ───────────────────────────────────────────────────

    /// Bell button press.
    pub fn toggle(&mut self) {
        if !self.is_mounted() {
            return;
        }
        match self.state {
            DropdownState::Open => self.close(CloseReason::Toggle),
            DropdownState::Closed => self.open(),
        }
    }

    /// Click on the backdrop behind an open dropdown.
    pub fn dismiss_overlay(&mut self) {
        if self.is_mounted() {
            self.close(CloseReason::Overlay);
        }
    }

    /// Click on a notification item: mark it read, report it, and close if
    /// auto-close is on. Returns `false` if no such notification is listed.
    pub fn click_notification(&mut self, id: &NotificationId) -> bool {
        if !self.is_mounted() {
            return false;
        }
        self.store.mark_read(id);
        let Some(notification) = self.store.get(id) else {
            debug!("Click on unknown notification {id}");
            return false;
        };
        if let Some(handler) = self.on_notification_click.as_mut() {
            handler(notification);
        }
        self.close_after_interaction();
        true
    }

    /// Keyboard activation of a focused item. Enter and Space behave like a click.
    pub fn activate_with_key(&mut self, id: &NotificationId, key: &str) -> bool {
        is_activation_key(key) && self.click_notification(id)
    }

    /// Press on an action button inside an item.
    ///
    /// Never counts as a click on the item itself, so the item's read state
    /// is left alone.
    pub fn click_action(&mut self, notification_id: &NotificationId, action_id: &ActionId) -> bool {
        if !self.is_mounted() {
            return false;
        }
        match self.store.get(notification_id) {
            Some(n) if n.has_action(action_id) => {}
            Some(_) => {
                debug!("Notification {notification_id} has no action {action_id}");
                return false;
            }
            None => {
                debug!("Action {action_id} on unknown notification {notification_id}");
                return false;
            }
        }
        if let Some(handler) = self.on_action_click.as_mut() {
            handler(action_id, notification_id);
        }
        self.close_after_interaction();
        true
    }

    /// "Mark all as read". Leaves the dropdown state untouched.
    pub fn mark_all_read(&mut self) -> usize {
        if !self.is_mounted() {
            return 0;
        }
        let changed = self.store.mark_all_read();
        debug!("Marked {changed} notifications read");
        changed
    }

    // ─── State machine ───────────────────────────────────────────────────

    fn open(&mut self) {
        self.state = DropdownState::Open;
        self.disarm_auto_close();
        if self.config.auto_close {
            self.auto_close = Some(self.scheduler.schedule_once(self.config.auto_close_delay()));
        }
        debug!("Notification dropdown opened");
    }

    fn close(&mut self, reason: CloseReason) {
        self.disarm_auto_close();
        if self.state == DropdownState::Open {
            self.state = DropdownState::Closed;
            debug!("Notification dropdown closed ({:?})", reason);
        }
    }

    fn close_after_interaction(&mut self) {
        if self.config.auto_close {
            self.close(CloseReason::Interaction);
        }
    }

    fn disarm_auto_close(&mut self) {
        if let Some(token) = self.auto_close.take() {
            self.scheduler.cancel(token);
        }
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    pub fn store(&self) -> &NotificationStore {
        &self.store
    }

    pub fn position(&self) -> DropdownPosition {
        self.config.position
    }

    /// Unread count for the bell badge, if the badge should render.
    pub fn badge(&self) -> Option<usize> {
        let unread = self.store.unread_count();
        (self.config.show_badge && unread > 0).then_some(unread)
    }

    /// Total count shown in the dropdown header.
    pub fn header_count(&self) -> usize {
        self.store.len()
    }

    pub fn show_mark_all_read(&self) -> bool {
        self.store.unread_count() > 0
    }

    pub fn feed_degraded(&self) -> bool {
        self.feed_degraded
    }

    pub fn auto_close_armed(&self) -> bool {
        self.auto_close.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn inputs(&self) -> &I {
        &self.inputs
    }

    pub fn feed_mut(&mut self) -> &mut F {
        &mut self.feed
    }
}

impl<S: Scheduler, I: InputBus, F: Feed> Drop for NotificationCenter<S, I, F> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<I: InputBus, F: Feed> NotificationCenter<ManualScheduler, I, F> {
    /// Move virtual time forward, delivering every timer that comes due.
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        while let Some(token) = self.scheduler.next_due(until) {
            self.on_timer(token);
        }
        self.scheduler.settle(until);
    }
}
