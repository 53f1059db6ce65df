use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::channel::mpsc::UnboundedSender;

use hearth_common::input::{InputBus, InputKind, ListenerId, PointerTarget};
use hearth_common::schedule::{Scheduler, TimerToken};

/// Something the browser reported, queued for the notification center.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Timer(TimerToken),
    PointerDown(PointerTarget),
    KeyDown(String),
}

pub fn clog(msg: &str) {
    #[cfg(target_family = "wasm")]
    web_sys::console::log_1(&msg.into());
    #[cfg(not(target_family = "wasm"))]
    let _ = msg;
}

#[cfg(target_family = "wasm")]
type TimerHandle = wasm_impl::TimerHandle;
#[cfg(not(target_family = "wasm"))]
type TimerHandle = ();

#[cfg(target_family = "wasm")]
type ListenerHandle = wasm_impl::DocumentListener;
#[cfg(not(target_family = "wasm"))]
type ListenerHandle = InputKind;

/// [`Scheduler`] backed by browser timers.
///
/// Fired tokens are queued as [`HostEvent::Timer`]. Dropping a handle clears
/// the browser timer, so cancelling is just removing it from the map. On
/// native builds tokens are issued but nothing ever fires.
pub struct WebScheduler {
    events: UnboundedSender<HostEvent>,
    next_token: u64,
    timers: HashMap<TimerToken, TimerHandle>,
    /// One-shot timers that already fired, pruned outside their own callback.
    fired: Rc<RefCell<Vec<TimerToken>>>,
}

impl WebScheduler {
    pub fn new(events: UnboundedSender<HostEvent>) -> Self {
        Self {
            events,
            next_token: 0,
            timers: HashMap::new(),
            fired: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }

    fn prune(&mut self) {
        let fired: Vec<TimerToken> = self.fired.borrow_mut().drain(..).collect();
        for token in fired {
            self.timers.remove(&token);
        }
    }
}

impl Scheduler for WebScheduler {
    fn schedule_once(&mut self, delay: Duration) -> TimerToken {
        self.prune();
        let token = self.token();
        #[cfg(target_family = "wasm")]
        let handle = wasm_impl::once(delay, token, self.events.clone(), self.fired.clone());
        #[cfg(not(target_family = "wasm"))]
        let handle = {
            let _ = (delay, &self.events);
            tracing::debug!("Timer {:?} scheduled (inert on native)", token);
        };
        self.timers.insert(token, handle);
        token
    }

    fn schedule_repeating(&mut self, period: Duration) -> TimerToken {
        self.prune();
        let token = self.token();
        #[cfg(target_family = "wasm")]
        let handle = wasm_impl::every(period, token, self.events.clone());
        #[cfg(not(target_family = "wasm"))]
        let handle = {
            let _ = period;
            tracing::debug!("Interval {:?} scheduled (inert on native)", token);
        };
        self.timers.insert(token, handle);
        token
    }

    fn cancel(&mut self, token: TimerToken) -> bool {
        self.prune();
        self.timers.remove(&token).is_some()
    }

    fn pending(&self) -> usize {
        let fired = self.fired.borrow();
        self.timers.keys().filter(|t| !fired.contains(*t)).count()
    }
}

/// [`InputBus`] registering `mousedown` / `keydown` listeners on `document`.
///
/// Pointer events are classified against the element with `root_id`.
pub struct DocumentInputs {
    root_id: String,
    events: UnboundedSender<HostEvent>,
    next_id: u64,
    listeners: HashMap<ListenerId, ListenerHandle>,
}

impl DocumentInputs {
    pub fn new(root_id: impl Into<String>, events: UnboundedSender<HostEvent>) -> Self {
        Self {
            root_id: root_id.into(),
            events,
            next_id: 0,
            listeners: HashMap::new(),
        }
    }
}

impl InputBus for DocumentInputs {
    fn listen(&mut self, kind: InputKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        #[cfg(target_family = "wasm")]
        let handle = wasm_impl::DocumentListener::register(kind, &self.root_id, self.events.clone());
        #[cfg(not(target_family = "wasm"))]
        let handle = {
            let _ = (&self.root_id, &self.events);
            kind
        };
        self.listeners.insert(id, handle);
        id
    }

    fn unlisten(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    fn active(&self, kind: InputKind) -> usize {
        #[cfg(target_family = "wasm")]
        let count = self.listeners.values().filter(|l| l.kind() == kind).count();
        #[cfg(not(target_family = "wasm"))]
        let count = self.listeners.values().filter(|k| **k == kind).count();
        count
    }
}

// ─── WASM implementation ─────────────────────────────────────────────────────

#[cfg(target_family = "wasm")]
mod wasm_impl {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use futures::channel::mpsc::UnboundedSender;
    use gloo_timers::callback::{Interval, Timeout};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use hearth_common::input::{InputKind, PointerTarget};
    use hearth_common::schedule::TimerToken;

    use super::{clog, HostEvent};

    /// Live browser timer. Dropping it clears the timer.
    #[allow(dead_code)] // held only for its Drop
    pub enum TimerHandle {
        Once(Timeout),
        Every(Interval),
    }

    fn millis(d: Duration) -> u32 {
        u32::try_from(d.as_millis()).unwrap_or(u32::MAX)
    }

    pub fn once(
        delay: Duration,
        token: TimerToken,
        events: UnboundedSender<HostEvent>,
        fired: Rc<RefCell<Vec<TimerToken>>>,
    ) -> TimerHandle {
        TimerHandle::Once(Timeout::new(millis(delay), move || {
            fired.borrow_mut().push(token);
            let _ = events.unbounded_send(HostEvent::Timer(token));
        }))
    }

    pub fn every(period: Duration, token: TimerToken, events: UnboundedSender<HostEvent>) -> TimerHandle {
        TimerHandle::Every(Interval::new(millis(period), move || {
            let _ = events.unbounded_send(HostEvent::Timer(token));
        }))
    }

    /// A listener attached to `document`, detached on drop.
    pub struct DocumentListener {
        kind: InputKind,
        callback: Closure<dyn FnMut(web_sys::Event)>,
    }

    fn event_name(kind: InputKind) -> &'static str {
        match kind {
            InputKind::PointerDown => "mousedown",
            InputKind::KeyDown => "keydown",
        }
    }

    fn classify(root_id: &str, event: &web_sys::Event) -> PointerTarget {
        let root = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(root_id));
        let target = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Node>().ok());
        match (root, target) {
            (Some(root), Some(node)) if root.contains(Some(&node)) => PointerTarget::Inside,
            _ => PointerTarget::Outside,
        }
    }

    impl DocumentListener {
        pub fn register(kind: InputKind, root_id: &str, events: UnboundedSender<HostEvent>) -> Self {
            let root_id = root_id.to_string();
            let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let host_event = match kind {
                    InputKind::PointerDown => HostEvent::PointerDown(classify(&root_id, &event)),
                    InputKind::KeyDown => match event.dyn_ref::<web_sys::KeyboardEvent>() {
                        Some(key) => HostEvent::KeyDown(key.key()),
                        None => return,
                    },
                };
                let _ = events.unbounded_send(host_event);
            }) as Box<dyn FnMut(web_sys::Event)>);

            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                if let Err(e) = document
                    .add_event_listener_with_callback(event_name(kind), callback.as_ref().unchecked_ref())
                {
                    clog(&format!("[NOTIFY] Failed to add {} listener: {:?}", event_name(kind), e));
                }
            }
            Self { kind, callback }
        }

        pub fn kind(&self) -> InputKind {
            self.kind
        }
    }

    impl Drop for DocumentListener {
        fn drop(&mut self) {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                let _ = document.remove_event_listener_with_callback(
                    event_name(self.kind),
                    self.callback.as_ref().unchecked_ref(),
                );
            }
        }
    }
}
