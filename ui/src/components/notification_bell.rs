use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures::StreamExt;

use hearth_common::center::NotificationCenter;
use hearth_common::config::{CenterConfig, DropdownPosition};
use hearth_common::feed::SimulatedFeed;
use hearth_common::input::is_activation_key;
use hearth_common::notification::{
    animation_delay, sample_notifications, ActionId, Notification, NotificationId,
};

use super::web_host::{clog, DocumentInputs, HostEvent, WebScheduler};

/// DOM id of the widget root; pointer-downs outside it close the dropdown.
const ROOT_ID: &str = "notifications-root";

pub type WebCenter = NotificationCenter<WebScheduler, DocumentInputs, SimulatedFeed>;

/// Payload of the action-button callback.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionClick {
    pub action_id: ActionId,
    pub notification_id: NotificationId,
}

/// Bell button with unread badge and a dropdown of recent notifications.
///
/// Props are read once when the widget mounts. `show_badge`, `auto_close`
/// and `position` override the matching fields of `config`.
#[component]
pub fn NotificationBell(
    notifications: Option<Vec<Notification>>,
    on_notification_click: Option<EventHandler<Notification>>,
    on_action_click: Option<EventHandler<ActionClick>>,
    show_badge: Option<bool>,
    auto_close: Option<bool>,
    position: Option<DropdownPosition>,
    config: Option<CenterConfig>,
) -> Element {
    let events = use_hook(|| {
        let (tx, rx) = futures::channel::mpsc::unbounded::<HostEvent>();
        (tx, Rc::new(RefCell::new(Some(rx))))
    });

    let tx = events.0.clone();
    let mut center = use_signal(move || {
        let mut config = config.unwrap_or_default();
        if let Some(show_badge) = show_badge {
            config.show_badge = show_badge;
        }
        if let Some(auto_close) = auto_close {
            config.auto_close = auto_close;
        }
        if let Some(position) = position {
            config.position = position;
        }
        let feed = SimulatedFeed::new(config.admission_probability);
        let mut center = NotificationCenter::new(
            config,
            notifications.unwrap_or_else(sample_notifications),
            WebScheduler::new(tx.clone()),
            DocumentInputs::new(ROOT_ID, tx),
            feed,
        )
        .on_notification_click(move |n| {
            if let Some(handler) = on_notification_click {
                handler.call(n.clone());
            }
        })
        .on_action_click(move |action_id, notification_id| {
            if let Some(handler) = on_action_click {
                handler.call(ActionClick {
                    action_id: action_id.clone(),
                    notification_id: notification_id.clone(),
                });
            }
        });
        center.mount();
        clog("[NOTIFY] Notification center mounted");
        center
    });

    // Browser timers and document listeners report through the channel.
    use_hook(move || {
        if let Some(mut rx) = events.1.borrow_mut().take() {
            spawn(async move {
                while let Some(event) = rx.next().await {
                    let mut c = center.write();
                    match event {
                        HostEvent::Timer(token) => c.on_timer(token),
                        HostEvent::PointerDown(target) => c.on_pointer_down(target),
                        HostEvent::KeyDown(key) => c.on_key_down(&key),
                    }
                }
            });
        }
    });

    use_drop(move || {
        if let Ok(mut c) = center.try_write() {
            c.unmount();
        }
    });

    let c = center.read();
    let is_open = c.is_open();
    let badge = c.badge();
    let header_count = c.header_count();
    let show_footer = c.show_mark_all_read();
    let degraded = c.feed_degraded();
    let anchor = c.position().anchor_style();
    let dropdown_class = match (is_open, c.position().opens_upward()) {
        (true, true) => "notifications-dropdown drop-up active",
        (true, false) => "notifications-dropdown active",
        (false, true) => "notifications-dropdown drop-up",
        (false, false) => "notifications-dropdown",
    };
    let position_class = c.position().as_str();
    let items: Vec<Notification> = c.store().iter().cloned().collect();
    drop(c);

    rsx! {
        div { class: "notifications-container {position_class}", id: ROOT_ID,
            button {
                class: "notification-trigger",
                aria_label: "Notifications",
                aria_expanded: "{is_open}",
                onclick: move |_| center.write().toggle(),
                "🔔"
                if let Some(count) = badge {
                    span {
                        class: "notification-badge",
                        aria_label: "{count} unread notifications",
                        "{count}"
                    }
                }
            }

            div {
                class: dropdown_class,
                style: "{anchor}",
                div { class: "notifications-header",
                    h4 {
                        "Notifications"
                        span { class: "notification-count-header", "{header_count}" }
                    }
                    if degraded {
                        span {
                            class: "notifications-degraded",
                            title: "Live updates are delayed",
                            "⚠"
                        }
                    }
                }

                div { class: "notifications-list",
                    if items.is_empty() {
                        div { class: "empty-notifications",
                            div { class: "empty-notifications-icon", "📭" }
                            div { "No notifications" }
                        }
                    } else {
                        for (index, notification) in items.into_iter().enumerate() {
                            NotificationItem {
                                key: "{notification.id}",
                                notification,
                                index,
                                center,
                            }
                        }
                    }
                }

                if show_footer {
                    div { class: "notifications-footer",
                        button {
                            class: "mark-all-read-btn",
                            onclick: move |_| {
                                center.write().mark_all_read();
                            },
                            "Mark all as read"
                        }
                    }
                }
            }

            if is_open {
                div {
                    class: "notifications-overlay active",
                    onclick: move |_| center.write().dismiss_overlay(),
                }
            }
        }
    }
}

#[component]
fn NotificationItem(notification: Notification, index: usize, center: Signal<WebCenter>) -> Element {
    let mut center = center;
    let click_id = notification.id.clone();
    let key_id = notification.id.clone();
    let delay = animation_delay(index);
    let icon = notification.icon();
    let kind_class = notification.kind.css_class();

    rsx! {
        div {
            class: if notification.unread { "notification-item unread" } else { "notification-item" },
            style: "animation-delay: {delay}",
            role: "button",
            tabindex: "0",
            onclick: move |_| {
                center.write().click_notification(&click_id);
            },
            onkeydown: move |evt: KeyboardEvent| {
                let key = evt.key().to_string();
                if is_activation_key(&key) {
                    // Space would otherwise scroll the page
                    evt.prevent_default();
                }
                center.write().activate_with_key(&key_id, &key);
            },
            div { class: "notification-icon {kind_class}", "{icon}" }
            div { class: "notification-content",
                div { class: "notification-title", "{notification.title}" }
                div { class: "notification-message", "{notification.body}" }
                div { class: "notification-time", "{notification.timestamp}" }
                if !notification.actions.is_empty() {
                    div { class: "notification-actions",
                        for action in notification.actions.iter() {
                            {
                                let notification_id = notification.id.clone();
                                let action_id = action.action_id.clone();
                                rsx! {
                                    button {
                                        key: "{action.action_id}",
                                        class: "notification-action-btn",
                                        onclick: move |evt: MouseEvent| {
                                            // the item's own click handler must not see this
                                            evt.stop_propagation();
                                            center.write().click_action(&notification_id, &action_id);
                                        },
                                        onkeydown: move |evt: KeyboardEvent| evt.stop_propagation(),
                                        "{action.label}"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
