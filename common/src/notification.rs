use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Seconds between the entrance animations of consecutive list items.
const STAGGER_SECS: f32 = 0.1;

/// Unique notification identifier, stable for the notification's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub String);

impl NotificationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier an action button dispatches to the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct ParseKindError(pub String);

/// What a notification is about. Drives icon and styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Booking,
    Message,
    Payment,
    System,
}

impl NotificationKind {
    pub fn all() -> &'static [NotificationKind] {
        &[
            NotificationKind::Booking,
            NotificationKind::Message,
            NotificationKind::Payment,
            NotificationKind::System,
        ]
    }

    pub fn icon(self) -> &'static str {
        match self {
            NotificationKind::Booking => "📅",
            NotificationKind::Message => "💬",
            NotificationKind::Payment => "💳",
            NotificationKind::System => "⚙️",
        }
    }

    /// CSS modifier class applied next to `notification-icon`.
    pub fn css_class(self) -> &'static str {
        match self {
            NotificationKind::Booking => "booking",
            NotificationKind::Message => "message",
            NotificationKind::Payment => "payment",
            NotificationKind::System => "system",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

impl FromStr for NotificationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "booking" => Ok(NotificationKind::Booking),
            "message" => Ok(NotificationKind::Message),
            "payment" => Ok(NotificationKind::Payment),
            "system" => Ok(NotificationKind::System),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// Entrance animation delay for the item at `index` in the rendered list.
pub fn animation_delay(index: usize) -> String {
    format!("{:.1}s", index as f32 * STAGGER_SECS)
}

/// A button rendered inside a notification. Carries no behavior of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub label: String,
    pub action_id: ActionId,
}

/// One entry of the notification feed.
///
/// Everything except `unread` is fixed at creation. `timestamp` is already
/// formatted for display and is never re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub timestamp: String,
    pub unread: bool,
    #[serde(default)]
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Create an unread notification with no actions.
    pub fn new(
        id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(id),
            kind,
            title: title.into(),
            body: body.into(),
            timestamp: timestamp.into(),
            unread: true,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, label: impl Into<String>, action_id: impl Into<String>) -> Self {
        self.actions.push(NotificationAction {
            label: label.into(),
            action_id: ActionId::new(action_id),
        });
        self
    }

    /// Mark as already read. Only meant for seed data.
    pub fn read(mut self) -> Self {
        self.unread = false;
        self
    }

    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    pub fn has_action(&self, action_id: &ActionId) -> bool {
        self.actions.iter().any(|a| &a.action_id == action_id)
    }
}

/// Default seed list: three notifications, the first two unread.
pub fn sample_notifications() -> Vec<Notification> {
    vec![
        Notification::new(
            "1",
            NotificationKind::Booking,
            "Booking Confirmed",
            "Your plumbing service is confirmed for tomorrow",
            "19:07:34",
        )
        .with_action("View Details", "view_details")
        .with_action("Reschedule", "reschedule"),
        Notification::new(
            "2",
            NotificationKind::Message,
            "New Message",
            "Provider sent you an update",
            "18:07:34",
        )
        .with_action("Read Message", "read_message")
        .with_action("Reply", "reply"),
        Notification::new(
            "3",
            NotificationKind::Payment,
            "Payment Due",
            "Complete payment for your recent service",
            "17:07:34",
        )
        .with_action("Pay Now", "pay_now")
        .read(),
    ]
}
