use std::sync::Once;

use chrono::{DateTime, Local, TimeZone};
use tracing_subscriber::EnvFilter;

use hearth_common::notification::{Notification, NotificationKind};


static TRACING: Once = Once::new();

/// Route `tracing` output to the test writer. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fixed local instant for deterministic feed timestamps.
pub fn local_time(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 6, 1, h, m, s)
        .single()
        .expect("unambiguous local time")
}

/// Unread system notification with id `N{i}`.
pub fn numbered(i: usize) -> Notification {
    Notification::new(
        format!("N{i}"),
        NotificationKind::System,
        format!("Update {i}"),
        "Something changed",
        "12:00:00",
    )
}

/// Ids of the notifications in display order.
pub fn ids<'a>(notifications: impl IntoIterator<Item = &'a Notification>) -> Vec<String> {
    notifications.into_iter().map(|n| n.id.0.clone()).collect()
}
