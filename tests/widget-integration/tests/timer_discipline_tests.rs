use rand::rngs::StdRng;
use rand::SeedableRng;

use hearth_common::config::CenterConfig;
use hearth_common::feed::{FeedError, FixedClock, SimulatedFeed};
use hearth_common::input::PointerTarget;
use hearth_common::notification::sample_notifications;
use hearth_common::schedule::Scheduler;
use hearth_common::store::NOTIFICATION_CAPACITY;
use hearth_widget_integration::harness::TestHarness;
use hearth_widget_integration::local_time;

fn auto_close() -> CenterConfig {
    CenterConfig {
        auto_close: true,
        ..CenterConfig::default()
    }
}

/// Outside click before expiry cancels the timer; nothing re-closes later.
#[test]
fn outside_click_cancels_auto_close() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    h.advance_secs(2);
    h.center.on_pointer_down(PointerTarget::Outside);
    assert!(!h.center.is_open());
    assert!(!h.center.auto_close_armed());
    // only the feed interval remains
    assert_eq!(h.center.scheduler().pending(), 1);

    h.advance_secs(1);
    h.center.toggle();
    // the cancelled timer was due at t=5; this open period runs to t=8
    h.advance_secs(4);
    assert!(h.center.is_open());
    h.advance_secs(1);
    assert!(!h.center.is_open());
}

/// Escape before expiry behaves the same as an outside click.
#[test]
fn escape_cancels_auto_close() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    h.center.on_key_down("Escape");
    assert_eq!(h.center.scheduler().pending(), 1);
    h.advance_secs(10);
    assert!(!h.center.is_open());
}

/// Repeated open/close cycles never leave more than one auto-close pending.
#[test]
fn rapid_toggling_keeps_a_single_timer() {
    let mut h = TestHarness::setup(auto_close());
    for _ in 0..25 {
        h.center.toggle();
        h.advance_millis(100);
    }
    // odd number of toggles → open, one feed + one auto-close
    assert!(h.center.is_open());
    assert_eq!(h.center.scheduler().pending(), 2);
    h.advance_secs(5);
    assert!(!h.center.is_open());
    assert_eq!(h.center.scheduler().pending(), 1);
}

/// Auto-close fires while the feed keeps ticking independently.
#[test]
fn feed_and_auto_close_timers_are_independent() {
    let mut h = TestHarness::setup(auto_close());
    h.center.feed_mut().push(hearth_widget_integration::numbered(1));
    h.advance_secs(13);
    h.center.toggle();
    // feed tick at t=15 while open
    h.advance_secs(2);
    assert!(h.center.is_open());
    assert_eq!(h.center.header_count(), 4);
    // auto-close at t=18
    h.advance_secs(3);
    assert!(!h.center.is_open());
}

/// Unmount while open with auto-close pending cancels both timers.
#[test]
fn unmount_while_open_cancels_everything() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    assert_eq!(h.center.scheduler().pending(), 2);
    h.center.unmount();
    assert_eq!(h.center.scheduler().pending(), 0);
    assert_eq!(h.center.inputs().total(), 0);
    assert!(!h.center.is_open());

    h.advance_secs(60);
    assert_eq!(h.center.header_count(), 3);
}

/// Timers delivered after unmount are ignored.
#[test]
fn events_after_unmount_are_ignored() {
    let mut h = TestHarness::setup(CenterConfig::default());
    h.center.feed_mut().push(hearth_widget_integration::numbered(1));
    h.center.unmount();
    h.advance_secs(30);
    h.center.toggle();
    assert!(!h.center.is_open());
    assert_eq!(h.center.header_count(), 3);
}

/// A failing feed drops ticks and reports itself degraded until it recovers.
#[test]
fn degraded_feed_recovers() {
    let mut h = TestHarness::setup(CenterConfig::default());
    h.center
        .feed_mut()
        .push_error(FeedError::Unavailable("push service down".into()))
        .push(hearth_widget_integration::numbered(9));
    h.advance_secs(15);
    assert!(h.center.feed_degraded());
    assert_eq!(h.center.header_count(), 3);
    h.advance_secs(15);
    assert!(!h.center.feed_degraded());
    assert_eq!(h.center.header_count(), 4);
}

/// An hour of simulated feed stays bounded and keeps ids unique.
#[test]
fn simulated_feed_hour_stays_bounded() {
    let feed = SimulatedFeed::with_parts(
        FixedClock(local_time(14, 0, 0)),
        StdRng::seed_from_u64(42),
        1.0,
    );
    let mut h = TestHarness::with_parts(CenterConfig::default(), sample_notifications(), feed);
    h.advance_secs(3600);

    let store = h.center.store();
    assert_eq!(store.len(), NOTIFICATION_CAPACITY);
    let mut seen: Vec<_> = store.iter().map(|n| n.id.clone()).collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), NOTIFICATION_CAPACITY);
    assert!(store.iter().all(|n| n.timestamp == "14:00:00"));
    assert_eq!(store.unread_count(), NOTIFICATION_CAPACITY);
}
