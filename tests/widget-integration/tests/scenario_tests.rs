use hearth_common::center::DropdownState;
use hearth_common::config::CenterConfig;
use hearth_common::input::{InputBus, InputKind, PointerTarget};
use hearth_common::schedule::Scheduler;
use hearth_common::store::NOTIFICATION_CAPACITY;
use hearth_widget_integration::harness::TestHarness;
use hearth_widget_integration::{ids, numbered};

fn auto_close() -> CenterConfig {
    CenterConfig {
        auto_close: true,
        ..CenterConfig::default()
    }
}

/// Seed of three with two unread → click one → mark all.
#[test]
fn seed_click_then_mark_all() {
    let mut h = TestHarness::setup(CenterConfig::default());
    assert_eq!(h.center.store().unread_count(), 2);
    assert_eq!(h.center.badge(), Some(2));

    assert!(h.click("1"));
    assert_eq!(h.center.store().unread_count(), 1);
    assert!(!h.unread("1"));
    assert_eq!(h.clicks().len(), 1);
    assert_eq!(h.clicks()[0].id.as_str(), "1");

    h.center.mark_all_read();
    assert_eq!(h.center.store().unread_count(), 0);
    assert!(!h.center.show_mark_all_read());
    assert_eq!(h.center.header_count(), 3);
}

/// Twelve distinct notifications onto an empty store keep N12..N3.
#[test]
fn capacity_keeps_the_ten_newest() {
    let mut h = TestHarness::empty(CenterConfig::default());
    for i in 1..=12 {
        h.center.ingest(numbered(i));
    }
    let expected: Vec<String> = (3..=12).rev().map(|i| format!("N{i}")).collect();
    assert_eq!(ids(h.center.store().iter()), expected);
    assert_eq!(h.center.header_count(), NOTIFICATION_CAPACITY);
}

/// With auto-close, an action press closes immediately rather than at the 5s mark.
#[test]
fn auto_close_action_click_closes_immediately() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    assert!(h.center.is_open());

    h.advance_millis(800);
    assert!(h.click_action("2", "reply"));
    assert_eq!(h.center.state(), DropdownState::Closed);
    assert_eq!(h.actions(), vec![("reply".to_string(), "2".to_string())]);
    // the action press doesn't count as an item click
    assert!(h.clicks().is_empty());
    assert!(h.unread("2"));
}

/// With auto-close, an item click closes too and still reports the click.
#[test]
fn auto_close_item_click_closes_after_reporting() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    assert!(h.click("2"));
    assert!(!h.center.is_open());
    assert_eq!(h.clicks().len(), 1);
    assert!(!h.clicks()[0].unread);
}

/// Without auto-close, item and action clicks leave the dropdown open.
#[test]
fn clicks_keep_dropdown_open_without_auto_close() {
    let mut h = TestHarness::setup(CenterConfig::default());
    h.center.toggle();
    h.click("1");
    h.click_action("1", "view_details");
    assert!(h.center.is_open());
    h.center.on_key_down("Escape");
    assert!(!h.center.is_open());
}

/// Mark-all doesn't move the dropdown.
#[test]
fn mark_all_read_keeps_dropdown_state() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    h.center.mark_all_read();
    assert!(h.center.is_open());
    h.center.mark_all_read();
    assert_eq!(h.center.store().unread_count(), 0);
}

/// Mount then unmount with no interaction leaves nothing scheduled or registered.
#[test]
fn unmount_before_interaction_releases_everything() {
    let mut h = TestHarness::setup(CenterConfig::default());
    assert_eq!(h.center.scheduler().pending(), 1);
    assert_eq!(h.center.inputs().total(), 2);

    h.center.unmount();
    assert_eq!(h.center.scheduler().pending(), 0);
    assert_eq!(h.center.inputs().total(), 0);
}

/// Remounting registers exactly one of each listener and one feed interval.
#[test]
fn remount_does_not_duplicate_subscriptions() {
    let mut h = TestHarness::setup(CenterConfig::default());
    h.center.unmount();
    h.center.mount();
    h.center.mount();

    assert_eq!(h.center.inputs().active(InputKind::PointerDown), 1);
    assert_eq!(h.center.inputs().active(InputKind::KeyDown), 1);
    assert_eq!(h.center.scheduler().pending(), 1);

    h.center
        .feed_mut()
        .push(numbered(1))
        .push(numbered(2));
    h.advance_secs(15);
    // one interval → one tick → one admission
    assert_eq!(h.center.header_count(), 4);
    assert_eq!(h.center.feed_mut().remaining(), 1);

    h.click("N1");
    assert_eq!(h.clicks().len(), 1);
}

/// Outside pointer closes, inside doesn't; overlay click closes.
#[test]
fn pointer_and_overlay_dismissal() {
    let mut h = TestHarness::setup(CenterConfig::default());
    h.center.toggle();
    h.center.on_pointer_down(PointerTarget::Inside);
    assert!(h.center.is_open());
    h.center.dismiss_overlay();
    assert!(!h.center.is_open());

    // closed stays closed
    h.center.on_pointer_down(PointerTarget::Outside);
    assert!(!h.center.is_open());
}

/// Badge hides once everything is read, header count doesn't.
#[test]
fn badge_and_header_derive_from_store() {
    let mut h = TestHarness::setup(CenterConfig::default());
    h.center.ingest(numbered(7));
    assert_eq!(h.center.badge(), Some(3));
    assert_eq!(h.center.header_count(), 4);
    h.center.mark_all_read();
    assert_eq!(h.center.badge(), None);
    assert_eq!(h.center.header_count(), 4);
}

/// A redelivered id is not a new notification: it stays read and in place.
#[test]
fn redelivered_notification_stays_read() {
    let mut h = TestHarness::empty(CenterConfig::default());
    h.center.ingest(numbered(1));
    h.center.ingest(numbered(2));
    assert!(h.click("N1"));

    h.center.feed_mut().push(numbered(1));
    h.advance_secs(15);
    assert!(!h.unread("N1"));
    assert_eq!(h.center.store().unread_count(), 1);
    assert_eq!(ids(h.center.store().iter()), vec!["N2", "N1"]);
}

/// An action the notification doesn't carry is not reported.
#[test]
fn foreign_action_is_rejected() {
    let mut h = TestHarness::setup(auto_close());
    h.center.toggle();
    assert!(!h.click_action("2", "pay_now"));
    assert!(h.actions().is_empty());
    assert!(h.center.is_open());
}
