use dioxus::prelude::*;

use hearth_common::config::CenterConfig;
use hearth_common::notification::Notification;

use super::notification_bell::{ActionClick, NotificationBell};
use super::web_host::clog;

#[component]
pub fn App() -> Element {
    let config = use_hook(load_config);
    let mut last_event = use_signal(|| None::<String>);

    let activity = last_event
        .read()
        .clone()
        .unwrap_or_else(|| "No notification activity yet".to_string());

    rsx! {
        div { class: "hearth-app",
            header { class: "app-header",
                div { class: "header-top",
                    h1 { "Hearth" }
                    NotificationBell {
                        config: config.clone(),
                        on_notification_click: move |n: Notification| {
                            clog(&format!("[NOTIFY] Opened notification {}", n.id));
                            last_event.set(Some(format!("{} Opened \"{}\"", stamp(), n.title)));
                        },
                        on_action_click: move |click: ActionClick| {
                            clog(&format!(
                                "[NOTIFY] Action {} on notification {}",
                                click.action_id, click.notification_id
                            ));
                            last_event.set(Some(format!(
                                "{} Action {} on {}",
                                stamp(),
                                click.action_id,
                                click.notification_id
                            )));
                        },
                    }
                }
                p { "Home services, booked in minutes" }
            }
            main {
                p { class: "last-event", "{activity}" }
            }
        }
    }
}

fn stamp() -> String {
    chrono::Local::now().format("[%H:%M:%S]").to_string()
}

/// Defaults, then `?position=..&auto_close=..` style overrides from the page URL.
fn load_config() -> CenterConfig {
    let mut config = CenterConfig::default();
    let query = page_query();
    let pairs = query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")));
    if let Err(e) = config.apply_overrides(pairs) {
        tracing::warn!("Ignoring notification settings from the URL: {e}");
        clog(&format!("[NOTIFY] Bad URL setting: {e}"));
    }
    config
}

#[cfg(target_family = "wasm")]
fn page_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[cfg(not(target_family = "wasm"))]
fn page_query() -> String {
    String::new()
}
