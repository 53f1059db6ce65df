pub mod app;
pub mod notification_bell;
pub mod web_host;
