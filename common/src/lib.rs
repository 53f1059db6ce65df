pub mod center;
pub mod config;
pub mod feed;
pub mod input;
pub mod notification;
pub mod schedule;
pub mod store;
