use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::feed::DEFAULT_ADMISSION_PROBABILITY;

/// How long an opened dropdown stays open when auto-close is enabled.
pub const AUTO_CLOSE_DELAY_MS: u64 = 5_000;

/// Interval between feed ticks.
pub const FEED_INTERVAL_MS: u64 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dropdown position: {0} (expected top-right, top-left, bottom-right or bottom-left)")]
pub struct ParsePositionError(pub String);

/// Corner the dropdown is anchored to, relative to the bell button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropdownPosition {
    #[default]
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl DropdownPosition {
    pub fn all() -> &'static [DropdownPosition] {
        &[
            DropdownPosition::TopRight,
            DropdownPosition::TopLeft,
            DropdownPosition::BottomRight,
            DropdownPosition::BottomLeft,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DropdownPosition::TopRight => "top-right",
            DropdownPosition::TopLeft => "top-left",
            DropdownPosition::BottomRight => "bottom-right",
            DropdownPosition::BottomLeft => "bottom-left",
        }
    }

    /// Inline style placing the dropdown. Bottom anchors open upwards.
    pub fn anchor_style(self) -> &'static str {
        match self {
            DropdownPosition::TopRight => "right: 0;",
            DropdownPosition::TopLeft => "right: auto; left: 0;",
            DropdownPosition::BottomRight => "top: auto; bottom: calc(100% + 1rem); right: 0;",
            DropdownPosition::BottomLeft => {
                "top: auto; bottom: calc(100% + 1rem); right: auto; left: 0;"
            }
        }
    }

    pub fn opens_upward(self) -> bool {
        matches!(
            self,
            DropdownPosition::BottomRight | DropdownPosition::BottomLeft
        )
    }
}

impl fmt::Display for DropdownPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropdownPosition {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        DropdownPosition::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| ParsePositionError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Position(#[from] ParsePositionError),
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Options the surrounding application passes to the notification center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterConfig {
    /// Render the unread badge on the bell button.
    pub show_badge: bool,
    /// Arm the close timer on open and close after item or action clicks.
    pub auto_close: bool,
    pub position: DropdownPosition,
    pub auto_close_delay_ms: u64,
    pub feed_interval_ms: u64,
    pub admission_probability: f64,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            show_badge: true,
            auto_close: false,
            position: default_position(),
            auto_close_delay_ms: AUTO_CLOSE_DELAY_MS,
            feed_interval_ms: FEED_INTERVAL_MS,
            admission_probability: DEFAULT_ADMISSION_PROBABILITY,
        }
    }
}

/// Build-time default, overridable with `HEARTH_NOTIFY_POSITION`.
fn default_position() -> DropdownPosition {
    match option_env!("HEARTH_NOTIFY_POSITION") {
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!("Ignoring HEARTH_NOTIFY_POSITION: {e}");
            DropdownPosition::default()
        }),
        None => DropdownPosition::default(),
    }
}

impl CenterConfig {
    pub fn auto_close_delay(&self) -> Duration {
        Duration::from_millis(self.auto_close_delay_ms)
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_millis(self.feed_interval_ms)
    }

    /// Apply `key=value` overrides such as page query parameters.
    ///
    /// Unknown keys are skipped so unrelated parameters can share the query
    /// string. The first bad value aborts and leaves earlier overrides applied.
    pub fn apply_overrides<K, V>(
        &mut self,
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Result<(), ConfigError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "position" => self.position = value.parse()?,
                "show_badge" => self.show_badge = parse_flag(key, value)?,
                "auto_close" => self.auto_close = parse_flag(key, value)?,
                "auto_close_ms" => self.auto_close_delay_ms = parse_number(key, value)?,
                "feed_interval_ms" => self.feed_interval_ms = parse_number(key, value)?,
                "admission_probability" => {
                    let p: f64 = parse_number(key, value)?;
                    if !(0.0..=1.0).contains(&p) {
                        return Err(invalid(key, value));
                    }
                    self.admission_probability = p;
                }
                _ => {}
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}
