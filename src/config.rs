//!
//! Carousel configuration.
//!

use ratatui::style::Style;
#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Default interval for the auto-advance.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(3000);

/// Configuration of a carousel.
///
/// Replaced as a whole. Any change re-derives the
/// auto-advance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselConfig {
    /// Advance to the next page periodically.
    pub auto_scroll: bool,
    /// Interval for the auto-advance. Must not be zero.
    #[cfg_attr(feature = "serde", serde(with = "interval_ms"))]
    pub auto_scroll_interval: Duration,
    /// Show the page markers.
    pub show_indicators: bool,
    /// Override for the page style.
    pub item_style: Option<Style>,
}

/// Invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The auto-advance interval is zero.
    ZeroInterval,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroInterval => write!(f, "auto-scroll interval must be greater than 0"),
        }
    }
}

impl Error for ConfigError {}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            auto_scroll: false,
            auto_scroll_interval: DEFAULT_INTERVAL,
            show_indicators: true,
            item_style: None,
        }
    }
}

impl CarouselConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable auto-advance.
    pub fn auto_scroll(mut self, auto_scroll: bool) -> Self {
        self.auto_scroll = auto_scroll;
        self
    }

    /// Auto-advance interval.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.auto_scroll_interval = interval;
        self
    }

    /// Auto-advance interval in milliseconds.
    pub fn interval_ms(self, interval: u64) -> Self {
        self.interval(Duration::from_millis(interval))
    }

    /// Show the page markers.
    pub fn show_indicators(mut self, show: bool) -> Self {
        self.show_indicators = show;
        self
    }

    /// Page style override.
    pub fn item_style(mut self, style: Style) -> Self {
        self.item_style = Some(style);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_scroll_interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod interval_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
