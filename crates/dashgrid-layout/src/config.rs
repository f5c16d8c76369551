#![forbid(unsafe_code)]

//! Policy-as-data knobs for the grid controller.

use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Tunable timings and defaults for the builder, loadable from config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuilderConfig {
    /// Interval for re-polling a deferred setup (mount missing or rebuild
    /// in flight), in milliseconds. Bounded, never exponential.
    pub setup_poll_interval_ms: u64,
    /// Quiet window for fullscreen resize debouncing, in milliseconds.
    pub resize_debounce_ms: u64,
    /// Whether viewport resizes are debounced (fullscreen) or immediate
    /// (embedded/edit preview).
    pub debounce_resizes: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            setup_poll_interval_ms: 300,
            resize_debounce_ms: 200,
            debounce_resizes: true,
        }
    }
}

impl BuilderConfig {
    /// The deferred-setup poll interval as a duration.
    #[must_use]
    pub fn setup_poll_interval(&self) -> Duration {
        Duration::from_millis(self.setup_poll_interval_ms)
    }

    /// The resize debounce window as a duration; zero when immediate.
    #[must_use]
    pub fn resize_window(&self) -> Duration {
        if self.debounce_resizes {
            Duration::from_millis(self.resize_debounce_ms)
        } else {
            Duration::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BuilderConfig::default();
        assert_eq!(config.setup_poll_interval(), Duration::from_millis(300));
        assert_eq!(config.resize_window(), Duration::from_millis(200));
    }

    #[test]
    fn immediate_resize_window() {
        let config = BuilderConfig {
            debounce_resizes: false,
            ..BuilderConfig::default()
        };
        assert_eq!(config.resize_window(), Duration::ZERO);
    }

    #[test]
    fn partial_json_backfills_defaults() {
        let config: BuilderConfig =
            serde_json::from_str(r#"{"resizeDebounceMs": 550}"#).unwrap();
        assert_eq!(config.resize_debounce_ms, 550);
        assert_eq!(config.setup_poll_interval_ms, 300);
    }
}
