//! Startup configuration for the counting strategy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How per-key registries count events. Chosen once when a detector is
/// constructed and fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CountingStrategy {
    /// Raw monotonic counts, never reset.
    SimpleCount,
    /// Approximate counts over the trailing five seconds.
    #[default]
    DecayingWindow,
}

impl CountingStrategy {
    /// The configuration selector naming this strategy.
    pub fn selector(&self) -> &'static str {
        match self {
            CountingStrategy::SimpleCount => "simple-count",
            CountingStrategy::DecayingWindow => "decaying-window",
        }
    }
}

impl fmt::Display for CountingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

impl FromStr for CountingStrategy {
    type Err = ConfigError;

    fn from_str(selector: &str) -> Result<Self, Self::Err> {
        match selector {
            "simple-count" => Ok(CountingStrategy::SimpleCount),
            "decaying-window" => Ok(CountingStrategy::DecayingWindow),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown counting strategy {0:?}, expected \"simple-count\" or \"decaying-window\"")]
    UnknownStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_selectors_parse() {
        assert_eq!(
            "simple-count".parse::<CountingStrategy>().unwrap(),
            CountingStrategy::SimpleCount
        );
        assert_eq!(
            "decaying-window".parse::<CountingStrategy>().unwrap(),
            CountingStrategy::DecayingWindow
        );
    }

    #[test]
    fn unknown_selector_is_a_config_error() {
        let err = "moving-average".parse::<CountingStrategy>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownStrategy(ref s) if s == "moving-average"));
        assert!(err.to_string().contains("moving-average"));
    }

    #[test]
    fn selector_round_trips_through_display() {
        for strategy in [CountingStrategy::SimpleCount, CountingStrategy::DecayingWindow] {
            assert_eq!(
                strategy.to_string().parse::<CountingStrategy>().unwrap(),
                strategy
            );
        }
    }
}
