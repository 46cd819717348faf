//! Spin timing and cosmetic tuning.

use crate::core::participant::DEFAULT_MAX_NAME_LEN;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or validating a [`SpinConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("spin_duration_ms must be greater than zero")]
    ZeroSpinDuration,

    #[error("min_extra_turns must be at least 1 so every spin moves forward")]
    NoExtraTurns,

    #[error("max_name_len must be at least 1")]
    ZeroNameLength,
}

/// Configuration for a spin session.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust
/// use fairspin::SpinConfig;
///
/// let config = SpinConfig::from_json(r#"{ "spin_duration_ms": 3000 }"#).unwrap();
/// assert_eq!(config.spin_duration_ms, 3000);
/// assert_eq!(config.reveal_delay_ms, 500);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinConfig {
    /// How long the renderer animates a spin. Settlement fires after this.
    pub spin_duration_ms: u64,

    /// Delay between settlement and the reveal signal.
    pub reveal_delay_ms: u64,

    /// Whole turns always added on top of the current rotation.
    pub min_extra_turns: u32,

    /// Random spread of additional whole turns, `[0, spread)`.
    pub extra_turn_spread: u32,

    /// Longest accepted participant name, in characters.
    pub max_name_len: usize,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: 5500,
            reveal_delay_ms: 500,
            min_extra_turns: 5,
            extra_turn_spread: 5,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

impl SpinConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spin_duration_ms == 0 {
            return Err(ConfigError::ZeroSpinDuration);
        }
        if self.min_extra_turns == 0 {
            return Err(ConfigError::NoExtraTurns);
        }
        if self.max_name_len == 0 {
            return Err(ConfigError::ZeroNameLength);
        }
        Ok(())
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Whole extra turns for a jitter value `u` in `[0, 1)`.
    ///
    /// Out-of-range jitter is clamped so the result stays within
    /// `[min_extra_turns, min_extra_turns + spread)`.
    pub fn extra_turns(&self, u: f64) -> u32 {
        if self.extra_turn_spread == 0 {
            return self.min_extra_turns;
        }
        let spread = f64::from(self.extra_turn_spread);
        let offset = (u * spread).floor().clamp(0.0, spread - 1.0);
        self.min_extra_turns + offset as u32
    }
}
