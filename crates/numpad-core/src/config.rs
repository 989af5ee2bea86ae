//! Runtime configuration for a Number Pad module.
//!
//! Every field has a default, so a host can pass `{}` or only the fields it
//! wants to change:
//!
//! ```
//! use numpad_core::config::ModuleConfig;
//!
//! let config = ModuleConfig::from_json(r#"{ "strike_cooldown_secs": 2.0 }"#).unwrap();
//! assert_eq!(config.strike_cooldown_secs, 2.0);
//! assert!(!config.pass_on_internal_error);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable module behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Seconds after a strike during which submissions are ignored; the
    /// display is cleared when it runs out.
    pub strike_cooldown_secs: f64,
    /// How long the colorblind overlay stays up after being toggled on.
    pub colorblind_duration_secs: f64,
    /// Delay between scripted presses produced by chat commands.
    pub press_delay_secs: f64,
    /// Award a pass instead of failing when derivation hits an internal
    /// error. Off by default.
    pub pass_on_internal_error: bool,
    /// Serial to use when the bomb reports none (test rigs only).
    pub fallback_serial: Option<String>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            strike_cooldown_secs: 1.0,
            colorblind_duration_secs: 5.0,
            press_delay_secs: 0.1,
            pass_on_internal_error: false,
            fallback_serial: None,
        }
    }
}

/// Rejected configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be a finite, non-negative number of seconds (got {value})")]
    InvalidDuration { field: &'static str, value: f64 },
}

impl ModuleConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ModuleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_duration("strike_cooldown_secs", self.strike_cooldown_secs)?;
        check_duration("colorblind_duration_secs", self.colorblind_duration_secs)?;
        check_duration("press_delay_secs", self.press_delay_secs)?;
        Ok(())
    }
}

fn check_duration(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ModuleConfig::default();
        assert_eq!(config.strike_cooldown_secs, 1.0);
        assert_eq!(config.colorblind_duration_secs, 5.0);
        assert_eq!(config.press_delay_secs, 0.1);
        assert!(!config.pass_on_internal_error);
        assert!(config.fallback_serial.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(ModuleConfig::from_json("{}").unwrap(), ModuleConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = ModuleConfig::from_json(
            r#"{ "pass_on_internal_error": true, "fallback_serial": "AB1CD2" }"#,
        )
        .unwrap();
        assert!(config.pass_on_internal_error);
        assert_eq!(config.fallback_serial.as_deref(), Some("AB1CD2"));
        assert_eq!(config.strike_cooldown_secs, 1.0);
    }

    #[test]
    fn test_negative_duration_rejected() {
        let err = ModuleConfig::from_json(r#"{ "strike_cooldown_secs": -1.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidDuration {
                field: "strike_cooldown_secs",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_json_rejected() {
        assert!(matches!(
            ModuleConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
