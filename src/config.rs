// In: src/config.rs

//! The single source of truth for all maskarray configuration.
//!
//! `MaskArrayConfig` is created once at the application boundary (e.g. from a
//! JSON document) and passed down explicitly. Nothing in the crate reads
//! configuration from global state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

//==================================================================================
// I. Floating-Point Error State
//==================================================================================

/// What to do when an elementwise computation hits a numeric event.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrAction {
    /// **Default:** the event is ignored. The affected slot holds whatever the
    /// native operation produced.
    #[default]
    Ignore,
    /// The first event on a present (non-missing) slot aborts the operation.
    Raise,
}

/// The numeric event categories tracked by the elementwise kernels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FpErrorKind {
    /// Division (or modulo) by zero.
    Divide,
    /// Result out of range for the compute type.
    Overflow,
    /// Result undefined, e.g. `0.0 / 0.0` or `inf - inf`.
    Invalid,
}

impl fmt::Display for FpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FpErrorKind::Divide => "divide by zero",
            FpErrorKind::Overflow => "overflow",
            FpErrorKind::Invalid => "invalid value",
        };
        f.write_str(name)
    }
}

/// Per-category handling of numeric events, passed explicitly to the compute
/// routine for the duration of a single call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct ErrState {
    #[serde(default)]
    pub divide: ErrAction,
    #[serde(default)]
    pub over: ErrAction,
    #[serde(default)]
    pub invalid: ErrAction,
}

impl ErrState {
    /// Every category ignored. This is what the arithmetic engine uses.
    pub const fn ignore_all() -> Self {
        Self {
            divide: ErrAction::Ignore,
            over: ErrAction::Ignore,
            invalid: ErrAction::Ignore,
        }
    }

    pub const fn raise_all() -> Self {
        Self {
            divide: ErrAction::Raise,
            over: ErrAction::Raise,
            invalid: ErrAction::Raise,
        }
    }

    pub fn action_for(&self, kind: FpErrorKind) -> ErrAction {
        match kind {
            FpErrorKind::Divide => self.divide,
            FpErrorKind::Overflow => self.over,
            FpErrorKind::Invalid => self.invalid,
        }
    }

    /// `true` when no category can abort a computation.
    pub fn is_silent(&self) -> bool {
        *self == Self::ignore_all()
    }
}

//==================================================================================
// II. Logging & Cast Settings
//==================================================================================

/// Settings for the `env_logger` backend installed by `observability::init_logging`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// A `log::LevelFilter` name: "off", "error", "warn", "info", "debug", "trace".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append log records to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

/// Defaults applied by `NumericArray::astype_with_config`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct CastConfig {
    #[serde(default = "default_true")]
    pub copy: bool,
}

impl Default for CastConfig {
    fn default() -> Self {
        Self { copy: true }
    }
}

//==================================================================================
// III. The Unified MaskArrayConfig
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct MaskArrayConfig {
    /// Numeric event handling for `binary_op_with_config`.
    #[serde(default)]
    pub errstate: ErrState,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub cast: CastConfig,
}

impl MaskArrayConfig {
    /// Parses a configuration document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = MaskArrayConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MaskArrayConfig::default());
        assert!(config.errstate.is_silent());
        assert!(config.cast.copy);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_errstate_document() {
        let config =
            MaskArrayConfig::from_json_str(r#"{"errstate": {"divide": "raise"}}"#).unwrap();
        assert_eq!(config.errstate.divide, ErrAction::Raise);
        assert_eq!(config.errstate.over, ErrAction::Ignore);
        assert_eq!(
            config.errstate.action_for(FpErrorKind::Divide),
            ErrAction::Raise
        );
        assert!(!config.errstate.is_silent());
    }

    #[test]
    fn test_config_json_roundtrip() {
        let mut config = MaskArrayConfig::default();
        config.errstate = ErrState::raise_all();
        config.logging.log_file = Some("/tmp/maskarray.log".to_string());
        let json = config.to_json_string().unwrap();
        assert_eq!(MaskArrayConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_malformed_document_is_reported() {
        assert!(MaskArrayConfig::from_json_str("{not json").is_err());
    }
}
