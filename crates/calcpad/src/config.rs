//! Controller configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What happens to a pending auto-clear when the user acts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoClearPolicy {
    /// Any user operation cancels the pending auto-clear
    #[default]
    CancelOnInput,
    /// Pending auto-clears always fire, even over newer input
    Unconditional,
}

/// Errors loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid YAML for this schema
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml_ng::Error),
    /// A field holds a value outside its domain
    #[error("invalid value {value:?} for {field}")]
    InvalidValue {
        /// Field name
        field: &'static str,
        /// Offending value
        value: String,
    },
}

/// Display controller settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcpadConfig {
    /// Delay before an error display clears itself
    pub auto_clear_ms: u64,
    /// Interaction between the auto-clear and user input
    pub auto_clear_policy: AutoClearPolicy,
    /// Text shown after a failed evaluation
    pub error_text: String,
}

impl Default for CalcpadConfig {
    fn default() -> Self {
        Self {
            auto_clear_ms: Self::DEFAULT_AUTO_CLEAR_MS,
            auto_clear_policy: AutoClearPolicy::CancelOnInput,
            error_text: Self::DEFAULT_ERROR_TEXT.to_string(),
        }
    }
}

impl CalcpadConfig {
    /// Default auto-clear delay
    pub const DEFAULT_AUTO_CLEAR_MS: u64 = 1500;
    /// Default error text
    pub const DEFAULT_ERROR_TEXT: &'static str = "Error";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML document; missing fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Rejects settings the controller cannot honor
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.error_text.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "error_text",
                value: String::new(),
            });
        }
        Ok(())
    }

    /// Sets the auto-clear delay
    #[must_use]
    pub const fn with_auto_clear_ms(mut self, ms: u64) -> Self {
        self.auto_clear_ms = ms;
        self
    }

    /// Sets the auto-clear policy
    #[must_use]
    pub const fn with_policy(mut self, policy: AutoClearPolicy) -> Self {
        self.auto_clear_policy = policy;
        self
    }

    /// Sets the error text
    #[must_use]
    pub fn with_error_text(mut self, text: impl Into<String>) -> Self {
        self.error_text = text.into();
        self
    }

    /// Auto-clear delay as a [`Duration`]
    #[must_use]
    pub const fn auto_clear_delay(&self) -> Duration {
        Duration::from_millis(self.auto_clear_ms)
    }
}
