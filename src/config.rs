use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::PROBE_TIMEOUT_CAP_SECS;

const APP_NAME: &str = "preflight";

/// Settings injected into the gate at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Candidate ports as the host stores them; local device paths are allowed and ignored.
    pub configured_addresses: Vec<String>,

    /// Upper bound, in seconds, on each preflight stage.
    pub timeout_cap_secs: f64,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            configured_addresses: Vec::new(),
            timeout_cap_secs: PROBE_TIMEOUT_CAP_SECS,
        }
    }
}

impl PreflightConfig {
    /// Load from `path` if given, otherwise from the per-user location.
    ///
    /// A missing file is created with the defaults, as confy does.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = match path {
            Some(path) => confy::load_path(path),
            None => confy::load(APP_NAME, None),
        }
        .map_err(ConfigError::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.timeout_cap_secs.is_finite() || self.timeout_cap_secs <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "timeout_cap_secs must be a positive number of seconds, got {}",
                self.timeout_cap_secs
            )));
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Load(confy::ConfyError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Load(e) => write!(f, "Cannot load configuration: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
