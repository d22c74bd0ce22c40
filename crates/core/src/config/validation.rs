//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use crate::identity::{DigestAlgorithm, Strategy};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if `reference_root` is set but not absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.reference_root {
            if root.as_os_str().is_empty() {
                return Err(ConfigError::Invalid { field: "reference_root".into(), reason: "must not be empty".into() });
            }
            if !root.is_absolute() {
                return Err(ConfigError::Invalid {
                    field: "reference_root".into(),
                    reason: format!("must be an absolute path, got {}", root.display()),
                });
            }
        }

        if self.strategy == Strategy::Proxy && self.algorithm == DigestAlgorithm::Sha1 {
            tracing::warn!(
                strategy = %self.strategy,
                algorithm = %self.algorithm,
                "Proxy identities with sha1 give the weakest staleness and collision guarantees"
            );
        }

        Ok(())
    }
}
