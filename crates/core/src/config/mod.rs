//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (IMGID_*)
//! 2. TOML config file (if IMGID_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::identity::{DigestAlgorithm, Strategy};

mod validation;

pub use validation::ConfigError;

/// Identity derivation settings.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (IMGID_*)
/// 2. TOML config file (if IMGID_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Digest used to finalize identities.
    ///
    /// Set via IMGID_ALGORITHM environment variable.
    #[serde(default)]
    pub algorithm: DigestAlgorithm,

    /// Default strategy for sources read from disk.
    ///
    /// Set via IMGID_STRATEGY environment variable.
    #[serde(default)]
    pub strategy: Strategy,

    /// Directory local sources are made relative to. Must be absolute.
    ///
    /// Set via IMGID_REFERENCE_ROOT environment variable. Defaults to the
    /// process working directory.
    #[serde(default)]
    pub reference_root: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("IMGID_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("IMGID_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
