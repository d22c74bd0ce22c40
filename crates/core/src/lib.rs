//! Core types and shared functionality for imgid.
//!
//! This crate provides:
//! - Exact and proxy identity derivation for image assets
//! - Source location canonicalization
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod identity;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use identity::{
    ContentDescriptor, DigestAlgorithm, Identity, IdentityDeriver, SourceLocation, Strategy, TransformConfig,
};
