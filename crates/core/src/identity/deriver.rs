//! Exact and proxy identity derivation.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::hash::{DigestAlgorithm, digest_segments};
use super::location::SourceLocation;
use super::transform::canonical_json;
use super::{Identity, Strategy};
use crate::Error;
use crate::config::AppConfig;

/// The third digest segment. Never both in one derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDescriptor<'a> {
    /// Full image content.
    Bytes(&'a [u8]),
    /// File length in bytes, hashed as its decimal string.
    Size(u64),
}

/// Derives identities relative to a fixed reference root.
///
/// Holds no mutable state; clone it freely across tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityDeriver {
    root: PathBuf,
    algorithm: DigestAlgorithm,
}

impl IdentityDeriver {
    /// Create a deriver that resolves local sources against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), algorithm: DigestAlgorithm::default() }
    }

    /// Create a deriver rooted at the process working directory.
    pub fn from_current_dir() -> Result<Self, Error> {
        let root = std::env::current_dir().map_err(Error::CurrentDir)?;
        Ok(Self::new(root))
    }

    /// Create a deriver from loaded configuration.
    ///
    /// Falls back to the working directory when no reference root is set.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let deriver = match &config.reference_root {
            Some(root) => Self::new(root.clone()),
            None => Self::from_current_dir()?,
        };
        Ok(deriver.with_algorithm(config.algorithm))
    }

    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    /// Canonical form of `location` under this deriver's root.
    pub fn canonical_location(&self, location: &SourceLocation) -> Result<String, Error> {
        location.canonicalize(&self.root)
    }

    /// Hash location, config and content bytes.
    ///
    /// Reads nothing from disk; the caller supplies the bytes.
    pub fn exact_identity<C: Serialize + ?Sized>(
        &self, location: &SourceLocation, config: &C, content: &[u8],
    ) -> Result<Identity, Error> {
        self.derive(location, config, ContentDescriptor::Bytes(content))
    }

    /// Hash location, config and the file size reported by the filesystem.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedSource` for remote locations
    /// - `Error::SourceUnavailable` if the metadata probe fails
    pub fn proxy_identity<C: Serialize + ?Sized>(
        &self, location: &SourceLocation, config: &C,
    ) -> Result<Identity, Error> {
        let path = self.local_path(location)?;
        let metadata = std::fs::metadata(&path).map_err(|source| Error::SourceUnavailable { path: path.clone(), source })?;
        let size = regular_file_len(&path, &metadata)?;

        self.derive(location, config, ContentDescriptor::Size(size))
    }

    /// Async form of [`IdentityDeriver::proxy_identity`].
    pub async fn proxy_identity_async<C: Serialize + ?Sized>(
        &self, location: &SourceLocation, config: &C,
    ) -> Result<Identity, Error> {
        let path = self.local_path(location)?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| Error::SourceUnavailable { path: path.clone(), source })?;
        let size = regular_file_len(&path, &metadata)?;

        self.derive(location, config, ContentDescriptor::Size(size))
    }

    /// Read a local source and derive its exact identity.
    pub async fn exact_identity_from_source<C: Serialize + ?Sized>(
        &self, location: &SourceLocation, config: &C,
    ) -> Result<Identity, Error> {
        let path = self.local_path(location)?;
        let content = tokio::fs::read(&path)
            .await
            .map_err(|source| Error::SourceUnavailable { path: path.clone(), source })?;

        self.exact_identity(location, config, &content)
    }

    /// Derive a local source's identity with the chosen strategy.
    pub async fn identity_for_source<C: Serialize + ?Sized>(
        &self, location: &SourceLocation, config: &C, strategy: Strategy,
    ) -> Result<Identity, Error> {
        match strategy {
            Strategy::Exact => self.exact_identity_from_source(location, config).await,
            Strategy::Proxy => self.proxy_identity_async(location, config).await,
        }
    }

    /// Shared digest path for both strategies.
    pub fn derive<C: Serialize + ?Sized>(
        &self, location: &SourceLocation, config: &C, content: ContentDescriptor<'_>,
    ) -> Result<Identity, Error> {
        let canonical = self.canonical_location(location)?;
        let config_json = canonical_json(config)?;

        let (strategy, hex) = match content {
            ContentDescriptor::Bytes(bytes) => (
                Strategy::Exact,
                digest_segments(self.algorithm, &[canonical.as_bytes(), config_json.as_bytes(), bytes]),
            ),
            ContentDescriptor::Size(size) => {
                let size = size.to_string();
                (
                    Strategy::Proxy,
                    digest_segments(self.algorithm, &[canonical.as_bytes(), config_json.as_bytes(), size.as_bytes()]),
                )
            }
        };

        tracing::debug!(
            strategy = strategy.as_str(),
            algorithm = self.algorithm.as_str(),
            location = %canonical,
            identity = %hex,
            "derived identity"
        );

        Ok(Identity::from_hex(hex))
    }

    /// Absolute path for a local source, rejecting remote ones up front.
    fn local_path(&self, location: &SourceLocation) -> Result<PathBuf, Error> {
        if location.is_remote() {
            return Err(Error::UnsupportedSource(format!(
                "{location} is remote; only local sources can be read or probed"
            )));
        }
        location.resolve(&self.root)
    }
}

fn regular_file_len(path: &Path, metadata: &std::fs::Metadata) -> Result<u64, Error> {
    if !metadata.is_file() {
        return Err(Error::SourceUnavailable {
            path: path.to_path_buf(),
            source: std::io::Error::other("not a regular file"),
        });
    }
    Ok(metadata.len())
}
