//! Cache identities for processed image assets.
//!
//! An identity is the hex digest of three ordered segments:
//!
//! 1. the canonical source location
//! 2. the canonical transform configuration
//! 3. the content bytes (exact) or the decimal file size (proxy)
//!
//! Proxy identities avoid reading the image but collide when a file is
//! replaced by different content of the same length.

pub mod deriver;
pub mod hash;
pub mod location;
pub mod transform;

use serde::{Deserialize, Serialize};

pub use deriver::{ContentDescriptor, IdentityDeriver};
pub use hash::{DigestAlgorithm, digest_segments};
pub use location::SourceLocation;
pub use transform::{TransformConfig, canonical_json};

/// Fixed-length lowercase hex cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub(crate) fn from_hex(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Which content representation feeds the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Full content bytes. Linear in file size, never stale.
    #[default]
    Exact,
    /// File size from a metadata probe. Constant cost, local sources only.
    Proxy,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Proxy => "proxy",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" | "buffer" => Ok(Strategy::Exact),
            "proxy" | "size" => Ok(Strategy::Proxy),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}
