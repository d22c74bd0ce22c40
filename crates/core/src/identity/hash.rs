//! Digest engine: incremental hashing of ordered key segments.

use serde::{Deserialize, Serialize};
use sha2::Digest;

/// Hash algorithm used to finalize an identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-256, 64 hex characters.
    #[default]
    Sha256,
    /// SHA-1, 40 hex characters. Shorter keys, weaker collision resistance.
    Sha1,
}

impl DigestAlgorithm {
    /// Length of the hex-encoded output.
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 64,
            DigestAlgorithm::Sha1 => 40,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha1 => "sha1",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DigestAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" => Ok(DigestAlgorithm::Sha256),
            "sha1" | "sha-1" => Ok(DigestAlgorithm::Sha1),
            other => Err(format!("unknown digest algorithm: {other}")),
        }
    }
}

/// Hash `segments` in order and return the lowercase hex digest.
///
/// Segments are fed as separate updates with no separator between them, so
/// the caller owns the segment order.
pub fn digest_segments(algorithm: DigestAlgorithm, segments: &[&[u8]]) -> String {
    match algorithm {
        DigestAlgorithm::Sha256 => hash_with::<sha2::Sha256>(segments),
        DigestAlgorithm::Sha1 => hash_with::<sha1::Sha1>(segments),
    }
}

fn hash_with<D: Digest>(segments: &[&[u8]]) -> String {
    let mut hasher = D::new();
    for segment in segments {
        hasher.update(segment);
    }
    hex::encode(hasher.finalize())
}
