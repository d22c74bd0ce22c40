//! Source location canonicalization for machine-independent identities.
//!
//! Remote sources keep `origin + path` only. Local sources are rewritten
//! relative to a reference root so two checkouts of the same project agree.

use std::path::{Component, Path, PathBuf};

use percent_encoding::percent_decode_str;
use url::Url;

use crate::Error;

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A source with a network host. `origin` is `scheme://host[:port]`.
    Remote { origin: String, path: String },
    /// Any host-less source. `path` is already percent-decoded.
    Local { scheme: String, path: PathBuf },
}

impl SourceLocation {
    /// Build a location from a parsed URL.
    ///
    /// A URL is remote when it carries a host. For local URLs the path is
    /// percent-decoded here, once, so canonicalization and the size probe
    /// see the same path.
    pub fn from_url(url: &Url) -> Result<Self, Error> {
        if let Some(host) = url.host_str().filter(|h| !h.is_empty()) {
            return Ok(SourceLocation::Remote { origin: origin_of(url, host), path: url.path().to_string() });
        }

        let path = if url.scheme() == "file" {
            url.to_file_path()
                .map_err(|()| Error::InvalidLocation(format!("not a local file URL: {url}")))?
        } else {
            let decoded = percent_decode_str(url.path())
                .decode_utf8()
                .map_err(|e| Error::InvalidLocation(format!("{url}: {e}")))?;
            PathBuf::from(decoded.as_ref())
        };

        Ok(SourceLocation::Local { scheme: url.scheme().to_string(), path })
    }

    /// Build a local `file` location from a filesystem path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        SourceLocation::Local { scheme: "file".into(), path: path.into() }
    }

    /// Parse either a URL or a plain filesystem path.
    ///
    /// Single-letter schemes are treated as Windows drive letters, not URLs.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Err(Error::InvalidLocation("empty source".into()));
        }

        let bytes = trimmed.as_bytes();
        if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
            return Ok(Self::from_path(trimmed));
        }

        match Url::parse(trimmed) {
            Ok(url) => Self::from_url(&url),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::from_path(trimmed)),
            Err(e) => Err(Error::InvalidLocation(format!("{trimmed}: {e}"))),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Remote { .. })
    }

    /// Canonical string used as the first digest segment.
    ///
    /// # Errors
    ///
    /// Returns `Error::PathResolution` if a local path cannot be expressed
    /// relative to `root`, and `Error::InvalidLocation` if the relative path
    /// is not valid UTF-8.
    pub fn canonicalize(&self, root: &Path) -> Result<String, Error> {
        match self {
            SourceLocation::Remote { origin, path } => Ok(format!("{origin}{path}")),
            SourceLocation::Local { scheme, path } => {
                let relative = relative_to(root, path)?;
                Ok(format!("{scheme}:{relative}"))
            }
        }
    }

    /// Absolute, normalized path of a local source under `root`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedSource` for remote locations.
    pub fn resolve(&self, root: &Path) -> Result<PathBuf, Error> {
        match self {
            SourceLocation::Local { path, .. } => Ok(normalize(&root.join(path)).into_iter().collect()),
            SourceLocation::Remote { origin, path } => {
                Err(Error::UnsupportedSource(format!("{origin}{path} has no local file to probe")))
            }
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceLocation::Remote { origin, path } => write!(f, "{origin}{path}"),
            SourceLocation::Local { scheme, path } => write!(f, "{scheme}:{}", path.display()),
        }
    }
}

/// `scheme://host[:port]`, also for schemes whose origin is opaque.
fn origin_of(url: &Url, host: &str) -> String {
    let origin = url.origin();
    if origin.is_tuple() {
        return origin.ascii_serialization();
    }

    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> Vec<Component<'_>> {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out
}

/// `/`-separated path from `root` to `path`, `..` where it climbs out.
fn relative_to(root: &Path, path: &Path) -> Result<String, Error> {
    let resolution_error = || Error::PathResolution { path: path.to_path_buf(), root: root.to_path_buf() };

    if !root.is_absolute() {
        return Err(resolution_error());
    }

    let absolute = root.join(path);
    let target = normalize(&absolute);
    let base = normalize(root);

    // Different drive or UNC share: no common ancestor.
    let anchored = |c: &Component<'_>| matches!(c, Component::Prefix(_) | Component::RootDir);
    let target_anchor: Vec<_> = target.iter().take_while(|c| anchored(*c)).collect();
    let base_anchor: Vec<_> = base.iter().take_while(|c| anchored(*c)).collect();
    if target_anchor != base_anchor {
        return Err(resolution_error());
    }

    let common = target.iter().zip(base.iter()).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<&str> = vec![".."; base.len() - common];
    for component in &target[common..] {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| Error::InvalidLocation(format!("non UTF-8 path: {}", path.display())))?;
        parts.push(part);
    }

    if parts.is_empty() {
        return Ok(".".into());
    }

    Ok(parts.join("/"))
}
