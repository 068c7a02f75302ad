//! Request-path to file resolution.
//!
//! Two policies share the same sanitizing front end:
//!
//! - **SPA fallback**: `/` and directories map to their index document, and any
//!   path that does not name a file falls back to the root index document so
//!   client-side routing can take over.
//! - **Plain**: classic static serving. Directories without a trailing slash
//!   are redirected, directories with one serve their index document, and
//!   missing files are 404.
//!
//! Whatever the policy, the final file must live under the document root.

use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};

use crate::http::response::StatusCode;

#[derive(Debug, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing to serve, fallback included.
    NotFound,
    /// Path tried to leave the document root.
    Forbidden,
    /// Path could not be decoded.
    BadRequest,
}

impl ResolveError {
    pub fn status(&self) -> StatusCode {
        match self {
            ResolveError::NotFound => StatusCode::NotFound,
            ResolveError::Forbidden => StatusCode::Forbidden,
            ResolveError::BadRequest => StatusCode::BadRequest,
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    /// Canonical path of a regular file under the root.
    File(PathBuf),
    /// Directory requested without a trailing slash; value is the `Location`.
    Redirect(String),
}

/// Drops everything from the first `?` or `#` onward.
///
/// ```
/// use devserve::files::resolver::strip_query_and_fragment;
/// assert_eq!(strip_query_and_fragment("/page.html?x=1#y"), "/page.html");
/// assert_eq!(strip_query_and_fragment("/a#b?c"), "/a");
/// ```
pub fn strip_query_and_fragment(raw: &str) -> &str {
    match raw.find(['?', '#']) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// Decodes a URL path into a relative filesystem path.
///
/// Empty and `.` segments are dropped. A `..` segment anywhere is rejected
/// rather than collapsed.
pub fn sanitize(path: &str) -> Result<PathBuf, ResolveError> {
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map_err(|_| ResolveError::BadRequest)?;

    if decoded.contains('\0') {
        return Err(ResolveError::BadRequest);
    }

    let mut normalized = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(ResolveError::Forbidden),
            _ => {
                // A decoded segment must be exactly one normal component.
                let mut components = Path::new(segment).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(part)), None) => normalized.push(part),
                    (Some(Component::CurDir), None) => {}
                    _ => return Err(ResolveError::Forbidden),
                }
            }
        }
    }

    Ok(normalized)
}

#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
    index_file: String,
    spa_fallback: bool,
}

impl Resolver {
    /// `root` is canonicalized when it exists, otherwise made absolute
    /// against the working directory. A missing root resolves every request
    /// to `NotFound` until the directory appears.
    pub fn new(root: impl Into<PathBuf>, index_file: impl Into<String>, spa_fallback: bool) -> Self {
        let root = root.into();
        let root = root
            .canonicalize()
            .or_else(|_| std::path::absolute(&root))
            .unwrap_or(root);
        Self {
            root,
            index_file: index_file.into(),
            spa_fallback,
        }
    }

    /// Resolves a raw request target to the file to serve.
    pub async fn resolve(&self, raw: &str) -> Result<Resolved, ResolveError> {
        let path = strip_query_and_fragment(raw);
        if self.spa_fallback {
            self.resolve_with_fallback(path).await
        } else {
            let suffix = &raw[path.len()..];
            self.resolve_plain(path, suffix).await
        }
    }

    async fn resolve_with_fallback(&self, path: &str) -> Result<Resolved, ResolveError> {
        let path = if path.is_empty() || path == "/" {
            format!("/{}", self.index_file)
        } else {
            path.to_string()
        };

        let mut candidate = self.root.join(sanitize(&path)?);
        let mut trailing_slash = path.ends_with('/');
        if is_dir(&candidate).await {
            candidate.push(&self.index_file);
            trailing_slash = false;
        }

        if !trailing_slash && is_file(&candidate).await {
            return self.confine(&candidate).await.map(Resolved::File);
        }

        // Single fallback attempt: a missing index is a 404, not another lookup.
        let fallback = self.root.join(&self.index_file);
        if is_file(&fallback).await {
            tracing::debug!(path = %path, "falling back to index document");
            return self.confine(&fallback).await.map(Resolved::File);
        }

        Err(ResolveError::NotFound)
    }

    async fn resolve_plain(&self, path: &str, suffix: &str) -> Result<Resolved, ResolveError> {
        let candidate = self.root.join(sanitize(path)?);

        if is_dir(&candidate).await {
            if !path.ends_with('/') {
                return Ok(Resolved::Redirect(format!("{path}/{suffix}")));
            }
            let index = candidate.join(&self.index_file);
            if is_file(&index).await {
                return self.confine(&index).await.map(Resolved::File);
            }
            return Err(ResolveError::NotFound);
        }

        if !path.ends_with('/') && is_file(&candidate).await {
            return self.confine(&candidate).await.map(Resolved::File);
        }

        Err(ResolveError::NotFound)
    }

    /// Canonicalizes `candidate` and checks it is still under the root,
    /// which catches symlinks pointing outside.
    ///
    /// The root is canonicalized again here since it may have been created
    /// (or replaced by a symlink) after startup.
    async fn confine(&self, candidate: &Path) -> Result<PathBuf, ResolveError> {
        let canonical = tokio::fs::canonicalize(candidate)
            .await
            .map_err(|_| ResolveError::NotFound)?;
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|_| ResolveError::NotFound)?;

        if !canonical.starts_with(&root) {
            tracing::warn!(path = %candidate.display(), "refusing file outside document root");
            return Err(ResolveError::Forbidden);
        }

        Ok(canonical)
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
