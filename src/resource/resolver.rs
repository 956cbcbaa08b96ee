//! Request path to filesystem path resolution.
//!
//! # Responsibilities
//! - Join the served root with the request path
//! - Refuse paths that would leave the root (`..`, escaping symlinks)
//! - Report what kind of object a path names
//!
//! # Design Decisions
//! - Nothing is cached: every query goes back to the filesystem
//! - Absence is a kind, not an error
//! - The request path is used verbatim (no percent-decoding)

use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::ServeError;

/// What a resolved path currently names on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Nothing exists at the path.
    Missing,
    /// A regular file (symlinks followed).
    File,
    /// A directory (symlinks followed).
    Directory,
    /// Something else: socket, fifo, device.
    Other,
}

impl ResourceKind {
    /// Query the filesystem for the kind of `path`.
    pub fn of(path: &Path) -> Self {
        match std::fs::metadata(path) {
            Ok(meta) if meta.is_file() => ResourceKind::File,
            Ok(meta) if meta.is_dir() => ResourceKind::Directory,
            Ok(_) => ResourceKind::Other,
            Err(_) => ResourceKind::Missing,
        }
    }

    pub fn exists(self) -> bool {
        self != ResourceKind::Missing
    }
}

/// Maps request paths onto the served directory tree.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    /// Create a resolver for `root`. The root must exist; it is canonicalized
    /// once so containment checks compare like with like.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("served root {} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    /// The canonical served root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path to an absolute path inside the root.
    ///
    /// The returned path is not required to exist.
    pub fn resolve(&self, request_path: &str) -> Result<PathBuf, ServeError> {
        let relative = request_path.trim_start_matches('/');

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                // ParentDir, RootDir or a Windows prefix
                _ => {
                    return Err(ServeError::PathEscape {
                        path: request_path.to_string(),
                    })
                }
            }
        }

        self.contain(self.root.join(relative), request_path)
    }

    /// Accept `full_path` only if, with symlinks followed, it stays under
    /// the root. Paths that do not exist pass unchanged.
    ///
    /// `request_path` names the request in the error.
    pub fn contain(&self, full_path: PathBuf, request_path: &str) -> Result<PathBuf, ServeError> {
        if let Ok(canonical) = full_path.canonicalize() {
            if !canonical.starts_with(&self.root) {
                return Err(ServeError::PathEscape {
                    path: request_path.to_string(),
                });
            }
        }
        Ok(full_path)
    }
}

/// Path of the index file a directory would be served through.
pub fn index_candidate(dir: &Path, index_file: &str) -> PathBuf {
    dir.join(index_file)
}
