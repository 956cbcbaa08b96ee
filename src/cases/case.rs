//! Classification rules.
//!
//! # Responsibilities
//! - Decide whether a request falls into a category (`test`)
//! - Answer requests in that category (`act`)
//!
//! # Design Decisions
//! - `test` re-queries the filesystem; nothing is cached between rules
//! - `act` never writes error pages, it returns a [`ServeError`]
//! - Each rule assumes every earlier rule in the chain said no

use futures_util::future::{self, BoxFuture, FutureExt};

use axum::response::Response;

use crate::error::ServeError;
use crate::http::request::RequestContext;
use crate::resource::{index_candidate, Resolver, ResourceKind};
use crate::responders::{list_directory, serve_file, ScriptRunner};

/// A predicate over the resolved resource paired with the action to take.
pub trait Case: Send + Sync + std::fmt::Debug {
    /// Stable label for logs and metrics.
    fn name(&self) -> &'static str;

    /// Returns true if this case should answer the request.
    fn test(&self, ctx: &RequestContext) -> bool;

    /// Answer the request.
    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>>;
}

/// Nothing exists at the resolved path.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFile;

impl Case for NoFile {
    fn name(&self) -> &'static str {
        "no_file"
    }

    fn test(&self, ctx: &RequestContext) -> bool {
        !ResourceKind::of(ctx.full_path()).exists()
    }

    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
        future::ready(Err(ServeError::NotFound {
            path: ctx.path.clone(),
        }))
        .boxed()
    }
}

/// A regular file whose name marks it as a script. Run, never served.
///
/// Only the requested name is checked: a link named `notes.txt` that points
/// at `tool.py` is a plain file.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    extension: String,
    runner: ScriptRunner,
}

impl ScriptFile {
    pub fn new(extension: impl Into<String>, runner: ScriptRunner) -> Self {
        Self {
            extension: extension.into(),
            runner,
        }
    }
}

impl Case for ScriptFile {
    fn name(&self) -> &'static str {
        "script_file"
    }

    fn test(&self, ctx: &RequestContext) -> bool {
        let path = ctx.full_path();
        ResourceKind::of(path) == ResourceKind::File
            && path
                .file_name()
                .map(|name| name.to_string_lossy().ends_with(self.extension.as_str()))
                .unwrap_or(false)
    }

    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
        self.runner.respond(ctx.full_path()).boxed()
    }
}

/// Any other regular file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistingFile;

impl Case for ExistingFile {
    fn name(&self) -> &'static str {
        "existing_file"
    }

    fn test(&self, ctx: &RequestContext) -> bool {
        ResourceKind::of(ctx.full_path()) == ResourceKind::File
    }

    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
        serve_file(ctx.full_path()).boxed()
    }
}

/// A directory holding an index file: serve the index.
///
/// The index may be a symlink, so it goes through the same containment
/// check as the request path before it is read.
#[derive(Debug, Clone)]
pub struct DirectoryIndexFile {
    index_file: String,
    resolver: Resolver,
}

impl DirectoryIndexFile {
    pub fn new(index_file: impl Into<String>, resolver: Resolver) -> Self {
        Self {
            index_file: index_file.into(),
            resolver,
        }
    }
}

impl Case for DirectoryIndexFile {
    fn name(&self) -> &'static str {
        "directory_index_file"
    }

    fn test(&self, ctx: &RequestContext) -> bool {
        let dir = ctx.full_path();
        ResourceKind::of(dir) == ResourceKind::Directory
            && ResourceKind::of(&index_candidate(dir, &self.index_file)) == ResourceKind::File
    }

    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
        async move {
            let index = self
                .resolver
                .contain(index_candidate(ctx.full_path(), &self.index_file), &ctx.path)?;
            serve_file(&index).await
        }
        .boxed()
    }
}

/// A directory without an index file: list it.
#[derive(Debug, Clone)]
pub struct DirectoryNoIndexFile {
    index_file: String,
}

impl DirectoryNoIndexFile {
    pub fn new(index_file: impl Into<String>) -> Self {
        Self {
            index_file: index_file.into(),
        }
    }
}

impl Case for DirectoryNoIndexFile {
    fn name(&self) -> &'static str {
        "directory_no_index_file"
    }

    fn test(&self, ctx: &RequestContext) -> bool {
        let dir = ctx.full_path();
        ResourceKind::of(dir) == ResourceKind::Directory
            && ResourceKind::of(&index_candidate(dir, &self.index_file)) != ResourceKind::File
    }

    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
        list_directory(ctx.full_path(), &ctx.path).boxed()
    }
}

/// Matches everything. Must be last.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysFail;

impl Case for AlwaysFail {
    fn name(&self) -> &'static str {
        "always_fail"
    }

    fn test(&self, _ctx: &RequestContext) -> bool {
        true
    }

    fn act<'a>(&'a self, ctx: &'a RequestContext) -> BoxFuture<'a, Result<Response, ServeError>> {
        future::ready(Err(ServeError::UnknownObject {
            path: ctx.path.clone(),
        }))
        .boxed()
    }
}
