//! Request handling.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4)
//! - Capture per-request facts (path, method, client, arrival time)
//! - Carry the resolved filesystem path to the case chain
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The context is owned by the dispatcher and lent read-only to cases
//! - The resolved path is attached exactly once, after resolution

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use axum::http::{HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 for every request lacking an `x-request-id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Everything known about one request while it is being answered.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Raw request path, rooted at `/`.
    pub path: String,
    pub method: Method,
    pub client: SocketAddr,
    pub received_at: SystemTime,
    pub request_id: String,
    full_path: PathBuf,
}

impl RequestContext {
    pub fn new(
        path: impl Into<String>,
        method: Method,
        client: SocketAddr,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            method,
            client,
            received_at: SystemTime::now(),
            request_id: request_id.into(),
            full_path: PathBuf::new(),
        }
    }

    /// Attach the resolved filesystem path.
    pub fn with_full_path(mut self, full_path: PathBuf) -> Self {
        self.full_path = full_path;
        self
    }

    /// Absolute filesystem path the request resolved to.
    pub fn full_path(&self) -> &Path {
        &self.full_path
    }
}
