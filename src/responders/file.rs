//! Whole-file responder.

use std::path::Path;

use axum::http::StatusCode;
use axum::response::Response;

use crate::error::ServeError;
use crate::http::response::send_content;

/// Read `path` into memory and send it with status 200.
///
/// The caller has classified `path` as a readable file, but it may have
/// changed since; any read error is reported as [`ServeError::ReadFailure`].
pub async fn serve_file(path: &Path) -> Result<Response, ServeError> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| ServeError::ReadFailure {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Serving file");
    Ok(send_content(content, StatusCode::OK))
}
