//! Response construction.
//!
//! # Responsibilities
//! - Build success responses: status, content type, exact content length
//! - Render the error page for every failure
//!
//! # Design Decisions
//! - One fixed content type (`text/html`) for everything
//! - Every failure is reported with 404, whatever its cause
//! - Bodies are fully buffered, so `Content-Length` is always known

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

/// Content type sent with every response.
pub const CONTENT_TYPE_HTML: &str = "text/html";

/// Build a response carrying `content` with the given status.
pub fn send_content(content: impl Into<Bytes>, status: StatusCode) -> Response {
    let content = content.into();
    let length = content.len();

    let mut response = Response::new(Body::from(content));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_HTML));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}

/// Render the error page for `path` and send it as a 404.
pub fn send_error(path: &str, message: &str) -> Response {
    let page = format!(
        "<html>\n<body>\n<h1>Error accessing {path}</h1>\n<p>{message}</p>\n</body>\n</html>\n"
    );
    send_content(page, StatusCode::NOT_FOUND)
}
