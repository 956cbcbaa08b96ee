//! Directory listing responder.
//!
//! Renders the visible children of a directory as an HTML bullet list.
//! Names starting with `.` are hidden. Entries are sorted so the page is
//! stable across filesystems.

use std::path::Path;

use axum::http::StatusCode;
use axum::response::Response;

use crate::error::ServeError;
use crate::http::response::send_content;

/// List `dir` and send the rendered page with status 200.
///
/// Failures name `request_path`, not the location on disk.
pub async fn list_directory(dir: &Path, request_path: &str) -> Result<Response, ServeError> {
    let list_failure = |source| ServeError::ListFailure {
        path: request_path.to_string(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(list_failure)?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(list_failure)? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            names.push(name);
        }
    }
    names.sort();

    tracing::debug!(path = %dir.display(), entries = names.len(), "Listing directory");
    Ok(send_content(render_listing(&names), StatusCode::OK))
}

fn render_listing(names: &[String]) -> String {
    let bullets: Vec<String> = names
        .iter()
        .map(|name| format!("<li>{}</li>", escape_html(name)))
        .collect();
    format!(
        "<html>\n<body>\n<ul>\n{}\n</ul>\n</body>\n</html>\n",
        bullets.join("\n")
    )
}

/// File names come from disk, not from us; keep them from becoming markup.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
