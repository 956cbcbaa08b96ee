//! Failure taxonomy for request handling.
//!
//! Every failure an action can raise is a [`ServeError`]. The dispatcher is
//! the single place that catches them and turns them into the error page.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while classifying or answering a request.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The resolved path does not exist.
    #[error("'{path}' not found")]
    NotFound { path: String },

    /// The resolved path exists but no case claimed it.
    #[error("Unknown object '{path}'")]
    UnknownObject { path: String },

    /// A file that was classified as readable could not be read.
    #[error("'{}' cannot be read: {source}", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A directory could not be enumerated. Named by request path.
    #[error("'{path}' cannot be listed: {source}")]
    ListFailure {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A script could not be run to completion.
    #[error("'{}' failed to run: {reason}", .path.display())]
    ExecutionFailure {
        path: PathBuf,
        #[source]
        reason: ScriptFailure,
    },

    /// The request path would leave the served directory.
    #[error("'{path}' is outside the served directory")]
    PathEscape { path: String },

    /// An action panicked.
    #[error("'{path}' failed unexpectedly: {detail}")]
    Internal { path: String, detail: String },
}

impl ServeError {
    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ServeError::NotFound { .. } => "not_found",
            ServeError::UnknownObject { .. } => "unknown_object",
            ServeError::ReadFailure { .. } => "read_failure",
            ServeError::ListFailure { .. } => "list_failure",
            ServeError::ExecutionFailure { .. } => "execution_failure",
            ServeError::PathEscape { .. } => "path_escape",
            ServeError::Internal { .. } => "internal",
        }
    }
}

/// Why a script run did not produce output.
#[derive(Debug, Error)]
pub enum ScriptFailure {
    /// The child process could not be started.
    #[error("could not spawn: {0}")]
    Spawn(#[source] std::io::Error),

    /// The child did not finish in time and was killed.
    #[error("timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    /// The child finished with a non-success status.
    #[error("exited with {0}")]
    Exit(ExitStatus),

    /// Collecting the child's output failed.
    #[error("output could not be collected: {0}")]
    Io(#[source] std::io::Error),
}

impl ScriptFailure {
    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            ScriptFailure::Spawn(_) => "spawn_failed",
            ScriptFailure::Timeout(_) => "timeout",
            ScriptFailure::Exit(_) => "exit_failure",
            ScriptFailure::Io(_) => "io_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_request_path() {
        let err = ServeError::NotFound { path: "/missing/page.html".into() };
        assert_eq!(err.to_string(), "'/missing/page.html' not found");

        let err = ServeError::UnknownObject { path: "/socket".into() };
        assert_eq!(err.to_string(), "Unknown object '/socket'");
    }

    #[test]
    fn read_failure_embeds_cause() {
        let err = ServeError::ReadFailure {
            path: PathBuf::from("/srv/a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("'/srv/a.txt' cannot be read"));
        assert!(msg.contains("denied"));
        assert_eq!(err.kind(), "read_failure");
    }

    #[test]
    fn timeout_reason_is_reported_in_seconds() {
        let err = ServeError::ExecutionFailure {
            path: PathBuf::from("/srv/slow.py"),
            reason: ScriptFailure::Timeout(Duration::from_secs(3)),
        };
        assert!(err.to_string().contains("timed out after 3 seconds"));
    }
}
