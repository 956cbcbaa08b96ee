//! Script execution responder.
//!
//! # Responsibilities
//! - Run a script file as a child process
//! - Capture its standard output as the response body
//! - Bound the run with a timeout
//!
//! # Design Decisions
//! - Output is opaque bytes; the script cannot set status or headers
//! - Standard error is discarded, standard input is closed
//! - The child is killed if the timeout fires or the request is dropped
//! - A non-zero exit status is a failure, not a page

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::Response;
use tokio::process::Command;
use tokio::time::timeout;

use crate::config::ScriptConfig;
use crate::error::{ScriptFailure, ServeError};
use crate::http::response::send_content;
use crate::observability::metrics;

/// Runs scripts with a configured interpreter and deadline.
#[derive(Debug, Clone)]
pub struct ScriptRunner {
    interpreter: Option<String>,
    timeout: Duration,
}

impl ScriptRunner {
    pub fn new(interpreter: Option<String>, timeout: Duration) -> Self {
        Self {
            interpreter,
            timeout,
        }
    }

    /// An empty interpreter runs the script itself.
    pub fn from_config(config: &ScriptConfig) -> Self {
        Self::new(
            config.interpreter.clone().filter(|program| !program.is_empty()),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Run `script` and send its standard output with status 200.
    pub async fn respond(&self, script: &Path) -> Result<Response, ServeError> {
        match self.run(script).await {
            Ok(output) => {
                metrics::record_script_run("success");
                tracing::debug!(path = %script.display(), bytes = output.len(), "Script finished");
                Ok(send_content(output, StatusCode::OK))
            }
            Err(reason) => {
                metrics::record_script_run(reason.outcome());
                Err(ServeError::ExecutionFailure {
                    path: script.to_path_buf(),
                    reason,
                })
            }
        }
    }

    async fn run(&self, script: &Path) -> Result<Vec<u8>, ScriptFailure> {
        let mut command = match &self.interpreter {
            Some(interpreter) => {
                let mut command = Command::new(interpreter);
                command.arg(script);
                command
            }
            None => Command::new(script),
        };
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = command.spawn().map_err(ScriptFailure::Spawn)?;

        // Dropping the pending wait drops the child, which kills it.
        let output = timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| ScriptFailure::Timeout(self.timeout))?
            .map_err(ScriptFailure::Io)?;

        if !output.status.success() {
            return Err(ScriptFailure::Exit(output.status));
        }
        Ok(output.stdout)
    }
}
