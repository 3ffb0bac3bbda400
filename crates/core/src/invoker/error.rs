//! Error types for the invoker module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running an external tool.
#[derive(Debug, Error)]
pub enum InvokerError {
    /// The tool binary was not found.
    #[error("tool not found: {}", .program.display())]
    ToolNotFound { program: PathBuf },

    /// The tool exited with a non-zero status.
    #[error("{} failed (exit code {:?}): {}", .program.display(), .exit_code, .stderr_tail)]
    ToolFailure {
        program: PathBuf,
        /// Exit code, `None` when killed by a signal.
        exit_code: Option<i32>,
        /// Bounded stderr tail for diagnostics, never the full output.
        stderr_tail: String,
    },

    /// The invocation exceeded the configured timeout and was killed.
    #[error("{} timed out after {} seconds", .program.display(), .timeout_secs)]
    Timeout {
        program: PathBuf,
        timeout_secs: u64,
    },

    /// I/O error while spawning or reading from the process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
