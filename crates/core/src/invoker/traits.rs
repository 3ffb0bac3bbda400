//! Trait definitions for the invoker module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::InvokerError;
use super::types::{Invocation, Outcome};

/// Runs external media tools.
///
/// Implementations must be single-attempt: a failed invocation is reported,
/// never retried. The registry and operations decide what a failure means.
#[async_trait]
pub trait ToolInvoker: Send + Sync {
    /// Runs the tool to completion, discarding stdout.
    ///
    /// Returns `Ok` only for a zero exit code; a non-zero exit maps to
    /// [`InvokerError::ToolFailure`] carrying the bounded stderr tail.
    async fn run(&self, invocation: Invocation) -> Result<Outcome, InvokerError>;

    /// Runs the tool, forwarding each stdout line to `lines` as it arrives.
    ///
    /// The full output is never buffered. If the receiver is dropped the
    /// invocation continues and remaining lines are discarded.
    async fn run_streaming(
        &self,
        invocation: Invocation,
        lines: mpsc::Sender<String>,
    ) -> Result<Outcome, InvokerError>;
}
