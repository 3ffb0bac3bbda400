//! System invoker backed by `tokio::process`.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::debug;

use super::error::InvokerError;
use super::traits::ToolInvoker;
use super::types::{Invocation, Outcome, STDERR_TAIL_BYTES};

/// Invoker that spawns real child processes.
pub struct SystemInvoker {
    /// Kill the child after this long. `None` means unbounded wait.
    timeout: Option<Duration>,
}

impl SystemInvoker {
    /// Creates an invoker with no timeout.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Creates an invoker that kills invocations after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    async fn execute(
        &self,
        invocation: Invocation,
        lines: Option<mpsc::Sender<String>>,
    ) -> Result<Outcome, InvokerError> {
        let start = Instant::now();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref dir) = invocation.workdir {
            cmd.current_dir(dir);
        }

        debug!(program = %invocation.program.display(), args = ?invocation.args, "spawning tool");

        let mut child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InvokerError::ToolNotFound {
                    program: invocation.program.clone(),
                }
            } else {
                InvokerError::Io(e)
            }
        })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            InvokerError::Io(std::io::Error::other("child stdout not captured"))
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            InvokerError::Io(std::io::Error::other("child stderr not captured"))
        })?;

        // Drain stderr concurrently, keeping only a bounded tail.
        let stderr_task = tokio::spawn(async move {
            let mut reader = BufReader::new(stderr).lines();
            let mut tail: VecDeque<String> = VecDeque::new();
            let mut tail_len = 0usize;
            while let Ok(Some(line)) = reader.next_line().await {
                tail_len += line.len() + 1;
                tail.push_back(line);
                while tail_len > STDERR_TAIL_BYTES {
                    if let Some(dropped) = tail.pop_front() {
                        tail_len -= dropped.len() + 1;
                    } else {
                        break;
                    }
                }
            }
            tail.into_iter().collect::<Vec<_>>().join("\n")
        });

        let wait = async {
            let mut reader = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                if let Some(ref tx) = lines {
                    // Receiver may be gone; keep draining so the child
                    // never blocks on a full pipe.
                    let _ = tx.send(line).await;
                }
            }
            child.wait().await
        };

        let status = match self.timeout {
            Some(limit) => match timeout(limit, wait).await {
                Ok(status) => status?,
                Err(_) => {
                    let _ = child.kill().await;
                    return Err(InvokerError::Timeout {
                        program: invocation.program.clone(),
                        timeout_secs: limit.as_secs(),
                    });
                }
            },
            None => wait.await?,
        };

        let stderr_tail = stderr_task.await.unwrap_or_default();
        let elapsed = start.elapsed();

        if !status.success() {
            return Err(InvokerError::ToolFailure {
                program: invocation.program,
                exit_code: status.code(),
                stderr_tail,
            });
        }

        Ok(Outcome {
            exit_code: status.code().unwrap_or(0),
            stderr_tail,
            elapsed,
        })
    }
}

impl Default for SystemInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolInvoker for SystemInvoker {
    async fn run(&self, invocation: Invocation) -> Result<Outcome, InvokerError> {
        self.execute(invocation, None).await
    }

    async fn run_streaming(
        &self,
        invocation: Invocation,
        lines: mpsc::Sender<String>,
    ) -> Result<Outcome, InvokerError> {
        self.execute(invocation, Some(lines)).await
    }
}
