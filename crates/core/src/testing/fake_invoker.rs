//! Scripted invoker for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::invoker::{Invocation, InvokerError, Outcome, ToolInvoker};

/// How a scripted response materializes an output file.
#[derive(Debug, Clone)]
pub enum OutputSpec {
    /// Write `content` at the path given by the invocation's last argument
    /// (matches the ffmpeg contract, where the output path comes last).
    LastArg { content: Vec<u8> },
    /// Resolve the yt-dlp `-o` output template by substituting `%(ext)s`
    /// with `ext`, then write `content` there.
    FromTemplate { ext: String, content: Vec<u8> },
}

/// One scripted invocation result.
#[derive(Debug, Clone)]
pub struct FakeResponse {
    kind: ResponseKind,
    stdout_lines: Vec<String>,
    output: Option<OutputSpec>,
    delay: Option<Duration>,
}

#[derive(Debug, Clone)]
enum ResponseKind {
    Success,
    Failure { exit_code: i32, stderr_tail: String },
    NotFound,
}

impl FakeResponse {
    /// Zero exit code, no output lines.
    pub fn success() -> Self {
        Self {
            kind: ResponseKind::Success,
            stdout_lines: Vec::new(),
            output: None,
            delay: None,
        }
    }

    /// Non-zero exit code with a stderr tail.
    pub fn failure(exit_code: i32, stderr_tail: &str) -> Self {
        Self {
            kind: ResponseKind::Failure {
                exit_code,
                stderr_tail: stderr_tail.to_string(),
            },
            stdout_lines: Vec::new(),
            output: None,
            delay: None,
        }
    }

    /// Simulates a missing binary.
    pub fn not_found() -> Self {
        Self {
            kind: ResponseKind::NotFound,
            stdout_lines: Vec::new(),
            output: None,
            delay: None,
        }
    }

    /// Lines streamed to the caller before the invocation resolves.
    pub fn with_stdout_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stdout_lines = lines.into_iter().map(Into::into).collect();
        self
    }

    /// File to create before resolving (only applied on success).
    pub fn with_output(mut self, output: OutputSpec) -> Self {
        self.output = Some(output);
        self
    }

    /// Hold the invocation open for `delay` before resolving.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Invoker that replays scripted responses in submission order and records
/// every invocation it receives. An empty script yields plain successes, so
/// incidental calls (version probes) need no setup.
pub struct FakeInvoker {
    responses: Mutex<VecDeque<FakeResponse>>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queues the next scripted response.
    pub fn push_response(&self, response: FakeResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// All invocations seen so far.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of invocations seen so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_response(&self) -> FakeResponse {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(FakeResponse::success)
    }

    fn resolve_output_path(invocation: &Invocation, spec: &OutputSpec) -> Option<PathBuf> {
        match spec {
            OutputSpec::LastArg { .. } => invocation.args.last().map(PathBuf::from),
            OutputSpec::FromTemplate { ext, .. } => {
                let template_idx = invocation.args.iter().position(|a| a == "-o")? + 1;
                let template = invocation.args.get(template_idx)?;
                Some(PathBuf::from(template.replace("%(ext)s", ext)))
            }
        }
    }

    async fn execute(
        &self,
        invocation: Invocation,
        lines: Option<mpsc::Sender<String>>,
    ) -> Result<Outcome, InvokerError> {
        let response = self.next_response();
        self.calls.lock().unwrap().push(invocation.clone());

        if let Some(delay) = response.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(ref tx) = lines {
            for line in &response.stdout_lines {
                let _ = tx.send(line.clone()).await;
                // Let pollers observe intermediate progress.
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        }

        match response.kind {
            ResponseKind::Success => {
                if let Some(ref spec) = response.output {
                    if let Some(path) = Self::resolve_output_path(&invocation, spec) {
                        let content = match spec {
                            OutputSpec::LastArg { content } => content,
                            OutputSpec::FromTemplate { content, .. } => content,
                        };
                        if let Some(parent) = path.parent() {
                            let _ = tokio::fs::create_dir_all(parent).await;
                        }
                        tokio::fs::write(&path, content).await?;
                    }
                }
                Ok(Outcome {
                    exit_code: 0,
                    stderr_tail: String::new(),
                    elapsed: Duration::from_millis(1),
                })
            }
            ResponseKind::Failure {
                exit_code,
                stderr_tail,
            } => Err(InvokerError::ToolFailure {
                program: invocation.program,
                exit_code: Some(exit_code),
                stderr_tail,
            }),
            ResponseKind::NotFound => Err(InvokerError::ToolNotFound {
                program: invocation.program,
            }),
        }
    }
}

impl Default for FakeInvoker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolInvoker for FakeInvoker {
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
