//! Types for the invoker module.

use std::path::PathBuf;
use std::time::Duration;

/// Maximum number of stderr bytes retained for diagnostics.
pub const STDERR_TAIL_BYTES: usize = 4096;

/// A single external tool invocation: program plus typed argument list.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Program to execute (name resolved via PATH, or an absolute path).
    pub program: PathBuf,
    /// Arguments, passed verbatim without shell interpretation.
    pub args: Vec<String>,
    /// Working directory for the child process.
    pub workdir: Option<PathBuf>,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
        }
    }

    /// Appends a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Sets the working directory.
    pub fn workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }
}

/// Result of a successful invocation.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Exit code of the process (0 on this path).
    pub exit_code: i32,
    /// Last [`STDERR_TAIL_BYTES`] of stderr, kept for diagnostics even on
    /// success (tools log warnings there).
    pub stderr_tail: String,
    /// Wall-clock duration of the invocation.
    pub elapsed: Duration,
}
