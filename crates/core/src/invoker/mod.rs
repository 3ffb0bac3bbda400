//! External process invocation.
//!
//! Media tools (ffmpeg, ffprobe, yt-dlp) are invoked through the
//! [`ToolInvoker`] trait with a typed argument list, never a shell string.
//! Stdout is streamed line-by-line to an optional channel so callers can
//! derive progress without buffering the whole output; stderr is captured
//! as a bounded tail for diagnostics. Invocation is single-attempt: retry
//! policy, if any, belongs to the caller.

mod error;
mod system;
mod traits;
mod types;

pub use error::InvokerError;
pub use system::SystemInvoker;
pub use traits::ToolInvoker;
pub use types::{Invocation, Outcome, STDERR_TAIL_BYTES};
