//! Media conversion operations.
//!
//! Three stateless operations built on the invoker and workspace manager:
//!
//! - Excerpt: a bounded time range of an input into a new file (synchronous).
//! - Concatenate: an ordered list of inputs into one output (synchronous).
//! - Fetch-and-transcode: remote reference to a local audio file, always run
//!   inside a job (see [`crate::jobs`]); this module only owns its argument
//!   contract.
//!
//! Preconditions are checked before any process is invoked, and every failure
//! path releases the workspace it allocated.

mod config;
mod error;
mod fetch;
mod ops;
mod types;

pub use config::MediaConfig;
pub use error::MediaError;
pub use fetch::{fetch_invocation, fetched_audio_path};
pub use ops::MediaOperations;
pub use types::{AudioFormat, ConversionArtifact, ToolAvailability};
