//! Testing utilities and fake implementations for integration tests.
//!
//! The [`FakeInvoker`] stands in for the real tool invoker so job and
//! operation flows can be driven deterministically without ffmpeg or
//! yt-dlp installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use waveforge_core::testing::{FakeInvoker, FakeResponse, OutputSpec};
//!
//! let invoker = FakeInvoker::new();
//! invoker.push_response(
//!     FakeResponse::success()
//!         .with_stdout_lines(["[download] 100% of 3.4MiB"])
//!         .with_output(OutputSpec::FromTemplate {
//!             ext: "mp3".to_string(),
//!             content: b"bytes".to_vec(),
//!         }),
//! );
//! ```

mod fake_invoker;

pub use fake_invoker::{FakeInvoker, FakeResponse, OutputSpec};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::path::{Path, PathBuf};

    /// Writes a small placeholder audio file and returns its path.
    pub fn write_audio_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"RIFF....WAVEfake-audio-payload").expect("write fixture file");
        path
    }

    /// Writes `count` placeholder tracks named `track_<n>.mp3`.
    pub fn write_track_set(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|i| write_audio_file(dir, &format!("track_{i}.mp3")))
            .collect()
    }
}
