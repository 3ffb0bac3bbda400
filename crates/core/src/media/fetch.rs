//! Argument contract for the external downloader (yt-dlp).
//!
//! Fetch-and-transcode always runs inside a job; the worker builds its
//! invocation here so the contract stays testable without a process.

use std::path::{Path, PathBuf};

use crate::invoker::Invocation;

use super::config::MediaConfig;

/// Basename used for the fetched audio inside the job workspace.
const FETCH_STEM: &str = "audio";

/// Builds the yt-dlp invocation for fetching `url` into `workspace_dir`.
///
/// The tool downloads the best audio stream, extracts it to mp3 at the
/// configured bitrate, and emits one progress line per update (`--newline`)
/// so the worker can stream percentages.
pub fn fetch_invocation(config: &MediaConfig, url: &str, workspace_dir: &Path) -> Invocation {
    let template = workspace_dir.join(format!("{FETCH_STEM}.%(ext)s"));

    Invocation::new(config.ytdlp_path.clone()).args([
        "-f".to_string(),
        "bestaudio/best".to_string(),
        "-x".to_string(),
        "--audio-format".to_string(),
        "mp3".to_string(),
        "--audio-quality".to_string(),
        format!("{}K", config.bitrate_kbps),
        "--no-playlist".to_string(),
        "--newline".to_string(),
        "--no-colors".to_string(),
        "-o".to_string(),
        template.to_string_lossy().to_string(),
        "--".to_string(),
        url.to_string(),
    ])
}

/// Path where the transcoded audio lands after a successful fetch.
pub fn fetched_audio_path(workspace_dir: &Path) -> PathBuf {
    workspace_dir.join(format!("{FETCH_STEM}.mp3"))
}
