//! Media tooling configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the external media tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to the ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Path to the ffprobe binary.
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,

    /// Path to the yt-dlp binary.
    #[serde(default = "default_ytdlp_path")]
    pub ytdlp_path: PathBuf,

    /// Output bitrate for lossy encodes, in kbps.
    #[serde(default = "default_bitrate")]
    pub bitrate_kbps: u32,

    /// Maximum accepted input file size in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,

    /// Kill a tool invocation after this many seconds. 0 means unbounded:
    /// the wait is only limited by the tool's own behavior.
    #[serde(default)]
    pub tool_timeout_secs: u64,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_ytdlp_path() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_bitrate() -> u32 {
    192
}

fn default_max_input_bytes() -> u64 {
    100 * 1024 * 1024 // 100MB
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            ytdlp_path: default_ytdlp_path(),
            bitrate_kbps: default_bitrate(),
            max_input_bytes: default_max_input_bytes(),
            tool_timeout_secs: 0,
        }
    }
}

impl MediaConfig {
    /// Invocation timeout, `None` when unbounded.
    pub fn tool_timeout(&self) -> Option<std::time::Duration> {
        if self.tool_timeout_secs == 0 {
            None
        } else {
            Some(std::time::Duration::from_secs(self.tool_timeout_secs))
        }
    }
}
