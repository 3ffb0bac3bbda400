//! Types for the media operations.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Recognized audio container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Wav,
    Ogg,
    M4a,
}

impl AudioFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Ogg => "ogg",
            Self::M4a => "m4a",
        }
    }

    /// FFmpeg encoder name for this format.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Mp3 => "libmp3lame",
            Self::Wav => "pcm_s16le",
            Self::Ogg => "libvorbis",
            Self::M4a => "aac",
        }
    }

    /// Whether bitrate applies (lossy formats only).
    pub fn is_lossy(&self) -> bool {
        !matches!(self, Self::Wav)
    }

    /// Parses a file extension (case-insensitive) into a recognized format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Recognizes the extension of `path`, if any.
    pub fn from_path(path: &std::path::Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::Mp3
    }
}

/// A finished conversion output, promoted out of its workspace.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionArtifact {
    /// Absolute path of the artifact. Owned by the caller until cleanup.
    pub path: PathBuf,
    /// Artifact size in bytes.
    pub size_bytes: u64,
    /// Container format of the artifact.
    pub format: AudioFormat,
}

/// Availability of the external tools, reported by the health endpoint.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolAvailability {
    pub ffmpeg: bool,
    pub ffprobe: bool,
    pub ytdlp: bool,
}

impl ToolAvailability {
    /// All tools present.
    pub fn all_available(&self) -> bool {
        self.ffmpeg && self.ffprobe && self.ytdlp
    }
}
