//! Progress parsing for yt-dlp output lines.
//!
//! With `--newline` the downloader emits one line per update, e.g.
//! `[download]  42.1% of 3.40MiB at 1.2MiB/s ETA 00:02`, followed by
//! post-processing lines like `[ExtractAudio] Destination: audio.mp3`.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static PERCENT_RE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\[download\]\s+(\d+(?:\.\d+)?)%").ok());

/// A structured progress event derived from one output line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ProgressEvent {
    /// Download percentage in `[0, 100]`.
    Percent(f32),
    /// Downloader finished, audio extraction running.
    PostProcessing,
}

/// Parses one output line into a progress event, if it carries one.
pub(crate) fn parse_line(line: &str) -> Option<ProgressEvent> {
    if let Some(re) = PERCENT_RE.as_ref() {
        if let Some(caps) = re.captures(line) {
            if let Some(value) = caps.get(1).and_then(|m| m.as_str().parse::<f32>().ok()) {
                return Some(ProgressEvent::Percent(value.clamp(0.0, 100.0)));
            }
        }
    }
    if line.starts_with("[ExtractAudio]") || line.starts_with("[ffmpeg]") {
        return Some(ProgressEvent::PostProcessing);
    }
    None
}
