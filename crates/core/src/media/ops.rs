//! Synchronous conversion operations (probe, excerpt, concatenate).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::invoker::{Invocation, InvokerError, ToolInvoker};
use crate::workspace::{WorkspaceHandle, WorkspaceManager};

use super::config::MediaConfig;
use super::error::MediaError;
use super::types::{AudioFormat, ConversionArtifact, ToolAvailability};

/// Stateless conversion operations built on the invoker and workspace
/// manager. Excerpt and concatenate block their caller for the duration of
/// the external invocation; both are bounded, local, single-pass operations.
pub struct MediaOperations {
    invoker: Arc<dyn ToolInvoker>,
    workspace: Arc<WorkspaceManager>,
    config: MediaConfig,
}

impl MediaOperations {
    pub fn new(
        invoker: Arc<dyn ToolInvoker>,
        workspace: Arc<WorkspaceManager>,
        config: MediaConfig,
    ) -> Self {
        Self {
            invoker,
            workspace,
            config,
        }
    }

    pub fn config(&self) -> &MediaConfig {
        &self.config
    }

    /// Probes the duration of an audio file in seconds using ffprobe.
    pub async fn probe_duration(&self, path: &Path) -> Result<f64, MediaError> {
        self.check_input_readable(path).await?;

        let invocation = probe_invocation(&self.config, path);
        let stdout = self.run_collecting(invocation).await.map_err(|e| {
            MediaError::UnreadableInput {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        stdout
            .iter()
            .find_map(|line| line.trim().parse::<f64>().ok())
            .ok_or_else(|| MediaError::UnreadableInput {
                path: path.to_path_buf(),
                reason: "no duration in probe output".to_string(),
            })
    }

    /// Extracts `[start, end)` seconds of `input` into a new artifact.
    ///
    /// Preconditions: `0 <= start < end <= duration(input)`. The source file
    /// is never mutated; a violated range yields [`MediaError::InvalidRange`]
    /// before any workspace is allocated.
    pub async fn excerpt(
        &self,
        input: &Path,
        start: f64,
        end: f64,
        format: AudioFormat,
    ) -> Result<ConversionArtifact, MediaError> {
        // Static part of the range check needs no probe.
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end <= start {
            return Err(MediaError::InvalidRange {
                start,
                end,
                duration: f64::NAN,
            });
        }

        self.check_recognized(input)?;
        self.check_input_readable(input).await?;

        let duration = self.probe_duration(input).await?;
        if end > duration {
            return Err(MediaError::InvalidRange {
                start,
                end,
                duration,
            });
        }

        let handle = self.workspace.allocate("excerpt").await?;
        let output = handle.path.join(format!("excerpt.{}", format.extension()));
        let invocation = excerpt_invocation(&self.config, input, &output, start, end, format);

        self.run_in_workspace(invocation, &handle).await?;
        let artifact = self
            .finish_artifact(&handle, &output, "excerpt", format)
            .await?;

        info!(
            input = %input.display(),
            start,
            end,
            artifact = %artifact.path.display(),
            "excerpt complete"
        );
        Ok(artifact)
    }

    /// Concatenates `inputs` in order into a single artifact.
    ///
    /// Requires at least two inputs, all readable and of a recognized
    /// format; the check runs before any process invocation. Output
    /// preserves input order.
    pub async fn concatenate(
        &self,
        inputs: &[PathBuf],
        format: AudioFormat,
    ) -> Result<ConversionArtifact, MediaError> {
        if inputs.len() < 2 {
            return Err(MediaError::InsufficientInputs(inputs.len()));
        }
        for input in inputs {
            self.check_recognized(input)?;
            self.check_input_readable(input).await?;
        }

        let handle = self.workspace.allocate("merge").await?;

        let manifest = handle.path.join("concat.txt");
        let manifest_body = concat_manifest(inputs);
        if let Err(e) = tokio::fs::write(&manifest, manifest_body).await {
            self.release_quietly(&handle).await;
            return Err(MediaError::Io(e));
        }

        let output = handle.path.join(format!("merged.{}", format.extension()));
        let invocation = concat_invocation(&self.config, &manifest, &output, format);

        self.run_in_workspace(invocation, &handle).await?;
        let artifact = self
            .finish_artifact(&handle, &output, "merged", format)
            .await?;

        info!(
            inputs = inputs.len(),
            artifact = %artifact.path.display(),
            "concatenate complete"
        );
        Ok(artifact)
    }

    /// Checks which external tools respond to a version probe.
    pub async fn validate_tools(&self) -> ToolAvailability {
        ToolAvailability {
            ffmpeg: self
                .tool_responds(&self.config.ffmpeg_path, "-version")
                .await,
            ffprobe: self
                .tool_responds(&self.config.ffprobe_path, "-version")
                .await,
            ytdlp: self
                .tool_responds(&self.config.ytdlp_path, "--version")
                .await,
        }
    }

    async fn tool_responds(&self, program: &Path, version_flag: &str) -> bool {
        self.invoker
            .run(Invocation::new(program.to_path_buf()).arg(version_flag))
            .await
            .is_ok()
    }

    fn check_recognized(&self, input: &Path) -> Result<(), MediaError> {
        match AudioFormat::from_path(input) {
            Some(_) => Ok(()),
            None => Err(MediaError::UnsupportedFormat(
                input
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("(none)")
                    .to_string(),
            )),
        }
    }

    async fn check_input_readable(&self, input: &Path) -> Result<(), MediaError> {
        let meta =
            tokio::fs::metadata(input)
                .await
                .map_err(|e| MediaError::UnreadableInput {
                    path: input.to_path_buf(),
                    reason: e.to_string(),
                })?;
        if !meta.is_file() {
            return Err(MediaError::UnreadableInput {
                path: input.to_path_buf(),
                reason: "not a regular file".to_string(),
            });
        }
        if meta.len() > self.config.max_input_bytes {
            return Err(MediaError::Validation(format!(
                "input exceeds maximum size of {} bytes",
                self.config.max_input_bytes
            )));
        }
        Ok(())
    }

    /// Runs an invocation, releasing the workspace on failure.
    async fn run_in_workspace(
        &self,
        invocation: Invocation,
        handle: &WorkspaceHandle,
    ) -> Result<(), MediaError> {
        match self.invoker.run(invocation).await {
            Ok(outcome) => {
                debug!(elapsed_ms = outcome.elapsed.as_millis() as u64, "tool finished");
                Ok(())
            }
            Err(e) => {
                self.release_quietly(handle).await;
                Err(e.into())
            }
        }
    }

    /// Promotes the output out of the workspace and releases the scratch dir.
    async fn finish_artifact(
        &self,
        handle: &WorkspaceHandle,
        output: &Path,
        stem: &str,
        format: AudioFormat,
    ) -> Result<ConversionArtifact, MediaError> {
        let size_bytes = match tokio::fs::metadata(output).await {
            Ok(meta) => meta.len(),
            Err(_) => {
                let path = output.to_path_buf();
                self.release_quietly(handle).await;
                return Err(MediaError::MissingOutput { path });
            }
        };

        let dest_filename = format!(
            "{}_{}_{}.{}",
            stem,
            chrono::Utc::now().format("%Y%m%d_%H%M%S"),
            &uuid::Uuid::new_v4().to_string()[..8],
            format.extension()
        );

        let promoted = match self.workspace.promote(output, &dest_filename).await {
            Ok(path) => path,
            Err(e) => {
                self.release_quietly(handle).await;
                return Err(e.into());
            }
        };
        self.release_quietly(handle).await;

        Ok(ConversionArtifact {
            path: promoted,
            size_bytes,
            format,
        })
    }

    async fn release_quietly(&self, handle: &WorkspaceHandle) {
        if let Err(e) = self.workspace.release(handle).await {
            warn!(workspace = %handle.path.display(), "workspace release failed: {}", e);
        }
    }

    async fn run_collecting(&self, invocation: Invocation) -> Result<Vec<String>, InvokerError> {
        let (tx, mut rx) = mpsc::channel(16);
        let collect = async {
            let mut lines = Vec::new();
            while let Some(line) = rx.recv().await {
                lines.push(line);
            }
            lines
        };
        let (result, lines) = tokio::join!(self.invoker.run_streaming(invocation, tx), collect);
        result.map(|_| lines)
    }
}

/// ffprobe invocation printing only the container duration.
fn probe_invocation(config: &MediaConfig, input: &Path) -> Invocation {
    Invocation::new(config.ffprobe_path.clone()).args([
        "-v".to_string(),
        "error".to_string(),
        "-show_entries".to_string(),
        "format=duration".to_string(),
        "-of".to_string(),
        "default=noprint_wrappers=1:nokey=1".to_string(),
        input.to_string_lossy().to_string(),
    ])
}

/// ffmpeg invocation trimming `[start, end)` of `input` into `output`.
fn excerpt_invocation(
    config: &MediaConfig,
    input: &Path,
    output: &Path,
    start: f64,
    end: f64,
    format: AudioFormat,
) -> Invocation {
    let mut args = vec![
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-ss".to_string(),
        format!("{start}"),
        "-t".to_string(),
        format!("{}", end - start),
        "-c:a".to_string(),
        format.ffmpeg_codec().to_string(),
    ];
    if format.is_lossy() {
        args.extend(["-b:a".to_string(), format!("{}k", config.bitrate_kbps)]);
    }
    args.extend([
        "-y".to_string(),
        output.to_string_lossy().to_string(),
    ]);
    Invocation::new(config.ffmpeg_path.clone()).args(args)
}

/// ffmpeg concat-demuxer invocation merging the manifest into `output`.
fn concat_invocation(
    config: &MediaConfig,
    manifest: &Path,
    output: &Path,
    format: AudioFormat,
) -> Invocation {
    let mut args = vec![
        "-f".to_string(),
        "concat".to_string(),
        "-safe".to_string(),
        "0".to_string(),
        "-i".to_string(),
        manifest.to_string_lossy().to_string(),
        "-c:a".to_string(),
        format.ffmpeg_codec().to_string(),
    ];
    if format.is_lossy() {
        args.extend(["-b:a".to_string(), format!("{}k", config.bitrate_kbps)]);
    }
    args.extend([
        "-y".to_string(),
        output.to_string_lossy().to_string(),
    ]);
    Invocation::new(config.ffmpeg_path.clone()).args(args)
}

/// Builds the concat-demuxer manifest, one `file '...'` line per input in
/// order. Single quotes in paths are escaped the way the demuxer expects.
fn concat_manifest(inputs: &[PathBuf]) -> String {
    let mut body = String::new();
    for input in inputs {
        let escaped = input.to_string_lossy().replace('\'', "'\\''");
        body.push_str(&format!("file '{}'\n", escaped));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MediaConfig {
        MediaConfig::default()
    }

    #[test]
    fn test_probe_invocation_args() {
        let invocation = probe_invocation(&config(), Path::new("/audio/in.mp3"));
        assert_eq!(invocation.program, PathBuf::from("ffprobe"));
        assert!(invocation.args.contains(&"format=duration".to_string()));
        assert_eq!(invocation.args.last().unwrap(), "/audio/in.mp3");
    }

    #[test]
    fn test_excerpt_invocation_args() {
        let invocation = excerpt_invocation(
            &config(),
            Path::new("/audio/in.mp3"),
            Path::new("/ws/excerpt.mp3"),
            5.0,
            12.5,
            AudioFormat::Mp3,
        );
        let args = &invocation.args;
        assert!(args.contains(&"-ss".to_string()));
        assert!(args.contains(&"5".to_string()));
        assert!(args.contains(&"-t".to_string()));
        assert!(args.contains(&"7.5".to_string()));
        assert!(args.contains(&"libmp3lame".to_string()));
        assert!(args.contains(&"192k".to_string()));
        assert_eq!(args.last().unwrap(), "/ws/excerpt.mp3");
    }

    #[test]
    fn test_excerpt_invocation_wav_has_no_bitrate() {
        let invocation = excerpt_invocation(
            &config(),
            Path::new("/a.wav"),
            Path::new("/ws/excerpt.wav"),
            0.0,
            1.0,
            AudioFormat::Wav,
        );
        assert!(invocation.args.contains(&"pcm_s16le".to_string()));
        assert!(!invocation.args.contains(&"-b:a".to_string()));
    }

    #[test]
    fn test_concat_invocation_args() {
        let invocation = concat_invocation(
            &config(),
            Path::new("/ws/concat.txt"),
            Path::new("/ws/merged.mp3"),
            AudioFormat::Mp3,
        );
        let args = &invocation.args;
        assert!(args.contains(&"concat".to_string()));
        assert!(args.contains(&"-safe".to_string()));
        assert!(args.contains(&"/ws/concat.txt".to_string()));
        assert_eq!(args.last().unwrap(), "/ws/merged.mp3");
    }

    #[test]
    fn test_concat_manifest_preserves_order_and_escapes() {
        let inputs = vec![
            PathBuf::from("/music/first.mp3"),
            PathBuf::from("/music/it's here.ogg"),
        ];
        let manifest = concat_manifest(&inputs);
        let lines: Vec<&str> = manifest.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "file '/music/first.mp3'");
        assert_eq!(lines[1], "file '/music/it'\\''s here.ogg'");
    }
}
