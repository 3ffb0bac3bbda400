use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::jobs::JobsConfig;
use crate::media::MediaConfig;
use crate::workspace::WorkspaceConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub jobs: JobsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            workspace: WorkspaceConfig::default(),
            media: MediaConfig::default(),
            jobs: JobsConfig::default(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (filesystem layout and tool paths redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub media: SanitizedMediaConfig,
    pub jobs: JobsConfig,
}

/// Sanitized media config (tool binary locations hidden, only their names shown)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMediaConfig {
    pub ffmpeg: String,
    pub ffprobe: String,
    pub ytdlp: String,
    pub bitrate_kbps: u32,
    pub max_input_bytes: u64,
    pub tool_timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let tool_name = |path: &std::path::Path| {
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        Self {
            server: config.server.clone(),
            media: SanitizedMediaConfig {
                ffmpeg: tool_name(&config.media.ffmpeg_path),
                ffprobe: tool_name(&config.media.ffprobe_path),
                ytdlp: tool_name(&config.media.ytdlp_path),
                bitrate_kbps: config.media.bitrate_kbps,
                max_input_bytes: config.media.max_input_bytes,
                tool_timeout_secs: config.media.tool_timeout_secs,
            },
            jobs: config.jobs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.media.bitrate_kbps, 192);
        assert_eq!(config.jobs.retention_secs, 600);
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[media]
bitrate_kbps = 128
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.media.bitrate_kbps, 128);
        // Untouched sections keep their defaults.
        assert_eq!(config.media.max_input_bytes, 100 * 1024 * 1024);
        assert_eq!(config.jobs.sweep_interval_secs, 30);
    }

    #[test]
    fn test_sanitized_config_hides_tool_paths() {
        let mut config = Config::default();
        config.media.ffmpeg_path = "/opt/tools/bin/ffmpeg".into();
        config.media.ytdlp_path = "/opt/tools/bin/yt-dlp".into();

        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.media.ffmpeg, "ffmpeg");
        assert_eq!(sanitized.media.ytdlp, "yt-dlp");
        assert_eq!(sanitized.server.port, 8080);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("/opt/tools"));
        assert!(!json.contains("workspace"));
    }
}
