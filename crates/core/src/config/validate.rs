use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Audio bitrate is within the usable MP3 range
/// - Retention sweep interval is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.media.bitrate_kbps < 32 || config.media.bitrate_kbps > 320 {
        return Err(ConfigError::ValidationError(format!(
            "media.bitrate_kbps must be between 32 and 320, got {}",
            config.media.bitrate_kbps
        )));
    }

    if config.media.max_input_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "media.max_input_bytes cannot be 0".to_string(),
        ));
    }

    if config.jobs.sweep_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "jobs.sweep_interval_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
