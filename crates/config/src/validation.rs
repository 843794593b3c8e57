//! Configuration validation
//!
//! Cross-section checks that cannot be expressed through serde defaults.

use crate::error::{ConfigError, Result};
use crate::Config;

/// Validate a parsed configuration
///
/// Checks for:
/// - Non-zero recent-lines snapshot size
/// - Non-zero poll interval and probe period
/// - Non-zero subscriber limits and queue depth
/// - Port conflict between the stream and http servers
pub fn validate_config(config: &Config) -> Result<()> {
    if config.tail.path.is_empty() {
        return Err(ConfigError::invalid_value(
            "tail",
            "path",
            "must not be empty",
        ));
    }

    if config.tail.recent_lines == 0 {
        return Err(ConfigError::invalid_value(
            "tail",
            "recent_lines",
            "must be greater than zero",
        ));
    }

    if config.tail.poll_interval.is_zero() {
        return Err(ConfigError::invalid_value(
            "tail",
            "poll_interval",
            "must be greater than zero",
        ));
    }

    if config.stream.probe_period.is_zero() {
        return Err(ConfigError::invalid_value(
            "stream",
            "probe_period",
            "must be greater than zero",
        ));
    }

    if config.stream.send_timeout.is_zero() {
        return Err(ConfigError::invalid_value(
            "stream",
            "send_timeout",
            "must be greater than zero",
        ));
    }

    if config.stream.max_subscribers == 0 {
        return Err(ConfigError::invalid_value(
            "stream",
            "max_subscribers",
            "must be greater than zero",
        ));
    }

    if config.stream.queue_size == 0 {
        return Err(ConfigError::invalid_value(
            "stream",
            "queue_size",
            "must be greater than zero",
        ));
    }

    if config.http.enabled && config.http.port == config.stream.port {
        return Err(ConfigError::DuplicatePort {
            port: config.stream.port,
        });
    }

    Ok(())
}
