//! Stream server configuration
//!
//! Controls the WebSocket endpoint subscribers connect to, the liveness
//! probe cadence, and the per-subscriber delivery bounds.

use serde::Deserialize;
use std::time::Duration;

/// Default liveness probe period (10s)
const DEFAULT_PROBE_PERIOD: Duration = Duration::from_secs(10);

/// Default bound on a single socket write (5s)
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Default maximum concurrent subscribers
const DEFAULT_MAX_SUBSCRIBERS: usize = 256;

/// Default per-subscriber frame queue depth
const DEFAULT_QUEUE_SIZE: usize = 64;

/// Stream server configuration
///
/// # Example
///
/// ```toml
/// [stream]
/// address = "0.0.0.0"
/// port = 9010
/// probe_period = "10s"
/// send_timeout = "5s"
/// max_subscribers = 256
/// queue_size = 64
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Bind address
    /// Default: "0.0.0.0"
    pub address: String,

    /// Listen port
    /// Default: 9010
    pub port: u16,

    /// Interval between liveness probes
    /// Default: 10s
    #[serde(with = "humantime_serde")]
    pub probe_period: Duration,

    /// Bound on a single frame write; a breach disconnects the subscriber
    /// Default: 5s
    #[serde(with = "humantime_serde")]
    pub send_timeout: Duration,

    /// Maximum concurrent subscribers
    /// Default: 256
    pub max_subscribers: usize,

    /// Per-subscriber frame queue depth; a full queue disconnects the subscriber
    /// Default: 64
    pub queue_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".into(),
            port: 9010,
            probe_period: DEFAULT_PROBE_PERIOD,
            send_timeout: DEFAULT_SEND_TIMEOUT,
            max_subscribers: DEFAULT_MAX_SUBSCRIBERS,
            queue_size: DEFAULT_QUEUE_SIZE,
        }
    }
}

impl StreamConfig {
    /// Get the socket address to bind to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StreamConfig::default();
        assert_eq!(config.port, 9010);
        assert_eq!(config.probe_period, Duration::from_secs(10));
        assert_eq!(config.send_timeout, Duration::from_secs(5));
        assert_eq!(config.max_subscribers, 256);
        assert_eq!(config.queue_size, 64);
    }

    #[test]
    fn test_bind_address() {
        let config = StreamConfig {
            address: "127.0.0.1".into(),
            port: 9999,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:9999");
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
address = "127.0.0.1"
port = 9020
probe_period = "30s"
send_timeout = "1s"
max_subscribers = 8
queue_size = 16
"#;
        let config: StreamConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 9020);
        assert_eq!(config.probe_period, Duration::from_secs(30));
        assert_eq!(config.send_timeout, Duration::from_secs(1));
        assert_eq!(config.max_subscribers, 8);
        assert_eq!(config.queue_size, 16);
    }
}
