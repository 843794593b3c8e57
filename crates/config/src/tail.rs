//! Tail reader configuration
//!
//! Controls which file is tailed and how aggressively it is polled.

use serde::Deserialize;
use std::time::Duration;

/// Default poll interval when the file has no new data (100ms)
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default number of recent lines sent to a new subscriber
const DEFAULT_RECENT_LINES: usize = 10;

/// Tail reader configuration
///
/// The poll interval is a latency/CPU tradeoff: lower values deliver lines
/// sooner at the cost of more wakeups on an idle file.
///
/// # Example
///
/// ```toml
/// [tail]
/// path = "logs/app.log"
/// poll_interval = "100ms"
/// recent_lines = 10
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TailConfig {
    /// Path to the log file to tail
    /// Default: "logs/app.log"
    pub path: String,

    /// Sleep interval between read attempts when no new data is available
    /// Default: 100ms
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,

    /// Number of recent lines replayed to a subscriber at connect time
    /// Default: 10
    pub recent_lines: usize,
}

impl Default for TailConfig {
    fn default() -> Self {
        Self {
            path: "logs/app.log".into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            recent_lines: DEFAULT_RECENT_LINES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TailConfig::default();
        assert_eq!(config.path, "logs/app.log");
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.recent_lines, 10);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: TailConfig = toml::from_str("").unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
path = "/var/log/syslog"
poll_interval = "250ms"
recent_lines = 50
"#;
        let config: TailConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.path, "/var/log/syslog");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.recent_lines, 50);
    }

    #[test]
    fn test_poll_interval_formats() {
        for (s, expected) in [
            ("100ms", Duration::from_millis(100)),
            ("1s", Duration::from_secs(1)),
            ("2m", Duration::from_secs(120)),
        ] {
            let toml = format!("poll_interval = \"{}\"", s);
            let config: TailConfig = toml::from_str(&toml).unwrap();
            assert_eq!(config.poll_interval, expected);
        }
    }
}
