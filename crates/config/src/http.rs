//! HTTP page server configuration

use serde::Deserialize;

/// HTTP page server configuration
///
/// Serves the operator-facing live-tail page and the health endpoint.
/// Disable it when running headless; the stream server is unaffected.
///
/// # Example
///
/// ```toml
/// [http]
/// enabled = true
/// address = "0.0.0.0"
/// port = 5000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Enable the page server
    /// Default: true
    pub enabled: bool,

    /// Bind address
    /// Default: "0.0.0.0"
    pub address: String,

    /// Listen port
    /// Default: 5000
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            address: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

impl HttpConfig {
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
        let config = HttpConfig::default();
        assert!(config.enabled);
        assert_eq!(config.port, 5000);
        assert_eq!(config.bind_address(), "0.0.0.0:5000");
    }

    #[test]
    fn test_deserialize_disabled() {
        let config: HttpConfig = toml::from_str("enabled = false").unwrap();
        assert!(!config.enabled);
    }
}
