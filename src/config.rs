//! Service configuration.
//!
//! Configuration is an explicit value handed into [`start_server`]; there is
//! no process-wide config singleton. Values come from an optional
//! `regserve.toml`/`regserve.yaml` file overridden by `REGSERVE__*`
//! environment variables.
//!
//! [`start_server`]: crate::server::start_server

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Service name used in logs and the informational route.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Host part of the listening address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Listening port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Frontend origin for CORS. Named explicitly because CORS requires
    /// so; `*` allows any origin.
    #[serde(default = "default_frontend_origin")]
    pub frontend_origin: String,

    /// Registry extract files loaded into the index at startup.
    #[serde(default)]
    pub data_files: Vec<PathBuf>,

    /// Log filter (tracing env-filter syntax).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            frontend_origin: default_frontend_origin(),
            data_files: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from an optional config file plus environment
    /// overrides, then validate it.
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("regserve").required(false))
            .add_source(
                config::Environment::with_prefix("REGSERVE")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("data_files"),
            );

        let config: ServerConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly serve.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.bind_addr.is_empty() {
            anyhow::bail!("config requires a non-empty bind_addr");
        }
        if self.port == 0 {
            anyhow::bail!("config requires a positive port");
        }
        if self.frontend_origin.is_empty() {
            anyhow::bail!("config requires a frontend origin ('*' to allow all)");
        }
        Ok(())
    }

    /// The socket address to bind to.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr.parse()?)
    }

    /// Request timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_app_name() -> String {
    "regserve".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_frontend_origin() -> String {
    // Allow access from all sites until a frontend is pinned down.
    "*".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.bind_addr, "0.0.0.0");
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.frontend_origin, "*");
        assert!(cfg.data_files.is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 9000);
    }

    #[test]
    fn test_validate_rejects_empty_bind_addr() {
        let cfg = ServerConfig {
            bind_addr: String::new(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let cfg = ServerConfig {
            port: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
