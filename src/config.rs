//! Server Configuration
//!
//! Configurable parameters for the responder. Values come from an optional
//! TOML file, overridden by CLI flags; defaults match the classic demo
//! deployment (port 1053, 30-minute TTL, local Redis).

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration for the responder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    // === Network ===

    /// UDP port to listen on (kept as a string so named services resolve
    /// through the usual address lookup)
    pub port: String,

    /// Redis connection URL: address, credentials, and database index,
    /// fixed at startup
    pub redis_url: String,

    // === Responses ===

    /// TTL in seconds stamped on every synthesized record
    pub expiry_secs: u32,

    /// Answer true lookup misses with NXDOMAIN instead of an empty
    /// NOERROR response
    pub nxdomain_on_miss: bool,

    // === Limits ===

    /// Maximum concurrently in-flight request tasks; the receive loop
    /// waits for a free slot past this bound
    pub max_inflight: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: "1053".to_string(),
            redis_url: "redis://127.0.0.1:6379/".to_string(),
            expiry_secs: 1800, // 30 minutes
            nxdomain_on_miss: false,
            max_inflight: 1024,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    // Builder-style methods for CLI overrides; None leaves the value as-is

    pub fn with_port(mut self, port: Option<String>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn with_expiry(mut self, expiry_secs: Option<u32>) -> Self {
        if let Some(expiry_secs) = expiry_secs {
            self.expiry_secs = expiry_secs;
        }
        self
    }

    pub fn with_redis_url(mut self, redis_url: Option<String>) -> Self {
        if let Some(redis_url) = redis_url {
            self.redis_url = redis_url;
        }
        self
    }

    /// The bind-all-interfaces listen address for the configured port
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Validate configuration values
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port.is_empty() {
            anyhow::bail!("port must not be empty");
        }

        if self.expiry_secs == 0 {
            anyhow::bail!("expiry_secs must be greater than zero");
        }

        if self.max_inflight == 0 {
            anyhow::bail!("max_inflight must be greater than zero");
        }

        Ok(())
    }
}
