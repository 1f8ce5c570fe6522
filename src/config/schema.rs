//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the load
//! balancer. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

use crate::load_balancer::DEFAULT_FAILURE_THRESHOLD;

/// Root configuration for the load balancer.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Ordered backend addresses (`host:port`, no scheme).
    pub servers: Vec<String>,

    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Outbound request and failure policy.
    pub forwarding: ForwardingConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Server entries with blank lines dropped, in configured order.
    pub fn seed(&self) -> Vec<String> {
        self.servers
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Outbound request and failure policy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Deadline for one backend call, body read included, in milliseconds.
    pub timeout_ms: u64,

    /// Consecutive failures that evict a backend.
    pub failure_threshold: u32,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 3_000,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address of the scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "reverse_lb=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
