//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every backend entry is a bare `host:port`
//! - Validate value ranges (timeout > 0, threshold >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no backend servers configured")]
    NoServers,
    #[error("server '{entry}' is not a host:port address: {reason}")]
    InvalidServer { entry: String, reason: String },
    #[error("{field} '{value}' is not a socket address")]
    InvalidSocketAddr { field: &'static str, value: String },
    #[error("forwarding.timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error("forwarding.failure_threshold must be at least 1")]
    ZeroThreshold,
}

/// Check a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let seed = config.seed();
    if seed.is_empty() {
        errors.push(ValidationError::NoServers);
    }
    for entry in &seed {
        if let Err(reason) = check_server(entry) {
            errors.push(ValidationError::InvalidServer {
                entry: entry.clone(),
                reason,
            });
        }
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidSocketAddr {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidSocketAddr {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.forwarding.timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.forwarding.failure_threshold == 0 {
        errors.push(ValidationError::ZeroThreshold);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_server(entry: &str) -> Result<(), String> {
    if entry.contains("://") {
        return Err("scheme not allowed".to_string());
    }
    let url = Url::parse(&format!("http://{}", entry)).map_err(|e| e.to_string())?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err("missing host".to_string());
    }
    // `Url::port` hides a default port, so look at the raw text.
    let explicit_port = entry
        .rsplit_once(':')
        .is_some_and(|(_, port)| port.parse::<u16>().is_ok());
    if !explicit_port {
        return Err("missing port".to_string());
    }
    if url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
        return Err("unexpected path".to_string());
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err("credentials not allowed".to_string());
    }
    Ok(())
}
