//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Seed the backend pool and build the forwarding engine
//! - Start the metrics endpoint when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, including an empty server list
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, ConfigError, ObservabilityConfig, ProxyConfig};
use crate::forwarding::{ForwardingEngine, HttpUpstream};
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::load_balancer::{BackendPool, PoolError};
use crate::observability::{metrics, EventSink, TracingSink};

/// Fatal startup or serving failure.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Backend pool: {0}")]
    Pool(#[from] PoolError),
    #[error("Metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
    #[error("Invalid metrics address {address}: {source}")]
    MetricsAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Validate `config` and assemble the server around a fresh pool.
pub fn build_server(
    config: &ProxyConfig,
    sink: Arc<dyn EventSink>,
) -> Result<HttpServer, StartupError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    let seed = config.seed();
    if seed.len() < config.servers.len() {
        tracing::warn!(
            dropped = config.servers.len() - seed.len(),
            "Ignoring blank server entries"
        );
    }
    let pool = Arc::new(BackendPool::new(seed, config.forwarding.failure_threshold)?);

    let backends = pool
        .snapshot()
        .backends
        .iter()
        .map(|b| b.as_str().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    tracing::info!(
        backends = %backends,
        failure_threshold = pool.failure_threshold(),
        "Backend pool ready"
    );
    metrics::record_live_backends(pool.len());

    let engine = ForwardingEngine::new(pool, HttpUpstream::new(), sink)
        .with_timeout(Duration::from_millis(config.forwarding.timeout_ms));
    Ok(HttpServer::new(Arc::new(engine)))
}

fn metrics_address(config: &ObservabilityConfig) -> Result<SocketAddr, StartupError> {
    config
        .metrics_address
        .parse()
        .map_err(|source| StartupError::MetricsAddress {
            address: config.metrics_address.clone(),
            source,
        })
}

/// Run the load balancer until `shutdown` fires.
pub async fn run(config: ProxyConfig, shutdown: &Shutdown) -> Result<(), StartupError> {
    let server = build_server(&config, Arc::new(TracingSink))?;

    if config.observability.metrics_enabled {
        metrics::init_metrics(metrics_address(&config.observability)?)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.listener.bind_address.clone(),
            source,
        })?;

    server
        .run(listener, shutdown.subscribe())
        .await
        .map_err(StartupError::Serve)
}
