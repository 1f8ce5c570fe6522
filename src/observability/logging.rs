//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (pretty or JSON output)
//! - Render core events as structured log records
//!
//! # Design Decisions
//! - `RUST_LOG` overrides the configured filter
//! - Failure events log at WARN, evictions at ERROR

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::observability::events::{Event, EventKind, EventSink};
use crate::observability::metrics;

/// Install the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_logging(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
}

/// Event sink backed by `tracing`, with per-kind counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event) {
        let kind = event.kind.as_str();
        let id = event.request_id;
        match event.kind {
            EventKind::Incoming => {
                tracing::info!(kind, id = %id, "{}", event.description)
            }
            EventKind::Success => {
                tracing::info!(kind, id = %id, "{}", event.description)
            }
            EventKind::Error => {
                tracing::warn!(kind, id = %id, "{}", event.description)
            }
            EventKind::ServerRemoved => {
                tracing::error!(
                    kind,
                    id = %id,
                    backend = %event.description,
                    "Backend evicted from rotation"
                )
            }
        }
        metrics::record_event(event.kind);
    }
}
