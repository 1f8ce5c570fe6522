//! reverse-lb: round-robin reverse proxy load balancer.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌─────────┐    ┌────────────┐    ┌──────────────┐
//!     ──────────────────▶│  http   │───▶│ forwarding │───▶│ backend pool │
//!                        │ server  │    │   engine   │◀───│ current()    │
//!                        └─────────┘    └─────┬──────┘    └──────────────┘
//!                             ▲               │ outbound call (3s deadline)
//!     Client Response         │               ▼
//!     ◀───────────────────────┴──────── backend server
//!
//!     engine ──▶ report_success / report_failure / advance ──▶ pool
//!     engine ──▶ events ──▶ observability (tracing, metrics)
//! ```

use std::path::PathBuf;

use clap::Parser;

use reverse_lb::config::{read_config, ProxyConfig};
use reverse_lb::lifecycle::{self, signals, Shutdown};
use reverse_lb::observability::logging;

const ABOUT: &str = "\
Round-robin reverse proxy load balancer.

Every request is forwarded to the next backend in a fixed rotation and the
backend's response is relayed back. A backend that fails three requests in a
row (refused, timed out, or unreadable response) is dropped from the rotation
until the load balancer is restarted.

Backends are listed as host:port without a scheme, either in the config file
(`servers = [...]`) or with repeated --server flags.";

#[derive(Parser)]
#[command(
    name = "reverse-lb",
    version,
    about = "Round-robin reverse proxy load balancer",
    long_about = ABOUT
)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Listen address, overriding the config file.
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,

    /// Backend address; repeat for several. Replaces the configured list.
    #[arg(short = 's', long = "server", value_name = "HOST:PORT")]
    servers: Vec<String>,

    /// Backend deadline in milliseconds, overriding the config file.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut ProxyConfig) {
        if let Some(bind) = &self.bind {
            config.listener.bind_address = bind.clone();
        }
        if !self.servers.is_empty() {
            config.servers = self.servers.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.forwarding.timeout_ms = timeout_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => read_config(path)?,
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);

    logging::init_logging(&config.observability)?;
    tracing::info!("reverse-lb v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        trigger.trigger();
    });

    if let Err(e) = lifecycle::run(config, &shutdown).await {
        tracing::error!(error = %e, "Load balancer stopped");
        return Err(e.into());
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
