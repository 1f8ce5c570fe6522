//! Round-robin reverse proxy load balancer.
//!
//! Requests are forwarded to one backend from a fixed pool in strict
//! rotation. A backend that fails three requests in a row leaves the
//! rotation for good.

pub mod config;
pub mod forwarding;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use forwarding::ForwardingEngine;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::BackendPool;
