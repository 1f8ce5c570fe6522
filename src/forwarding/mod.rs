//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request (from http::server)
//!     → engine.rs (select backend, dispatch, report outcome)
//!     → upstream.rs (outbound HTTP call)
//!     → error.rs (failure class → caller status)
//!     → Response back to http::server
//! ```
//!
//! # Design Decisions
//! - One attempt per inbound request; the next request is the retry
//! - A single deadline covers the call and the body read
//! - Every failure class is charged to the backend that was selected

pub mod engine;
pub mod error;
pub mod upstream;

pub use engine::{ForwardingEngine, DEFAULT_TIMEOUT};
pub use error::ForwardError;
pub use upstream::{BoxError, HttpUpstream, Upstream};
