//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarding engine
//!     → events.rs (Event handed to an EventSink)
//!     → logging.rs TracingSink (structured log record)
//!     → metrics.rs (event and response counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - The core only emits events; formatting lives here
//! - Every event carries the request id, rendered as hex

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{
    Event, EventKind, EventSink, NullSink, RecordingSink, RequestId, RequestIdGenerator,
};
pub use logging::TracingSink;
