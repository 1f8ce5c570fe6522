//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route)
//!     → forwarding engine
//!         → request.rs (rewrite for the selected backend)
//!         → response.rs (relay backend reply or map the error)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use server::{build_router, HttpServer};
