//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! Request arrives
//!     → pool.rs current() (backend under the cursor)
//!     → forwarding engine dispatches to it
//!     → pool.rs report_success() / report_failure()
//!         - third consecutive failure evicts the backend
//!     → pool.rs advance() (rotate to the next backend)
//! ```
//!
//! # Design Decisions
//! - Pool is the single shared mutable object; one lock guards it
//! - Failure streaks are consecutive and reset on success
//! - Eviction is permanent for the life of the process
//! - Rotation order of surviving backends never changes

pub mod backend;
pub mod pool;

pub use backend::BackendAddress;
pub use pool::{BackendPool, FailureOutcome, PoolError, PoolSnapshot, DEFAULT_FAILURE_THRESHOLD};
