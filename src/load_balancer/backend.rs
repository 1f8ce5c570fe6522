//! Backend identity.
//!
//! # Responsibilities
//! - Represent a single backend server by its `host:port` address
//! - Build the outbound base URL for that backend
//!
//! Addresses are opaque to the pool: two entries with the same text are the
//! same backend for failure counting, and nothing here enforces uniqueness.

use std::fmt;
use std::sync::Arc;

/// A backend address in `host:port` form, without a scheme.
///
/// Cheap to clone; the string is shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BackendAddress(Arc<str>);

impl BackendAddress {
    /// Create a backend address from raw text.
    pub fn new(addr: impl AsRef<str>) -> Self {
        Self(Arc::from(addr.as_ref()))
    }

    /// The raw `host:port` text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Absolute `http://` URI for a path-and-query on this backend.
    pub fn uri_for(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.0, path_and_query)
    }
}

impl fmt::Display for BackendAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BackendAddress {
    fn from(addr: &str) -> Self {
        Self::new(addr)
    }
}

impl From<String> for BackendAddress {
    fn from(addr: String) -> Self {
        Self(Arc::from(addr))
    }
}

impl AsRef<str> for BackendAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
