//! Forwarding error taxonomy and its HTTP mapping.

use std::time::Duration;

use axum::http::StatusCode;
use thiserror::Error;

use crate::forwarding::upstream::BoxError;
use crate::load_balancer::PoolError;

/// Why a request could not be served by a backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// No backend is left in rotation.
    #[error("all servers down")]
    PoolExhausted,

    /// The outbound request could not be built.
    #[error("unable to initialize request to application server: {0}")]
    OutboundConstructionFailed(#[source] axum::http::Error),

    /// Connection refused, reset, or otherwise failed before a response.
    #[error("unable to send request to application server: {0}")]
    OutboundTransportFailed(#[source] BoxError),

    /// The backend did not finish answering before the deadline.
    #[error("application server did not answer within {0:?}")]
    OutboundTimedOut(Duration),

    /// The backend answered but its body could not be read in full.
    #[error("unable to read response from application server: {0}")]
    OutboundReadFailed(#[source] BoxError),
}

impl From<PoolError> for ForwardError {
    fn from(_: PoolError) -> Self {
        ForwardError::PoolExhausted
    }
}

impl ForwardError {
    /// Status returned to the caller.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ForwardError::PoolExhausted => StatusCode::SERVICE_UNAVAILABLE,
            ForwardError::OutboundConstructionFailed(_) => StatusCode::BAD_REQUEST,
            ForwardError::OutboundTransportFailed(_) => StatusCode::BAD_GATEWAY,
            ForwardError::OutboundTimedOut(_) => StatusCode::GATEWAY_TIMEOUT,
            ForwardError::OutboundReadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure is charged to the selected backend.
    pub fn counts_against_backend(&self) -> bool {
        !matches!(self, ForwardError::PoolExhausted)
    }

    /// Short body text for the caller. Internal detail stays in the logs.
    pub fn client_message(&self) -> &'static str {
        match self {
            ForwardError::PoolExhausted => "No backend servers available",
            ForwardError::OutboundConstructionFailed(_) => "Unable to build upstream request",
            ForwardError::OutboundTransportFailed(_) => "Upstream request failed",
            ForwardError::OutboundTimedOut(_) => "Upstream request timed out",
            ForwardError::OutboundReadFailed(_) => "Unable to read upstream response",
        }
    }
}
