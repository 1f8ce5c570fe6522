//! Per-request forwarding.
//!
//! # Algorithm
//! ```text
//! incoming event
//!     → pool.current()            (exhausted → 503, stop)
//!     → build outbound request     (failure → 400)
//!     → send under deadline        (failure → 502, expiry → 504)
//!     → read body under deadline   (failure → 500, expiry → 504)
//!     → report success / failure to the pool
//!     → pool.advance()
//! ```
//!
//! The pool lock is taken only inside the pool's own methods, never while a
//! backend call is in flight.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use tokio::time::{timeout_at, Instant};

use crate::forwarding::error::ForwardError;
use crate::forwarding::upstream::{HttpUpstream, Upstream};
use crate::http::{request, response};
use crate::load_balancer::{BackendAddress, BackendPool, FailureOutcome};
use crate::observability::{Event, EventKind, EventSink, RequestId, RequestIdGenerator};

/// Default deadline for one backend call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Forwards inbound requests to the pool's current backend.
pub struct ForwardingEngine<U = HttpUpstream> {
    pool: Arc<BackendPool>,
    upstream: U,
    sink: Arc<dyn EventSink>,
    timeout: Duration,
    ids: RequestIdGenerator,
}

impl<U: Upstream> ForwardingEngine<U> {
    pub fn new(pool: Arc<BackendPool>, upstream: U, sink: Arc<dyn EventSink>) -> Self {
        Self {
            pool,
            upstream,
            sink,
            timeout: DEFAULT_TIMEOUT,
            ids: RequestIdGenerator::new(),
        }
    }

    /// Override the per-request deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn pool(&self) -> &Arc<BackendPool> {
        &self.pool
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Serve one inbound request. Never fails; errors become responses.
    pub async fn forward(&self, request: Request<Body>) -> Response<Body> {
        let id = self.ids.next_id();
        let summary = request::describe(&request);
        self.emit(EventKind::Incoming, summary.clone(), id);

        let backend = match self.pool.current() {
            Ok(backend) => backend,
            Err(e) => {
                let err = ForwardError::from(e);
                self.emit(EventKind::Error, format!("{}: {}", err, summary), id);
                return response::error_response(&err);
            }
        };

        let result = match self.dispatch(&backend, request).await {
            Ok(reply) => {
                self.pool.report_success(&backend);
                self.emit(
                    EventKind::Success,
                    format!("Succeeded in sending request: {} via {}", summary, backend),
                    id,
                );
                reply
            }
            Err(err) => {
                self.emit(EventKind::Error, format!("{} ({}): {}", backend, summary, err), id);
                if err.counts_against_backend() {
                    if let FailureOutcome::Evicted = self.pool.report_failure(&backend) {
                        self.emit(EventKind::ServerRemoved, backend.to_string(), id);
                    }
                }
                response::error_response(&err)
            }
        };

        self.pool.advance();
        result
    }

    async fn dispatch(
        &self,
        backend: &BackendAddress,
        inbound: Request<Body>,
    ) -> Result<Response<Body>, ForwardError> {
        let outbound = request::build_outbound(backend, inbound)
            .map_err(ForwardError::OutboundConstructionFailed)?;

        let deadline = Instant::now() + self.timeout;
        let reply = timeout_at(deadline, self.upstream.send(outbound))
            .await
            .map_err(|_| ForwardError::OutboundTimedOut(self.timeout))?
            .map_err(ForwardError::OutboundTransportFailed)?;

        let (parts, body) = reply.into_parts();
        let bytes = timeout_at(deadline, axum::body::to_bytes(body, usize::MAX))
            .await
            .map_err(|_| ForwardError::OutboundTimedOut(self.timeout))?
            .map_err(|e| ForwardError::OutboundReadFailed(Box::new(e)))?;

        Ok(response::relay(parts.status, &parts.headers, bytes))
    }

    fn emit(&self, kind: EventKind, description: String, id: RequestId) {
        self.sink.emit(Event::new(kind, description, id));
    }
}
