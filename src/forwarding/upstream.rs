//! Outbound HTTP transport.
//!
//! The engine only needs "send this request, give me a response". The
//! [`Upstream`] trait is that seam; [`HttpUpstream`] is the real client.

use axum::body::Body;
use axum::http::{Request, Response};
use futures_util::future::BoxFuture;
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

/// Boxed error for transport and body failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Sends a fully built request to a backend.
///
/// The returned response body is read by the caller, so body errors surface
/// separately from transport errors.
pub trait Upstream: Send + Sync {
    fn send(&self, request: Request<Body>) -> BoxFuture<'static, Result<Response<Body>, BoxError>>;
}

/// HTTP/1.1 client backed by `hyper-util`.
#[derive(Clone)]
pub struct HttpUpstream {
    client: Client<HttpConnector, Body>,
}

impl HttpUpstream {
    pub fn new() -> Self {
        let mut connector = HttpConnector::new();
        connector.set_nodelay(true);
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client }
    }
}

impl Default for HttpUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Upstream for HttpUpstream {
    fn send(&self, request: Request<Body>) -> BoxFuture<'static, Result<Response<Body>, BoxError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let response: Response<Incoming> = client.request(request).await?;
            Ok(response.map(Body::new))
        })
    }
}
