//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all forwarding handler
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Stop accepting on shutdown signal

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::forwarding::{ForwardingEngine, HttpUpstream, Upstream};
use crate::observability::metrics;

/// HTTP front end of the load balancer.
pub struct HttpServer {
    router: Router,
    engine: Arc<ForwardingEngine<HttpUpstream>>,
}

impl HttpServer {
    /// Create a server around a forwarding engine.
    pub fn new(engine: Arc<ForwardingEngine<HttpUpstream>>) -> Self {
        let router = build_router(engine.clone());
        Self { router, engine }
    }

    pub fn engine(&self) -> &Arc<ForwardingEngine<HttpUpstream>> {
        &self.engine
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = self.engine.pool().len(),
            timeout_ms = self.engine.timeout().as_millis() as u64,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router: every method and path goes to the engine.
pub fn build_router<U>(engine: Arc<ForwardingEngine<U>>) -> Router
where
    U: Upstream + 'static,
{
    Router::new()
        .route("/", any(proxy_handler::<U>))
        .route("/{*path}", any(proxy_handler::<U>))
        .with_state(engine)
        .layer(TraceLayer::new_for_http())
}

async fn proxy_handler<U>(
    State(engine): State<Arc<ForwardingEngine<U>>>,
    request: Request<Body>,
) -> Response
where
    U: Upstream + 'static,
{
    // Detached so a caller hanging up cannot cancel the outcome report or the advance.
    let forwarding = engine.clone();
    let response = match tokio::spawn(async move { forwarding.forward(request).await }).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Forwarding task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    };
    metrics::record_response(response.status().as_u16());
    metrics::record_live_backends(engine.pool().len());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forwarding::BoxError;
    use crate::load_balancer::BackendPool;
    use crate::observability::NullSink;
    use axum::http::Method;
    use futures_util::future::BoxFuture;
    use tower::ServiceExt;

    /// Answers with the outbound method and URI it was given.
    struct EchoUpstream;

    impl Upstream for EchoUpstream {
        fn send(
            &self,
            request: Request<Body>,
        ) -> BoxFuture<'static, Result<Response<Body>, BoxError>> {
            let echo = format!("{} {}", request.method(), request.uri());
            Box::pin(async move { Ok(Response::new(Body::from(echo))) })
        }
    }

    fn router() -> Router {
        let pool = Arc::new(BackendPool::new(["10.0.0.1:8080"], 3).unwrap());
        build_router(Arc::new(ForwardingEngine::new(pool, EchoUpstream, Arc::new(NullSink))))
    }

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn root_is_forwarded() {
        let (status, body) = call(router(), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "GET http://10.0.0.1:8080/");
    }

    #[tokio::test]
    async fn any_method_and_nested_path_is_forwarded() {
        let (status, body) = call(router(), Method::DELETE, "/deep/nested/path?q=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "DELETE http://10.0.0.1:8080/deep/nested/path?q=1");
    }
}
