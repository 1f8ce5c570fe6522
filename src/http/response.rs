//! Response handling and transformation.
//!
//! # Responsibilities
//! - Relay a backend status and body to the caller verbatim
//! - Carry backend headers across, minus hop-by-hop ones
//! - Map forwarding errors to caller-facing responses

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, Response, StatusCode};
use axum::response::IntoResponse;

use crate::forwarding::ForwardError;

/// Headers that describe a single connection and must not be relayed.
/// `content-length` is recomputed from the buffered body.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "transfer-encoding"
            | "upgrade"
            | "te"
            | "trailer"
            | "content-length"
    )
}

/// Build the caller response from a fully read backend response.
pub fn relay(status: StatusCode, headers: &HeaderMap, body: Bytes) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let out = response.headers_mut();
    for (name, value) in headers.iter().filter(|(name, _)| !is_hop_by_hop(name)) {
        out.append(name.clone(), value.clone());
    }
    response
}

/// Caller response for a request that could not be forwarded.
pub fn error_response(err: &ForwardError) -> Response<Body> {
    (err.status_code(), err.client_message()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn relays_status_body_and_end_to_end_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("connection", "close".parse().unwrap());
        headers.insert("content-length", "999".parse().unwrap());
        headers.append("set-cookie", "a=1".parse().unwrap());
        headers.append("set-cookie", "b=2".parse().unwrap());

        let response = relay(StatusCode::CREATED, &headers, Bytes::from_static(b"made"));
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.headers().get("connection").is_none());
        assert!(response.headers().get("content-length").is_none());
        assert_eq!(response.headers().get_all("set-cookie").iter().count(), 2);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"made");
    }

    #[test]
    fn backend_errors_pass_through_unchanged() {
        let response = relay(StatusCode::NOT_FOUND, &HeaderMap::new(), Bytes::new());
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn exhaustion_maps_to_503() {
        let response = error_response(&ForwardError::PoolExhausted);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
