//! Request handling and transformation.
//!
//! # Responsibilities
//! - Rewrite an inbound request to target the selected backend
//! - Copy headers in order, keeping duplicates
//! - Summarize the request for events
//!
//! # Design Decisions
//! - Body is moved through untouched, so it streams to the backend
//! - Inbound `Host` is dropped; the client derives it from the backend authority
//! - Path and query are forwarded; the fragment never reaches a server anyway

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header::HOST, Request};

use crate::load_balancer::BackendAddress;

/// Build the outbound request for `backend` from an inbound request.
pub fn build_outbound(
    backend: &BackendAddress,
    request: Request<Body>,
) -> Result<Request<Body>, axum::http::Error> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    let mut builder = Request::builder()
        .method(parts.method)
        .uri(backend.uri_for(path_and_query));

    for (name, value) in parts.headers.iter() {
        if name == HOST {
            continue;
        }
        builder = builder.header(name, value);
    }

    builder.body(body)
}

/// Peer address recorded by the listener, when it recorded one.
pub fn peer_addr(request: &Request<Body>) -> Option<SocketAddr> {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
}

/// One-line summary: `GET /path (peer)`.
pub fn describe(request: &Request<Body>) -> String {
    let path = request.uri().path();
    match peer_addr(request) {
        Some(peer) => format!("{} {} ({})", request.method(), path, peer),
        None => format!("{} {}", request.method(), path),
    }
}
