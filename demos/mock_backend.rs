//! Tiny backend for trying the load balancer by hand.
//!
//! ```text
//! cargo run --example mock_backend -- 8081
//! cargo run --example mock_backend -- 8082
//! cargo run -- -s 127.0.0.1:8081 -s 127.0.0.1:8082
//! curl http://127.0.0.1:8080/
//! ```

use std::net::SocketAddr;

use axum::{extract::Request, Router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let port: u16 = std::env::args()
        .nth(1)
        .map(|p| p.parse())
        .transpose()?
        .unwrap_or(8081);
    let name = format!("backend-{}", port);

    let app = Router::new().fallback(move |req: Request| {
        let name = name.clone();
        async move { format!("{} answered {} {}\n", name, req.method(), req.uri()) }
    });

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    println!("Mock backend listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
