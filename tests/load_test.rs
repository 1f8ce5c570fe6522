//! Load and rotation tests for the load balancer.

use std::collections::HashMap;
use std::time::Instant;

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_round_robin_rotation() {
    let b1 = common::start_mock_backend("b1").await;
    let b2 = common::start_mock_backend("b2").await;
    let b3 = common::start_mock_backend("b3").await;
    let proxy = common::start_proxy(&[b1, b2, b3], 1_000).await;
    let client = common::client();

    let mut seen = Vec::new();
    for _ in 0..7 {
        let res = client.get(proxy.url("/")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        seen.push(res.text().await.unwrap());
    }
    assert_eq!(seen, vec!["b1", "b2", "b3", "b1", "b2", "b3", "b1"]);
}

#[tokio::test]
async fn test_request_reaches_backend_intact() {
    let echo = common::start_echo_backend().await;
    let proxy = common::start_proxy(&[echo], 1_000).await;

    let res = common::client()
        .post(proxy.url("/submit?x=1"))
        .header("x-tag", "one")
        .header("x-tag", "two")
        .body("hello backend")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let echoed = res.text().await.unwrap();
    assert!(echoed.starts_with("POST /submit?x=1 HTTP/1.1\r\n"), "{echoed}");
    let one = echoed.find("x-tag: one").expect("first x-tag missing");
    let two = echoed.find("x-tag: two").expect("second x-tag missing");
    assert!(one < two);
    assert!(echoed.contains(&format!("host: {}", echo)), "{echoed}");
    assert!(echoed.ends_with("hello backend"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_load() {
    let b1 = common::start_mock_backend("b1").await;
    let b2 = common::start_mock_backend("b2").await;
    let b3 = common::start_mock_backend("b3").await;
    let proxy = common::start_proxy(&[b1, b2, b3], 2_000).await;

    let concurrency = 20;
    let requests_per_task = 15;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for _ in 0..concurrency {
        let client = client.clone();
        let url = proxy.url("/");
        tasks.push(tokio::spawn(async move {
            let mut bodies = Vec::new();
            for _ in 0..requests_per_task {
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() {
                        if let Ok(body) = res.text().await {
                            bodies.push(body);
                        }
                    }
                }
            }
            bodies
        }));
    }

    let mut hits: HashMap<String, usize> = HashMap::new();
    for task in tasks {
        for body in task.await.unwrap() {
            *hits.entry(body).or_default() += 1;
        }
    }

    let served: usize = hits.values().sum();
    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Duration:       {:?}", start.elapsed());
    println!("Per backend:    {:?}", hits);
    println!("-------------------------\n");

    assert_eq!(served, total_requests);
    for name in ["b1", "b2", "b3"] {
        assert!(hits.get(name).copied().unwrap_or(0) > 0, "{name} never selected");
    }

    let snapshot = proxy.engine.pool().snapshot();
    assert_eq!(snapshot.backends.len(), 3);
    assert!(snapshot.cursor < 3);
    assert!(snapshot.error_counts.values().all(|&c| c == 0));
}
