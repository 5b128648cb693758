//! End-to-end tests for the submission, lookup and stats endpoints.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use password_encoder::config::ServerConfig;
use password_encoder::stats::StatsReport;
use password_encoder::store::compute_digest;
use reqwest::StatusCode;

mod common;

const PASSWORD123: &str =
    "vtTvodT9vZVL03Bdaip4Jw7JpS7Pv7AQxhhir1x2rxdh/+sa72rKG/XQKzeBqoVPq9K2nHkN504X7P7Dy2rEvw==";

#[tokio::test]
async fn digest_released_after_delay() {
    let server = common::start_server(common::fast_config()).await;
    let client = common::client();

    let res = client
        .post(server.url("/hash"))
        .form(&[("password", "password123")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap().trim(), "1");

    let res = client.get(server.url("/hash/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["retry-after"], "1");

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let res = client.get(server.url("/hash/1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap().trim(), PASSWORD123);

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn secret_accepted_from_query_string() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client
        .post(server.url("/hash?password=angryMonkey"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let id: u64 = res.text().await.unwrap().trim().parse().unwrap();
    assert_eq!(id, 1);

    let later = Instant::now() + Duration::from_secs(5);
    assert_eq!(
        server.state.store.retrieve(id, later),
        Some(compute_digest("angryMonkey"))
    );

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn missing_password_is_counted_but_not_stored() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.post(server.url("/hash")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.url("/hash"))
        .form(&[("password", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.text().await.unwrap().trim(), "missing password");

    assert!(server.state.store.is_empty());

    let stats: StatsReport = client
        .get(server.url("/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total, 2);

    client
        .post(server.url("/hash"))
        .form(&[("password", "hunter2")])
        .send()
        .await
        .unwrap();

    let stats: StatsReport = client
        .get(server.url("/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total, 3);
    assert!(stats.average >= 0.0);
    assert_eq!(server.state.store.len(), 1);

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn stats_start_at_zero() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/stats")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json, serde_json::json!({"total": 0, "average": 0.0}));

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/hash/42")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.headers().get("retry-after").is_none());

    for bad in ["abc", "0", "-1"] {
        let res = client
            .get(server.url(&format!("/hash/{bad}")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "id {bad}");
    }

    let res = client
        .get(server.url("/hash/99999999999999999999999"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn duplicate_password_keys_use_first_value_and_count() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client
        .post(server.url("/hash?password=first&password=second"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let id: u64 = res.text().await.unwrap().trim().parse().unwrap();

    let later = Instant::now() + Duration::from_secs(5);
    assert_eq!(
        server.state.store.retrieve(id, later),
        Some(compute_digest("first"))
    );

    // an empty first value hides any later one
    let res = client
        .post(server.url("/hash?password=&password=second"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(server.url("/hash"))
        .form(&[("password", "a"), ("password", "b")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let stats: StatsReport = client
        .get(server.url("/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(server.state.store.len(), 2);

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn concurrent_submissions_get_unique_ids() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let tasks: Vec<_> = (0..50)
        .map(|i| {
            let client = client.clone();
            let url = server.url("/hash");
            tokio::spawn(async move {
                let res = client
                    .post(url)
                    .form(&[("password", format!("secret-{i}"))])
                    .send()
                    .await
                    .unwrap();
                res.text().await.unwrap().trim().parse::<u64>().unwrap()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for task in tasks {
        assert!(ids.insert(task.await.unwrap()));
    }
    assert_eq!(ids, (1..=50).collect::<HashSet<_>>());
    assert_eq!(server.state.stats.snapshot().total_requests, 50);

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn request_id_is_generated_or_propagated() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/stats")).send().await.unwrap();
    let generated = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&generated).is_ok());

    let res = client
        .get(server.url("/stats"))
        .header("x-request-id", "client-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "client-chosen");

    server.coordinator.request_shutdown();
}

#[tokio::test]
async fn unrouted_paths_are_not_found() {
    let server = common::start_server(ServerConfig::default()).await;
    let client = common::client();

    let res = client.get(server.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(res.text().await.unwrap().contains("/nope"));

    server.coordinator.request_shutdown();
}
