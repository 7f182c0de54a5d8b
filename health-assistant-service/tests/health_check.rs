//! End-to-end tests against a spawned application.

mod common;

use common::TestApp;
use health_assistant_service::services::providers::mock::MockTextProvider;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::echo())).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", app.address))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "AI Health Assistant");
}

#[tokio::test]
async fn chat_round_trip_over_http() {
    let app = TestApp::spawn(Arc::new(MockTextProvider::echo())).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/chat", app.address))
        .json(&serde_json::json!({ "message": "sore throat" }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "success");
    assert!(body["response"]
        .as_str()
        .unwrap()
        .contains("For the health condition 'sore throat'"));
}

#[tokio::test]
async fn whitespace_message_is_rejected_over_http() {
    let provider = Arc::new(MockTextProvider::echo());
    let app = TestApp::spawn(provider.clone()).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/chat", app.address))
        .json(&serde_json::json!({ "message": "   " }))
        .timeout(Duration::from_secs(5))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    assert_eq!(provider.calls(), 0);
}
