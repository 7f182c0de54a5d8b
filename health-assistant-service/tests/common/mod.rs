#![allow(dead_code)]

use health_assistant_service::config::{AssistantConfig, ObservabilityConfig, OpenAiConfig};
use health_assistant_service::services::TextProvider;
use health_assistant_service::startup::{router, AppState, Application};
use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config(openai_base_url: &str) -> AssistantConfig {
    AssistantConfig {
        common: CoreConfig { port: 0 },
        openai: OpenAiConfig {
            api_key: Secret::new("sk-test".to_string()),
            base_url: openai_base_url.to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            temperature: 0.8,
            max_tokens: 256,
            timeout_secs: 5,
        },
        observability: ObservabilityConfig {
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
    }
}

/// Router backed by `provider`, for in-process `oneshot` tests.
pub fn test_router(provider: Arc<dyn TextProvider>) -> axum::Router {
    router(AppState::new(&test_config("http://127.0.0.1:1/v1"), provider))
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn the full application on a random port.
    pub async fn spawn(provider: Arc<dyn TextProvider>) -> Self {
        let app = Application::build_with_provider(test_config("http://127.0.0.1:1/v1"), provider)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp { address, port }
    }
}
