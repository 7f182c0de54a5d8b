//! Completion provider abstraction and implementations.
//!
//! Handlers depend on the `TextProvider` trait only, so the OpenAI backend can
//! be swapped for the mock in tests.

pub mod mock;
pub mod openai;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no completion")]
    EmptyCompletion,
}

/// Result of a single completion call.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    /// Completion text, exactly as returned by the provider.
    pub text: String,

    /// Prompt tokens consumed.
    pub input_tokens: u32,

    /// Completion tokens generated.
    pub output_tokens: u32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
}

/// Sampling parameters shared by every completion call.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<u32>,

    /// Stop sequences.
    pub stop_sequences: Vec<String>,
}

/// Trait for text completion providers (e.g., OpenAI).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Complete a single prompt.
    async fn complete(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Whether the provider is able to serve requests. Must not spend tokens.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
