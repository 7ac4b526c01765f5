//! Google Gemini client for sentiment classification and summaries.
//!
//! Talks to the public Generative Language REST API. Requires an API key
//! (`GEMINI_API_KEY`); without one every call degrades to a sentinel result
//! and nothing is sent over the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::config::GeminiConfig;
use super::error::LlmError;
use super::prompts::{sentiment_prompt, summary_prompt};
use super::provider::{SentimentProvider, SUMMARY_NO_KEY};
use super::reply::{
    classify_outcome, interpret_response, summary_from_outcome, GenerateContentResponse,
};
use crate::models::SentimentResult;
use crate::utils::char_prefix;

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the `error.message` out of an API error body, or return it whole.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// The part of `text` sent for summarization: its first `max_chars` characters.
fn summary_request_text(text: &str, max_chars: usize) -> &str {
    char_prefix(text, max_chars)
}

/// Gemini client holding its own configuration.
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        if !config.has_api_key() {
            tracing::warn!("GEMINI_API_KEY not found.");
        }

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey)
    }

    fn base_url(&self) -> &str {
        self.config.endpoint.trim_end_matches('/')
    }

    /// Send a single-turn prompt and return the reply text.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url(),
            self.config.model
        );

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!(
                "HTTP {}: {}",
                status,
                api_error_message(&body)
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Unexpected(format!("Failed to decode response: {}", e)))?;

        interpret_response(body)
    }

    /// List models that support `generateContent`.
    pub async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let api_key = self.api_key()?;
        let url = format!("{}/v1beta/models", self.base_url());

        let mut names = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .header("x-goog-api-key", api_key)
                .query(&[("pageSize", "1000")]);
            if let Some(token) = page_token.as_deref() {
                request = request.query(&[("pageToken", token)]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| LlmError::Connection(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::Api(format!(
                    "HTTP {}: {}",
                    status,
                    api_error_message(&body)
                )));
            }

            let page: ModelsResponse = response
                .json()
                .await
                .map_err(|e| LlmError::Parse(e.to_string()))?;

            names.extend(
                page.models
                    .into_iter()
                    .filter(|m| {
                        m.supported_generation_methods
                            .iter()
                            .any(|g| g == "generateContent")
                    })
                    .map(|m| m.name),
            );

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        info!("Found {} generateContent models", names.len());
        Ok(names)
    }
}

#[async_trait]
impl SentimentProvider for GeminiClient {
    fn name(&self) -> &str {
        "Gemini AI"
    }

    async fn analyze_sentiment(&self, text: &str) -> SentimentResult {
        if !self.config.has_api_key() {
            return classify_outcome(Err(LlmError::MissingApiKey));
        }

        debug!("Sending request to Gemini: {}...", char_prefix(text, 50));
        let outcome = self.generate(&sentiment_prompt(text)).await;
        classify_outcome(outcome)
    }

    async fn generate_summary(&self, text: &str) -> String {
        if !self.config.has_api_key() {
            return SUMMARY_NO_KEY.to_string();
        }

        debug!(
            "Requesting summary for text length {}...",
            text.chars().count()
        );
        let truncated = summary_request_text(text, self.config.max_summary_chars);
        summary_from_outcome(self.generate(&summary_prompt(truncated)).await)
    }
}
