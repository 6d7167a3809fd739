// Google Gemini implementation of the LanguageModel trait.
//
// Calls `models/{model}:generateContent` with a single user turn and returns
// the concatenated text parts of the first candidate. Every call is paced by
// the rate limiter, bounded by a request timeout, and retried on transient
// failures.
//
// API docs: https://ai.google.dev/api/generate-content

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rate_limiter::RateLimiter;
use super::retry::{with_retry, RetryPolicy, StatusError};
use super::traits::LanguageModel;
use crate::output::truncate_chars;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Connection settings for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiOptions {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub requests_per_second: f64,
}

impl GeminiOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_API_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
            requests_per_second: 1.0,
        }
    }
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: Client,
    options: GeminiOptions,
    rate_limiter: RateLimiter,
}

impl GeminiClient {
    pub fn new(options: GeminiOptions) -> Result<Self> {
        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(concat!("lectern/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(options.requests_per_second),
            options,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.options.base_url.trim_end_matches('/'),
            self.options.model
        )
    }

    async fn generate_once(&self, url: &str, request: &GenerateRequest<'_>) -> Result<String> {
        self.rate_limiter.acquire().await;

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.options.api_key)
            .json(request)
            .send()
            .await
            .context("Failed to call Gemini API")?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::Error::new(StatusError { status, body }))
                .context("Gemini API request was rejected");
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        reply_text(parsed)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        };

        let text = with_retry(&self.options.retry, || self.generate_once(&url, &request)).await?;

        debug!(
            model = %self.options.model,
            reply_chars = text.chars().count(),
            reply_preview = %truncate_chars(&text, 80),
            "Gemini replied"
        );
        Ok(text)
    }
}

/// Concatenate the text parts of the first candidate.
fn reply_text(response: GenerateResponse) -> Result<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        anyhow::bail!("Gemini returned no reply: {reason}");
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok(text)
}

// --- Gemini API request/response types ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}
