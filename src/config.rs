use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::judge::gemini::{GeminiOptions, DEFAULT_GEMINI_API_URL, DEFAULT_GEMINI_MODEL};
use crate::judge::retry::RetryPolicy;
use crate::topics::ctfidf::KeywordTopicModel;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Central configuration loaded from environment variables.
///
/// All secrets come from env vars (never hardcoded). The .env file
/// is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory holding one subdirectory per ONNX model
    pub model_dir: PathBuf,
    /// Gemini API key. Empty means the AI judge is unconfigured.
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub judge_model: String,
    pub judge_timeout: Duration,
    pub judge_max_retries: u32,
    /// Requests per second to the LLM service; 0 disables pacing
    pub judge_rps: f64,
    pub topic_top_n: usize,
    pub topic_merge_threshold: f64,
    pub topic_min_vocabulary: usize,
    /// GitHub REST endpoint for the README generator
    pub github_api_url: String,
    pub github_token: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default. A numeric variable that is set but does not
    /// parse is an error naming the variable.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let model_dir = lookup("LECTERN_MODEL_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(crate::models::download::default_model_dir);

        Ok(Self {
            model_dir,
            gemini_api_key: lookup("GEMINI_API_KEY").unwrap_or_default().trim().to_string(),
            gemini_api_url: text("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            judge_model: text("LECTERN_JUDGE_MODEL", DEFAULT_GEMINI_MODEL),
            judge_timeout: Duration::from_secs(parse_var(&lookup, "LECTERN_JUDGE_TIMEOUT_SECS", 60)?),
            judge_max_retries: parse_var(&lookup, "LECTERN_JUDGE_MAX_RETRIES", 2)?,
            judge_rps: parse_rate(&lookup, "LECTERN_JUDGE_RPS", 1.0)?,
            topic_top_n: parse_var(&lookup, "LECTERN_TOPIC_TOP_N", 10)?,
            topic_merge_threshold: parse_var(&lookup, "LECTERN_TOPIC_MERGE_THRESHOLD", 0.5)?,
            topic_min_vocabulary: parse_var(&lookup, "LECTERN_TOPIC_MIN_VOCABULARY", 3)?,
            github_api_url: text("GITHUB_API_URL", DEFAULT_GITHUB_API_URL),
            github_token: lookup("GITHUB_TOKEN").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Check that a Gemini API key is configured.
    /// Call this before any operation that cannot run without the LLM.
    pub fn require_judge(&self) -> Result<()> {
        if self.gemini_api_key.is_empty() {
            anyhow::bail!(
                "GEMINI_API_KEY not set. Add it to your .env file.\n\
                 Without it the AI judge reports an error entry and `generate` is unavailable."
            );
        }
        Ok(())
    }

    /// Check that both ONNX models have been downloaded.
    pub fn require_models(&self) -> Result<()> {
        use crate::models::download::{embedding_files_present, ner_files_present};

        if !embedding_files_present(&self.model_dir) || !ner_files_present(&self.model_dir) {
            anyhow::bail!(
                "ONNX model files not found in {}\n\
                 Run `lectern download-models` to download them.",
                self.model_dir.display()
            );
        }
        Ok(())
    }

    pub fn gemini_options(&self) -> GeminiOptions {
        GeminiOptions {
            api_key: self.gemini_api_key.clone(),
            base_url: self.gemini_api_url.clone(),
            model: self.judge_model.clone(),
            timeout: self.judge_timeout,
            retry: RetryPolicy {
                max_retries: self.judge_max_retries,
                ..RetryPolicy::default()
            },
            requests_per_second: self.judge_rps,
        }
    }

    pub fn topic_model(&self) -> KeywordTopicModel {
        let mut model = KeywordTopicModel::default();
        model.top_n_words = self.topic_top_n;
        model.merge_threshold = self.topic_merge_threshold;
        model.min_vocabulary = self.topic_min_vocabulary;
        model
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        _ => Ok(default),
    }
}

/// A request rate: finite and not negative. Zero disables pacing.
fn parse_rate(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: f64) -> Result<f64> {
    let rate: f64 = parse_var(lookup, name, default)?;
    if !rate.is_finite() || rate < 0.0 {
        anyhow::bail!("Invalid value for {name}: {rate} (expected a rate >= 0)");
    }
    Ok(rate)
}
