use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::error::{PipelineError, Result};

const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
const DEFAULT_MODEL: &str = "deepseek-chat";
const DEFAULT_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Wall-clock bound for the single completion request, independent of
/// request size
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the completion endpoint
#[derive(Clone, Debug)]
pub struct CompletionConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read the credential and endpoint from the environment
    /// (`DEEPSEEK_API_KEY`, optional `DEEPSEEK_API_URL`)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DEEPSEEK_API_KEY").map_err(|_| {
            PipelineError::Config(
                "DEEPSEEK_API_KEY environment variable must be set before creating a client"
                    .to_string(),
            )
        })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("DEEPSEEK_API_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the chat-completion endpoint. Issues exactly one request per
/// `complete` call; retry policy belongs to the caller.
#[derive(Clone, Debug)]
pub struct CompletionClient {
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Send the prompt and return the raw message content. The content is
    /// never inspected here; recovering structure from it is the
    /// extractor's job.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        if self.config.api_key.trim().is_empty() {
            return Err(PipelineError::Config(
                "completion API key is not configured".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|err| {
                PipelineError::Internal(format!("failed to build HTTP client: {err}"))
            })?;

        let url = build_chat_url(&self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt,
                }
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        });

        debug!(
            url = %url,
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "sending completion request"
        );

        let response = client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(classify_transport_error)?;

        if !status.is_success() {
            let message = decode_error_message(&response_text);
            return Err(PipelineError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
            PipelineError::MalformedResponse(format!("response body is not JSON: {err}"))
        })?;

        let content = response_json
            .get("choices")
            .and_then(|choices| choices.get(0))
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(|content| content.as_str());

        match content {
            Some(content) => {
                debug!(content_chars = content.len(), "completion received");
                Ok(content.to_string())
            }
            None => Err(PipelineError::MalformedResponse(
                "response is missing choices[0].message.content".to_string(),
            )),
        }
    }
}

/// Prefer the decodable `error.message` field of an error body over the
/// raw text
fn decode_error_message(response_text: &str) -> String {
    serde_json::from_str::<Value>(response_text)
        .ok()
        .and_then(|body| {
            body.get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(|message| message.to_string())
        })
        .unwrap_or_else(|| response_text.to_string())
}

fn classify_transport_error(err: reqwest::Error) -> PipelineError {
    if err.is_timeout() {
        PipelineError::Timeout(err.to_string())
    } else {
        PipelineError::Internal(format!("HTTP request failed: {err}"))
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}
