//! Chat-completion client for the strengths/gaps analysis.
//!
//! One request per analysis: a fixed system message plus the prompt as the
//! user message. No retries, no streaming.

use crate::prompt::DEFAULT_SYSTEM_PROMPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Configuration for the remote analyzer.
#[derive(Clone)]
pub struct AnalyzerConfig {
    /// Full chat-completion URL (including any deployment path and api-version).
    pub endpoint: String,
    /// Sent as the `api-key` header.
    pub api_key: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl AnalyzerConfig {
    /// Create a config with the default sampling parameters.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.9,
        }
    }

    /// Host part of the endpoint, for logs and reports.
    pub fn endpoint_host(&self) -> &str {
        let rest = self
            .endpoint
            .split_once("://")
            .map_or(self.endpoint.as_str(), |(_, rest)| rest);
        rest.split(['/', '?']).next().unwrap_or(rest)
    }
}

impl fmt::Debug for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("system_prompt", &self.system_prompt)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .finish()
    }
}

/// Reasons an analysis request produced no result.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("cannot reach {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("endpoint returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed response body: {0}")]
    MalformedBody(String),

    #[error("model returned an empty analysis")]
    EmptyContent,
}

/// A message in the chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Chat-completion request body.
#[derive(Debug, Serialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

/// Chat-completion response body; only the fields we read.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Sends prompts to the configured chat-completion endpoint.
pub struct RemoteAnalyzer {
    config: AnalyzerConfig,
    http_client: reqwest::Client,
}

impl RemoteAnalyzer {
    /// Create an analyzer. The HTTP client keeps the transport defaults.
    pub fn new(config: AnalyzerConfig) -> Self {
        info!(
            "Initializing analyzer for endpoint host {}",
            config.endpoint_host()
        );

        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Submit a prompt and return the trimmed analysis text.
    pub async fn analyze(&self, prompt: &str) -> Result<String, AnalyzerError> {
        let request = self.build_request(prompt);

        debug!(
            "Sending analysis request ({} prompt bytes, max_tokens={})",
            prompt.len(),
            self.config.max_tokens
        );

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .header("api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalyzerError::Transport {
                endpoint: self.config.endpoint_host().to_string(),
                source: e,
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalyzerError::Transport {
                endpoint: self.config.endpoint_host().to_string(),
                source: e,
            })?;

        if !status.is_success() {
            return Err(AnalyzerError::Status { status, body });
        }

        extract_analysis(&body)
    }

    /// Like [`analyze`](Self::analyze), but reports failures as warnings and
    /// returns `None` instead of an error.
    pub async fn try_analyze(&self, prompt: &str) -> Option<String> {
        match self.analyze(prompt).await {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                warn!("Error analyzing the responses: {}", e);
                None
            }
        }
    }

    fn build_request(&self, prompt: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: self.config.system_prompt.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
        }
    }
}

/// Pull `choices[0].message.content` out of a response body and trim it.
pub fn extract_analysis(body: &str) -> Result<String, AnalyzerError> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|e| AnalyzerError::MalformedBody(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AnalyzerError::MalformedBody("no choices in response".to_string()))?;

    let content = choice
        .message
        .content
        .ok_or_else(|| AnalyzerError::MalformedBody("first choice has no content".to_string()))?;

    let analysis = content.trim();
    if analysis.is_empty() {
        return Err(AnalyzerError::EmptyContent);
    }

    Ok(analysis.to_string())
}
