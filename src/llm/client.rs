use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::errors::{AgentError, ErrorCategory};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;
const SERVICE_UNAVAILABLE: &str = "AI service temporarily unavailable. Please try again.";
const NOT_CONFIGURED: &str = "AI service is not configured properly. Please contact support.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorObject,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    message: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Failures come back already categorized; retrying is left to the caller.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: Option<f32>,
    timeout: Duration,
}

impl ChatClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, AgentError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("job-agent/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AgentError::unknown(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            temperature: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AgentError> {
        Ok(Self::new(
            config.llm_base_url(),
            config.llm_model(),
            config.llm_api_key().map(str::to_string),
        )?
        .with_temperature(config.llm_temperature()))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one system + user exchange and returns the reply text.
    #[instrument(skip_all, fields(model = %self.model))]
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, AgentError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AgentError::generation("API key not configured for the chat endpoint")
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![Message::system(system), Message::user(user)],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = read_limited_text(response).await;
            return Err(classify_status(status, &body));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AgentError::parsing(format!("invalid completion payload: {}", e)))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| AgentError::generation("model returned an empty completion"))?;

        debug!(chars = content.len(), "completion received");
        Ok(content)
    }

    /// Like [`Self::complete`], parsing the reply as JSON into `T`.
    pub async fn complete_json<T: DeserializeOwned>(
        &self,
        system: &str,
        user: &str,
    ) -> Result<T, AgentError> {
        let reply = self.complete(system, user).await?;
        serde_json::from_str(strip_json_fences(&reply)).map_err(|e| {
            AgentError::parsing(format!("model reply is not the expected JSON: {}", e))
                .with_detail("reply_preview", reply.chars().take(200).collect::<String>())
        })
    }
}

/// Removes a surrounding Markdown code fence and any prose around the
/// outermost JSON object.
pub fn strip_json_fences(reply: &str) -> &str {
    let mut text = reply.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.split_once('\n').map_or("", |(_, body)| body);
        text = rest.trim_end().strip_suffix("```").unwrap_or(rest).trim();
    }

    if text.starts_with('{') {
        return text;
    }
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

fn classify_transport_error(err: reqwest::Error) -> AgentError {
    let message = format!("chat request failed: {}", err);
    if err.is_timeout() {
        AgentError::timeout(message).with_user_message("AI response timed out. Please try again.")
    } else if err.is_connect() || err.is_request() {
        AgentError::new(ErrorCategory::Network, message).with_user_message(SERVICE_UNAVAILABLE)
    } else if err.is_decode() || err.is_body() {
        AgentError::parsing(message)
    } else {
        AgentError::generation(message)
    }
}

fn classify_status(status: StatusCode, body: &str) -> AgentError {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error.message)
        .unwrap_or_else(|| body.trim().to_string());
    let message = format!("chat endpoint returned {}: {}", status, detail);
    warn!(status = status.as_u16(), "chat endpoint error");

    let err = match status.as_u16() {
        401 | 403 => AgentError::new(ErrorCategory::Authentication, message)
            .with_user_message(NOT_CONFIGURED),
        408 => AgentError::timeout(message)
            .with_user_message("AI response timed out. Please try again."),
        429 => AgentError::rate_limited(message)
            .with_user_message("AI service is temporarily busy. Please try again in a few minutes."),
        code if code >= 500 => {
            AgentError::new(ErrorCategory::Network, message).with_user_message(SERVICE_UNAVAILABLE)
        }
        _ => AgentError::generation(message),
    };
    err.with_detail("status_code", status.as_u16())
}

async fn read_limited_text(response: reqwest::Response) -> String {
    match response.bytes().await {
        Ok(bytes) => {
            let end = bytes.len().min(MAX_ERROR_BODY_BYTES);
            String::from_utf8_lossy(&bytes[..end]).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read error body");
            String::new()
        }
    }
}
