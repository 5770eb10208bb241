//! OpenAI Chat Completions Client
//!
//! Sends a single non-streaming request to an OpenAI-compatible endpoint:
//! ```text
//! POST {base_url}/chat/completions
//! {"model":"gpt-4.1-nano","messages":[{"role":"system",...},{"role":"user",...}],"temperature":0.2,"max_tokens":800}
//! ```
//! and returns `choices[0].message.content`.

use crate::error::{Error, Result};
use crate::inference::{InferenceClient, InferenceError};
use crate::types::{ChatMessage, InferenceParams};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Connection settings for an OpenAI-compatible service
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API root, e.g. `https://api.openai.com/v1`
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Bearer token (omitted from the request when `None`)
    pub api_key: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4.1-nano".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// OpenAI chat completions client
#[derive(Debug, Clone)]
pub struct OpenAiChatClient {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: Option<String>,
}

impl OpenAiChatClient {
    /// Create a client from settings
    pub fn new(settings: OpenAiSettings) -> Result<Self> {
        let endpoint = completions_endpoint(&settings.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            model: settings.model,
            api_key: settings.api_key,
        })
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Model requested from the service
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl InferenceClient for OpenAiChatClient {
    async fn invoke(
        &self,
        system_instruction: &str,
        user_text: &str,
        params: InferenceParams,
    ) -> std::result::Result<String, InferenceError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::system(system_instruction),
                ChatMessage::user(user_text),
            ],
            temperature: params.temperature,
            max_tokens: params.max_output_tokens,
        };

        debug!("Sending chat completion request to {}", self.endpoint);

        let mut builder = self.http.post(self.endpoint.clone()).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Inference service returned {}", status);
            return Err(map_status(status.as_u16(), body));
        }

        let body = response.text().await.map_err(map_transport_error)?;
        extract_content(&body)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

/// Join `base_url` with the chat completions path
fn completions_endpoint(base_url: &str) -> Result<Url> {
    let base = Url::parse(base_url)
        .map_err(|e| Error::config(format!("Invalid inference base URL '{}': {}", base_url, e)))?;

    match base.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::config(format!(
                "Inference base URL scheme '{}' is not supported",
                other
            )))
        }
    }

    let path = format!("{}/chat/completions", base.path().trim_end_matches('/'));
    let mut endpoint = base;
    endpoint.set_path(&path);
    Ok(endpoint)
}

fn map_transport_error(err: reqwest::Error) -> InferenceError {
    if err.is_timeout() {
        InferenceError::Timeout
    } else if err.is_decode() {
        InferenceError::MalformedResponse(err.to_string())
    } else {
        InferenceError::Transport(err.to_string())
    }
}

fn map_status(status: u16, body: String) -> InferenceError {
    match status {
        401 | 403 => InferenceError::Authentication(body),
        429 => InferenceError::RateLimited(body),
        _ => InferenceError::Status { status, body },
    }
}

/// Pull the first choice's message content out of a completions body
fn extract_content(body: &str) -> std::result::Result<String, InferenceError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::MalformedResponse(format!("Failed to decode completion: {}", e)))?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| InferenceError::MalformedResponse("completion has no message content".to_string()))
}

// =============================================================================
// OpenAI Request/Response Structures
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_path() {
        let url = completions_endpoint("https://api.openai.com/v1").unwrap();
        assert_eq!(url.as_str(), "https://api.openai.com/v1/chat/completions");

        let url = completions_endpoint("http://localhost:8000/v1/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/v1/chat/completions");
    }

    #[test]
    fn test_endpoint_rejects_bad_urls() {
        assert!(completions_endpoint("not a url").is_err());
        assert!(completions_endpoint("ftp://example.com/v1").is_err());
    }

    #[test]
    fn test_extract_content() {
        let body = r#"{"id":"chatcmpl-1","object":"chat.completion","choices":[{"index":0,"message":{"role":"assistant","content":"  {\"valid\":false}\n"},"finish_reason":"stop"}]}"#;
        assert_eq!(extract_content(body).unwrap(), r#"{"valid":false}"#);
    }

    #[test]
    fn test_extract_content_without_choices() {
        let err = extract_content(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));

        let err = extract_content("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, InferenceError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(map_status(401, String::new()), InferenceError::Authentication(_)));
        assert!(matches!(map_status(403, String::new()), InferenceError::Authentication(_)));
        assert!(matches!(map_status(429, String::new()), InferenceError::RateLimited(_)));
        assert!(matches!(
            map_status(502, "upstream".into()),
            InferenceError::Status { status: 502, .. }
        ));
    }

    #[test]
    fn test_client_construction() {
        let client = OpenAiChatClient::new(OpenAiSettings::default()).unwrap();
        assert_eq!(client.model(), "gpt-4.1-nano");
        assert_eq!(client.name(), "openai");
    }
}
