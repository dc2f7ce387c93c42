//! Groq API client for chat completions.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::GroqConfig;

use super::error::{AiError, ApiErrorResponse};
use super::types::{ChatCompletionRequest, ChatCompletionResponse, Message};

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq API client.
///
/// Holds one `reqwest` client with the authorization header baked in and
/// the configured model ids. Cheap to clone.
#[derive(Clone)]
pub struct GroqClient {
    inner: Arc<GroqClientInner>,
}

struct GroqClientInner {
    client: reqwest::Client,
    chat_model: String,
    vision_model: String,
    max_tokens: u32,
    analysis_max_tokens: u32,
}

impl GroqClient {
    /// Create a new Groq client.
    ///
    /// # Errors
    ///
    /// Returns `AiError::Parse` if the API key contains invalid header
    /// characters, or `AiError::Http` if the HTTP client fails to build.
    pub fn new(config: &GroqConfig) -> Result<Self, AiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth_value)
                .map_err(|e| AiError::Parse(format!("invalid API key for header: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(GroqClientInner {
                client,
                chat_model: config.chat_model.clone(),
                vision_model: config.vision_model.clone(),
                max_tokens: config.max_tokens,
                analysis_max_tokens: config.analysis_max_tokens,
            }),
        })
    }

    /// Token budget for chat and diagnosis replies.
    #[must_use]
    pub fn max_tokens(&self) -> u32 {
        self.inner.max_tokens
    }

    /// Token budget for questionnaire analysis replies.
    #[must_use]
    pub fn analysis_max_tokens(&self) -> u32 {
        self.inner.analysis_max_tokens
    }

    /// Send a completion request to the text-reasoning model.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error
    /// response.
    #[instrument(skip(self, messages), fields(model = %self.inner.chat_model))]
    pub async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatCompletionResponse, AiError> {
        self.request(&self.inner.chat_model, messages, temperature, max_tokens)
            .await
    }

    /// Send a completion request to the vision-capable model.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error
    /// response.
    #[instrument(skip(self, messages), fields(model = %self.inner.vision_model))]
    pub async fn complete_vision(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatCompletionResponse, AiError> {
        self.request(&self.inner.vision_model, messages, temperature, max_tokens)
            .await
    }

    async fn request(
        &self,
        model: &str,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<ChatCompletionResponse, AiError> {
        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
        };

        let response = self
            .inner
            .client
            .post(GROQ_API_URL)
            .json(&request)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Handle a completion response.
    async fn handle_response(
        response: reqwest::Response,
    ) -> Result<ChatCompletionResponse, AiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| AiError::Parse(format!("failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> AiError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return AiError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return AiError::Unauthorized("invalid API key".to_string());
        }

        // Try to parse the API error envelope
        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    AiError::Api {
                        error_type: api_error
                            .error
                            .error_type
                            .unwrap_or_else(|| "unknown".to_string()),
                        message: api_error.error.message,
                    }
                } else {
                    AiError::Api {
                        error_type: "unknown".to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => AiError::Http(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn config() -> GroqConfig {
        GroqConfig {
            api_key: SecretString::from("gsk_test_key"),
            chat_model: "openai/gpt-oss-120b".to_string(),
            vision_model: "meta-llama/llama-4-maverick-17b-128e-instruct".to_string(),
            max_tokens: 2048,
            analysis_max_tokens: 512,
        }
    }

    #[test]
    fn test_client_builds_from_config() {
        let client = GroqClient::new(&config()).expect("client");
        assert_eq!(client.max_tokens(), 2048);
        assert_eq!(client.analysis_max_tokens(), 512);
    }

    #[test]
    fn test_client_rejects_bad_api_key() {
        let mut cfg = config();
        cfg.api_key = SecretString::from("bad\nkey");
        assert!(matches!(GroqClient::new(&cfg), Err(AiError::Parse(_))));
    }

    #[test]
    fn test_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<GroqClient>();
        assert_send_sync::<GroqClient>();
    }
}
