use async_trait::async_trait;
use reqwest::Client;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Provider, DEFAULT_REQUEST_TIMEOUT,
    OPENROUTER_BASE_URL, OPENROUTER_MODELS,
};
use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ApiConnectionError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    Api {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("API returned no usable content")]
    EmptyResponse,
}

/// One prompt in, one text blob out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ApiConnectionError>;
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            model: OPENROUTER_MODELS[0].model_name.to_string(),
            site_url: "http://localhost:3000".to_string(),
            app_name: "MealPlanner".to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::OpenRouter {
            api_key: config.llm_api_key_env_var.clone(),
            base_url: config.llm_base_url.clone(),
            model: config.llm_model.clone(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        match &mut self {
            Provider::OpenRouter { base_url, .. } => *base_url = url.into(),
        }
        self
    }

    pub fn with_timeout(mut self, deadline: Duration) -> Self {
        match &mut self {
            Provider::OpenRouter { timeout, .. } => *timeout = deadline,
        }
        self
    }

    pub fn model(&self) -> &str {
        match self {
            Provider::OpenRouter { model, .. } => model,
        }
    }

    pub async fn call_chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ApiConnectionError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                base_url,
                site_url,
                app_name,
                timeout,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ApiConnectionError::MissingApiKey(api_key_env_var_name.clone()))?;

                let client = Client::builder().timeout(*timeout).build()?;
                let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
                debug!(%url, model = %request.model, "sending chat completion request");

                let response = client
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    // Read as text first so a bad body surfaces as a serde error.
                    let body = response.text().await?;
                    let chat_response = serde_json::from_str::<ChatCompletionResponse>(&body)?;
                    Ok(chat_response)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ApiConnectionError::Api { status, error_body })
                }
            }
        }
    }
}

#[async_trait]
impl TextGenerator for Provider {
    async fn generate(&self, prompt: &str) -> Result<String, ApiConnectionError> {
        let request = ChatCompletionRequest {
            model: self.model().to_string(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(0.2),
            max_tokens: Some(2048),
        };

        let response = self.call_chat_completion(request).await?;
        match response.first_content().map(str::trim) {
            Some(content) if !content.is_empty() => Ok(content.to_string()),
            _ => Err(ApiConnectionError::EmptyResponse),
        }
    }
}

/// Strips a surrounding markdown code fence (```` ```json ```` or bare ```` ``` ````).
pub fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    if !(trimmed.starts_with("```") && trimmed.ends_with("```") && trimmed.len() >= 6) {
        return trimmed;
    }
    let inner = &trimmed[3..trimmed.len() - 3];
    // Drop an info string such as `json` or `markdown` on the opening fence.
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim().contains(' ') => inner[newline + 1..].trim(),
        _ => inner.trim(),
    }
}
