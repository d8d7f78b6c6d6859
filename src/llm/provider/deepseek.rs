// src/llm/provider/deepseek.rs
// DeepSeek Chat API gateway (OpenAI-compatible chat completions)

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Instant;
use tracing::{debug, warn};

use super::{CompletionError, CompletionGateway, CompletionRequest, CompletionResult};
use crate::config::BusterConfig;

pub struct DeepSeekGateway {
    client: Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl DeepSeekGateway {
    pub fn new(config: &BusterConfig) -> Self {
        // Builder only fails if the TLS backend can't initialise; a plain
        // client still works, just without the per-request timeout.
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        if config.api_key.is_none() {
            warn!("DEEPSEEK_API_KEY is not set; completions will fail and games will use fallback text");
        }

        Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.chat_completions_url(),
        }
    }

    fn body(&self, request: &CompletionRequest) -> Value {
        json!({
            "model": self.model,
            "messages": request.messages(),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        })
    }

    async fn send(&self, request: &CompletionRequest) -> CompletionResult {
        let mut builder = self.client.post(&self.endpoint).json(&self.body(request));
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {}", key));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Service { status, body });
        }

        let raw_response = response.json::<Value>().await.map_err(body_error)?;

        extract_content(&raw_response)
    }
}

/// A body that stalls or drops mid-read is a transport failure; one that
/// arrives whole but isn't JSON is malformed.
fn body_error(e: reqwest::Error) -> CompletionError {
    if e.is_timeout() || e.is_body() {
        CompletionError::Transport(e.to_string())
    } else {
        CompletionError::MalformedResponse(e.to_string())
    }
}

/// Pull `choices[0].message.content` out of an OpenAI-format body.
/// An empty string is a valid completion and is returned as-is.
pub fn extract_content(raw_response: &Value) -> CompletionResult {
    raw_response["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or_else(|| CompletionError::MalformedResponse("no content in first choice".to_string()))
}

#[async_trait]
impl CompletionGateway for DeepSeekGateway {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn complete(&self, request: CompletionRequest) -> CompletionResult {
        let start = Instant::now();
        debug!(
            "DeepSeek request: model={} max_tokens={} prompt_chars={}",
            self.model,
            request.max_tokens,
            request.user_prompt.len()
        );

        let result = self.send(&request).await;
        let latency_ms = start.elapsed().as_millis();

        match &result {
            Ok(content) => debug!("DeepSeek response: {} chars in {}ms", content.len(), latency_ms),
            Err(e) => warn!("DeepSeek completion failed after {}ms: {}", latency_ms, e),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "Hello there" } }]
        });
        assert_eq!(extract_content(&body), Ok("Hello there".to_string()));
    }

    #[test]
    fn test_extract_content_empty_string_is_ok() {
        let body = json!({ "choices": [{ "message": { "content": "" } }] });
        assert_eq!(extract_content(&body), Ok(String::new()));
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let body = json!({ "error": "nope" });
        assert!(matches!(
            extract_content(&body),
            Err(CompletionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_extract_content_non_string() {
        let body = json!({ "choices": [{ "message": { "content": 42 } }] });
        assert!(extract_content(&body).is_err());
    }

    #[test]
    fn test_body_shape() {
        let config = BusterConfig::from_lookup(|_| None);
        let gateway = DeepSeekGateway::new(&config);
        let body = gateway.body(&CompletionRequest::new("tell me a joke"));

        assert_eq!(body["model"], "deepseek-chat");
        assert_eq!(body["max_tokens"], 500);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "tell me a joke");
        assert_eq!(body["temperature"], json!(0.8));
    }
}
