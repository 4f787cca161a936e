//! Documentation search through the Inkeep chat-completion service.

use crate::config::DocsConfig;
use crate::error::{PosthogError, PosthogResult};
use reqwest::{header, Client};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sampling temperature sent with every search.
pub const DOCS_TEMPERATURE: f32 = 0.7;

/// Completion length cap sent with every search.
pub const DOCS_MAX_TOKENS: u32 = 1000;

/// Client for the documentation question-answering service.
#[derive(Debug, Clone)]
pub struct DocsClient {
    client: Client,
    config: Arc<DocsConfig>,
}

impl DocsClient {
    pub fn new(config: DocsConfig) -> PosthogResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("posthog-sdk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// Ask the documentation service a question and return the raw
    /// chat-completion response.
    pub async fn search(&self, query: &str) -> PosthogResult<Value> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(PosthogError::MissingDocsApiKey)?;

        let url = self.config.base_url.join("chat/completions")?;
        debug!(url = %url, model = %self.config.model, "Docs search request");

        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: query,
            }],
            stream: false,
            temperature: DOCS_TEMPERATURE,
            max_tokens: DOCS_MAX_TOKENS,
        };

        let response = self
            .client
            .post(url.clone())
            .header(header::AUTHORIZATION, format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Docs search failed");
                PosthogError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "Docs search non-success status");
            return Err(PosthogError::from_response(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

/// Pull the answer text out of a chat-completion response.
///
/// `Ok(None)` means the response had no `choices` at all; a `choices` array
/// without `[0].message.content` is malformed.
pub fn completion_text(response: &Value) -> PosthogResult<Option<&str>> {
    if response.get("choices").is_none() {
        return Ok(None);
    }
    response
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(Some)
        .ok_or_else(|| {
            PosthogError::UnexpectedResponse(
                "completion has no choices[0].message.content".to_string(),
            )
        })
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, api_key: Option<&str>) -> DocsConfig {
        DocsConfig {
            base_url: url::Url::parse(&format!("{}/v1/", server.uri())).unwrap(),
            api_key: api_key.map(str::to_string),
            ..DocsConfig::default()
        }
    }

    #[tokio::test]
    async fn test_search_sends_completion_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer ik-test"))
            .and(body_json(json!({
                "model": "inkeep-qa-expert",
                "messages": [{"role": "user", "content": "How do feature flags work?"}],
                "stream": false,
                "temperature": 0.7,
                "max_tokens": 1000
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Flags are..."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let docs = DocsClient::new(config_for(&server, Some("ik-test"))).unwrap();
        let response = docs.search("How do feature flags work?").await.unwrap();

        assert_eq!(completion_text(&response).unwrap(), Some("Flags are..."));
    }

    #[tokio::test]
    async fn test_search_without_key_is_config_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let docs = DocsClient::new(config_for(&server, None)).unwrap();
        let err = docs.search("anything").await.unwrap_err();

        assert!(matches!(err, PosthogError::MissingDocsApiKey));
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_search_http_failure_is_error_value() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let docs = DocsClient::new(config_for(&server, Some("ik-bad"))).unwrap();
        let err = docs.search("anything").await.unwrap_err();

        assert_eq!(err.to_string(), "API error (status 401): unauthorized");
    }

    #[test]
    fn test_completion_text_without_choices() {
        assert_eq!(completion_text(&json!({"id": "x"})).unwrap(), None);
    }

    #[test]
    fn test_completion_text_with_empty_choices_is_malformed() {
        let err = completion_text(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, PosthogError::UnexpectedResponse(_)));
    }
}
