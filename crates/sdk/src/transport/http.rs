//! HTTP transport layer for the PostHog SDK.

use crate::config::ClientConfig;
use crate::error::{PosthogError, PosthogResult};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP transport for making API requests.
///
/// Every call is a single request bounded by the configured timeout. Failures
/// of any kind come back as a [`PosthogError`] value; nothing is retried.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> PosthogResult<Self> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref api_key) = config.api_key {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|_| PosthogError::Config("Invalid API key format".to_string()))?,
            );
        }

        let client = Client::builder()
            .user_agent(concat!("posthog-sdk/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// The configuration this transport was built from.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a URL for the given path (which may carry a query string).
    pub(crate) fn build_url(&self, path: &str) -> PosthogResult<url::Url> {
        self.config.base_url.join(path).map_err(PosthogError::InvalidUrl)
    }

    /// Execute a request and return the parsed JSON body verbatim.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> PosthogResult<Value> {
        if self.config.api_key.is_none() {
            warn!(path, "Refusing request without a personal API key");
            return Err(PosthogError::MissingApiKey);
        }

        let url = self.build_url(path)?;
        debug!(method = %method, url = %url, "PostHog request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, url = %url, error = %e, "Request failed");
            PosthogError::Http(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method = %method, url = %url, status = status.as_u16(), "Non-success status");
            return Err(PosthogError::from_response(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }

    /// Execute a GET request and decode the body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> PosthogResult<T> {
        let value = self.request(Method::GET, path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Execute a POST request and decode the body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> PosthogResult<T> {
        let body = body.map(serde_json::to_value).transpose()?;
        let value = self.request(Method::POST, path, body.as_ref()).await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Region;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url: url::Url::parse(base_url).unwrap(),
            api_key: Some("phx-test-key".to_string()),
            timeout: Duration::from_secs(30),
        })
    }

    fn create_config_without_key(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig {
            base_url: url::Url::parse(base_url).unwrap(),
            api_key: None,
            timeout: Duration::from_secs(30),
        })
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/test/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: Value = transport.get("/api/test/").await.unwrap();
        assert_eq!(result, json!({"value": 42}));
    }

    #[tokio::test]
    async fn test_post_request_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/create/"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"name": "test"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let body = json!({"name": "test"});
        let result: Value = transport.post("/api/create/", Some(&body)).await.unwrap();
        assert_eq!(result["id"], 1);
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/protected/"))
            .and(header("Authorization", "Bearer phx-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: Value = transport.get("/api/protected/").await.unwrap();
        assert_eq!(result["ok"], true);
    }

    #[tokio::test]
    async fn test_missing_api_key_sends_nothing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config_without_key(&server.uri())).unwrap();

        let err = transport
            .get::<Value>("/api/organizations/@current/")
            .await
            .unwrap_err();
        assert!(matches!(err, PosthogError::MissingApiKey));
        assert!(err.to_string().contains("PERSONAL_API_KEY"));
    }

    #[tokio::test]
    async fn test_error_on_403() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/forbidden/"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"type": "authentication_error", "detail": "Forbidden"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        match transport.get::<Value>("/api/forbidden/").await {
            Err(PosthogError::Api { status, message }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Forbidden");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_on_404_plain_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/notfound/"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let err = transport.get::<Value>("/api/notfound/").await.unwrap_err();
        assert_eq!(err.to_string(), "API error (status 404): Not found");
    }

    #[tokio::test]
    async fn test_timeout_is_an_error_value() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/slow/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let config = Arc::new(ClientConfig {
            timeout: Duration::from_millis(50),
            ..(*create_config(&server.uri())).clone()
        });
        let transport = HttpTransport::new(config).unwrap();

        let err = transport.get::<Value>("/api/slow/").await.unwrap_err();
        match err {
            PosthogError::Http(e) => assert!(e.is_timeout()),
            other => panic!("Expected Http timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_an_error_value() {
        // Nothing listens on port 9 of localhost in the test environment.
        let transport = HttpTransport::new(create_config("http://127.0.0.1:9")).unwrap();

        let err = transport.get::<Value>("/api/anything/").await.unwrap_err();
        assert!(matches!(err, PosthogError::Http(_)));
    }

    #[tokio::test]
    async fn test_build_url_with_query() {
        let transport = HttpTransport::new(create_config("http://localhost:8000")).unwrap();

        let url = transport
            .build_url("/api/projects/1/insights/?limit=10&search=funnel")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/projects/1/insights/?limit=10&search=funnel"
        );
    }

    #[tokio::test]
    async fn test_build_url_uses_region_host() {
        let config = Arc::new(ClientConfig {
            api_key: Some("phx-test-key".to_string()),
            ..ClientConfig::for_region(Region::Eu)
        });
        let transport = HttpTransport::new(config).unwrap();

        let url = transport.build_url("/api/organizations/@current/").unwrap();
        assert_eq!(
            url.as_str(),
            "https://eu.posthog.com/api/organizations/@current/"
        );
    }
}
