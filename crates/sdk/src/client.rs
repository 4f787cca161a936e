//! Main client for the PostHog SDK.

use crate::api::*;
use crate::config::{ClientConfig, Region, DEFAULT_TIMEOUT};
use crate::error::PosthogResult;
use crate::transport::HttpTransport;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Client for the PostHog REST API.
///
/// Cheap to clone; the configuration is read-only once built.
#[derive(Debug, Clone)]
pub struct PosthogClient {
    pub(crate) http: HttpTransport,
}

impl PosthogClient {
    /// Create a new client builder.
    pub fn builder() -> PosthogClientBuilder {
        PosthogClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> PosthogResult<Self> {
        let http = HttpTransport::new(Arc::new(config))?;
        Ok(Self { http })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    /// Get the organizations API.
    pub fn organizations(&self) -> OrganizationsApi<'_> {
        OrganizationsApi::new(self)
    }

    /// Get the projects API.
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi::new(self)
    }

    /// Get the annotations API.
    pub fn annotations(&self) -> AnnotationsApi<'_> {
        AnnotationsApi::new(self)
    }

    /// Get the insights API.
    pub fn insights(&self) -> InsightsApi<'_> {
        InsightsApi::new(self)
    }

    /// Get the queries API.
    pub fn queries(&self) -> QueriesApi<'_> {
        QueriesApi::new(self)
    }
}

/// Builder for creating a PosthogClient.
pub struct PosthogClientBuilder {
    region: Region,
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
}

impl PosthogClientBuilder {
    /// Create a new builder targeting the US region.
    pub fn new() -> Self {
        Self {
            region: Region::default(),
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the cloud region.
    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Override the base URL, e.g. for a self-hosted instance.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the personal API key. Empty keys are treated as unset.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = (!key.trim().is_empty()).then_some(key);
        self
    }

    /// Set the personal API key if one is available.
    pub fn maybe_api_key(self, key: Option<String>) -> Self {
        match key {
            Some(key) => self.api_key(key),
            None => self,
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client.
    pub fn build(self) -> PosthogResult<PosthogClient> {
        let base_url = match self.base_url {
            Some(raw) => Url::parse(&raw)?,
            None => self.region.base_url(),
        };

        let config = ClientConfig {
            base_url,
            api_key: self.api_key,
            timeout: self.timeout,
        };

        PosthogClient::from_config(config)
    }
}

impl Default for PosthogClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
