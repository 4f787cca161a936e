//! Configuration types for the PostHog SDK.

use crate::error::PosthogError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default request timeout for every outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default base URL of the Inkeep documentation service.
pub const DEFAULT_DOCS_BASE_URL: &str = "https://api.inkeep.com/v1/";

/// Default model used for documentation search.
pub const DEFAULT_DOCS_MODEL: &str = "inkeep-qa-expert";

/// PostHog cloud deployment region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    /// Base URL of the region's API host.
    pub fn base_url(&self) -> Url {
        let raw = match self {
            Region::Us => "https://us.posthog.com",
            Region::Eu => "https://eu.posthog.com",
        };
        // Both literals are valid absolute URLs.
        Url::parse(raw).expect("static region URL is valid")
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Eu => "eu",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = PosthogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            other => Err(PosthogError::Config(format!(
                "unsupported region '{other}', expected 'us' or 'eu'"
            ))),
        }
    }
}

/// Configuration for the PostHog client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the PostHog API.
    pub base_url: Url,
    /// Personal API key for authentication.
    pub api_key: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a configuration pointing at a cloud region.
    pub fn for_region(region: Region) -> Self {
        Self::new(region.base_url())
    }
}

/// Configuration for the documentation search client.
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Base URL of the chat-completion service, with trailing slash.
    pub base_url: Url,
    /// Service API key; search fails without it.
    pub api_key: Option<String>,
    /// Model name sent with every completion request.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_DOCS_BASE_URL).expect("static docs URL is valid"),
            api_key: None,
            model: DEFAULT_DOCS_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_base_urls() {
        assert_eq!(Region::Us.base_url().as_str(), "https://us.posthog.com/");
        assert_eq!(Region::Eu.base_url().as_str(), "https://eu.posthog.com/");
    }

    #[test]
    fn test_region_parse() {
        assert_eq!("us".parse::<Region>().unwrap(), Region::Us);
        assert_eq!("EU".parse::<Region>().unwrap(), Region::Eu);
        assert_eq!(" eu ".parse::<Region>().unwrap(), Region::Eu);
    }

    #[test]
    fn test_region_parse_rejects_unknown() {
        let err = "ap".parse::<Region>().unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("'ap'"));
    }

    #[test]
    fn test_region_default_is_us() {
        assert_eq!(Region::default(), Region::Us);
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::for_region(Region::Eu);

        assert_eq!(config.base_url, Region::Eu.base_url());
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_docs_config_defaults() {
        let config = DocsConfig::default();

        assert_eq!(config.base_url.as_str(), "https://api.inkeep.com/v1/");
        assert_eq!(config.model, "inkeep-qa-expert");
        assert!(config.api_key.is_none());
    }
}
