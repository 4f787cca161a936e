// Environment-sourced settings for the MCP server

use clap::Parser;
use posthog_sdk::config::{DEFAULT_DOCS_BASE_URL, DEFAULT_DOCS_MODEL};
use posthog_sdk::{DocsClient, DocsConfig, PosthogClient, PosthogResult, Region};
use url::Url;

/// Every value can be given as a flag or through the environment.
/// An unknown region is rejected at startup.
#[derive(Debug, Clone, Parser)]
#[command(name = "posthog-mcp")]
#[command(version, about = "MCP server exposing PostHog as tools over stdio", long_about = None)]
pub struct Settings {
    /// PostHog personal API key
    #[arg(long, env = "PERSONAL_API_KEY", hide_env_values = true)]
    pub personal_api_key: Option<String>,

    /// PostHog cloud region (us or eu)
    #[arg(long, env = "POSTHOG_REGION", default_value = "us")]
    pub region: Region,

    /// Inkeep API key, needed only for documentation search
    #[arg(long, env = "INKEEP_API_KEY", hide_env_values = true)]
    pub inkeep_api_key: Option<String>,

    /// Inkeep API base URL
    #[arg(long, env = "INKEEP_BASE_URL", default_value = DEFAULT_DOCS_BASE_URL)]
    pub inkeep_base_url: Url,

    /// Inkeep model name
    #[arg(long, env = "INKEEP_MODEL", default_value = DEFAULT_DOCS_MODEL)]
    pub inkeep_model: String,
}

impl Settings {
    /// Whether a usable personal API key is configured.
    pub fn has_api_key(&self) -> bool {
        non_blank(&self.personal_api_key).is_some()
    }

    /// Client for the PostHog API. Builds even without a key; calls then
    /// fail with a missing-credential error.
    pub fn posthog_client(&self) -> PosthogResult<PosthogClient> {
        PosthogClient::builder()
            .region(self.region)
            .maybe_api_key(non_blank(&self.personal_api_key))
            .build()
    }

    /// Client for documentation search.
    pub fn docs_client(&self) -> PosthogResult<DocsClient> {
        DocsClient::new(DocsConfig {
            base_url: with_trailing_slash(self.inkeep_base_url.clone()),
            api_key: non_blank(&self.inkeep_api_key),
            model: self.inkeep_model.clone(),
            ..DocsConfig::default()
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

// `chat/completions` is joined onto this, which drops the last segment
// unless the path ends with a slash.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
