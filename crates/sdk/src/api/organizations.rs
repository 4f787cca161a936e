//! Organizations API endpoints.

use crate::client::PosthogClient;
use crate::error::PosthogResult;
use serde::{Deserialize, Serialize};

/// Organizations API.
pub struct OrganizationsApi<'a> {
    client: &'a PosthogClient,
}

impl<'a> OrganizationsApi<'a> {
    pub(crate) fn new(client: &'a PosthogClient) -> Self {
        Self { client }
    }

    /// Get the organization the API key belongs to.
    pub async fn current(&self) -> PosthogResult<Organization> {
        self.client.http.get("/api/organizations/@current/").await
    }
}

/// The caller's organization. Only the fields the tools consume are decoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}
