//! Insights API endpoints.

use crate::api::Paginated;
use crate::client::PosthogClient;
use crate::error::PosthogResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Page size requested when listing insights.
pub const INSIGHTS_PAGE_LIMIT: u32 = 10;

/// Insights API.
pub struct InsightsApi<'a> {
    client: &'a PosthogClient,
}

impl<'a> InsightsApi<'a> {
    pub(crate) fn new(client: &'a PosthogClient) -> Self {
        Self { client }
    }

    /// List a project's insights, optionally filtered by a search term.
    pub async fn list(&self, project_id: i64, search: Option<&str>) -> PosthogResult<Vec<Insight>> {
        let page: Paginated<Insight> = self
            .client
            .http
            .get(&Self::list_path(project_id, search))
            .await?;
        Ok(page.results)
    }

    /// Get the full record of one insight, passed through unmodified.
    pub async fn get(&self, project_id: i64, insight_id: i64) -> PosthogResult<Value> {
        self.client
            .http
            .get(&format!("/api/projects/{}/insights/{}/", project_id, insight_id))
            .await
    }

    fn list_path(project_id: i64, search: Option<&str>) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query.append_pair("limit", &INSIGHTS_PAGE_LIMIT.to_string());
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            query.append_pair("search", search);
        }
        format!("/api/projects/{}/insights/?{}", project_id, query.finish())
    }
}

/// A saved insight. Records carry either `id`/`name` or
/// `short_id`/`derived_name`, sometimes both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Insight {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub short_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub derived_name: Option<String>,
}

impl Insight {
    /// Identifier to show: `id`, then `short_id`, then `N/A`.
    pub fn display_id(&self) -> String {
        match (self.id, self.short_id.as_deref()) {
            (Some(id), _) => id.to_string(),
            (None, Some(short_id)) if !short_id.is_empty() => short_id.to_string(),
            _ => "N/A".to_string(),
        }
    }

    /// Name to show: `name`, then `derived_name`, then `Unnamed`.
    pub fn display_name(&self) -> &str {
        [self.name.as_deref(), self.derived_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or("Unnamed")
    }
}
