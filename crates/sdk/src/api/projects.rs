//! Projects API endpoints.

use crate::api::Paginated;
use crate::client::PosthogClient;
use crate::error::PosthogResult;
use serde::{Deserialize, Serialize};

/// Projects API.
pub struct ProjectsApi<'a> {
    client: &'a PosthogClient,
}

impl<'a> ProjectsApi<'a> {
    pub(crate) fn new(client: &'a PosthogClient) -> Self {
        Self { client }
    }

    /// List the projects of an organization.
    ///
    /// Only the first page is returned. A response without `results` yields
    /// an empty list rather than an error.
    pub async fn list(&self, org_id: &str) -> PosthogResult<Vec<Project>> {
        let page: Paginated<Project> = self
            .client
            .http
            .get(&format!("/api/organizations/{}/projects/", org_id))
            .await?;
        Ok(page.results)
    }
}

/// An analytics project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PosthogClient {
        PosthogClient::builder()
            .base_url(server.uri())
            .api_key("phx-test")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_projects() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/organizations/org-1/projects/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": 2,
                "next": null,
                "results": [
                    {"id": 99423, "name": "Web"},
                    {"id": 99424, "name": "Mobile"}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let projects = client.projects().list("org-1").await.unwrap();

        assert_eq!(
            projects,
            vec![
                Project { id: 99423, name: "Web".to_string() },
                Project { id: 99424, name: "Mobile".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_list_projects_without_results_is_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/organizations/org-1/projects/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let projects = client.projects().list("org-1").await.unwrap();

        assert!(projects.is_empty());
    }

    #[tokio::test]
    async fn test_list_projects_propagates_http_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/organizations/org-1/projects/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.projects().list("org-1").await.unwrap_err();

        assert_eq!(err.to_string(), "API error (status 500): boom");
    }
}
