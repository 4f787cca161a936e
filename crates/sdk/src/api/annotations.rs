//! Annotations API endpoints.

use crate::client::PosthogClient;
use crate::error::PosthogResult;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Annotations API.
pub struct AnnotationsApi<'a> {
    client: &'a PosthogClient,
}

impl<'a> AnnotationsApi<'a> {
    pub(crate) fn new(client: &'a PosthogClient) -> Self {
        Self { client }
    }

    /// Create an annotation on a project's timeline.
    ///
    /// `date_marker` defaults to the current UTC instant.
    pub async fn create(
        &self,
        project_id: i64,
        content: &str,
        date_marker: Option<&str>,
    ) -> PosthogResult<CreatedAnnotation> {
        let request = CreateAnnotation::new(content, date_marker);
        self.client
            .http
            .post(
                &format!("/api/projects/{}/annotations/", project_id),
                Some(&request),
            )
            .await
    }
}

/// Request body for creating an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAnnotation {
    pub content: String,
    pub date_marker: String,
}

impl CreateAnnotation {
    pub fn new(content: impl Into<String>, date_marker: Option<&str>) -> Self {
        let date_marker = match date_marker {
            Some(marker) if !marker.trim().is_empty() => marker.to_string(),
            _ => Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        };
        Self {
            content: content.into(),
            date_marker,
        }
    }
}

/// Annotation as returned by the API after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedAnnotation {
    pub id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub date_marker: Option<String>,
    #[serde(default)]
    pub created_by: Option<AnnotationAuthor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationAuthor {
    #[serde(default)]
    pub email: Option<String>,
}

impl CreatedAnnotation {
    /// Email of the user who created the annotation, if the API reported one.
    pub fn creator_email(&self) -> Option<&str> {
        self.created_by.as_ref()?.email.as_deref()
    }
}
