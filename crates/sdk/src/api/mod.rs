//! Domain operations, one API handle per PostHog resource.

pub mod annotations;
pub mod insights;
pub mod organizations;
pub mod projects;
pub mod queries;

pub use annotations::{AnnotationAuthor, AnnotationsApi, CreateAnnotation, CreatedAnnotation};
pub use insights::{Insight, InsightsApi, INSIGHTS_PAGE_LIMIT};
pub use organizations::{Organization, OrganizationsApi};
pub use projects::{Project, ProjectsApi};
pub use queries::{hogql, QueriesApi, QueryRefresh};

use crate::error::{PosthogError, PosthogResult};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Paginated list envelope returned by PostHog list endpoints.
///
/// A missing `results` field decodes as an empty page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
}

/// Percent-encode a caller-supplied identifier for use as one path segment.
///
/// Empty and dot segments are rejected since URL resolution would collapse them.
pub(crate) fn path_segment(value: impl Display) -> PosthogResult<String> {
    let raw = value.to_string();
    if matches!(raw.as_str(), "" | "." | "..") {
        return Err(PosthogError::InvalidPathSegment(raw));
    }
    Ok(urlencoding::encode(&raw).into_owned())
}
