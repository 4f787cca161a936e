//! # PostHog SDK
//!
//! Thin async client for the PostHog REST API and the Inkeep documentation
//! search service.
//!
//! Every operation returns a [`PosthogResult`]: transport failures, non-2xx
//! responses and missing credentials all arrive as a [`PosthogError`] value,
//! never as a panic.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use posthog_sdk::{PosthogClient, PosthogResult, Region};
//!
//! #[tokio::main]
//! async fn main() -> PosthogResult<()> {
//!     let client = PosthogClient::builder()
//!         .region(Region::Eu)
//!         .api_key("phx_your_personal_key")
//!         .build()?;
//!
//!     let org = client.organizations().current().await?;
//!     for project in client.projects().list(&org.id).await? {
//!         println!("{} - {}", project.id, project.name);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod docs;
pub mod error;
pub mod transport;

pub use api::{
    hogql, CreatedAnnotation, Insight, Organization, Paginated, Project, QueryRefresh,
};
pub use client::{PosthogClient, PosthogClientBuilder};
pub use config::{ClientConfig, DocsConfig, Region};
pub use docs::{completion_text, DocsClient};
pub use error::{PosthogError, PosthogResult};
