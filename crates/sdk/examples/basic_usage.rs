//! Basic SDK usage example.
//!
//! Lists the projects of the organization that owns the API key, then the
//! first few insights of each project.
//!
//! Run with: PERSONAL_API_KEY=phx_... cargo run --example basic_usage

use posthog_sdk::{PosthogClient, PosthogResult, Region};
use std::time::Duration;

#[tokio::main]
async fn main() -> PosthogResult<()> {
    tracing_subscriber::fmt::init();

    let region: Region = std::env::var("POSTHOG_REGION")
        .unwrap_or_else(|_| "us".to_string())
        .parse()?;

    let client = PosthogClient::builder()
        .region(region)
        .maybe_api_key(std::env::var("PERSONAL_API_KEY").ok())
        .timeout(Duration::from_secs(30))
        .build()?;

    let org = client.organizations().current().await?;
    println!("Organization: {}", org.name.as_deref().unwrap_or(&org.id));

    let projects = client.projects().list(&org.id).await?;
    println!("Found {} projects", projects.len());

    for project in &projects {
        println!("\n{} ({})", project.name, project.id);
        for insight in client.insights().list(project.id, None).await?.iter().take(5) {
            println!("  {} - {}", insight.display_id(), insight.display_name());
        }
    }

    Ok(())
}
