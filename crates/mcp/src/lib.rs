// MCP (Model Context Protocol) server for PostHog
// Exposes projects, annotations, insights, queries and docs search as tools
// to agent clients over stdio.

pub mod codec;
pub mod format;
pub mod protocol;
pub mod server;
pub mod settings;
pub mod tools;

pub use server::McpServer;
pub use settings::Settings;
