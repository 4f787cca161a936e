//! Transport layer for the PostHog SDK.

pub mod http;

pub use http::HttpTransport;
