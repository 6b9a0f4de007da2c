//! # sf-client
//!
//! HTTP plumbing for talking to a Salesforce org's REST API.
//!
//! This crate is deliberately small: one GET per explain request, a bearer
//! token, and a typed error that keeps the status code and raw response
//! body so callers can report exactly what the org answered.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   SalesforceClient                          │
//! │  - Holds instance URL, access token, API version            │
//! │  - Builds REST URLs, issues the query-explain call          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    SfHttpClient                             │
//! │  - Raw HTTP over reqwest, timeouts, user agent              │
//! │  - No retry: one request, one response                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use apexscan_sf_client::SalesforceClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), apexscan_sf_client::Error> {
//!     let client = SalesforceClient::new("https://myorg.my.salesforce.com", "token")?;
//!     let plan = client.explain("SELECT Id FROM Account").await?;
//!     println!("{}", plan.to_pretty_json());
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod request;
mod response;
mod salesforce_client;

pub use client::SfHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result};
pub use request::RequestBuilder;
pub use response::Response;
pub use salesforce_client::{ExplainPlan, SalesforceClient};

/// API version of the query-explain endpoint.
pub const DEFAULT_API_VERSION: &str = "60.0";

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("apexscan/", env!("CARGO_PKG_VERSION"));
