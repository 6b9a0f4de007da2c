//! # apexscan
//!
//! Static SOQL tooling for Salesforce Apex code bases.
//!
//! Two steps, each with its own binary:
//!
//! 1. `apex-soql-extractor` scans a folder of `.cls` files and writes every
//!    embedded SOQL query, with its line, file-level SOSL/DML findings and
//!    test-class flag, to a CSV.
//! 2. `soql-explain-plan` reads that CSV, cleans each query and asks the org
//!    for its query plan, writing a CSV and an HTML report.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Tracing skips credential parameters
//!
//! ## Crates
//!
//! - **apexscan-sf-client** - HTTP client and the query-explain call
//! - **apexscan-sf-auth** - Credentials from the Salesforce CLI
//! - **apexscan-soql-extractor** - SOQL/SOSL/DML extraction from Apex source
//! - **apexscan-soql-explain** - Query normalization, explain dispatch, reports
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use apexscan::{connect, ExplainSettings, SfCliCredentialResolver};
//! use apexscan::explain::{explain_csv, Explainer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), apexscan::RunError> {
//!     let client = connect(
//!         &SfCliCredentialResolver::new(),
//!         "me@example.com.dev",
//!         &ExplainSettings::default(),
//!     )
//!     .await?;
//!
//!     let report = explain_csv(&Explainer::new(client)?, "soql.csv".as_ref(), "soql_with_explain.csv".as_ref()).await?;
//!     println!("HTML report: {}", report.html_path.display());
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

// Re-export all crates for convenient access
pub use apexscan_sf_auth as auth;
pub use apexscan_sf_client as client;
pub use apexscan_soql_explain as explain;
pub use apexscan_soql_extractor as extractor;

// Re-export commonly used types at the top level
pub use apexscan_sf_auth::{
    CredentialResolver, Credentials, SalesforceCredentials, SfCliCredentialResolver,
    StaticCredentialResolver,
};
pub use apexscan_sf_client::{ClientConfig, SalesforceClient, DEFAULT_API_VERSION};
pub use apexscan_soql_explain::{ExplainReport, Explainer};
pub use apexscan_soql_extractor::{Extractor, QueryRecord};

/// Any fatal failure of an extract or explain run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("{0}")]
    Auth(#[from] apexscan_sf_auth::Error),
    #[error("{0}")]
    Client(#[from] apexscan_sf_client::Error),
    #[error("{0}")]
    Extract(#[from] apexscan_soql_extractor::Error),
    #[error("{0}")]
    Explain(#[from] apexscan_soql_explain::Error),
}

/// Install the stderr log subscriber shared by both binaries.
///
/// Filtering follows `RUST_LOG`, defaulting to `warn` so stdout carries only
/// the progress lines.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Knobs for the org connection used by the explainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainSettings {
    /// REST API version of the explain endpoint, without the `v`.
    pub api_version: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for ExplainSettings {
    fn default() -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Resolve credentials for `username` once and build the client every
/// explain call will share.
///
/// The explain endpoint version comes from `settings`, not from the
/// credentials, so every row of a run hits the same version.
#[tracing::instrument(skip(resolver, settings))]
pub async fn connect<R: CredentialResolver>(
    resolver: &R,
    username: &str,
    settings: &ExplainSettings,
) -> Result<SalesforceClient, RunError> {
    let credentials = resolver.resolve(username).await?;
    tracing::debug!(instance = %credentials.instance_url(), "Resolved org credentials");

    let config = ClientConfig::builder()
        .with_timeout(settings.timeout)
        .build();
    let client = SalesforceClient::with_config(
        credentials.instance_url(),
        credentials.access_token(),
        config,
    )?
    .with_api_version(settings.api_version.clone());

    Ok(client)
}

/// Progress points of [`run_explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// About to resolve org credentials.
    Connecting,
    /// Credentials resolved; about to explain the input rows.
    Processing,
}

/// Connect to the org, then explain every row of `input` into `output`.
///
/// Credentials are resolved before the input is touched. If that fails no
/// explain request is made and no report is written.
#[tracing::instrument(skip(resolver, settings, input, output, progress), fields(input = %input.display()))]
pub async fn run_explain<R: CredentialResolver>(
    resolver: &R,
    username: &str,
    settings: &ExplainSettings,
    input: &Path,
    output: &Path,
    mut progress: impl FnMut(RunStage),
) -> Result<ExplainReport, RunError> {
    progress(RunStage::Connecting);
    let client = connect(resolver, username, settings).await?;

    progress(RunStage::Processing);
    let explainer = Explainer::new(client)?;
    let report = apexscan_soql_explain::explain_csv(&explainer, input, output).await?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_uses_settings_api_version() {
        let resolver = StaticCredentialResolver::new(SalesforceCredentials::new(
            "https://example.my.salesforce.com/",
            "token",
            "58.0",
        ));
        let settings = ExplainSettings {
            api_version: "61.0".to_string(),
            ..ExplainSettings::default()
        };

        let client = connect(&resolver, "me@example.com", &settings).await.unwrap();

        assert_eq!(client.api_version(), "61.0");
        assert_eq!(client.instance_url(), "https://example.my.salesforce.com");
    }

    #[tokio::test]
    async fn test_connect_rejects_bad_instance_url() {
        let resolver = StaticCredentialResolver::new(SalesforceCredentials::new(
            "not a url",
            "token",
            DEFAULT_API_VERSION,
        ));

        let err = connect(&resolver, "me", &ExplainSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Client(_)));
    }

    #[test]
    fn test_default_settings() {
        let settings = ExplainSettings::default();
        assert_eq!(settings.api_version, "60.0");
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }
}
