//! Authenticated Salesforce client.
//!
//! This module provides `SalesforceClient`, which combines an instance URL
//! and access token with an HTTP client and exposes the query-explain call.
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Tracing spans record the query, never the token

use serde_json::Value;
use tracing::instrument;

use crate::client::SfHttpClient;
use crate::config::ClientConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::request::RequestBuilder;
use crate::DEFAULT_API_VERSION;

/// Salesforce API client bound to one org.
///
/// # Example
///
/// ```rust,ignore
/// use apexscan_sf_client::SalesforceClient;
///
/// let client = SalesforceClient::new("https://na1.salesforce.com", "token")?;
/// let plan = client.explain("SELECT Id FROM Account").await?;
/// ```
#[derive(Clone)]
pub struct SalesforceClient {
    http: SfHttpClient,
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceClient")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl SalesforceClient {
    /// Create a new Salesforce client with the given instance URL and access token.
    pub fn new(instance_url: impl Into<String>, access_token: impl Into<String>) -> Result<Self> {
        Self::with_config(instance_url, access_token, ClientConfig::default())
    }

    /// Create a new Salesforce client with custom configuration.
    ///
    /// Fails with [`ErrorKind::InvalidUrl`] when the instance URL does not parse.
    pub fn with_config(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self> {
        let instance_url = instance_url.into().trim_end_matches('/').to_string();
        url::Url::parse(&instance_url)?;

        let http = SfHttpClient::new(config)?;
        Ok(Self {
            http,
            instance_url,
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        })
    }

    /// Set the API version (e.g., "60.0").
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Get the instance URL.
    pub fn instance_url(&self) -> &str {
        &self.instance_url
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Build the REST API URL for a path.
    ///
    /// Example: `rest_url("query/")` -> `<instance>/services/data/v60.0/query/`
    pub fn rest_url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!(
            "{}/services/data/v{}/{}",
            self.instance_url, self.api_version, path
        )
    }

    /// Create a GET request builder with authentication.
    pub fn get(&self, url: &str) -> RequestBuilder {
        self.http.get(url).bearer_auth(&self.access_token)
    }

    /// Ask the org how it would execute `soql`.
    ///
    /// Only HTTP 200 counts as success; any other status becomes
    /// [`ErrorKind::Http`] with the untouched response body, or a note on why
    /// the body could not be read. A 200 whose
    /// body is not a JSON object becomes [`ErrorKind::InvalidJson`].
    #[instrument(skip(self), fields(instance = %self.instance_url))]
    pub async fn explain(&self, soql: &str) -> Result<ExplainPlan> {
        let request = self
            .get(&self.rest_url("query/"))
            .json_content()
            .query("explain", soql);
        let response = self.http.execute(request).await?;

        let status = response.status();
        if status != 200 {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => format!("(failed to read response body: {e})"),
            };
            return Err(Error::new(ErrorKind::Http { status, body }));
        }

        let body: Value = response.json().await?;
        ExplainPlan::from_response(body)
    }
}

/// The `plans` section of an explain response.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainPlan {
    /// Raw `plans` value; an empty array when the org omitted it.
    pub plans: Value,
}

impl ExplainPlan {
    fn from_response(body: Value) -> Result<Self> {
        match body {
            Value::Object(mut map) => Ok(Self {
                plans: map.remove("plans").unwrap_or_else(|| Value::Array(Vec::new())),
            }),
            other => Err(Error::new(ErrorKind::InvalidJson(format!(
                "expected a JSON object, got {}",
                json_type_name(&other)
            )))),
        }
    }

    /// Render the plans as two-space indented JSON.
    pub fn to_pretty_json(&self) -> String {
        // Serializing a `Value` cannot fail.
        serde_json::to_string_pretty(&self.plans).unwrap_or_default()
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
