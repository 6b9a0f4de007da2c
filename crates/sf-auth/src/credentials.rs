//! Credentials trait and implementations.
//!
//! All credential types implement custom Debug to redact sensitive data.

use serde_json::Value;

use crate::error::{Error, ErrorKind, Result};

/// Trait for Salesforce credentials.
pub trait Credentials: Send + Sync {
    /// Get the Salesforce instance URL.
    fn instance_url(&self) -> &str;

    /// Get the access token.
    fn access_token(&self) -> &str;

    /// Get the API version (e.g., "60.0").
    fn api_version(&self) -> &str;

    /// Returns true if the credentials appear to be valid (non-empty).
    fn is_valid(&self) -> bool {
        !self.instance_url().is_empty() && !self.access_token().is_empty()
    }
}

/// Standard Salesforce credentials implementation.
///
/// The access token is redacted in Debug output to prevent accidental
/// exposure in logs.
#[derive(Clone)]
pub struct SalesforceCredentials {
    instance_url: String,
    access_token: String,
    api_version: String,
}

impl std::fmt::Debug for SalesforceCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesforceCredentials")
            .field("instance_url", &self.instance_url)
            .field("access_token", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl SalesforceCredentials {
    /// Create new credentials with the given values.
    pub fn new(
        instance_url: impl Into<String>,
        access_token: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            instance_url: instance_url.into(),
            access_token: access_token.into(),
            api_version: api_version.into(),
        }
    }

    /// Parse the stdout of `sf org display --json`.
    ///
    /// Expects `result.instanceUrl` and `result.accessToken`; `result.apiVersion`
    /// is optional. When the CLI reports a failure (non-zero `status`), its
    /// `message` is surfaced as the error.
    pub fn from_org_display_json(stdout: &[u8]) -> Result<Self> {
        let json: Value = serde_json::from_slice(stdout)?;

        let status = json.get("status").and_then(Value::as_i64).unwrap_or(0);
        if status != 0 {
            let message = json
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("sf org display reported a failure");
            return Err(Error::new(ErrorKind::SfdxCli(message.to_string())));
        }

        let result = json.get("result").ok_or_else(|| {
            Error::new(ErrorKind::SfdxCli("Missing 'result' in output".to_string()))
        })?;

        let instance_url = result
            .get("instanceUrl")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::new(ErrorKind::SfdxCli("Missing instanceUrl".to_string())))?;

        let access_token = result
            .get("accessToken")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::new(ErrorKind::SfdxCli("Missing accessToken".to_string())))?;

        let api_version = result
            .get("apiVersion")
            .and_then(Value::as_str)
            .unwrap_or(apexscan_sf_client::DEFAULT_API_VERSION);

        let creds = Self::new(instance_url, access_token, api_version);
        if !creds.is_valid() {
            return Err(Error::new(ErrorKind::InvalidCredentials(
                "sf org display returned an empty instanceUrl or accessToken".to_string(),
            )));
        }
        Ok(creds)
    }
}

impl Credentials for SalesforceCredentials {
    fn instance_url(&self) -> &str {
        &self.instance_url
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }

    fn api_version(&self) -> &str {
        &self.api_version
    }
}
