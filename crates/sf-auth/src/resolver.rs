//! Credential resolution.
//!
//! A [`CredentialResolver`] turns an org identifier (username or alias) into
//! live credentials. It is called once per run, before any API traffic.

use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::credentials::SalesforceCredentials;
use crate::error::{Error, ErrorKind, Result};

/// Source of credentials for an org.
#[allow(async_fn_in_trait)]
pub trait CredentialResolver {
    /// Resolve credentials for `username` (a username or sf CLI alias).
    async fn resolve(&self, username: &str) -> Result<SalesforceCredentials>;
}

/// Resolves credentials by running `sf org display --target-org <org> --json`.
///
/// The org must already be authenticated in the local sf CLI.
#[derive(Debug, Clone)]
pub struct SfCliCredentialResolver {
    program: PathBuf,
}

impl Default for SfCliCredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SfCliCredentialResolver {
    /// Use the `sf` executable found on `PATH`.
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(crate::DEFAULT_SF_BIN),
        }
    }

    /// Use a specific CLI executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl CredentialResolver for SfCliCredentialResolver {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    async fn resolve(&self, username: &str) -> Result<SalesforceCredentials> {
        use tokio::process::Command;

        let output = Command::new(&self.program)
            .args(["org", "display", "--target-org", username, "--json"])
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                Error::with_source(
                    ErrorKind::SfdxCli(format!(
                        "Failed to run {}: {}",
                        self.program.display(),
                        e
                    )),
                    e,
                )
            })?;

        debug!(status = ?output.status, "sf org display finished");

        if !output.status.success() {
            // With --json the CLI reports its failure on stdout.
            if let Err(err) = SalesforceCredentials::from_org_display_json(&output.stdout) {
                if matches!(err.kind, ErrorKind::SfdxCli(_)) {
                    return Err(err);
                }
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::new(ErrorKind::SfdxCli(format!(
                "sf org display failed: {}",
                stderr.trim()
            ))));
        }

        SalesforceCredentials::from_org_display_json(&output.stdout)
    }
}

/// Resolver that hands out fixed credentials, e.g. a token supplied directly
/// on the command line.
#[derive(Debug, Clone)]
pub struct StaticCredentialResolver {
    credentials: SalesforceCredentials,
}

impl StaticCredentialResolver {
    pub fn new(credentials: SalesforceCredentials) -> Self {
        Self { credentials }
    }
}

impl CredentialResolver for StaticCredentialResolver {
    async fn resolve(&self, _username: &str) -> Result<SalesforceCredentials> {
        Ok(self.credentials.clone())
    }
}
