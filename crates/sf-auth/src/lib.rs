//! # sf-auth
//!
//! Resolves the bearer token and instance URL for a Salesforce org.
//!
//! Authentication itself is delegated to the Salesforce CLI (`sf`): the org
//! must already be logged in there. This crate only asks the CLI for the
//! current session and turns the answer into [`SalesforceCredentials`].
//!
//! ## Security
//!
//! - Access tokens are redacted in Debug output
//! - Tracing skips credential values
//! - CLI error output is reported without the token
//!
//! ## Example
//!
//! ```rust,ignore
//! use apexscan_sf_auth::{CredentialResolver, Credentials, SfCliCredentialResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), apexscan_sf_auth::Error> {
//!     let creds = SfCliCredentialResolver::new()
//!         .resolve("me@example.com.dev")
//!         .await?;
//!     println!("{}", creds.instance_url());
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod resolver;

pub use credentials::{Credentials, SalesforceCredentials};
pub use error::{Error, ErrorKind, Result};
pub use resolver::{CredentialResolver, SfCliCredentialResolver, StaticCredentialResolver};

/// Default name of the Salesforce CLI executable.
pub const DEFAULT_SF_BIN: &str = "sf";
