//! Fetch query plans for the SOQL found by `apex-soql-extractor`.
//!
//! The org must already be authenticated in the Salesforce CLI:
//!
//! ```sh
//! sf org login web --alias my-org
//! soql-explain-plan --input-soql-csv soql.csv --username my-org
//! ```
//!
//! Writes `<output-csv>` and `<output-csv>.html`.

use std::path::PathBuf;
use std::time::Duration;

use apexscan::explain::DEFAULT_OUTPUT_CSV;
use apexscan::{
    run_explain, ExplainReport, ExplainSettings, RunError, RunStage, SalesforceCredentials,
    SfCliCredentialResolver, StaticCredentialResolver, DEFAULT_API_VERSION,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "soql-explain-plan")]
#[command(about = "Generate EXPLAIN plans for SOQL queries in Apex classes", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to input CSV from the SOQL extractor
    #[arg(long = "input-soql-csv")]
    input_soql_csv: PathBuf,

    /// Salesforce org username or CLI alias
    #[arg(long)]
    username: String,

    /// Output CSV with EXPLAIN plans
    #[arg(long = "output-csv", default_value = DEFAULT_OUTPUT_CSV)]
    output_csv: PathBuf,

    /// REST API version of the explain endpoint
    #[arg(long = "api-version", default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Per-request HTTP timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    timeout_secs: u64,

    /// Salesforce CLI executable
    #[arg(long = "sf-bin", env = "SF_CLI_PATH", default_value = apexscan::auth::DEFAULT_SF_BIN)]
    sf_bin: PathBuf,

    /// Instance URL to use instead of asking the Salesforce CLI
    #[arg(long = "instance-url", env = "SF_INSTANCE_URL", requires = "access_token")]
    instance_url: Option<String>,

    /// Access token to use instead of asking the Salesforce CLI
    #[arg(long = "access-token", env = "SF_ACCESS_TOKEN", hide_env_values = true, requires = "instance_url")]
    access_token: Option<String>,
}

impl Cli {
    fn settings(&self) -> ExplainSettings {
        ExplainSettings {
            api_version: self.api_version.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }

    async fn explain(&self, progress: impl FnMut(RunStage)) -> Result<ExplainReport, RunError> {
        let settings = self.settings();
        let (input, output) = (self.input_soql_csv.as_path(), self.output_csv.as_path());

        match (&self.instance_url, &self.access_token) {
            (Some(instance_url), Some(access_token)) => {
                let credentials = SalesforceCredentials::new(
                    instance_url.as_str(),
                    access_token.as_str(),
                    settings.api_version.as_str(),
                );
                let resolver = StaticCredentialResolver::new(credentials);
                run_explain(&resolver, &self.username, &settings, input, output, progress).await
            }
            _ => {
                let resolver = SfCliCredentialResolver::with_program(&self.sf_bin);
                run_explain(&resolver, &self.username, &settings, input, output, progress).await
            }
        }
    }
}

fn main() {
    apexscan::init_tracing();
    let cli = Cli::parse();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| {
            eprintln!("[ERROR] Failed to start async runtime: {e}");
            std::process::exit(1);
        });

    runtime.block_on(run(cli));
}

async fn run(cli: Cli) {
    let result = cli
        .explain(|stage| match stage {
            RunStage::Connecting => {
                println!("[INFO] Fetching Salesforce org authentication details...")
            }
            RunStage::Processing => println!("[INFO] Processing SOQL explain plans..."),
        })
        .await;

    let report = result.unwrap_or_else(|e| {
        match &e {
            RunError::Auth(_) | RunError::Client(_) => {
                eprintln!("[ERROR] Failed to retrieve org credentials: {e}")
            }
            _ => eprintln!("[ERROR] Failed to process {}: {e}", cli.input_soql_csv.display()),
        }
        std::process::exit(1);
    });

    println!("[SUCCESS] CSV written to: {}", report.csv_path.display());
    println!("[SUCCESS] HTML written to: {}", report.html_path.display());
}
