//! Scan Apex classes for embedded SOQL and write the findings to a CSV.
//!
//! ```sh
//! apex-soql-extractor --folder-cls force-app/main/default/classes --output-csv soql.csv
//! ```

use std::path::PathBuf;

use apexscan::extractor::{extract_to_csv, Extractor};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "apex-soql-extractor")]
#[command(about = "Extract SOQL queries, SOSL searches and DML operations from Apex classes", long_about = None)]
#[command(version)]
struct Cli {
    /// Folder containing Apex .cls files (searched recursively)
    #[arg(long = "folder-cls")]
    folder_cls: PathBuf,

    /// Path of the CSV to write
    #[arg(long = "output-csv")]
    output_csv: PathBuf,
}

fn main() {
    apexscan::init_tracing();
    let cli = Cli::parse();

    let extractor = Extractor::new().unwrap_or_else(|e| {
        eprintln!("[ERROR] Failed to build extraction rules: {e}");
        std::process::exit(1);
    });

    let count = extract_to_csv(&extractor, &cli.folder_cls, &cli.output_csv).unwrap_or_else(|e| {
        eprintln!("[ERROR] Extraction failed: {e}");
        std::process::exit(1);
    });

    println!(
        "Extracted {count} SOQL queries to {}",
        cli.output_csv.display()
    );
}
