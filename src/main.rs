//! Wizcoin Issuer CLI
//!
//! Command-line interface for deploying a fixed-supply token with a
//! logic-controlled reserve and running purchases against it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- manifest.yaml > holdings.csv
//! cargo run -- --report accounts manifest.yaml > accounts.csv
//! cargo run -- --max-concurrent 8 manifest.yaml > holdings.csv
//! ```
//!
//! The program loads the deployment manifest, funds the named accounts,
//! creates the asset, hands the supply to the reserve authority, attempts
//! the listed purchases, and writes the final-state report to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success (rejected purchases are reported on stderr but do not fail
//!   the run)
//! - 1: Error (manifest not found or invalid, bootstrap failure, etc.)

use std::process;
use wizcoin_issuer::cli;
use wizcoin_issuer::run;

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();
    let options = args.to_run_options();

    // Run the manifest; the report goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = run::execute(&args.manifest, &options, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
