use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Deploy a fixed-supply token and run purchases against it
#[derive(Parser, Debug)]
#[command(name = "wizcoin-issuer")]
#[command(
    about = "Deploy a fixed-supply token with a logic-controlled reserve and run purchases",
    long_about = None
)]
pub struct CliArgs {
    /// Deployment manifest path
    #[arg(value_name = "MANIFEST", help = "Path to the YAML deployment manifest")]
    pub manifest: PathBuf,

    /// Report written to stdout after the run
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "holdings",
        help = "Final-state report: 'accounts' for balances or 'holdings' for asset holdings"
    )]
    pub report: ReportKind,

    /// Maximum number of funding transfers in flight (default: CPU cores)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of funding transfers in flight (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,
}

/// Available final-state reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Accounts,
    Holdings,
}

impl CliArgs {
    /// Build RunOptions from CLI arguments
    pub fn to_run_options(&self) -> crate::run::RunOptions {
        crate::run::RunOptions {
            report: self.report,
            max_concurrent: self.max_concurrent,
        }
    }
}
