//! Manifest execution pipeline
//!
//! This module ties the layers together: load a deployment manifest, run
//! the bootstrap and the listed purchases against a fresh in-memory ledger,
//! and write the selected final-state report as CSV.
//!
//! Rejected purchases are recoverable: they are logged to stderr and the
//! run continues with the next purchase. Manifest and bootstrap failures
//! are fatal.

use crate::cli::ReportKind;
use crate::core::ledger::Ledger;
use crate::core::shared::SharedLedger;
use crate::deploy::bootstrap::{bootstrap, purchase, BootstrapConfig, Deployment};
use crate::deploy::manifest::Manifest;
use crate::io::report::{write_accounts_csv, write_holdings_csv, AccountRow, HoldingRow};
use crate::types::Address;
use std::io::Write;
use std::path::Path;

/// Name under which the reserve authority appears in reports
const AUTHORITY_NAME: &str = "token_issuer";

/// Options controlling a manifest run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Which report to write to the output
    pub report: ReportKind,

    /// Funding parallelism override; `None` uses the default (CPU count)
    pub max_concurrent: Option<usize>,
}

/// Execute a manifest and write the final-state report
///
/// Loads and validates the manifest, seeds the master account, runs the
/// bootstrap (funding, asset creation, opt-in, reserve hand-off), attempts
/// each listed purchase, and writes the selected report to `output`.
///
/// # Errors
///
/// Returns an error message if the manifest cannot be loaded, the bootstrap
/// fails, or the report cannot be written. Rejected purchases do not fail
/// the run; they are logged to stderr.
pub fn execute(
    manifest_path: &Path,
    options: &RunOptions,
    output: &mut dyn Write,
) -> Result<(), String> {
    let manifest = Manifest::load(manifest_path).map_err(|e| e.to_string())?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start async runtime: {}", e))?;
    runtime.block_on(run_manifest(&manifest, options, output))
}

async fn run_manifest(
    manifest: &Manifest,
    options: &RunOptions,
    output: &mut dyn Write,
) -> Result<(), String> {
    let config = match options.max_concurrent {
        Some(n) => BootstrapConfig::new(manifest.fee, n),
        None => BootstrapConfig {
            fee: manifest.fee,
            ..Default::default()
        },
    };

    let mut ledger = Ledger::new();
    ledger.seed_account(manifest.master_address(), manifest.master.balance);
    let shared = SharedLedger::new(ledger);

    let deployment = bootstrap(&shared, manifest, &config)
        .await
        .map_err(|e| e.to_string())?;

    for entry in &manifest.purchases {
        let buyer = Address::named(&entry.buyer);
        if let Err(e) = purchase(&shared, deployment.issuer(), buyer, entry.payment, config.fee).await
        {
            eprintln!("Purchase by '{}' rejected: {}", entry.buyer, e);
        }
    }

    write_report(&shared, manifest, &deployment, options.report, output).await
}

async fn write_report(
    shared: &SharedLedger<Ledger>,
    manifest: &Manifest,
    deployment: &Deployment,
    kind: ReportKind,
    output: &mut dyn Write,
) -> Result<(), String> {
    let names = report_names(manifest, deployment);

    match kind {
        ReportKind::Accounts => {
            let rows = shared
                .with(|ledger| {
                    names
                        .iter()
                        .filter_map(|(name, address)| {
                            ledger.account(*address).map(|account| AccountRow {
                                name: name.clone(),
                                address: *address,
                                balance: account.balance,
                                min_balance: account.min_balance(),
                            })
                        })
                        .collect::<Vec<_>>()
                })
                .await;
            write_accounts_csv(&rows, output)
        }
        ReportKind::Holdings => {
            let rows = shared
                .with(|ledger| {
                    let mut rows = Vec::new();
                    for (name, address) in &names {
                        let Some(account) = ledger.account(*address) else {
                            continue;
                        };
                        for (asset, holding) in &account.holdings {
                            let unit_name = ledger
                                .asset(*asset)
                                .map(|a| a.params.unit_name.clone())
                                .unwrap_or_default();
                            rows.push(HoldingRow {
                                name: name.clone(),
                                address: *address,
                                asset: *asset,
                                unit_name,
                                amount: holding.amount,
                            });
                        }
                    }
                    rows
                })
                .await;
            write_holdings_csv(&rows, output)
        }
    }
}

// The named accounts a report covers: master, every manifest account, and
// the reserve authority.
fn report_names(manifest: &Manifest, deployment: &Deployment) -> Vec<(String, Address)> {
    let mut names = vec![(manifest.master.name.clone(), manifest.master_address())];
    for account in &manifest.accounts {
        names.push((account.name.clone(), Address::named(&account.name)));
    }
    names.push((AUTHORITY_NAME.to_string(), deployment.issuer().address()));
    names
}
