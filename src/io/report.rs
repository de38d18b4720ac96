//! CSV report output
//!
//! This module centralizes the final-state report formats: account balances
//! and asset holdings, written as CSV with deterministic row order.
//!
//! All functions are pure over their inputs (no ledger access) for easy
//! testing.

use crate::types::{Address, AssetId};
use std::io::Write;

/// One row of the accounts report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    /// Manifest name of the account ("token_issuer" for the authority)
    pub name: String,

    /// The account's address
    pub address: Address,

    /// Balance in micro-units
    pub balance: u64,

    /// The account's minimum-balance floor
    pub min_balance: u64,
}

/// One row of the holdings report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRow {
    /// Manifest name of the account ("token_issuer" for the authority)
    pub name: String,

    /// The account's address
    pub address: Address,

    /// The asset held
    pub asset: AssetId,

    /// The asset's unit name
    pub unit_name: String,

    /// Amount held in base units
    pub amount: u64,
}

/// Write the accounts report as CSV
///
/// Columns: name, address, balance, min_balance. Rows are sorted by name
/// for deterministic output.
///
/// # Errors
///
/// Returns an error message if writing fails.
pub fn write_accounts_csv(rows: &[AccountRow], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["name", "address", "balance", "min_balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));

    for row in sorted {
        writer
            .write_record(&[
                row.name,
                row.address.to_string(),
                row.balance.to_string(),
                row.min_balance.to_string(),
            ])
            .map_err(|e| format!("Failed to write account row: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(())
}

/// Write the holdings report as CSV
///
/// Columns: name, address, asset, unit_name, amount. Rows are sorted by
/// (name, asset) for deterministic output.
///
/// # Errors
///
/// Returns an error message if writing fails.
pub fn write_holdings_csv(rows: &[HoldingRow], output: &mut dyn Write) -> Result<(), String> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["name", "address", "asset", "unit_name", "amount"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.asset.cmp(&b.asset)));

    for row in sorted {
        writer
            .write_record(&[
                row.name,
                row.address.to_string(),
                row.asset.to_string(),
                row.unit_name,
                row.amount.to_string(),
            ])
            .map_err(|e| format!("Failed to write holding row: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;
    Ok(())
}
