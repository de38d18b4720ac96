//! I/O module
//!
//! Handles CSV report output.
//!
//! # Components
//!
//! - `report` - Final-state report formats (accounts, holdings)

pub mod report;

pub use report::{write_accounts_csv, write_holdings_csv, AccountRow, HoldingRow};
