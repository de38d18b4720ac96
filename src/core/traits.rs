//! Ledger client trait
//!
//! This module defines the interface everything above the ledger depends
//! on. The purchase protocol and the deployment tooling never mutate ledger
//! state directly; all state changes are requested through this interface
//! and accepted or rejected as a unit. The in-memory [`Ledger`] is one
//! implementation; a networked client would be another.
//!
//! [`Ledger`]: crate::core::ledger::Ledger

use crate::core::ledger::TxReceipt;
use crate::types::{Address, AssetId, LedgerError, SignedTransaction, TransactionGroup};

/// Interface consumed from the ledger
///
/// Mirrors what a node client exposes: single-transaction execution,
/// atomic group execution, holding queries, and opt-in.
pub trait LedgerClient {
    /// Execute a single transaction
    fn execute_transaction(&mut self, stx: &SignedTransaction) -> Result<TxReceipt, LedgerError>;

    /// Execute an atomic transaction group; all legs apply or none do
    fn execute_group(&mut self, group: &TransactionGroup) -> Result<Vec<TxReceipt>, LedgerError>;

    /// Amount of an asset held by an account, `None` if not opted in
    fn asset_holding(&self, account: Address, asset: AssetId) -> Option<u64>;

    /// Opt an account into an asset, creating a zero holding slot
    fn opt_in(&mut self, account: Address, asset: AssetId) -> Result<(), LedgerError>;
}
