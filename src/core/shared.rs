//! Shared ledger handle for concurrent bootstrap use
//!
//! This module provides a cloneable, task-safe wrapper around any
//! [`LedgerClient`]. Bootstrap funding issues transfers to disjoint
//! accounts concurrently; the handle serializes all mutation through an
//! async read-write lock, matching the atomic-commit serialization a real
//! ledger provides.

use crate::core::ledger::TxReceipt;
use crate::core::traits::LedgerClient;
use crate::types::{Address, AssetId, LedgerError, SignedTransaction, TransactionGroup};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cloneable handle to a ledger shared across async tasks
///
/// Clones share the same underlying ledger. Writers (transaction and group
/// execution, opt-in) take the write lock; queries take the read lock.
#[derive(Debug)]
pub struct SharedLedger<L> {
    inner: Arc<RwLock<L>>,
}

impl<L> Clone for SharedLedger<L> {
    fn clone(&self) -> Self {
        SharedLedger {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L: LedgerClient> SharedLedger<L> {
    /// Wrap a ledger for shared use
    pub fn new(ledger: L) -> Self {
        SharedLedger {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Execute a single transaction
    pub async fn execute_transaction(
        &self,
        stx: &SignedTransaction,
    ) -> Result<TxReceipt, LedgerError> {
        self.inner.write().await.execute_transaction(stx)
    }

    /// Execute an atomic transaction group
    pub async fn execute_group(
        &self,
        group: &TransactionGroup,
    ) -> Result<Vec<TxReceipt>, LedgerError> {
        self.inner.write().await.execute_group(group)
    }

    /// Amount of an asset held by an account, `None` if not opted in
    pub async fn asset_holding(&self, account: Address, asset: AssetId) -> Option<u64> {
        self.inner.read().await.asset_holding(account, asset)
    }

    /// Opt an account into an asset
    pub async fn opt_in(&self, account: Address, asset: AssetId) -> Result<(), LedgerError> {
        self.inner.write().await.opt_in(account, asset)
    }

    /// Run a read-only closure against the ledger
    ///
    /// Used for queries the trait does not cover, such as report
    /// generation over the final state.
    pub async fn with<R>(&self, f: impl FnOnce(&L) -> R) -> R {
        let guard = self.inner.read().await;
        f(&guard)
    }

    /// Recover the ledger if this is the last handle
    pub fn try_into_inner(self) -> Option<L> {
        Arc::try_unwrap(self.inner).ok().map(RwLock::into_inner)
    }
}
