//! Core data types
//!
//! This module defines the data model shared by the ledger, the purchase
//! protocol, and the deployment tooling:
//! - `address` - Fixed-length account identifiers and derivation
//! - `account` - Account state and minimum-balance rules
//! - `asset` - Assets, holdings, and authority updates
//! - `transaction` - Transactions, authorizations, and atomic groups
//! - `error` - Error taxonomy for ledger and protocol failures

pub mod account;
pub mod address;
pub mod asset;
pub mod error;
pub mod transaction;

pub use account::{Account, BASE_MIN_BALANCE, HOLDING_MIN_BALANCE};
pub use address::Address;
pub use asset::{Asset, AssetConfigUpdate, AssetHolding, AssetId, AssetParams};
pub use error::{DenialReason, LedgerError};
pub use transaction::{
    Authorization, LogicSignature, SignedTransaction, Transaction, TransactionGroup,
    TransactionKind, MAX_GROUP_SIZE,
};
