//! Core business logic module
//!
//! This module contains the purchase protocol and the ledger it runs
//! against:
//! - `traits` - The ledger client interface everything depends on
//! - `ledger` - In-memory reference ledger with atomic group execution
//! - `issuer` - The reserve authority's purchase-rule evaluator
//! - `shared` - Task-safe shared ledger handle for concurrent bootstrap

pub mod issuer;
pub mod ledger;
pub mod shared;
pub mod traits;

pub use issuer::{IssuerParams, TokenIssuer, DEFAULT_FEE_CAP, DEFAULT_PRICE, DEFAULT_UNIT};
pub use ledger::{Ledger, TxReceipt};
pub use shared::SharedLedger;
pub use traits::LedgerClient;
