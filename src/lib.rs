//! Wizcoin Issuer Library
//! # Overview
//!
//! This library implements a token-purchase transaction-group protocol: a
//! fixed-supply token distributed by a logic-controlled reserve authority
//! that authorizes its own transfer leg only when bundled atomically with a
//! qualifying payment leg.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Address, Account, Asset, Transaction, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::issuer`] - The reserve authority's purchase-rule evaluator
//!   - [`core::ledger`] - In-memory reference ledger with atomic groups
//!   - [`core::shared`] - Task-safe shared ledger handle
//! - [`deploy`] - Deployment manifest and bootstrap operations
//! - [`io`] - CSV report output
//! - [`run`] - Manifest execution pipeline
//!
//! # Purchase Rule
//!
//! A purchase is a two-leg atomic group:
//!
//! - **Leg 0**: a payment from the buyer to the authority, meeting the price
//! - **Leg 1**: an asset transfer of exactly one purchase unit from the
//!   authority back to the buyer
//!
//! The authority authorizes leg 1 only if every check passes: group shape,
//! receiver, price, fee cap, asset, unit amount, buyer payout, and the
//! absence of rekey/close-to fields. Any deviation rejects the whole group
//! with no partial balance change.
//!
//! # Asset Lifecycle
//!
//! `Created → ReserveReassigned → SupplyFunded → Purchasable`. The
//! administrative hand-off (reserve reassignment plus full-supply transfer)
//! is a one-time bootstrap step; repeating it is rejected by the deployment
//! tooling.

// Module declarations
pub mod cli;
pub mod core;
pub mod deploy;
pub mod io;
pub mod run;
pub mod types;

pub use core::{IssuerParams, Ledger, LedgerClient, SharedLedger, TokenIssuer, TxReceipt};
pub use deploy::{BootstrapConfig, DeployError, Deployment, DeploymentState, Manifest};
pub use io::{write_accounts_csv, write_holdings_csv};
pub use types::{
    Account, Address, Asset, AssetHolding, AssetId, AssetParams, DenialReason, LedgerError,
    SignedTransaction, Transaction, TransactionGroup,
};
