//! Deployment and bootstrap module
//!
//! This module contains the glue that takes an asset from a manifest to a
//! purchasable deployment:
//! - `manifest` - YAML manifest parsing and validation
//! - `bootstrap` - Funding, asset creation, opt-in, and reserve hand-off

pub mod bootstrap;
pub mod manifest;

pub use bootstrap::{
    bootstrap, create_asset, fund_accounts, issue_reserve, opt_in_accounts, purchase,
    BootstrapConfig, Deployment, DeploymentState,
};
pub use manifest::{AccountDef, AssetDef, DeploymentDef, Manifest, MasterDef, PurchaseDef};

use crate::types::LedgerError;
use thiserror::Error;

/// Errors surfaced by manifest handling and bootstrap execution
#[derive(Debug, Error)]
pub enum DeployError {
    /// The ledger rejected a generated transaction or group
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The manifest file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest file is not valid YAML
    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The manifest references an asset definition that does not exist
    #[error("unknown asset '{name}' in manifest")]
    UnknownAsset {
        /// The missing asset name
        name: String,
    },

    /// The manifest references an account that is not declared
    #[error("unknown account '{name}' in manifest")]
    UnknownAccount {
        /// The missing account name
        name: String,
    },

    /// The manifest declares the same account name twice
    #[error("duplicate account '{name}' in manifest")]
    DuplicateAccount {
        /// The duplicated account name
        name: String,
    },

    /// A one-time deployment step was repeated or run out of order
    #[error("deployment step '{step}' rejected: lifecycle is at '{state}'")]
    LifecycleViolation {
        /// The step that was attempted
        step: String,
        /// The lifecycle state it found
        state: String,
    },

    /// Asset creation committed but returned no asset id
    #[error("asset creation returned no asset id")]
    MissingAssetId,
}
