//! Deployment manifest parsing
//!
//! A manifest is a YAML file describing one self-contained deployment run:
//! the master account's genesis balance, the named accounts to fund, the
//! asset definitions (by name, the way an asset file declares them), the
//! deployment to perform, and an optional list of purchases to attempt.
//!
//! Named accounts have no keys; their addresses derive from their names so
//! that a manifest produces the same addresses on every run.
//!
//! # Example
//!
//! ```yaml
//! master:
//!   balance: 1000000000
//! accounts:
//!   - name: alice
//!     fund: 5000000
//!   - name: bob
//!     fund: 1000000
//! assets:
//!   wizcoin:
//!     total: 69
//!     unit_name: WZC
//! deployment:
//!   asset: wizcoin
//!   creator: alice
//!   opt_in: [bob]
//! purchases:
//!   - buyer: bob
//!     payment: 1000
//! ```

use super::DeployError;
use crate::core::issuer::{DEFAULT_FEE_CAP, DEFAULT_PRICE, DEFAULT_UNIT};
use crate::types::{Address, AssetParams};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

fn default_master_name() -> String {
    "master".to_string()
}

fn default_master_balance() -> u64 {
    1_000_000_000
}

fn default_fee() -> u64 {
    1_000
}

fn default_price() -> u64 {
    DEFAULT_PRICE
}

fn default_unit() -> u64 {
    DEFAULT_UNIT
}

fn default_fee_cap() -> u64 {
    DEFAULT_FEE_CAP
}

fn default_authority_fund() -> u64 {
    300_000
}

/// The master (genesis) account definition
#[derive(Debug, Clone, Deserialize)]
pub struct MasterDef {
    /// Account name; addresses derive from names
    #[serde(default = "default_master_name")]
    pub name: String,

    /// Genesis balance in micro-units
    #[serde(default = "default_master_balance")]
    pub balance: u64,
}

impl Default for MasterDef {
    fn default() -> Self {
        MasterDef {
            name: default_master_name(),
            balance: default_master_balance(),
        }
    }
}

/// A named account to fund from the master account
#[derive(Debug, Clone, Deserialize)]
pub struct AccountDef {
    /// Account name
    pub name: String,

    /// Micro-units transferred from the master account
    pub fund: u64,
}

/// A named asset definition
///
/// Mirrors the shape of an asset-definition file entry: total supply, unit
/// name, optional display name, decimals, and the default-frozen flag.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetDef {
    /// Total supply, fixed forever at creation
    pub total: u64,

    /// Display decimals
    #[serde(default)]
    pub decimals: u8,

    /// Short ticker-style unit name
    pub unit_name: String,

    /// Full asset name; defaults to the definition's key
    #[serde(default)]
    pub asset_name: String,

    /// Whether holdings start frozen
    #[serde(default)]
    pub default_frozen: bool,
}

/// The deployment to perform
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentDef {
    /// Name of the asset definition to deploy
    pub asset: String,

    /// Named account creating the asset (becomes manager)
    pub creator: String,

    /// Named accounts to opt into the asset after creation
    #[serde(default)]
    pub opt_in: Vec<String>,

    /// Purchase price in micro-units
    #[serde(default = "default_price")]
    pub price: u64,

    /// Asset units transferred per purchase
    #[serde(default = "default_unit")]
    pub unit: u64,

    /// Strict upper bound on the transfer leg's fee
    #[serde(default = "default_fee_cap")]
    pub fee_cap: u64,

    /// Micro-units paid to the authority account before it opts in
    ///
    /// Must cover the authority's raised minimum-balance floor plus fee
    /// headroom; the protocol does not self-fund.
    #[serde(default = "default_authority_fund")]
    pub authority_fund: u64,
}

/// A purchase to attempt after deployment
#[derive(Debug, Clone, Deserialize)]
pub struct PurchaseDef {
    /// Named buyer account
    pub buyer: String,

    /// Payment offered, in micro-units
    #[serde(default = "default_price")]
    pub payment: u64,
}

/// A full deployment manifest
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Master account seeded at genesis
    #[serde(default)]
    pub master: MasterDef,

    /// Accounts funded from the master account
    pub accounts: Vec<AccountDef>,

    /// Asset definitions by name
    pub assets: BTreeMap<String, AssetDef>,

    /// The deployment to perform
    pub deployment: DeploymentDef,

    /// Flat network fee applied to generated transactions
    #[serde(default = "default_fee")]
    pub fee: u64,

    /// Purchases to attempt after deployment
    #[serde(default)]
    pub purchases: Vec<PurchaseDef>,
}

impl Manifest {
    /// Load and validate a manifest from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or
    /// fails cross-reference validation (see [`validate`](Self::validate)).
    pub fn load(path: &Path) -> Result<Self, DeployError> {
        let text = fs::read_to_string(path)?;
        let manifest: Manifest = serde_yaml::from_str(&text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate cross-references within the manifest
    ///
    /// Checks that account names are unique, the deployed asset is defined,
    /// and every referenced account (creator, opt-in list, buyers) is
    /// declared.
    pub fn validate(&self) -> Result<(), DeployError> {
        let mut names = HashSet::new();
        for account in &self.accounts {
            if !names.insert(account.name.as_str()) {
                return Err(DeployError::DuplicateAccount {
                    name: account.name.clone(),
                });
            }
        }

        if !self.assets.contains_key(&self.deployment.asset) {
            return Err(DeployError::UnknownAsset {
                name: self.deployment.asset.clone(),
            });
        }

        let known = |name: &str| names.contains(name);
        if !known(&self.deployment.creator) {
            return Err(DeployError::UnknownAccount {
                name: self.deployment.creator.clone(),
            });
        }
        for name in &self.deployment.opt_in {
            if !known(name) {
                return Err(DeployError::UnknownAccount { name: name.clone() });
            }
        }
        for purchase in &self.purchases {
            if !known(&purchase.buyer) {
                return Err(DeployError::UnknownAccount {
                    name: purchase.buyer.clone(),
                });
            }
        }
        Ok(())
    }

    /// Build creation parameters for a named asset definition
    ///
    /// An empty `asset_name` falls back to the definition's key.
    pub fn asset_params(&self, name: &str) -> Option<AssetParams> {
        self.assets.get(name).map(|def| AssetParams {
            total: def.total,
            decimals: def.decimals,
            unit_name: def.unit_name.clone(),
            asset_name: if def.asset_name.is_empty() {
                name.to_string()
            } else {
                def.asset_name.clone()
            },
            default_frozen: def.default_frozen,
        })
    }

    /// Address of the master account
    pub fn master_address(&self) -> Address {
        Address::named(&self.master.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MANIFEST: &str = "\
master:
  balance: 1000000000
accounts:
  - name: alice
    fund: 5000000
  - name: john
    fund: 5000000
  - name: bob
    fund: 1000000
assets:
  wizcoin:
    total: 69
    unit_name: WZC
deployment:
  asset: wizcoin
  creator: alice
  opt_in: [bob]
purchases:
  - buyer: bob
    payment: 1000
";

    fn parse(text: &str) -> Manifest {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MANIFEST.as_bytes()).unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        assert_eq!(manifest.accounts.len(), 3);
        assert_eq!(manifest.deployment.asset, "wizcoin");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Manifest::load(Path::new("no/such/manifest.yaml"));
        assert!(matches!(result.unwrap_err(), DeployError::Io(_)));
    }

    #[test]
    fn test_defaults_are_applied() {
        let manifest = parse(MANIFEST);
        assert_eq!(manifest.master.name, "master");
        assert_eq!(manifest.fee, 1_000);
        assert_eq!(manifest.deployment.price, DEFAULT_PRICE);
        assert_eq!(manifest.deployment.unit, DEFAULT_UNIT);
        assert_eq!(manifest.deployment.fee_cap, DEFAULT_FEE_CAP);
        assert_eq!(manifest.deployment.authority_fund, 300_000);

        let wizcoin = &manifest.assets["wizcoin"];
        assert_eq!(wizcoin.decimals, 0);
        assert!(!wizcoin.default_frozen);
    }

    #[test]
    fn test_asset_params_falls_back_to_key_name() {
        let manifest = parse(MANIFEST);
        let params = manifest.asset_params("wizcoin").unwrap();
        assert_eq!(params.asset_name, "wizcoin");
        assert_eq!(params.unit_name, "WZC");
        assert_eq!(params.total, 69);

        assert!(manifest.asset_params("goldcoin").is_none());
    }

    #[test]
    fn test_validate_rejects_unknown_asset() {
        let mut manifest = parse(MANIFEST);
        manifest.deployment.asset = "goldcoin".to_string();
        assert!(matches!(
            manifest.validate().unwrap_err(),
            DeployError::UnknownAsset { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_creator() {
        let mut manifest = parse(MANIFEST);
        manifest.deployment.creator = "mallory".to_string();
        assert!(matches!(
            manifest.validate().unwrap_err(),
            DeployError::UnknownAccount { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_buyer() {
        let mut manifest = parse(MANIFEST);
        manifest.purchases.push(PurchaseDef {
            buyer: "mallory".to_string(),
            payment: 1_000,
        });
        assert!(matches!(
            manifest.validate().unwrap_err(),
            DeployError::UnknownAccount { .. }
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_accounts() {
        let mut manifest = parse(MANIFEST);
        manifest.accounts.push(AccountDef {
            name: "alice".to_string(),
            fund: 1,
        });
        assert!(matches!(
            manifest.validate().unwrap_err(),
            DeployError::DuplicateAccount { .. }
        ));
    }
}
