//! Deployment and bootstrap operations
//!
//! This module drives an asset from nothing to purchasable: fund the named
//! accounts from the master account, create the asset, opt accounts in,
//! then hand control of the supply to the reserve authority.
//!
//! Funding transfers target disjoint accounts and are issued concurrently
//! with bounded parallelism; no ordering guarantee exists between them.
//! Everything after funding is sequential: each step depends on the one
//! before it.
//!
//! The administrative hand-off (reserve reassignment plus full-supply
//! transfer) is a one-time step tracked by an explicit lifecycle state
//! machine; repeating it or running steps out of order is rejected here,
//! not by the ledger.

use super::manifest::Manifest;
use super::DeployError;
use crate::core::issuer::{IssuerParams, TokenIssuer};
use crate::core::ledger::TxReceipt;
use crate::core::shared::SharedLedger;
use crate::core::traits::LedgerClient;
use crate::types::{
    Address, AssetConfigUpdate, AssetId, SignedTransaction, Transaction, TransactionGroup,
};
use futures::stream::{self, StreamExt};

/// Configuration for bootstrap execution
///
/// Controls the flat fee attached to generated transactions and the number
/// of funding transfers in flight at once.
#[derive(Clone, Debug)]
pub struct BootstrapConfig {
    /// Flat network fee for generated transactions, in micro-units
    pub fee: u64,

    /// Maximum number of funding transfers in flight concurrently
    pub max_concurrent: usize,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            fee: 1_000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BootstrapConfig {
    /// Create a BootstrapConfig with custom values
    ///
    /// A zero `max_concurrent` falls back to the default with a warning on
    /// stderr.
    pub fn new(fee: u64, max_concurrent: usize) -> Self {
        let default = Self::default();

        let max_concurrent = if max_concurrent == 0 {
            eprintln!(
                "Warning: Invalid max_concurrent ({}), using default ({})",
                max_concurrent, default.max_concurrent
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            fee,
            max_concurrent,
        }
    }
}

/// Lifecycle of a deployed asset
///
/// `Created → ReserveReassigned → SupplyFunded → Purchasable`. No
/// transition returns to an earlier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentState {
    /// Asset created; all authorities still point at the creator
    Created,

    /// Reserve authority reassigned to the derived issuer address
    ReserveReassigned,

    /// The issuer account holds the full supply
    SupplyFunded,

    /// Steady state; purchases may be submitted
    Purchasable,
}

impl std::fmt::Display for DeploymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DeploymentState::Created => "created",
            DeploymentState::ReserveReassigned => "reserve-reassigned",
            DeploymentState::SupplyFunded => "supply-funded",
            DeploymentState::Purchasable => "purchasable",
        };
        write!(f, "{name}")
    }
}

/// One asset's deployment, tracked through its lifecycle
///
/// Owns the protocol instantiation for the asset and guards the one-time
/// administrative steps against repetition.
#[derive(Debug, Clone)]
pub struct Deployment {
    asset: AssetId,
    creator: Address,
    issuer: TokenIssuer,
    state: DeploymentState,
}

impl Deployment {
    /// Track a freshly created asset
    pub fn new(asset: AssetId, creator: Address, issuer: TokenIssuer) -> Self {
        Deployment {
            asset,
            creator,
            issuer,
            state: DeploymentState::Created,
        }
    }

    /// The deployed asset id
    pub fn asset(&self) -> AssetId {
        self.asset
    }

    /// The creating (manager) account
    pub fn creator(&self) -> Address {
        self.creator
    }

    /// The protocol instantiation for this asset
    pub fn issuer(&self) -> &TokenIssuer {
        &self.issuer
    }

    /// Current lifecycle state
    pub fn state(&self) -> DeploymentState {
        self.state
    }

    // Advance the lifecycle, rejecting out-of-order or repeated steps.
    fn advance(
        &mut self,
        from: DeploymentState,
        to: DeploymentState,
        step: &str,
    ) -> Result<(), DeployError> {
        if self.state != from {
            return Err(DeployError::LifecycleViolation {
                step: step.to_string(),
                state: self.state.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}

/// Fund accounts from the master account, concurrently
///
/// Each target receives one payment. Transfers go out with at most
/// `config.max_concurrent` in flight; targets are disjoint so no ordering
/// is needed between them.
///
/// # Errors
///
/// Returns the first failed transfer. Transfers already committed stay
/// committed; funding is not atomic across targets.
pub async fn fund_accounts<L>(
    ledger: &SharedLedger<L>,
    master: Address,
    targets: Vec<(Address, u64)>,
    config: &BootstrapConfig,
) -> Result<Vec<TxReceipt>, DeployError>
where
    L: LedgerClient + Send + Sync,
{
    let fee = config.fee;
    let results: Vec<Result<TxReceipt, _>> = stream::iter(targets)
        .map(|(address, amount)| {
            let ledger = ledger.clone();
            async move {
                let stx = SignedTransaction::with_key(Transaction::payment(
                    master, address, amount, fee,
                ));
                ledger.execute_transaction(&stx).await
            }
        })
        .buffer_unordered(config.max_concurrent)
        .collect()
        .await;

    let receipts = results.into_iter().collect::<Result<Vec<_>, _>>()?;
    Ok(receipts)
}

/// Create an asset and start tracking its deployment
///
/// The creator becomes manager, reserve, freeze, and clawback authority and
/// implicitly holds the entire supply.
pub async fn create_asset<L>(
    ledger: &SharedLedger<L>,
    manifest: &Manifest,
    config: &BootstrapConfig,
) -> Result<Deployment, DeployError>
where
    L: LedgerClient + Send + Sync,
{
    let name = &manifest.deployment.asset;
    let params = manifest
        .asset_params(name)
        .ok_or_else(|| DeployError::UnknownAsset { name: name.clone() })?;
    let creator = Address::named(&manifest.deployment.creator);

    let receipt = ledger
        .execute_transaction(&SignedTransaction::with_key(Transaction::asset_create(
            creator, params, config.fee,
        )))
        .await?;
    let asset = receipt
        .created_asset
        .ok_or(DeployError::MissingAssetId)?;

    let issuer = TokenIssuer::new(IssuerParams {
        asset,
        price: manifest.deployment.price,
        unit: manifest.deployment.unit,
        fee_cap: manifest.deployment.fee_cap,
    });
    Ok(Deployment::new(asset, creator, issuer))
}

/// Opt the manifest's listed accounts into the asset
pub async fn opt_in_accounts<L>(
    ledger: &SharedLedger<L>,
    manifest: &Manifest,
    asset: AssetId,
) -> Result<(), DeployError>
where
    L: LedgerClient + Send + Sync,
{
    for name in &manifest.deployment.opt_in {
        ledger.opt_in(Address::named(name), asset).await?;
    }
    Ok(())
}

/// Hand control of the supply to the reserve authority
///
/// One-time administrative step, performed by the creator:
/// 1. fund the authority account (its minimum-balance floor plus fee
///    headroom; the protocol does not self-fund),
/// 2. opt the authority into the asset,
/// 3. atomically reassign the asset's reserve authority to the derived
///    address and transfer the entire supply to it.
///
/// # Errors
///
/// Returns a lifecycle violation if the deployment is past `Created`, or
/// the ledger error if any step is rejected.
pub async fn issue_reserve<L>(
    ledger: &SharedLedger<L>,
    deployment: &mut Deployment,
    authority_fund: u64,
    config: &BootstrapConfig,
) -> Result<(), DeployError>
where
    L: LedgerClient + Send + Sync,
{
    if deployment.state() != DeploymentState::Created {
        return Err(DeployError::LifecycleViolation {
            step: "issue-reserve".to_string(),
            state: deployment.state().to_string(),
        });
    }

    let creator = deployment.creator();
    let authority = deployment.issuer().address();
    let asset = deployment.asset();

    // Fund the authority account and create its holding slot
    ledger
        .execute_transaction(&SignedTransaction::with_key(Transaction::payment(
            creator,
            authority,
            authority_fund,
            config.fee,
        )))
        .await?;
    ledger.opt_in(authority, asset).await?;

    // Reassign the reserve and move the full supply in one atomic group
    let supply = ledger
        .asset_holding(creator, asset)
        .await
        .ok_or_else(|| {
            DeployError::Ledger(crate::types::LedgerError::not_opted_in(creator, asset))
        })?;
    let group = TransactionGroup::pair(
        SignedTransaction::with_key(Transaction::asset_config(
            creator,
            asset,
            AssetConfigUpdate::reserve(authority),
            config.fee,
        )),
        SignedTransaction::with_key(Transaction::asset_transfer(
            creator, asset, authority, supply, config.fee,
        )),
    );
    ledger.execute_group(&group).await?;

    deployment.advance(
        DeploymentState::Created,
        DeploymentState::ReserveReassigned,
        "reassign-reserve",
    )?;
    deployment.advance(
        DeploymentState::ReserveReassigned,
        DeploymentState::SupplyFunded,
        "fund-supply",
    )?;
    deployment.advance(
        DeploymentState::SupplyFunded,
        DeploymentState::Purchasable,
        "open-purchases",
    )?;
    Ok(())
}

/// Submit one purchase against a purchasable deployment
///
/// Builds the two-leg group (payment from the buyer, logic-authorized
/// transfer back) and executes it atomically.
///
/// # Errors
///
/// Returns the ledger's rejection if the group fails authorization or any
/// validity rule; no leg applies in that case.
pub async fn purchase<L>(
    ledger: &SharedLedger<L>,
    issuer: &TokenIssuer,
    buyer: Address,
    payment: u64,
    fee: u64,
) -> Result<(), DeployError>
where
    L: LedgerClient + Send + Sync,
{
    let group = issuer.purchase_group(buyer, payment, fee);
    ledger.execute_group(&group).await?;
    Ok(())
}

/// Run a manifest's full bootstrap: fund, create, opt in, issue reserve
///
/// Assumes the master account is already seeded. Returns the purchasable
/// deployment.
pub async fn bootstrap<L>(
    ledger: &SharedLedger<L>,
    manifest: &Manifest,
    config: &BootstrapConfig,
) -> Result<Deployment, DeployError>
where
    L: LedgerClient + Send + Sync,
{
    let master = manifest.master_address();
    let targets: Vec<(Address, u64)> = manifest
        .accounts
        .iter()
        .map(|account| (Address::named(&account.name), account.fund))
        .collect();
    fund_accounts(ledger, master, targets, config).await?;

    let mut deployment = create_asset(ledger, manifest, config).await?;
    opt_in_accounts(ledger, manifest, deployment.asset()).await?;
    issue_reserve(
        ledger,
        &mut deployment,
        manifest.deployment.authority_fund,
        config,
    )
    .await?;
    Ok(deployment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ledger::Ledger;
    use crate::types::{BASE_MIN_BALANCE, HOLDING_MIN_BALANCE};

    fn manifest() -> Manifest {
        serde_yaml::from_str(
            "\
master:
  balance: 1000000000
accounts:
  - name: alice
    fund: 10000000
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
",
        )
        .unwrap()
    }

    fn seeded_ledger(manifest: &Manifest) -> SharedLedger<Ledger> {
        let mut ledger = Ledger::new();
        ledger.seed_account(manifest.master_address(), manifest.master.balance);
        SharedLedger::new(ledger)
    }

    #[test]
    fn test_config_zero_max_concurrent_falls_back() {
        let config = BootstrapConfig::new(500, 0);
        assert_eq!(config.fee, 500);
        assert_eq!(config.max_concurrent, num_cpus::get());
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(DeploymentState::Created.to_string(), "created");
        assert_eq!(DeploymentState::Purchasable.to_string(), "purchasable");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_fund_accounts_reaches_every_target() {
        let manifest = manifest();
        let ledger = seeded_ledger(&manifest);
        let config = BootstrapConfig::default();

        let targets: Vec<(Address, u64)> = manifest
            .accounts
            .iter()
            .map(|a| (Address::named(&a.name), a.fund))
            .collect();
        let receipts = fund_accounts(&ledger, manifest.master_address(), targets, &config)
            .await
            .unwrap();

        assert_eq!(receipts.len(), 3);
        let balances = ledger
            .with(|l| {
                (
                    l.balance(Address::named("alice")),
                    l.balance(Address::named("john")),
                    l.balance(Address::named("bob")),
                )
            })
            .await;
        assert_eq!(balances, (10_000_000, 5_000_000, 1_000_000));
    }

    #[tokio::test]
    async fn test_fund_accounts_propagates_rejection() {
        let manifest = manifest();
        let ledger = seeded_ledger(&manifest);
        let config = BootstrapConfig::default();

        // A target below the minimum-balance floor is rejected
        let result = fund_accounts(
            &ledger,
            manifest.master_address(),
            vec![(Address::named("dust"), BASE_MIN_BALANCE - 1)],
            &config,
        )
        .await;
        assert!(matches!(result.unwrap_err(), DeployError::Ledger(_)));
    }

    #[tokio::test]
    async fn test_bootstrap_reaches_purchasable() {
        let manifest = manifest();
        let ledger = seeded_ledger(&manifest);
        let config = BootstrapConfig::default();

        let deployment = bootstrap(&ledger, &manifest, &config).await.unwrap();
        assert_eq!(deployment.state(), DeploymentState::Purchasable);

        let authority = deployment.issuer().address();
        let asset = deployment.asset();

        // The authority holds the full supply; the creator holds none
        assert_eq!(ledger.asset_holding(authority, asset).await, Some(69));
        assert_eq!(
            ledger
                .asset_holding(Address::named("alice"), asset)
                .await,
            Some(0)
        );
        // The reserve authority now points at the issuer address
        let reserve = ledger.with(|l| l.asset(asset).unwrap().reserve).await;
        assert_eq!(reserve, authority);
    }

    #[tokio::test]
    async fn test_issue_reserve_twice_is_rejected() {
        let manifest = manifest();
        let ledger = seeded_ledger(&manifest);
        let config = BootstrapConfig::default();

        let mut deployment = bootstrap(&ledger, &manifest, &config).await.unwrap();
        let result = issue_reserve(&ledger, &mut deployment, 300_000, &config).await;
        assert!(matches!(
            result.unwrap_err(),
            DeployError::LifecycleViolation { .. }
        ));
    }

    #[tokio::test]
    async fn test_authority_fund_covers_min_balance() {
        let manifest = manifest();
        let ledger = seeded_ledger(&manifest);
        let config = BootstrapConfig::default();

        let deployment = bootstrap(&ledger, &manifest, &config).await.unwrap();
        let authority = deployment.issuer().address();
        let balance = ledger.with(|l| l.balance(authority)).await;
        assert!(balance >= BASE_MIN_BALANCE + HOLDING_MIN_BALANCE);
    }

    #[tokio::test]
    async fn test_purchase_moves_one_unit() {
        let manifest = manifest();
        let ledger = seeded_ledger(&manifest);
        let config = BootstrapConfig::default();
        let deployment = bootstrap(&ledger, &manifest, &config).await.unwrap();

        let bob = Address::named("bob");
        purchase(&ledger, deployment.issuer(), bob, 1_000, config.fee)
            .await
            .unwrap();

        let asset = deployment.asset();
        assert_eq!(ledger.asset_holding(bob, asset).await, Some(1));
        assert_eq!(
            ledger
                .asset_holding(deployment.issuer().address(), asset)
                .await,
            Some(68)
        );
    }
}
