//! In-memory reference ledger
//!
//! This module provides the Ledger component backing the purchase protocol
//! and the deployment tooling in tests and demos, the way a real network
//! node would back them in production. It maintains accounts, assets, and
//! holdings, and executes transactions or atomic groups against them.
//!
//! # Atomicity
//!
//! A group is validated and applied against a staged copy of the state;
//! the copy replaces the live state only if every leg succeeds. A rejected
//! group therefore leaves no partial balance change, which is what the
//! purchase protocol's conservation guarantee relies on.
//!
//! # Authorization
//!
//! Key-authorized transactions are admitted as long as the sender account
//! exists (cryptographic validity is out of scope). A logic-authorized
//! transaction is admitted only if the program's derived address equals the
//! sender and the program approves the surrounding group.

use crate::types::{
    Account, Address, Asset, AssetConfigUpdate, AssetHolding, AssetId, AssetParams, Authorization,
    DenialReason, LedgerError, SignedTransaction, Transaction, TransactionGroup, TransactionKind,
};
use std::collections::HashMap;

/// Result of a successfully applied transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxReceipt {
    /// Fee debited from the sender, in micro-units
    pub fee: u64,

    /// Id of the asset created by this transaction, if any
    pub created_asset: Option<AssetId>,
}

/// In-memory ledger state
///
/// Maintains maps of accounts and assets plus the running total of burned
/// fees. All mutation goes through [`execute_transaction`] and
/// [`execute_group`]; queries never mutate.
///
/// [`execute_transaction`]: Ledger::execute_transaction
/// [`execute_group`]: Ledger::execute_group
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Accounts keyed by address
    accounts: HashMap<Address, Account>,

    /// Assets keyed by id
    assets: HashMap<AssetId, Asset>,

    /// Next asset id to assign at creation
    next_asset_id: AssetId,

    /// Total fees debited so far
    ///
    /// Fees leave circulation entirely; tracking the total keeps micro-unit
    /// conservation observable in tests.
    fees_burned: u64,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Ledger {
            accounts: HashMap::new(),
            assets: HashMap::new(),
            next_asset_id: 1,
            fees_burned: 0,
        }
    }

    /// Seed an account with a balance, outside any transaction
    ///
    /// Genesis-style funding for bootstrap: creates the account if needed
    /// and sets its balance. Not reachable through the transaction path.
    pub fn seed_account(&mut self, address: Address, balance: u64) {
        let account = self
            .accounts
            .entry(address)
            .or_insert_with(|| Account::new(address));
        account.balance = balance;
    }

    /// Get an account by address
    pub fn account(&self, address: Address) -> Option<&Account> {
        self.accounts.get(&address)
    }

    /// Balance of an account, or 0 if it does not exist
    pub fn balance(&self, address: Address) -> u64 {
        self.accounts.get(&address).map_or(0, |a| a.balance)
    }

    /// Get an asset by id
    pub fn asset(&self, asset: AssetId) -> Option<&Asset> {
        self.assets.get(&asset)
    }

    /// Amount of an asset held by an account
    ///
    /// `None` means the account does not exist or has not opted in;
    /// `Some(0)` means an opted-in account holding nothing.
    pub fn asset_holding(&self, address: Address, asset: AssetId) -> Option<u64> {
        self.accounts
            .get(&address)
            .and_then(|account| account.holding_amount(asset))
    }

    /// Sum of all holdings of an asset across all accounts
    ///
    /// For any created asset this equals the fixed total supply at every
    /// observation point (conservation law).
    pub fn total_holdings(&self, asset: AssetId) -> u64 {
        self.accounts
            .values()
            .filter_map(|account| account.holding_amount(asset))
            .sum()
    }

    /// Total fees debited so far
    pub fn fees_burned(&self) -> u64 {
        self.fees_burned
    }

    /// All accounts sorted by address for deterministic output
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|account| account.address);
        accounts
    }

    /// Execute a single transaction
    ///
    /// Equivalent to executing a group of one: a logic-authorized
    /// transaction submitted alone is evaluated against a one-leg group,
    /// which the purchase protocol denies.
    ///
    /// # Errors
    ///
    /// Returns an error if authorization or any validity rule fails; the
    /// state is unchanged on error.
    pub fn execute_transaction(
        &mut self,
        stx: &SignedTransaction,
    ) -> Result<TxReceipt, LedgerError> {
        let receipts = self.execute_group(&TransactionGroup::single(stx.clone()))?;
        // A one-leg group always yields exactly one receipt
        Ok(receipts[0])
    }

    /// Execute an atomic transaction group
    ///
    /// Authorization is evaluated first for every leg against the pre-state
    /// group; application is then staged and committed only if every leg
    /// succeeds. Either all legs apply or none do.
    ///
    /// # Errors
    ///
    /// Returns the first authorization or validity error; the state is
    /// unchanged on error.
    pub fn execute_group(
        &mut self,
        group: &TransactionGroup,
    ) -> Result<Vec<TxReceipt>, LedgerError> {
        let legs: Vec<Transaction> = group
            .transactions()
            .iter()
            .map(|stx| stx.txn.clone())
            .collect();

        // Authorization pass: pure, no state touched
        for (index, stx) in group.transactions().iter().enumerate() {
            if let Authorization::Logic(program) = &stx.auth {
                if program.address() != stx.txn.sender {
                    return Err(LedgerError::authorization_denied(
                        program.address(),
                        DenialReason::SenderMismatch {
                            expected: program.address(),
                            actual: stx.txn.sender,
                        },
                    ));
                }
                program
                    .check(&legs, index)
                    .map_err(|reason| LedgerError::authorization_denied(program.address(), reason))?;
            }
        }

        // Staged application: commit only if every leg applies
        let mut staged = self.clone();
        let mut receipts = Vec::with_capacity(group.len());
        for stx in group.transactions() {
            receipts.push(staged.apply(&stx.txn)?);
        }
        *self = staged;
        Ok(receipts)
    }

    /// Opt an account into an asset
    ///
    /// Creates a zero holding slot and raises the account's minimum-balance
    /// floor by one increment; the account's balance must cover the raised
    /// floor.
    ///
    /// # Errors
    ///
    /// Returns an error if the asset or account is unknown, the account is
    /// already opted in, or its balance cannot cover the raised floor.
    pub fn opt_in(&mut self, address: Address, asset: AssetId) -> Result<(), LedgerError> {
        let default_frozen = self
            .assets
            .get(&asset)
            .ok_or(LedgerError::AssetNotFound { asset })?
            .params
            .default_frozen;

        let account = self
            .accounts
            .get_mut(&address)
            .ok_or(LedgerError::AccountNotFound { address })?;
        if account.holdings.contains_key(&asset) {
            return Err(LedgerError::AlreadyOptedIn { address, asset });
        }

        account.holdings.insert(asset, AssetHolding::new(default_frozen));
        let min_balance = account.min_balance();
        if account.balance < min_balance {
            // Undo the slot; the opt-in never happened
            account.holdings.remove(&asset);
            return Err(LedgerError::below_min_balance(
                address,
                account.balance,
                min_balance,
            ));
        }
        Ok(())
    }

    /// Opt an account out of an asset
    ///
    /// Removes the holding slot and lowers the minimum-balance floor. The
    /// holding must be empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the account is unknown, not opted in, or still
    /// holds units of the asset.
    pub fn opt_out(&mut self, address: Address, asset: AssetId) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&address)
            .ok_or(LedgerError::AccountNotFound { address })?;
        let holding = account
            .holdings
            .get(&asset)
            .ok_or(LedgerError::NotOptedIn { address, asset })?;
        if holding.amount != 0 {
            return Err(LedgerError::HoldingNotEmpty {
                address,
                asset,
                amount: holding.amount,
            });
        }
        account.holdings.remove(&asset);
        Ok(())
    }

    // Application of a single validated leg. Runs against the staged copy,
    // so a mid-leg error discards all of its effects.
    fn apply(&mut self, txn: &Transaction) -> Result<TxReceipt, LedgerError> {
        if txn.rekey_to.is_some() {
            return Err(LedgerError::unsupported_field("rekey_to"));
        }

        match &txn.kind {
            TransactionKind::Payment {
                receiver,
                amount,
                close_remainder_to,
            } => {
                if close_remainder_to.is_some() {
                    return Err(LedgerError::unsupported_field("close_remainder_to"));
                }
                self.apply_payment(txn.sender, *receiver, *amount, txn.fee)
            }
            TransactionKind::AssetTransfer {
                asset,
                receiver,
                amount,
                asset_close_to,
            } => {
                if asset_close_to.is_some() {
                    return Err(LedgerError::unsupported_field("asset_close_to"));
                }
                self.apply_asset_transfer(txn.sender, *asset, *receiver, *amount, txn.fee)
            }
            TransactionKind::AssetCreate { params } => {
                self.apply_asset_create(txn.sender, params, txn.fee)
            }
            TransactionKind::AssetConfig { asset, update } => {
                self.apply_asset_config(txn.sender, *asset, update, txn.fee)
            }
        }
    }

    // Debit micro-units from an existing account, enforcing the
    // minimum-balance floor on the remainder.
    fn debit(&mut self, address: Address, amount: u64) -> Result<(), LedgerError> {
        let account = self
            .accounts
            .get_mut(&address)
            .ok_or(LedgerError::AccountNotFound { address })?;
        if account.balance < amount {
            return Err(LedgerError::insufficient_balance(
                address,
                account.balance,
                amount,
            ));
        }
        let remaining = account.balance - amount;
        let min_balance = account.min_balance();
        if remaining < min_balance {
            return Err(LedgerError::below_min_balance(address, remaining, min_balance));
        }
        account.balance = remaining;
        Ok(())
    }

    // Burn a fee out of an account's balance.
    fn debit_fee(&mut self, address: Address, fee: u64, operation: &str) -> Result<(), LedgerError> {
        self.debit(address, fee)?;
        self.fees_burned = self
            .fees_burned
            .checked_add(fee)
            .ok_or_else(|| LedgerError::arithmetic_overflow(operation))?;
        Ok(())
    }

    fn apply_payment(
        &mut self,
        sender: Address,
        receiver: Address,
        amount: u64,
        fee: u64,
    ) -> Result<TxReceipt, LedgerError> {
        let required = amount
            .checked_add(fee)
            .ok_or_else(|| LedgerError::arithmetic_overflow("payment"))?;

        // Debit amount + fee together so the sender-side checks see the
        // full outflow, then burn the fee portion.
        self.debit(sender, required)?;
        self.fees_burned = self
            .fees_burned
            .checked_add(fee)
            .ok_or_else(|| LedgerError::arithmetic_overflow("payment"))?;

        // Receiving accounts are created on first payment
        let receiver_account = self
            .accounts
            .entry(receiver)
            .or_insert_with(|| Account::new(receiver));
        receiver_account.balance = receiver_account
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("payment"))?;
        let min_balance = receiver_account.min_balance();
        if receiver_account.balance < min_balance {
            return Err(LedgerError::below_min_balance(
                receiver,
                receiver_account.balance,
                min_balance,
            ));
        }

        Ok(TxReceipt {
            fee,
            created_asset: None,
        })
    }

    fn apply_asset_transfer(
        &mut self,
        sender: Address,
        asset: AssetId,
        receiver: Address,
        amount: u64,
        fee: u64,
    ) -> Result<TxReceipt, LedgerError> {
        if !self.assets.contains_key(&asset) {
            return Err(LedgerError::AssetNotFound { asset });
        }

        self.debit_fee(sender, fee, "asset transfer")?;

        // Sender side: must be opted in, unfrozen, and hold enough
        let sender_account = self
            .accounts
            .get_mut(&sender)
            .ok_or(LedgerError::AccountNotFound { address: sender })?;
        let holding = sender_account
            .holdings
            .get_mut(&asset)
            .ok_or(LedgerError::NotOptedIn {
                address: sender,
                asset,
            })?;
        if holding.frozen {
            return Err(LedgerError::HoldingFrozen {
                address: sender,
                asset,
            });
        }
        if holding.amount < amount {
            return Err(LedgerError::insufficient_holding(
                sender,
                asset,
                holding.amount,
                amount,
            ));
        }
        holding.amount -= amount;

        // Receiver side: must be opted in and unfrozen; no slot is created
        // implicitly
        let receiver_account = self
            .accounts
            .get_mut(&receiver)
            .ok_or(LedgerError::NotOptedIn {
                address: receiver,
                asset,
            })?;
        let holding = receiver_account
            .holdings
            .get_mut(&asset)
            .ok_or(LedgerError::NotOptedIn {
                address: receiver,
                asset,
            })?;
        if holding.frozen {
            return Err(LedgerError::HoldingFrozen {
                address: receiver,
                asset,
            });
        }
        holding.amount = holding
            .amount
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("asset transfer"))?;

        Ok(TxReceipt {
            fee,
            created_asset: None,
        })
    }

    fn apply_asset_create(
        &mut self,
        sender: Address,
        params: &AssetParams,
        fee: u64,
    ) -> Result<TxReceipt, LedgerError> {
        self.debit_fee(sender, fee, "asset create")?;

        let id = self.next_asset_id;

        // The creator implicitly holds the entire supply; the new slot
        // raises its minimum-balance floor like any other holding.
        let account = self
            .accounts
            .get_mut(&sender)
            .ok_or(LedgerError::AccountNotFound { address: sender })?;
        account.holdings.insert(
            id,
            AssetHolding {
                amount: params.total,
                frozen: false,
            },
        );
        let min_balance = account.min_balance();
        if account.balance < min_balance {
            return Err(LedgerError::below_min_balance(
                sender,
                account.balance,
                min_balance,
            ));
        }

        self.assets.insert(id, Asset::new(id, sender, params.clone()));
        self.next_asset_id += 1;

        Ok(TxReceipt {
            fee,
            created_asset: Some(id),
        })
    }

    fn apply_asset_config(
        &mut self,
        sender: Address,
        asset: AssetId,
        update: &AssetConfigUpdate,
        fee: u64,
    ) -> Result<TxReceipt, LedgerError> {
        {
            let record = self
                .assets
                .get(&asset)
                .ok_or(LedgerError::AssetNotFound { asset })?;
            if record.manager != sender {
                return Err(LedgerError::NotManager { asset, sender });
            }
        }

        self.debit_fee(sender, fee, "asset config")?;

        let record = self
            .assets
            .get_mut(&asset)
            .ok_or(LedgerError::AssetNotFound { asset })?;
        if let Some(manager) = update.manager {
            record.manager = manager;
        }
        if let Some(reserve) = update.reserve {
            record.reserve = reserve;
        }
        if let Some(freeze) = update.freeze {
            record.freeze = freeze;
        }
        if let Some(clawback) = update.clawback {
            record.clawback = clawback;
        }

        Ok(TxReceipt {
            fee,
            created_asset: None,
        })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl crate::core::traits::LedgerClient for Ledger {
    fn execute_transaction(&mut self, stx: &SignedTransaction) -> Result<TxReceipt, LedgerError> {
        Ledger::execute_transaction(self, stx)
    }

    fn execute_group(&mut self, group: &TransactionGroup) -> Result<Vec<TxReceipt>, LedgerError> {
        Ledger::execute_group(self, group)
    }

    fn asset_holding(&self, account: Address, asset: AssetId) -> Option<u64> {
        Ledger::asset_holding(self, account, asset)
    }

    fn opt_in(&mut self, account: Address, asset: AssetId) -> Result<(), LedgerError> {
        Ledger::opt_in(self, account, asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BASE_MIN_BALANCE;

    const FEE: u64 = 1_000;

    fn alice() -> Address {
        Address::named("alice")
    }

    fn bob() -> Address {
        Address::named("bob")
    }

    fn wizcoin_params() -> AssetParams {
        AssetParams {
            total: 69,
            decimals: 0,
            unit_name: "WZC".to_string(),
            asset_name: "wizcoin".to_string(),
            default_frozen: false,
        }
    }

    /// Ledger with alice and bob funded well above the minimum balance
    fn funded_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.seed_account(alice(), 10_000_000);
        ledger.seed_account(bob(), 10_000_000);
        ledger
    }

    fn pay(sender: Address, receiver: Address, amount: u64) -> SignedTransaction {
        SignedTransaction::with_key(Transaction::payment(sender, receiver, amount, FEE))
    }

    fn create_wizcoin(ledger: &mut Ledger) -> AssetId {
        let receipt = ledger
            .execute_transaction(&SignedTransaction::with_key(Transaction::asset_create(
                alice(),
                wizcoin_params(),
                FEE,
            )))
            .unwrap();
        receipt.created_asset.unwrap()
    }

    #[test]
    fn test_payment_moves_funds_and_burns_fee() {
        let mut ledger = funded_ledger();

        let receipt = ledger.execute_transaction(&pay(alice(), bob(), 500_000)).unwrap();
        assert_eq!(receipt.fee, FEE);
        assert_eq!(ledger.balance(alice()), 10_000_000 - 500_000 - FEE);
        assert_eq!(ledger.balance(bob()), 10_500_000);
        assert_eq!(ledger.fees_burned(), FEE);
    }

    #[test]
    fn test_payment_creates_receiver_account() {
        let mut ledger = funded_ledger();
        let charlie = Address::named("charlie");
        assert!(ledger.account(charlie).is_none());

        ledger.execute_transaction(&pay(alice(), charlie, 1_000_000)).unwrap();
        assert_eq!(ledger.balance(charlie), 1_000_000);
    }

    #[test]
    fn test_payment_rejects_unknown_sender() {
        let mut ledger = Ledger::new();
        let result = ledger.execute_transaction(&pay(alice(), bob(), 1_000));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AccountNotFound { .. }
        ));
    }

    #[test]
    fn test_payment_rejects_insufficient_balance() {
        let mut ledger = funded_ledger();
        let result = ledger.execute_transaction(&pay(alice(), bob(), 20_000_000));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientBalance { .. }
        ));
        assert_eq!(ledger.balance(alice()), 10_000_000);
        assert_eq!(ledger.balance(bob()), 10_000_000);
    }

    #[test]
    fn test_payment_rejects_sender_below_min_balance() {
        let mut ledger = funded_ledger();
        // Leave the sender just under the base floor
        let amount = 10_000_000 - FEE - BASE_MIN_BALANCE + 1;
        let result = ledger.execute_transaction(&pay(alice(), bob(), amount));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::BelowMinBalance { .. }
        ));
    }

    #[test]
    fn test_payment_rejects_receiver_below_min_balance() {
        let mut ledger = funded_ledger();
        let charlie = Address::named("charlie");
        let result = ledger.execute_transaction(&pay(alice(), charlie, BASE_MIN_BALANCE - 1));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::BelowMinBalance { .. }
        ));
        assert!(ledger.account(charlie).is_none());
    }

    #[test]
    fn test_rekey_is_unsupported() {
        let mut ledger = funded_ledger();
        let mut txn = Transaction::payment(alice(), bob(), 1_000_000, FEE);
        txn.rekey_to = Some(bob());
        let result = ledger.execute_transaction(&SignedTransaction::with_key(txn));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::UnsupportedField { .. }
        ));
    }

    #[test]
    fn test_asset_create_assigns_supply_and_authorities() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);

        let record = ledger.asset(asset).unwrap();
        assert_eq!(record.creator, alice());
        assert_eq!(record.manager, alice());
        assert_eq!(record.reserve, alice());
        assert_eq!(record.freeze, alice());
        assert_eq!(record.clawback, alice());
        assert_eq!(record.params.total, 69);
        assert!(!record.params.default_frozen);

        assert_eq!(ledger.asset_holding(alice(), asset), Some(69));
        assert_eq!(ledger.total_holdings(asset), 69);
    }

    #[test]
    fn test_asset_ids_are_sequential() {
        let mut ledger = funded_ledger();
        let first = create_wizcoin(&mut ledger);
        let second = create_wizcoin(&mut ledger);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn test_opt_in_creates_empty_holding() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);

        assert_eq!(ledger.asset_holding(bob(), asset), None);
        ledger.opt_in(bob(), asset).unwrap();
        assert_eq!(ledger.asset_holding(bob(), asset), Some(0));
    }

    #[test]
    fn test_opt_in_twice_is_rejected() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        ledger.opt_in(bob(), asset).unwrap();

        let result = ledger.opt_in(bob(), asset);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::AlreadyOptedIn { .. }
        ));
    }

    #[test]
    fn test_opt_in_unknown_asset_is_rejected() {
        let mut ledger = funded_ledger();
        let result = ledger.opt_in(bob(), 99);
        assert!(matches!(result.unwrap_err(), LedgerError::AssetNotFound { .. }));
    }

    #[test]
    fn test_opt_in_requires_raised_min_balance() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);

        let poor = Address::named("poor");
        ledger.seed_account(poor, BASE_MIN_BALANCE);
        let result = ledger.opt_in(poor, asset);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::BelowMinBalance { .. }
        ));
        // The failed opt-in left no slot behind
        assert_eq!(ledger.asset_holding(poor, asset), None);
    }

    #[test]
    fn test_opt_out_requires_empty_holding() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        ledger.opt_in(bob(), asset).unwrap();

        ledger
            .execute_transaction(&SignedTransaction::with_key(Transaction::asset_transfer(
                alice(),
                asset,
                bob(),
                3,
                FEE,
            )))
            .unwrap();

        let result = ledger.opt_out(bob(), asset);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::HoldingNotEmpty { amount: 3, .. }
        ));

        ledger
            .execute_transaction(&SignedTransaction::with_key(Transaction::asset_transfer(
                bob(),
                asset,
                alice(),
                3,
                FEE,
            )))
            .unwrap();
        ledger.opt_out(bob(), asset).unwrap();
        assert_eq!(ledger.asset_holding(bob(), asset), None);
    }

    #[test]
    fn test_asset_transfer_moves_units() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        ledger.opt_in(bob(), asset).unwrap();

        ledger
            .execute_transaction(&SignedTransaction::with_key(Transaction::asset_transfer(
                alice(),
                asset,
                bob(),
                10,
                FEE,
            )))
            .unwrap();

        assert_eq!(ledger.asset_holding(alice(), asset), Some(59));
        assert_eq!(ledger.asset_holding(bob(), asset), Some(10));
        assert_eq!(ledger.total_holdings(asset), 69);
    }

    #[test]
    fn test_asset_transfer_requires_receiver_opt_in() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);

        let result = ledger.execute_transaction(&SignedTransaction::with_key(
            Transaction::asset_transfer(alice(), asset, bob(), 1, FEE),
        ));
        assert!(matches!(result.unwrap_err(), LedgerError::NotOptedIn { .. }));
        assert_eq!(ledger.asset_holding(alice(), asset), Some(69));
    }

    #[test]
    fn test_asset_transfer_requires_sender_holding() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        ledger.opt_in(bob(), asset).unwrap();

        let result = ledger.execute_transaction(&SignedTransaction::with_key(
            Transaction::asset_transfer(bob(), asset, alice(), 1, FEE),
        ));
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::InsufficientHolding {
                held: 0,
                requested: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_asset_config_reassigns_reserve() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        let authority = Address::named("issuer");

        ledger
            .execute_transaction(&SignedTransaction::with_key(Transaction::asset_config(
                alice(),
                asset,
                AssetConfigUpdate::reserve(authority),
                FEE,
            )))
            .unwrap();

        let record = ledger.asset(asset).unwrap();
        assert_eq!(record.reserve, authority);
        // Other authorities are untouched
        assert_eq!(record.manager, alice());
        assert_eq!(record.freeze, alice());
        assert_eq!(record.clawback, alice());
    }

    #[test]
    fn test_asset_config_rejects_non_manager() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);

        let result = ledger.execute_transaction(&SignedTransaction::with_key(
            Transaction::asset_config(bob(), asset, AssetConfigUpdate::reserve(bob()), FEE),
        ));
        assert!(matches!(result.unwrap_err(), LedgerError::NotManager { .. }));
        assert_eq!(ledger.asset(asset).unwrap().reserve, alice());
    }

    #[test]
    fn test_group_is_atomic_on_failure() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        let balance_before = ledger.balance(alice());

        // Leg 1 is valid, leg 2 fails (bob is not opted in); neither applies
        let group = TransactionGroup::pair(
            pay(alice(), bob(), 500_000),
            SignedTransaction::with_key(Transaction::asset_transfer(alice(), asset, bob(), 1, FEE)),
        );
        let result = ledger.execute_group(&group);

        assert!(matches!(result.unwrap_err(), LedgerError::NotOptedIn { .. }));
        assert_eq!(ledger.balance(alice()), balance_before);
        assert_eq!(ledger.balance(bob()), 10_000_000);
        assert_eq!(ledger.asset_holding(alice(), asset), Some(69));
    }

    #[test]
    fn test_group_applies_all_legs_on_success() {
        let mut ledger = funded_ledger();

        let group = TransactionGroup::pair(pay(alice(), bob(), 100_000), pay(bob(), alice(), 50_000));
        let receipts = ledger.execute_group(&group).unwrap();

        assert_eq!(receipts.len(), 2);
        assert_eq!(ledger.balance(alice()), 10_000_000 - 100_000 - FEE + 50_000);
        assert_eq!(ledger.balance(bob()), 10_000_000 + 100_000 - 50_000 - FEE);
    }

    #[test]
    fn test_micro_unit_conservation_including_fees() {
        let mut ledger = funded_ledger();
        let asset = create_wizcoin(&mut ledger);
        ledger.opt_in(bob(), asset).unwrap();
        ledger
            .execute_transaction(&SignedTransaction::with_key(Transaction::asset_transfer(
                alice(),
                asset,
                bob(),
                5,
                FEE,
            )))
            .unwrap();
        ledger.execute_transaction(&pay(bob(), alice(), 250_000)).unwrap();

        let total: u64 = ledger.accounts().iter().map(|a| a.balance).sum();
        assert_eq!(total + ledger.fees_burned(), 20_000_000);
    }
}
