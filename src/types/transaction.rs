//! Transaction-related types
//!
//! This module defines the transaction shapes the ledger executes, the
//! authorization attached to each transaction, and the atomic transaction
//! group wrapper.

use super::address::Address;
use super::asset::{AssetConfigUpdate, AssetId, AssetParams};
use super::error::{DenialReason, LedgerError};
use std::fmt;
use std::sync::Arc;

/// Maximum number of transactions in an atomic group
pub const MAX_GROUP_SIZE: usize = 16;

/// The operation a transaction performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Move micro-units between accounts
    Payment {
        /// Receiving account; created on first payment if unknown
        receiver: Address,
        /// Amount in micro-units
        amount: u64,
        /// Close-out target; not executed by the in-memory ledger
        close_remainder_to: Option<Address>,
    },

    /// Move asset units between opted-in accounts
    AssetTransfer {
        /// The asset being moved
        asset: AssetId,
        /// Receiving account; must hold an opt-in slot
        receiver: Address,
        /// Amount in asset base units
        amount: u64,
        /// Holding close-out target; not executed by the in-memory ledger
        asset_close_to: Option<Address>,
    },

    /// Create a new asset; the sender becomes creator and holds the supply
    AssetCreate {
        /// Immutable parameters of the new asset
        params: AssetParams,
    },

    /// Reassign asset authorities; only the current manager may send this
    AssetConfig {
        /// The asset being configured
        asset: AssetId,
        /// Authority reassignments to apply
        update: AssetConfigUpdate,
    },
}

/// A single unsigned transaction
///
/// Carries the fields common to every kind (sender, fee, rekey target) plus
/// the kind-specific payload. The rekey and close-to fields exist so the
/// purchase protocol can reject groups that set them; the in-memory ledger
/// refuses to execute them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The account the transaction debits and acts for
    pub sender: Address,

    /// Network fee in micro-units, debited from the sender
    pub fee: u64,

    /// Rekey target; not executed by the in-memory ledger
    pub rekey_to: Option<Address>,

    /// The operation performed
    pub kind: TransactionKind,
}

impl Transaction {
    /// Build a payment transaction
    pub fn payment(sender: Address, receiver: Address, amount: u64, fee: u64) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TransactionKind::Payment {
                receiver,
                amount,
                close_remainder_to: None,
            },
        }
    }

    /// Build an asset-transfer transaction
    pub fn asset_transfer(
        sender: Address,
        asset: AssetId,
        receiver: Address,
        amount: u64,
        fee: u64,
    ) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TransactionKind::AssetTransfer {
                asset,
                receiver,
                amount,
                asset_close_to: None,
            },
        }
    }

    /// Build an asset-creation transaction
    pub fn asset_create(sender: Address, params: AssetParams, fee: u64) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TransactionKind::AssetCreate { params },
        }
    }

    /// Build an asset-configuration transaction
    pub fn asset_config(sender: Address, asset: AssetId, update: AssetConfigUpdate, fee: u64) -> Self {
        Transaction {
            sender,
            fee,
            rekey_to: None,
            kind: TransactionKind::AssetConfig { asset, update },
        }
    }

    /// Whether this is a payment
    pub fn is_payment(&self) -> bool {
        matches!(self.kind, TransactionKind::Payment { .. })
    }

    /// Whether this is an asset transfer
    pub fn is_asset_transfer(&self) -> bool {
        matches!(self.kind, TransactionKind::AssetTransfer { .. })
    }
}

/// A program that controls a derived account
///
/// A logic-signature account has no key; a transaction it sends is admitted
/// only if the program approves the surrounding group. Implementations must
/// be pure: same group and index, same verdict, no side effects.
pub trait LogicSignature: Send + Sync {
    /// The derived address this program controls
    fn address(&self) -> Address;

    /// Check the group against the program's embedded conditions
    ///
    /// `index` is the position within `group` of the leg being authorized.
    /// Returns the first failed check, or `Ok(())` to authorize.
    fn check(&self, group: &[Transaction], index: usize) -> Result<(), DenialReason>;

    /// Boolean form of [`check`](Self::check)
    fn approves(&self, group: &[Transaction], index: usize) -> bool {
        self.check(group, index).is_ok()
    }
}

/// How a transaction is authorized
#[derive(Clone)]
pub enum Authorization {
    /// Signed by the sender's own key
    ///
    /// Cryptographic validity is out of scope; a key authorization is
    /// accepted as long as the sender account exists.
    Key,

    /// Authorized by a logic-signature program
    ///
    /// Admitted only if the program's address equals the sender and the
    /// program approves the surrounding group.
    Logic(Arc<dyn LogicSignature>),
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Authorization::Key => write!(f, "Key"),
            Authorization::Logic(program) => write!(f, "Logic({})", program.address()),
        }
    }
}

/// A transaction paired with its authorization
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// The transaction itself
    pub txn: Transaction,

    /// The authorization attached to it
    pub auth: Authorization,
}

impl SignedTransaction {
    /// Wrap a transaction with a key authorization
    pub fn with_key(txn: Transaction) -> Self {
        SignedTransaction {
            txn,
            auth: Authorization::Key,
        }
    }

    /// Wrap a transaction with a logic-signature authorization
    pub fn with_logic(txn: Transaction, program: Arc<dyn LogicSignature>) -> Self {
        SignedTransaction {
            txn,
            auth: Authorization::Logic(program),
        }
    }
}

/// An ordered sequence of transactions that commits or fails as a unit
///
/// Construction enforces the size bounds (1 to [`MAX_GROUP_SIZE`]); the
/// atomicity itself is enforced by the ledger at execution time.
#[derive(Debug, Clone)]
pub struct TransactionGroup(Vec<SignedTransaction>);

impl TransactionGroup {
    /// Build a group from signed transactions
    ///
    /// # Errors
    ///
    /// Returns an error if the group is empty or exceeds [`MAX_GROUP_SIZE`].
    pub fn new(transactions: Vec<SignedTransaction>) -> Result<Self, LedgerError> {
        if transactions.is_empty() {
            return Err(LedgerError::EmptyGroup);
        }
        if transactions.len() > MAX_GROUP_SIZE {
            return Err(LedgerError::GroupTooLarge {
                size: transactions.len(),
                max: MAX_GROUP_SIZE,
            });
        }
        Ok(TransactionGroup(transactions))
    }

    /// Build a group containing a single transaction
    pub fn single(transaction: SignedTransaction) -> Self {
        TransactionGroup(vec![transaction])
    }

    /// Build a two-transaction group
    ///
    /// Two legs always satisfy the size bounds, so this cannot fail.
    pub fn pair(first: SignedTransaction, second: SignedTransaction) -> Self {
        TransactionGroup(vec![first, second])
    }

    /// The signed transactions in group order
    pub fn transactions(&self) -> &[SignedTransaction] {
        &self.0
    }

    /// Number of transactions in the group
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the group is empty (never true for a constructed group)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> Transaction {
        Transaction::payment(Address::named("alice"), Address::named("bob"), 1000, 100)
    }

    #[test]
    fn test_payment_constructor_defaults() {
        let txn = payment();
        assert!(txn.is_payment());
        assert!(!txn.is_asset_transfer());
        assert_eq!(txn.rekey_to, None);
        match txn.kind {
            TransactionKind::Payment {
                close_remainder_to, ..
            } => assert_eq!(close_remainder_to, None),
            _ => panic!("expected a payment"),
        }
    }

    #[test]
    fn test_asset_transfer_constructor() {
        let txn =
            Transaction::asset_transfer(Address::named("issuer"), 1, Address::named("bob"), 1, 100);
        assert!(txn.is_asset_transfer());
        match txn.kind {
            TransactionKind::AssetTransfer {
                asset,
                amount,
                asset_close_to,
                ..
            } => {
                assert_eq!(asset, 1);
                assert_eq!(amount, 1);
                assert_eq!(asset_close_to, None);
            }
            _ => panic!("expected an asset transfer"),
        }
    }

    #[test]
    fn test_group_rejects_empty() {
        let result = TransactionGroup::new(vec![]);
        assert!(matches!(result.unwrap_err(), LedgerError::EmptyGroup));
    }

    #[test]
    fn test_group_rejects_oversized() {
        let transactions = (0..MAX_GROUP_SIZE + 1)
            .map(|_| SignedTransaction::with_key(payment()))
            .collect();
        let result = TransactionGroup::new(transactions);
        assert!(matches!(
            result.unwrap_err(),
            LedgerError::GroupTooLarge { size: 17, max: 16 }
        ));
    }

    #[test]
    fn test_group_accepts_bounds() {
        let group = TransactionGroup::single(SignedTransaction::with_key(payment()));
        assert_eq!(group.len(), 1);
        assert!(!group.is_empty());

        let transactions = (0..MAX_GROUP_SIZE)
            .map(|_| SignedTransaction::with_key(payment()))
            .collect();
        assert_eq!(TransactionGroup::new(transactions).unwrap().len(), 16);
    }
}
