//! Error types for the ledger and the purchase protocol
//!
//! This module defines all error types surfaced during transaction
//! execution. Errors are descriptive and carry the context needed to
//! diagnose a rejected transaction or group.
//!
//! # Error Categories
//!
//! - **Authorization errors**: the purchase protocol withheld authorization
//!   for a logic-controlled account; the reason names the failed check.
//! - **Precondition errors**: balance, minimum-balance, opt-in, and holding
//!   requirements enforced by the ledger.
//! - **Administrative errors**: authority checks on asset configuration.
//! - **Structural errors**: malformed transaction groups, unsupported
//!   transaction fields, arithmetic overflow.

use super::address::Address;
use super::asset::AssetId;
use thiserror::Error;

/// Reason the purchase protocol withheld authorization
///
/// Each variant corresponds to one check of the purchase rule. The protocol
/// fails closed: the first failed check is reported and the transfer leg is
/// never authorized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DenialReason {
    /// The group does not contain exactly the expected number of legs
    #[error("group has {actual} transactions, expected {expected}")]
    WrongGroupSize {
        /// Required group size
        expected: usize,
        /// Observed group size
        actual: usize,
    },

    /// The authorized leg sits at the wrong position in the group
    #[error("authorized leg is at group index {actual}, expected {expected}")]
    WrongGroupIndex {
        /// Required group index of the transfer leg
        expected: usize,
        /// Observed group index
        actual: usize,
    },

    /// The leg at the given index is not a payment
    #[error("leg {index} is not a payment")]
    ExpectedPayment {
        /// Group index of the offending leg
        index: usize,
    },

    /// The leg at the given index is not an asset transfer
    #[error("leg {index} is not an asset transfer")]
    ExpectedAssetTransfer {
        /// Group index of the offending leg
        index: usize,
    },

    /// The logic account is not the sender of the leg it authorizes
    #[error("logic account {expected} cannot authorize a leg sent by {actual}")]
    SenderMismatch {
        /// The logic account's address
        expected: Address,
        /// The leg's actual sender
        actual: Address,
    },

    /// The payment leg does not pay the authority itself
    #[error("payment receiver {actual} is not the authority {expected}")]
    PaymentNotToAuthority {
        /// The authority address
        expected: Address,
        /// The payment leg's receiver
        actual: Address,
    },

    /// The payment leg offers less than the configured price
    #[error("payment of {offered} is below the price of {required}")]
    Underpayment {
        /// Configured price in micro-units
        required: u64,
        /// Amount offered by the payment leg
        offered: u64,
    },

    /// The transfer leg's fee reaches or exceeds the configured cap
    #[error("transfer fee {fee} reaches the cap of {cap}")]
    FeeExceedsCap {
        /// Configured strict upper bound on the transfer fee
        cap: u64,
        /// Observed fee
        fee: u64,
    },

    /// The transfer leg moves a different asset than configured
    #[error("transfer moves asset {actual}, expected asset {expected}")]
    WrongAsset {
        /// The configured asset id
        expected: AssetId,
        /// The transferred asset id
        actual: AssetId,
    },

    /// The transfer leg's amount differs from the per-purchase unit
    #[error("transfer of {actual} units, expected exactly {expected}")]
    WrongUnitAmount {
        /// Fixed per-purchase unit
        expected: u64,
        /// Observed transfer amount
        actual: u64,
    },

    /// The transfer leg does not pay out to the buyer
    #[error("asset receiver {actual} is not the buyer {expected}")]
    WrongAssetReceiver {
        /// The payment leg's sender (the buyer)
        expected: Address,
        /// The transfer leg's asset receiver
        actual: Address,
    },

    /// A leg sets its rekey field
    #[error("leg {index} sets rekey-to")]
    RekeySet {
        /// Group index of the offending leg
        index: usize,
    },

    /// A leg sets a close-to field
    #[error("leg {index} sets a close-to field")]
    CloseToSet {
        /// Group index of the offending leg
        index: usize,
    },
}

/// Main error type for ledger operations
///
/// This enum represents all possible errors surfaced while validating and
/// applying transactions or transaction groups. A group-level error means
/// no leg of the group was applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A logic-controlled account withheld authorization
    ///
    /// The entire group is rejected with no partial application.
    #[error("authorization denied for {address}: {reason}")]
    AuthorizationDenied {
        /// The logic account that refused to authorize its leg
        address: Address,
        /// The specific failed check
        reason: DenialReason,
    },

    /// Sender balance cannot cover the transaction
    #[error("insufficient balance for {address}: available {available}, required {required}")]
    InsufficientBalance {
        /// Sending account
        address: Address,
        /// Balance before the transaction
        available: u64,
        /// Amount plus fee the transaction needs
        required: u64,
    },

    /// The transaction would drop an account below its minimum-balance floor
    #[error("account {address} would drop to {balance}, below its minimum balance {min_balance}")]
    BelowMinBalance {
        /// Affected account
        address: Address,
        /// Balance the transaction would leave
        balance: u64,
        /// The account's minimum-balance floor
        min_balance: u64,
    },

    /// Sender does not hold enough of the asset
    #[error("insufficient holding of asset {asset} for {address}: held {held}, requested {requested}")]
    InsufficientHolding {
        /// Sending account
        address: Address,
        /// The asset being transferred
        asset: AssetId,
        /// Amount currently held
        held: u64,
        /// Amount the transfer requested
        requested: u64,
    },

    /// The account has not opted into the asset
    ///
    /// Both sides of an asset transfer need a holding slot; the transfer
    /// fails if either is missing.
    #[error("account {address} is not opted into asset {asset}")]
    NotOptedIn {
        /// The account without a holding slot
        address: Address,
        /// The asset in question
        asset: AssetId,
    },

    /// The holding is frozen and cannot send or receive
    #[error("holding of asset {asset} is frozen for {address}")]
    HoldingFrozen {
        /// The account with the frozen holding
        address: Address,
        /// The asset in question
        asset: AssetId,
    },

    /// The account already holds a slot for the asset
    #[error("account {address} is already opted into asset {asset}")]
    AlreadyOptedIn {
        /// The account with an existing holding slot
        address: Address,
        /// The asset in question
        asset: AssetId,
    },

    /// Opt-out attempted while the holding still contains units
    #[error("account {address} still holds {amount} of asset {asset}")]
    HoldingNotEmpty {
        /// The account attempting to opt out
        address: Address,
        /// The asset in question
        asset: AssetId,
        /// Units still held
        amount: u64,
    },

    /// No account exists at the address
    #[error("account not found: {address}")]
    AccountNotFound {
        /// The unknown address
        address: Address,
    },

    /// No asset exists with the id
    #[error("asset not found: {asset}")]
    AssetNotFound {
        /// The unknown asset id
        asset: AssetId,
    },

    /// Asset configuration attempted by an account other than the manager
    #[error("account {sender} is not the manager of asset {asset}")]
    NotManager {
        /// The asset being configured
        asset: AssetId,
        /// The non-manager sender
        sender: Address,
    },

    /// A transaction group must contain at least one transaction
    #[error("transaction group is empty")]
    EmptyGroup,

    /// A transaction group exceeds the maximum size
    #[error("transaction group has {size} transactions, maximum is {max}")]
    GroupTooLarge {
        /// Observed group size
        size: usize,
        /// Maximum allowed group size
        max: usize,
    },

    /// The transaction uses a field this ledger does not implement
    ///
    /// Rekeying and close-out are validated by the purchase protocol but not
    /// executed by the in-memory ledger.
    #[error("unsupported transaction field: {field}")]
    UnsupportedField {
        /// Name of the unsupported field
        field: String,
    },

    /// Arithmetic overflow would occur
    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AuthorizationDenied error
    pub fn authorization_denied(address: Address, reason: DenialReason) -> Self {
        LedgerError::AuthorizationDenied { address, reason }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(address: Address, available: u64, required: u64) -> Self {
        LedgerError::InsufficientBalance {
            address,
            available,
            required,
        }
    }

    /// Create a BelowMinBalance error
    pub fn below_min_balance(address: Address, balance: u64, min_balance: u64) -> Self {
        LedgerError::BelowMinBalance {
            address,
            balance,
            min_balance,
        }
    }

    /// Create an InsufficientHolding error
    pub fn insufficient_holding(address: Address, asset: AssetId, held: u64, requested: u64) -> Self {
        LedgerError::InsufficientHolding {
            address,
            asset,
            held,
            requested,
        }
    }

    /// Create a NotOptedIn error
    pub fn not_opted_in(address: Address, asset: AssetId) -> Self {
        LedgerError::NotOptedIn { address, asset }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(address: Address) -> Self {
        LedgerError::AccountNotFound { address }
    }

    /// Create an AssetNotFound error
    pub fn asset_not_found(asset: AssetId) -> Self {
        LedgerError::AssetNotFound { asset }
    }

    /// Create an UnsupportedField error
    pub fn unsupported_field(field: &str) -> Self {
        LedgerError::UnsupportedField {
            field: field.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
        }
    }
}
