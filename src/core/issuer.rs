//! Token issuer purchase protocol
//!
//! This module implements the reserve authority: a stateless rule evaluator
//! gating outgoing transfers of the token from the reserve account. The
//! authority is a logic-signature account whose address derives from the
//! protocol parameters, so the same instantiation always controls the same
//! address.
//!
//! The rule covers a two-leg atomic group:
//! - leg 0: a payment from the buyer to the authority, meeting the price
//! - leg 1: an asset transfer of exactly one purchase unit from the
//!   authority back to the buyer
//!
//! Any deviation withholds authorization and the whole group is rejected by
//! the ledger. The evaluation is a pure predicate over the group and the
//! instantiation parameters: no side effects, idempotent.

use crate::types::{
    Address, AssetId, DenialReason, LogicSignature, SignedTransaction, Transaction,
    TransactionGroup, TransactionKind,
};
use std::sync::Arc;

/// Default price of one purchase, in micro-units
pub const DEFAULT_PRICE: u64 = 1_000;

/// Default number of asset units transferred per purchase
pub const DEFAULT_UNIT: u64 = 1;

/// Default strict upper bound on the transfer leg's fee, in micro-units
pub const DEFAULT_FEE_CAP: u64 = 10_000;

/// Instantiation parameters of the purchase protocol
///
/// The parameters are immutable once the issuer is constructed; changing any
/// of them yields a different authority address. Price and network fee are
/// distinct: the price is what the buyer pays the authority, the fee cap
/// bounds what the authority's own leg may spend on fees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssuerParams {
    /// The asset the authority distributes
    pub asset: AssetId,

    /// Minimum payment the buyer must make, in micro-units
    pub price: u64,

    /// Exact number of asset units transferred per purchase
    pub unit: u64,

    /// Strict upper bound on the transfer leg's fee, in micro-units
    pub fee_cap: u64,
}

impl IssuerParams {
    /// Parameters for an asset with the default price, unit, and fee cap
    pub fn new(asset: AssetId) -> Self {
        IssuerParams {
            asset,
            price: DEFAULT_PRICE,
            unit: DEFAULT_UNIT,
            fee_cap: DEFAULT_FEE_CAP,
        }
    }

    /// Serialize the parameters for address derivation
    fn derivation_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[0..8].copy_from_slice(&self.asset.to_le_bytes());
        bytes[8..16].copy_from_slice(&self.price.to_le_bytes());
        bytes[16..24].copy_from_slice(&self.unit.to_le_bytes());
        bytes[24..32].copy_from_slice(&self.fee_cap.to_le_bytes());
        bytes
    }
}

/// The reserve authority for one asset
///
/// Holds the instantiation parameters and the derived authority address.
/// The issuer carries no mutable state; cloning it yields an equivalent
/// evaluator for the same address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIssuer {
    params: IssuerParams,
    address: Address,
}

impl TokenIssuer {
    /// Instantiate the protocol for the given parameters
    ///
    /// The authority address is derived deterministically from the
    /// parameters; instantiating twice with the same parameters controls
    /// the same account.
    pub fn new(params: IssuerParams) -> Self {
        let address = Address::derive(b"wizcoin/issuer/v1", &params.derivation_bytes());
        TokenIssuer { params, address }
    }

    /// The derived authority address
    pub fn address(&self) -> Address {
        self.address
    }

    /// The instantiation parameters
    pub fn params(&self) -> &IssuerParams {
        &self.params
    }

    /// Evaluate the purchase rule for the leg at `index` within `group`
    ///
    /// Checks, in order: group shape (exactly two legs, payment then asset
    /// transfer, authorized leg at index 1), the payment leg (paid to the
    /// authority, at or above the price, no rekey or close-out), and the
    /// transfer leg (fee under the cap, configured asset, exact unit amount,
    /// paid out to the buyer, no rekey or close-out).
    ///
    /// # Errors
    ///
    /// Returns the first failed check as a [`DenialReason`].
    pub fn check(&self, group: &[Transaction], index: usize) -> Result<(), DenialReason> {
        if group.len() != 2 {
            return Err(DenialReason::WrongGroupSize {
                expected: 2,
                actual: group.len(),
            });
        }
        if index != 1 {
            return Err(DenialReason::WrongGroupIndex {
                expected: 1,
                actual: index,
            });
        }

        let payment = &group[0];
        let transfer = &group[1];

        let (pay_receiver, pay_amount, pay_close) = match &payment.kind {
            TransactionKind::Payment {
                receiver,
                amount,
                close_remainder_to,
            } => (*receiver, *amount, *close_remainder_to),
            _ => return Err(DenialReason::ExpectedPayment { index: 0 }),
        };

        let (xfer_asset, xfer_receiver, xfer_amount, xfer_close) = match &transfer.kind {
            TransactionKind::AssetTransfer {
                asset,
                receiver,
                amount,
                asset_close_to,
            } => (*asset, *receiver, *amount, *asset_close_to),
            _ => return Err(DenialReason::ExpectedAssetTransfer { index: 1 }),
        };

        // Payment leg: pays the authority itself, at or above the price
        if pay_receiver != self.address {
            return Err(DenialReason::PaymentNotToAuthority {
                expected: self.address,
                actual: pay_receiver,
            });
        }
        if pay_amount < self.params.price {
            return Err(DenialReason::Underpayment {
                required: self.params.price,
                offered: pay_amount,
            });
        }
        if payment.rekey_to.is_some() {
            return Err(DenialReason::RekeySet { index: 0 });
        }
        if pay_close.is_some() {
            return Err(DenialReason::CloseToSet { index: 0 });
        }

        // Transfer leg: exactly one purchase unit of the configured asset,
        // paid out to whoever sent the payment
        if transfer.fee >= self.params.fee_cap {
            return Err(DenialReason::FeeExceedsCap {
                cap: self.params.fee_cap,
                fee: transfer.fee,
            });
        }
        if xfer_asset != self.params.asset {
            return Err(DenialReason::WrongAsset {
                expected: self.params.asset,
                actual: xfer_asset,
            });
        }
        if xfer_amount != self.params.unit {
            return Err(DenialReason::WrongUnitAmount {
                expected: self.params.unit,
                actual: xfer_amount,
            });
        }
        if xfer_receiver != payment.sender {
            return Err(DenialReason::WrongAssetReceiver {
                expected: payment.sender,
                actual: xfer_receiver,
            });
        }
        if transfer.rekey_to.is_some() {
            return Err(DenialReason::RekeySet { index: 1 });
        }
        if xfer_close.is_some() {
            return Err(DenialReason::CloseToSet { index: 1 });
        }

        Ok(())
    }

    /// Build a well-formed purchase group for a buyer
    ///
    /// Leg 0 pays `payment` micro-units from the buyer to the authority with
    /// a key authorization; leg 1 transfers the purchase unit back to the
    /// buyer under this issuer's logic authorization. The group satisfies
    /// the rule whenever `payment >= price` and `fee < fee_cap`.
    pub fn purchase_group(&self, buyer: Address, payment: u64, fee: u64) -> TransactionGroup {
        let pay_leg = SignedTransaction::with_key(Transaction::payment(
            buyer,
            self.address,
            payment,
            fee,
        ));
        let transfer_leg = SignedTransaction::with_logic(
            Transaction::asset_transfer(self.address, self.params.asset, buyer, self.params.unit, fee),
            Arc::new(self.clone()),
        );
        TransactionGroup::pair(pay_leg, transfer_leg)
    }
}

impl LogicSignature for TokenIssuer {
    fn address(&self) -> Address {
        TokenIssuer::address(self)
    }

    fn check(&self, group: &[Transaction], index: usize) -> Result<(), DenialReason> {
        TokenIssuer::check(self, group, index)
    }
}
