//! Account-related types
//!
//! This module defines the Account structure holding a micro-unit balance
//! and a set of asset holdings, plus the minimum-balance floor rules.

use super::address::Address;
use super::asset::{AssetHolding, AssetId};
use std::collections::HashMap;

/// Base minimum balance every account must keep, in micro-units
pub const BASE_MIN_BALANCE: u64 = 100_000;

/// Additional minimum balance required per asset holding, in micro-units
pub const HOLDING_MIN_BALANCE: u64 = 100_000;

/// Ledger account state
///
/// Represents the current state of an account: its micro-unit balance and
/// the asset holdings it has opted into. The minimum-balance floor is not
/// stored; it is a function of the number of holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The account's address
    pub address: Address,

    /// Balance in micro-units
    ///
    /// A transaction that would drop the balance below the account's
    /// minimum-balance floor is rejected.
    pub balance: u64,

    /// Asset holdings, keyed by asset id
    ///
    /// A holding exists only after opt-in. An account cannot receive an
    /// asset it has no holding slot for.
    pub holdings: HashMap<AssetId, AssetHolding>,
}

impl Account {
    /// Create a new account with zero balance and no holdings
    pub fn new(address: Address) -> Self {
        Account {
            address,
            balance: 0,
            holdings: HashMap::new(),
        }
    }

    /// The account's minimum-balance floor
    ///
    /// Base floor plus one increment per asset holding. Opting into an asset
    /// raises the floor; opting out lowers it again.
    pub fn min_balance(&self) -> u64 {
        BASE_MIN_BALANCE + HOLDING_MIN_BALANCE * self.holdings.len() as u64
    }

    /// Get the holding for an asset, if the account has opted in
    pub fn holding(&self, asset: AssetId) -> Option<&AssetHolding> {
        self.holdings.get(&asset)
    }

    /// Amount of an asset held, or `None` if not opted in
    ///
    /// An opted-in account with nothing received yet reports `Some(0)`,
    /// which is distinct from not being opted in at all.
    pub fn holding_amount(&self, asset: AssetId) -> Option<u64> {
        self.holdings.get(&asset).map(|h| h.amount)
    }
}
