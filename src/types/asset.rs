//! Asset-related types
//!
//! This module defines assets (fixed-supply tokens with four authority
//! roles), per-account asset holdings, and the authority-update payload used
//! by asset configuration transactions.

use super::address::Address;

/// Asset identifier
///
/// Assigned sequentially by the ledger at creation time, starting at 1.
pub type AssetId = u64;

/// Immutable asset parameters fixed at creation
///
/// The total supply can never change after creation; distribution happens by
/// moving holdings between accounts, never by minting or burning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetParams {
    /// Total supply in base units, fixed forever at creation
    pub total: u64,

    /// Number of decimals for display purposes only
    pub decimals: u8,

    /// Short ticker-style unit name (e.g. "WZC")
    pub unit_name: String,

    /// Full asset name (e.g. "wizcoin")
    pub asset_name: String,

    /// Whether holdings start frozen when created
    pub default_frozen: bool,
}

/// A created asset and its current authority assignments
///
/// The four authority addresses are mutable via asset configuration
/// transactions signed by the current manager. Everything else is fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Unique asset identifier
    pub id: AssetId,

    /// Immutable creation parameters
    pub params: AssetParams,

    /// The account that created the asset
    ///
    /// The creator implicitly holds the entire supply at creation.
    pub creator: Address,

    /// Authority allowed to reassign the other authorities
    pub manager: Address,

    /// Authority conventionally expected to hold undistributed supply
    pub reserve: Address,

    /// Authority allowed to freeze/unfreeze holdings
    pub freeze: Address,

    /// Authority allowed to claw back holdings
    pub clawback: Address,
}

impl Asset {
    /// Create an asset record with all four authorities set to the creator
    ///
    /// This matches the default assignment applied at creation time; the
    /// manager can reassign individual authorities afterwards.
    pub fn new(id: AssetId, creator: Address, params: AssetParams) -> Self {
        Asset {
            id,
            params,
            creator,
            manager: creator,
            reserve: creator,
            freeze: creator,
            clawback: creator,
        }
    }
}

/// Per-account holding of a single asset
///
/// Created on opt-in with amount 0; must be 0 again before the holding can
/// be removed on opt-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetHolding {
    /// Amount of the asset held, in base units
    pub amount: u64,

    /// Whether the holding is frozen (cannot send or receive)
    pub frozen: bool,
}

impl AssetHolding {
    /// Create an empty holding, as produced by opt-in
    pub fn new(frozen: bool) -> Self {
        AssetHolding { amount: 0, frozen }
    }
}

/// Authority updates carried by an asset configuration transaction
///
/// `None` leaves an authority unchanged; `Some(addr)` reassigns it. Only the
/// current manager may apply an update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetConfigUpdate {
    /// New manager authority, if being reassigned
    pub manager: Option<Address>,

    /// New reserve authority, if being reassigned
    pub reserve: Option<Address>,

    /// New freeze authority, if being reassigned
    pub freeze: Option<Address>,

    /// New clawback authority, if being reassigned
    pub clawback: Option<Address>,
}

impl AssetConfigUpdate {
    /// An update that reassigns only the reserve authority
    pub fn reserve(address: Address) -> Self {
        AssetConfigUpdate {
            reserve: Some(address),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> AssetParams {
        AssetParams {
            total: 69,
            decimals: 0,
            unit_name: "WZC".to_string(),
            asset_name: "wizcoin".to_string(),
            default_frozen: false,
        }
    }

    #[test]
    fn test_new_asset_authorities_default_to_creator() {
        let creator = Address::named("alice");
        let asset = Asset::new(1, creator, params());

        assert_eq!(asset.creator, creator);
        assert_eq!(asset.manager, creator);
        assert_eq!(asset.reserve, creator);
        assert_eq!(asset.freeze, creator);
        assert_eq!(asset.clawback, creator);
    }

    #[test]
    fn test_new_holding_is_empty() {
        let holding = AssetHolding::new(false);
        assert_eq!(holding.amount, 0);
        assert!(!holding.frozen);
    }

    #[test]
    fn test_reserve_update_touches_only_reserve() {
        let authority = Address::named("issuer");
        let update = AssetConfigUpdate::reserve(authority);

        assert_eq!(update.reserve, Some(authority));
        assert_eq!(update.manager, None);
        assert_eq!(update.freeze, None);
        assert_eq!(update.clawback, None);
    }
}
