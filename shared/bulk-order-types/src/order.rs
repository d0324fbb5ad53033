use core::fmt;

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Raised when a `u8` does not map to a known enum discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownDiscriminant {
    pub kind: &'static str,
    pub value: u8,
}

impl fmt::Display for UnknownDiscriminant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} discriminant {}", self.kind, self.value)
    }
}

impl std::error::Error for UnknownDiscriminant {}

/// Asset class of an offer or consideration item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum ItemType {
    #[default]
    Native = 0,
    Erc20 = 1,
    Erc721 = 2,
    Erc1155 = 3,
    Erc721WithCriteria = 4,
    Erc1155WithCriteria = 5,
}

impl ItemType {
    /// Whether the item refers to a specific non-fungible token id.
    pub fn is_nft(self) -> bool {
        matches!(self, ItemType::Erc721 | ItemType::Erc1155)
    }
}

impl TryFrom<u8> for ItemType {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use ItemType::*;
        let ty = match value {
            0 => Native,
            1 => Erc20,
            2 => Erc721,
            3 => Erc1155,
            4 => Erc721WithCriteria,
            5 => Erc1155WithCriteria,
            _ => return Err(UnknownDiscriminant { kind: "item type", value }),
        };
        Ok(ty)
    }
}

impl From<ItemType> for u8 {
    fn from(value: ItemType) -> Self {
        value as u8
    }
}

/// Fill and restriction mode of an order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum OrderType {
    #[default]
    FullOpen = 0,
    PartialOpen = 1,
    FullRestricted = 2,
    PartialRestricted = 3,
    Contract = 4,
}

impl TryFrom<u8> for OrderType {
    type Error = UnknownDiscriminant;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use OrderType::*;
        let ty = match value {
            0 => FullOpen,
            1 => PartialOpen,
            2 => FullRestricted,
            3 => PartialRestricted,
            4 => Contract,
            _ => return Err(UnknownDiscriminant { kind: "order type", value }),
        };
        Ok(ty)
    }
}

impl From<OrderType> for u8 {
    fn from(value: OrderType) -> Self {
        value as u8
    }
}

/// An item the offerer gives up.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
    pub item_type: ItemType,
    pub token: Address,
    pub identifier_or_criteria: U256,
    pub start_amount: U256,
    pub end_amount: U256,
}

/// An item that must be received by `recipient` for the order to fill.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsiderationItem {
    pub item_type: ItemType,
    pub token: Address,
    pub identifier_or_criteria: U256,
    pub start_amount: U256,
    pub end_amount: U256,
    pub recipient: Address,
}

/// The signed portion of a marketplace order.
///
/// Field order mirrors the on-chain `OrderComponents` struct; the EIP-712
/// encoding depends on it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderComponents {
    pub offerer: Address,
    pub zone: Address,
    pub offer: Vec<OfferItem>,
    pub consideration: Vec<ConsiderationItem>,
    pub order_type: OrderType,
    pub start_time: U256,
    pub end_time: U256,
    pub zone_hash: B256,
    pub salt: U256,
    pub conduit_key: B256,
    pub counter: U256,
}
