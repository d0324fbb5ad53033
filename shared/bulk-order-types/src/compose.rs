//! Listing and offer composition.
//!
//! Turns a "sell this token for that price" style request into the order components the
//! marketplace signs. Fees are expressed in basis points of the price and carved out of it.

use core::fmt;

use alloy_primitives::{Address, B256, U256};

use crate::order::{ConsiderationItem, ItemType, OfferItem, OrderComponents, OrderType};

pub const ONE_HUNDRED_PERCENT_BP: u16 = 10_000;

/// Errors during order composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeError {
    /// Fees add up to more than the full price.
    FeesExceedPrice { total_basis_points: u32 },
    /// Native currency cannot be escrowed by an offer; use a wrapped ERC-20.
    NativeOffer,
    /// The traded asset must be a specific ERC-721 / ERC-1155 token.
    NotAnNft(ItemType),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::FeesExceedPrice { total_basis_points } => {
                write!(f, "fees of {total_basis_points} bp exceed the price")
            }
            ComposeError::NativeOffer => f.write_str("offers must be made in an ERC-20 currency"),
            ComposeError::NotAnNft(ty) => write!(f, "item type {ty:?} is not a specific NFT"),
        }
    }
}

impl std::error::Error for ComposeError {}

/// A fee paid out of the price.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fee {
    pub recipient: Address,
    pub basis_points: u16,
}

/// Payment currency.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Currency {
    Native,
    Erc20(Address),
}

impl Currency {
    fn item_type(self) -> ItemType {
        match self {
            Currency::Native => ItemType::Native,
            Currency::Erc20(_) => ItemType::Erc20,
        }
    }

    fn token(self) -> Address {
        match self {
            Currency::Native => Address::ZERO,
            Currency::Erc20(token) => token,
        }
    }
}

/// A specific ERC-721 or ERC-1155 token (eg, a domain name NFT).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenAsset {
    pub item_type: ItemType,
    pub token: Address,
    pub identifier: U256,
    pub amount: U256,
}

impl TokenAsset {
    pub fn erc721(token: Address, identifier: U256) -> Self {
        Self { item_type: ItemType::Erc721, token, identifier, amount: U256::from(1u64) }
    }

    pub fn erc1155(token: Address, identifier: U256, amount: U256) -> Self {
        Self { item_type: ItemType::Erc1155, token, identifier, amount }
    }
}

/// Fields shared by every composed order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderTerms {
    pub offerer: Address,
    pub zone: Address,
    pub order_type: OrderType,
    pub start_time: U256,
    pub end_time: U256,
    pub zone_hash: B256,
    pub salt: U256,
    pub conduit_key: B256,
    pub counter: U256,
}

impl OrderTerms {
    fn into_components(
        self,
        offer: Vec<OfferItem>,
        consideration: Vec<ConsiderationItem>,
    ) -> OrderComponents {
        OrderComponents {
            offerer: self.offerer,
            zone: self.zone,
            offer,
            consideration,
            order_type: self.order_type,
            start_time: self.start_time,
            end_time: self.end_time,
            zone_hash: self.zone_hash,
            salt: self.salt,
            conduit_key: self.conduit_key,
            counter: self.counter,
        }
    }
}

/// Sell `asset` for `price` in `currency`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub terms: OrderTerms,
    pub asset: TokenAsset,
    pub currency: Currency,
    pub price: U256,
    pub fees: Vec<Fee>,
}

impl Listing {
    pub fn into_order_components(self) -> Result<OrderComponents, ComposeError> {
        ensure_nft(&self.asset)?;
        let recipient = self.terms.offerer;
        let consideration = split_payment(self.currency, self.price, recipient, &self.fees)?;
        let offer = vec![OfferItem {
            item_type: self.asset.item_type,
            token: self.asset.token,
            identifier_or_criteria: self.asset.identifier,
            start_amount: self.asset.amount,
            end_amount: self.asset.amount,
        }];
        Ok(self.terms.into_components(offer, consideration))
    }
}

/// Offer `amount` of an ERC-20 `currency` for `asset`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offer {
    pub terms: OrderTerms,
    pub asset: TokenAsset,
    pub currency: Currency,
    pub amount: U256,
    pub fees: Vec<Fee>,
}

impl Offer {
    pub fn into_order_components(self) -> Result<OrderComponents, ComposeError> {
        ensure_nft(&self.asset)?;
        if self.currency == Currency::Native {
            return Err(ComposeError::NativeOffer);
        }
        let offer = vec![OfferItem {
            item_type: self.currency.item_type(),
            token: self.currency.token(),
            identifier_or_criteria: U256::ZERO,
            start_amount: self.amount,
            end_amount: self.amount,
        }];

        let mut consideration = vec![ConsiderationItem {
            item_type: self.asset.item_type,
            token: self.asset.token,
            identifier_or_criteria: self.asset.identifier,
            start_amount: self.asset.amount,
            end_amount: self.asset.amount,
            recipient: self.terms.offerer,
        }];
        consideration.extend(fee_items(self.currency, self.amount, &self.fees)?);
        Ok(self.terms.into_components(offer, consideration))
    }
}

/// `amount * basis_points / 10_000`, rounded down. Split so it cannot overflow near `U256::MAX`.
pub fn basis_points_of(amount: U256, basis_points: u16) -> U256 {
    let whole = U256::from(ONE_HUNDRED_PERCENT_BP);
    let bp = U256::from(basis_points);
    amount / whole * bp + amount % whole * bp / whole
}

fn ensure_nft(asset: &TokenAsset) -> Result<(), ComposeError> {
    if asset.item_type.is_nft() {
        Ok(())
    } else {
        Err(ComposeError::NotAnNft(asset.item_type))
    }
}

fn total_basis_points(fees: &[Fee]) -> Result<u32, ComposeError> {
    let total: u32 = fees.iter().map(|fee| u32::from(fee.basis_points)).sum();
    if total > u32::from(ONE_HUNDRED_PERCENT_BP) {
        return Err(ComposeError::FeesExceedPrice { total_basis_points: total });
    }
    Ok(total)
}

fn fee_items(
    currency: Currency,
    amount: U256,
    fees: &[Fee],
) -> Result<Vec<ConsiderationItem>, ComposeError> {
    total_basis_points(fees)?;
    Ok(fees
        .iter()
        .map(|fee| (fee, basis_points_of(amount, fee.basis_points)))
        .filter(|(_, value)| !value.is_zero())
        .map(|(fee, value)| ConsiderationItem {
            item_type: currency.item_type(),
            token: currency.token(),
            identifier_or_criteria: U256::ZERO,
            start_amount: value,
            end_amount: value,
            recipient: fee.recipient,
        })
        .collect())
}

/// Seller proceeds first, then one item per non-zero fee.
fn split_payment(
    currency: Currency,
    price: U256,
    seller: Address,
    fees: &[Fee],
) -> Result<Vec<ConsiderationItem>, ComposeError> {
    let fee_items = fee_items(currency, price, fees)?;
    let fee_total = fee_items.iter().fold(U256::ZERO, |acc, item| acc + item.start_amount);
    let proceeds = price - fee_total;

    let mut items = Vec::with_capacity(fee_items.len() + 1);
    items.push(ConsiderationItem {
        item_type: currency.item_type(),
        token: currency.token(),
        identifier_or_criteria: U256::ZERO,
        start_amount: proceeds,
        end_amount: proceeds,
        recipient: seller,
    });
    items.extend(fee_items);
    Ok(items)
}
