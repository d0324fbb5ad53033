//! Shared types for marketplace orders, order composition, and digest signing.

pub mod compose;
pub mod order;
pub mod signer;


pub use compose::{ComposeError, Currency, Fee, Listing, Offer, OrderTerms, TokenAsset};
pub use order::{
    ConsiderationItem, ItemType, OfferItem, OrderComponents, OrderType, UnknownDiscriminant,
};
pub use signer::{DigestSigner, SignerError};
