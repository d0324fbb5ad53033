//! Bulk order encoding for Seaport-style marketplaces.
//!
//! A bulk order commits any number of orders to one EIP-712 Merkle root so a wallet signs
//! once for the whole batch. Each order is then submitted with a bulk signature carrying
//! its leaf index and proof.

pub mod encoder;
pub mod error;
pub mod hash;
pub mod merkle;
pub mod seaport;
pub mod signature;
pub mod signer;
pub mod typed_data;

#[cfg(test)]
mod tests;

pub use encoder::{BulkOrder, BulkOrderEncoder, OrderProof};
pub use error::{Error, ErrorKind, Result};
pub use merkle::{compute_root, tree_height, verify_proof, Eip712MerkleTree, MAX_TREE_HEIGHT};
pub use signature::{compact_signature, expand_signature, BulkSignature};
pub use signer::{DigestSigner, LocalSigner, SignerError};
pub use typed_data::{Eip712Domain, TypeSchema, TypedValue};
