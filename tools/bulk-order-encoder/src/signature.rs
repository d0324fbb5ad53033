//! Bulk signature encoding.
//!
//! A bulk-signed order carries its own proof next to the shared signature:
//! - `bytes signature` (64-byte EIP-2098 compact, or 65-byte r||s||v)
//! - `uint24 key` (leaf index, big-endian)
//! - `bytes32[height] proof` (leaf to root)

use alloy_primitives::B256;

use crate::error::{Error, Result};
use crate::hash::keccak256_bytes;
use crate::merkle::{compute_root, MAX_TREE_HEIGHT};
use crate::seaport::bulk_order_type_hash;
use crate::typed_data::Eip712Domain;

pub const COMPACT_SIGNATURE_LEN: usize = 64;
pub const FULL_SIGNATURE_LEN: usize = 65;
pub const KEY_LEN: usize = 3;

const MAX_KEY: usize = (1 << 24) - 1;

/// Convert `r || s || v` into the EIP-2098 `r || yParityAndS` form.
///
/// Accepts `v` in {0, 1, 27, 28}.
pub fn compact_signature(signature: &[u8; FULL_SIGNATURE_LEN]) -> Result<[u8; COMPACT_SIGNATURE_LEN]> {
    let y_parity = match signature[64] {
        0 | 27 => 0u8,
        1 | 28 => 1u8,
        _ => return Err(Error::MalformedSignature("recovery id must be 0, 1, 27 or 28")),
    };
    if signature[32] & 0x80 != 0 {
        return Err(Error::MalformedSignature("s is not in the lower half order"));
    }
    let mut compact = [0u8; COMPACT_SIGNATURE_LEN];
    compact.copy_from_slice(&signature[..64]);
    compact[32] |= y_parity << 7;
    Ok(compact)
}

/// Inverse of [`compact_signature`], producing `v` in {27, 28}.
pub fn expand_signature(compact: &[u8; COMPACT_SIGNATURE_LEN]) -> [u8; FULL_SIGNATURE_LEN] {
    let mut full = [0u8; FULL_SIGNATURE_LEN];
    full[..64].copy_from_slice(compact);
    full[32] &= 0x7f;
    full[64] = 27 + (compact[32] >> 7);
    full
}

/// A signature over a bulk order root plus one order's position and proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkSignature {
    signature: Vec<u8>,
    key: u32,
    proof: Vec<B256>,
}

impl BulkSignature {
    pub fn new(signature: Vec<u8>, key: usize, proof: Vec<B256>) -> Result<Self> {
        if signature.len() != COMPACT_SIGNATURE_LEN && signature.len() != FULL_SIGNATURE_LEN {
            return Err(Error::MalformedSignature("signature must be 64 or 65 bytes"));
        }
        if key > MAX_KEY {
            return Err(Error::MalformedSignature("key does not fit in 24 bits"));
        }
        let height = proof.len();
        if height == 0 || height > MAX_TREE_HEIGHT as usize {
            return Err(Error::MalformedSignature("proof height out of range"));
        }
        if key >> height != 0 {
            return Err(Error::MalformedSignature("key is outside the tree"));
        }
        Ok(Self { signature, key: key as u32, proof })
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Leaf index of the order inside the tree.
    pub fn key(&self) -> usize {
        self.key as usize
    }

    pub fn proof(&self) -> &[B256] {
        &self.proof
    }

    pub fn height(&self) -> u32 {
        self.proof.len() as u32
    }

    /// Encode for submission alongside the order.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.signature.len() + KEY_LEN + 32 * self.proof.len());
        buf.extend_from_slice(&self.signature);
        buf.extend_from_slice(&self.key.to_be_bytes()[1..]);
        for node in &self.proof {
            buf.extend_from_slice(node.as_slice());
        }
        buf
    }

    /// Parse an encoded bulk signature.
    ///
    /// Valid lengths are `64 + 3 + 32 * h` and `65 + 3 + 32 * h` for `1 <= h <= 24`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let min_len = COMPACT_SIGNATURE_LEN + KEY_LEN + 32;
        if bytes.len() < min_len {
            return Err(Error::MalformedSignature("too short for a bulk signature"));
        }
        let extra = (bytes.len() - COMPACT_SIGNATURE_LEN - KEY_LEN) % 32;
        let sig_len = match extra {
            0 => COMPACT_SIGNATURE_LEN,
            1 => FULL_SIGNATURE_LEN,
            _ => return Err(Error::MalformedSignature("length is not signature + key + proof")),
        };
        let height = (bytes.len() - sig_len - KEY_LEN) / 32;
        if height == 0 || height > MAX_TREE_HEIGHT as usize {
            return Err(Error::MalformedSignature("proof height out of range"));
        }

        let mut i = 0usize;
        let signature = read_vec(bytes, &mut i, sig_len)?;
        let key_bytes = read_vec(bytes, &mut i, KEY_LEN)?;
        let key = u32::from_be_bytes([0, key_bytes[0], key_bytes[1], key_bytes[2]]) as usize;
        let mut proof = Vec::with_capacity(height);
        for _ in 0..height {
            proof.push(B256::from_slice(&read_vec(bytes, &mut i, 32)?));
        }
        if i != bytes.len() {
            return Err(Error::MalformedSignature("trailing bytes"));
        }
        Self::new(signature, key, proof)
    }

    /// Root implied by an order hash at this signature's key and proof.
    pub fn root(&self, order_hash: B256) -> B256 {
        compute_root(order_hash, self.key(), &self.proof)
    }

    /// Recompute the digest the bulk signature must have been produced over, given the order
    /// hash of the order it accompanies.
    ///
    /// Recovering the signer from this digest and `signature()` authenticates the order.
    /// [`BulkOrderEncoder::bulk_digest`](crate::BulkOrderEncoder::bulk_digest) hashes the
    /// order first.
    pub fn bulk_digest(&self, domain: &Eip712Domain, order_hash: B256) -> Result<B256> {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(bulk_order_type_hash(self.height())?.as_slice());
        buf[32..].copy_from_slice(self.root(order_hash).as_slice());
        Ok(domain.signing_digest(keccak256_bytes(&buf)))
    }
}

fn read_vec(bytes: &[u8], i: &mut usize, len: usize) -> Result<Vec<u8>> {
    if bytes.len() < *i + len {
        return Err(Error::MalformedSignature("truncated"));
    }
    let out = bytes[*i..*i + len].to_vec();
    *i += len;
    Ok(out)
}
