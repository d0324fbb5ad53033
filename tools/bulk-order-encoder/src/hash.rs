use alloy_primitives::B256;
use sha3::{Digest, Keccak256};

pub fn keccak256_bytes(bytes: &[u8]) -> B256 {
    let mut h = Keccak256::new();
    h.update(bytes);
    B256::from_slice(&h.finalize())
}

/// Parent of two tree nodes: keccak256(left || right). Order is significant.
pub fn hash_pair(left: &B256, right: &B256) -> B256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left.as_slice());
    buf[32..].copy_from_slice(right.as_slice());
    keccak256_bytes(&buf)
}
