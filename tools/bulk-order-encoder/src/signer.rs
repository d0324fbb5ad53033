//! Local secp256k1 signer.

pub use bulk_order_types::{DigestSigner, SignerError};

use alloy_primitives::{hex, Address, B256};
use k256::ecdsa::SigningKey;

use crate::hash::keccak256_bytes;

/// Signs digests with an in-memory private key.
///
/// Suitable for tooling and tests; wallets that keep keys elsewhere implement
/// [`DigestSigner`] themselves.
#[derive(Clone)]
pub struct LocalSigner {
    key: SigningKey,
}

impl LocalSigner {
    pub fn new(key: SigningKey) -> Self {
        Self { key }
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        SigningKey::from_slice(bytes).map(Self::new).map_err(|_| SignerError::InvalidKey)
    }

    /// Parse a hex private key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self, SignerError> {
        let bytes =
            hex::decode(key.trim().trim_start_matches("0x")).map_err(|_| SignerError::InvalidKey)?;
        Self::from_bytes(&bytes)
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

impl DigestSigner for LocalSigner {
    fn address(&self) -> Address {
        let point = self.key.verifying_key().to_encoded_point(false);
        // Skip the 0x04 uncompressed-point tag.
        let hash = keccak256_bytes(&point.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }

    fn sign_digest(&self, digest: B256) -> Result<[u8; 65], SignerError> {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(digest.as_slice())
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;

        let mut sig_bytes = [0u8; 65];
        sig_bytes[..64].copy_from_slice(&signature.to_bytes());
        sig_bytes[64] = 27 + recovery_id.to_byte();
        Ok(sig_bytes)
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner").field("address", &self.address()).finish()
    }
}
