use core::fmt;

use alloy_primitives::{Address, B256};

/// Errors raised by a digest signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The key material could not be parsed.
    InvalidKey,
    /// The signer refused to sign (eg, the wallet user rejected the prompt).
    Rejected,
    /// The underlying signing primitive failed.
    SigningFailed(String),
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignerError::InvalidKey => f.write_str("invalid signing key"),
            SignerError::Rejected => f.write_str("signing request rejected"),
            SignerError::SigningFailed(reason) => write!(f, "signing failed: {reason}"),
        }
    }
}

impl std::error::Error for SignerError {}

/// Signs 32-byte EIP-712 digests, implemented differently by local keys and external wallets.
pub trait DigestSigner {
    /// Address the signatures recover to.
    fn address(&self) -> Address;

    /// Sign a prehashed digest, returning `r || s || v` with `v` in {27, 28}.
    fn sign_digest(&self, digest: B256) -> Result<[u8; 65], SignerError>;
}
