//! EIP-712 domain separator and final signing digest.

use alloy_primitives::{address, Address, B256, U256};

use crate::hash::keccak256_bytes;

/// Canonical Seaport 1.6 deployment (same address on every supported chain).
pub const SEAPORT_V1_6_ADDRESS: Address = address!("0000000000000068f116a894984e2db1123eb395");
/// Canonical Seaport 1.5 deployment.
pub const SEAPORT_V1_5_ADDRESS: Address = address!("00000000000000adc04c56bf30ac9d3c0aaf14dc");

pub const SEAPORT_DOMAIN_NAME: &str = "Seaport";

/// EIP-712 domain. Absent fields are left out of the domain type entirely.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Eip712Domain {
    pub name: Option<String>,
    pub version: Option<String>,
    pub chain_id: Option<U256>,
    pub verifying_contract: Option<Address>,
    pub salt: Option<B256>,
}

impl Eip712Domain {
    /// The common `name, version, chainId, verifyingContract` domain.
    pub fn new(name: &str, version: &str, chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: Some(name.to_owned()),
            version: Some(version.to_owned()),
            chain_id: Some(U256::from(chain_id)),
            verifying_contract: Some(verifying_contract),
            salt: None,
        }
    }

    pub fn seaport(chain_id: u64) -> Self {
        Self::new(SEAPORT_DOMAIN_NAME, "1.6", chain_id, SEAPORT_V1_6_ADDRESS)
    }

    pub fn seaport_v1_5(chain_id: u64) -> Self {
        Self::new(SEAPORT_DOMAIN_NAME, "1.5", chain_id, SEAPORT_V1_5_ADDRESS)
    }

    /// `EIP712Domain(...)` listing the present fields in canonical order.
    pub fn encode_type(&self) -> String {
        let mut members = Vec::with_capacity(5);
        if self.name.is_some() {
            members.push("string name");
        }
        if self.version.is_some() {
            members.push("string version");
        }
        if self.chain_id.is_some() {
            members.push("uint256 chainId");
        }
        if self.verifying_contract.is_some() {
            members.push("address verifyingContract");
        }
        if self.salt.is_some() {
            members.push("bytes32 salt");
        }
        format!("EIP712Domain({})", members.join(","))
    }

    pub fn separator(&self) -> B256 {
        let domain_type_hash = keccak256_bytes(self.encode_type().as_bytes());

        let mut domain_buf = Vec::with_capacity(32 * 6);
        domain_buf.extend_from_slice(domain_type_hash.as_slice());
        if let Some(name) = &self.name {
            domain_buf.extend_from_slice(keccak256_bytes(name.as_bytes()).as_slice());
        }
        if let Some(version) = &self.version {
            domain_buf.extend_from_slice(keccak256_bytes(version.as_bytes()).as_slice());
        }
        if let Some(chain_id) = self.chain_id {
            domain_buf.extend_from_slice(&chain_id.to_be_bytes::<32>());
        }
        if let Some(verifying_contract) = self.verifying_contract {
            let mut vc_padded = [0u8; 32];
            vc_padded[12..32].copy_from_slice(verifying_contract.as_slice());
            domain_buf.extend_from_slice(&vc_padded);
        }
        if let Some(salt) = self.salt {
            domain_buf.extend_from_slice(salt.as_slice());
        }
        keccak256_bytes(&domain_buf)
    }

    /// Digest a wallet signs for `struct_hash` under this domain.
    pub fn signing_digest(&self, struct_hash: B256) -> B256 {
        signing_digest(self.separator(), struct_hash)
    }
}

/// keccak256("\x19\x01" || domainSeparator || structHash)
pub fn signing_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(domain_separator.as_slice());
    final_buf.extend_from_slice(struct_hash.as_slice());
    keccak256_bytes(&final_buf)
}
