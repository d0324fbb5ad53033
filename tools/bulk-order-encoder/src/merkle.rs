//! Fixed-height EIP-712 Merkle tree.
//!
//! The tree is exactly the EIP-712 encoding of a nested `T[2][2]...[2]` array: each parent is
//! keccak256(left || right) of its children, so the root doubles as the encoded value of the
//! wrapper struct's single array member.

use alloy_primitives::B256;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hash::{hash_pair, keccak256_bytes};
use crate::typed_data::{Eip712Domain, FieldType, StructHasher, TypeSchema, TypedValue};

/// Largest tree height the order protocol accepts (2^24 leaves).
pub const MAX_TREE_HEIGHT: u32 = 24;

/// `max(ceil(log2(leaf_count + start_index)), 1)`.
pub fn tree_height(leaf_count: usize, start_index: usize) -> u32 {
    let slots = leaf_count.saturating_add(start_index);
    if slots <= 2 {
        return 1;
    }
    slots.checked_next_power_of_two().map_or(usize::BITS, usize::trailing_zeros)
}

pub(crate) fn check_height(height: u32) -> Result<()> {
    if height == 0 {
        return Err(Error::ZeroHeight);
    }
    if height > MAX_TREE_HEIGHT {
        return Err(Error::HeightOutOfRange { height, max: MAX_TREE_HEIGHT });
    }
    Ok(())
}

fn check_wrapper(
    schema: &TypeSchema,
    wrapper_type: &str,
    leaf_type: &str,
    height: u32,
) -> Result<()> {
    let mismatch = || Error::WrapperMismatch { wrapper: wrapper_type.to_owned(), height };
    let [member] = schema.fields(wrapper_type)? else {
        return Err(mismatch());
    };
    let mut ty = schema.resolve(member)?;
    for _ in 0..height {
        ty = match ty {
            FieldType::Array { element, len: Some(2) } => *element,
            _ => return Err(mismatch()),
        };
    }
    match ty {
        FieldType::Struct(name) if name == leaf_type => Ok(()),
        _ => Err(mismatch()),
    }
}

/// A perfect binary tree of struct hashes under a wrapper type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Eip712MerkleTree {
    type_hash: B256,
    height: u32,
    start_index: usize,
    leaf_count: usize,
    default_leaf: B256,
    /// `levels[0]` are the leaves, `levels[height]` holds only the root.
    levels: Vec<Vec<B256>>,
}

impl Eip712MerkleTree {
    /// Hash `leaves` as `leaf_type` and place them at `start_index..`, padding every other slot
    /// with the hash of the default `leaf_type` value.
    ///
    /// `wrapper_type` must declare exactly one member of type `leaf_type[2]...[2]` with one
    /// `[2]` per level, otherwise its type hash would not describe this tree.
    pub fn build(
        schema: &TypeSchema,
        wrapper_type: &str,
        leaf_type: &str,
        leaves: &[TypedValue],
        height: u32,
        start_index: usize,
    ) -> Result<Self> {
        check_height(height)?;
        check_wrapper(schema, wrapper_type, leaf_type, height)?;
        let hasher = StructHasher::new(schema)?;
        let digests = leaves
            .iter()
            .map(|leaf| hasher.hash_struct(leaf_type, leaf))
            .collect::<Result<Vec<_>>>()?;
        let default_leaf = hasher.hash_struct(leaf_type, &hasher.default_value(leaf_type)?)?;
        Self::from_leaf_digests(
            hasher.type_hash(wrapper_type)?,
            default_leaf,
            &digests,
            height,
            start_index,
        )
    }

    /// Build from already hashed leaves.
    pub fn from_leaf_digests(
        type_hash: B256,
        default_leaf: B256,
        digests: &[B256],
        height: u32,
        start_index: usize,
    ) -> Result<Self> {
        check_height(height)?;
        let capacity = 1usize << height;
        let occupied = digests.len().checked_add(start_index);
        if occupied.map_or(true, |occupied| occupied > capacity) {
            return Err(Error::CapacityExceeded {
                leaves: digests.len(),
                start_index,
                capacity,
            });
        }

        let mut leaves = vec![default_leaf; capacity];
        leaves[start_index..start_index + digests.len()].copy_from_slice(digests);

        let mut levels = Vec::with_capacity(height as usize + 1);
        levels.push(leaves);
        for level in 0..height as usize {
            let parents = levels[level]
                .chunks_exact(2)
                .map(|pair| hash_pair(&pair[0], &pair[1]))
                .collect();
            levels.push(parents);
        }

        debug!(
            height,
            start_index,
            leaves = digests.len(),
            padding = capacity - digests.len(),
            "built merkle tree"
        );

        Ok(Self { type_hash, height, start_index, leaf_count: digests.len(), default_leaf, levels })
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn root(&self) -> B256 {
        self.levels[self.height as usize][0]
    }

    /// Type hash of the wrapper struct.
    pub fn type_hash(&self) -> B256 {
        self.type_hash
    }

    /// Leaf digest used for every padding slot.
    pub fn default_leaf(&self) -> B256 {
        self.default_leaf
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Number of real (non-padding) leaves.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn leaves(&self) -> &[B256] {
        &self.levels[0]
    }

    pub fn level(&self, level: usize) -> Option<&[B256]> {
        self.levels.get(level).map(Vec::as_slice)
    }

    /// Sibling path for leaf `index`, leaf to root. `None` if the index is outside the tree.
    pub fn proof(&self, index: usize) -> Option<Vec<B256>> {
        if index >= self.leaves().len() {
            return None;
        }
        let proof = self.levels[..self.height as usize]
            .iter()
            .enumerate()
            .map(|(level, nodes)| nodes[(index >> level) ^ 1])
            .collect();
        Some(proof)
    }

    /// hashStruct of the wrapper: keccak256(typeHash || root).
    pub fn struct_hash(&self) -> B256 {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(self.type_hash.as_slice());
        buf[32..].copy_from_slice(self.root().as_slice());
        keccak256_bytes(&buf)
    }

    pub fn signing_digest(&self, domain: &Eip712Domain) -> B256 {
        domain.signing_digest(self.struct_hash())
    }
}

/// Fold `leaf` up through `proof` (leaf to root), taking left/right from the bits of `index`.
pub fn compute_root(leaf: B256, index: usize, proof: &[B256]) -> B256 {
    proof.iter().enumerate().fold(leaf, |node, (level, sibling)| {
        if (index >> level) & 1 == 0 {
            hash_pair(&node, sibling)
        } else {
            hash_pair(sibling, &node)
        }
    })
}

pub fn verify_proof(leaf: B256, index: usize, proof: &[B256], root: B256) -> bool {
    // An index with bits above the proof length names a leaf outside the tree.
    let in_range = u32::try_from(proof.len())
        .ok()
        .and_then(|len| index.checked_shr(len))
        .map_or(true, |high| high == 0);
    in_range && compute_root(leaf, index, proof) == root
}
