use alloy_primitives::B256;
use bulk_order_types::{DigestSigner, OrderComponents};
use tracing::debug;

use crate::error::{Error, Result};
use crate::merkle::{check_height, tree_height, Eip712MerkleTree};
use crate::seaport::{bulk_order_type_hash, order_schema, order_value, ORDER_COMPONENTS};
use crate::signature::{compact_signature, BulkSignature};
use crate::typed_data::{Eip712Domain, StructHasher};

/// One order of a bulk order, with its position and inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderProof {
    /// Leaf index in the tree (`start_index + position in the batch`).
    pub index: usize,
    pub order: OrderComponents,
    /// EIP-712 struct hash of `order`, the leaf value.
    pub order_hash: B256,
    /// Sibling path, leaf to root.
    pub proof: Vec<B256>,
}

/// A batch of orders committed to one Merkle root, signed once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkOrder {
    tree: Eip712MerkleTree,
    digest: B256,
    proofs: Vec<OrderProof>,
}

impl BulkOrder {
    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    pub fn root(&self) -> B256 {
        self.tree.root()
    }

    /// Type hash of `BulkOrder(OrderComponents[2]...[2] tree)` at this height.
    pub fn type_hash(&self) -> B256 {
        self.tree.type_hash()
    }

    pub fn struct_hash(&self) -> B256 {
        self.tree.struct_hash()
    }

    /// The single digest to sign for the whole batch.
    pub fn digest(&self) -> B256 {
        self.digest
    }

    pub fn proofs(&self) -> &[OrderProof] {
        &self.proofs
    }

    pub fn tree(&self) -> &Eip712MerkleTree {
        &self.tree
    }

    /// Combine a signature over [`BulkOrder::digest`] with the proof of the `i`th order.
    ///
    /// The signature is stored in its compact form.
    pub fn bulk_signature(&self, i: usize, signature: &[u8; 65]) -> Result<BulkSignature> {
        let entry = self
            .proofs
            .get(i)
            .ok_or(Error::OrderIndexOutOfRange { index: i, orders: self.proofs.len() })?;
        let compact = compact_signature(signature)?;
        BulkSignature::new(compact.to_vec(), entry.index, entry.proof.clone())
    }

    /// Sign the digest once and return one bulk signature per order, in batch order.
    pub fn sign<S: DigestSigner>(&self, signer: &S) -> Result<Vec<BulkSignature>> {
        let signature = signer.sign_digest(self.digest)?;
        debug!(signer = %signer.address(), digest = %self.digest, "signed bulk order");
        (0..self.proofs.len()).map(|i| self.bulk_signature(i, &signature)).collect()
    }
}

/// Encodes batches of orders into bulk orders for one EIP-712 domain.
#[derive(Clone, Debug)]
pub struct BulkOrderEncoder {
    domain: Eip712Domain,
    hasher: StructHasher,
}

impl BulkOrderEncoder {
    pub fn new(domain: Eip712Domain) -> Result<Self> {
        let hasher = StructHasher::new(&order_schema())?;
        Ok(Self { domain, hasher })
    }

    pub fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// EIP-712 struct hash of a single order (its order hash).
    pub fn order_hash(&self, order: &OrderComponents) -> Result<B256> {
        self.hasher.hash_struct(ORDER_COMPONENTS, &order_value(order))
    }

    /// Leaf used for every padding slot: the hash of the all-zero order.
    pub fn default_leaf(&self) -> Result<B256> {
        let default_order = self.hasher.default_value(ORDER_COMPONENTS)?;
        self.hasher.hash_struct(ORDER_COMPONENTS, &default_order)
    }

    /// Digest `signature` must cover for `order` to be authentic under this encoder's domain.
    pub fn bulk_digest(&self, signature: &BulkSignature, order: &OrderComponents) -> Result<B256> {
        signature.bulk_digest(&self.domain, self.order_hash(order)?)
    }

    pub fn type_hash(&self, height: u32) -> Result<B256> {
        bulk_order_type_hash(height)
    }

    /// Type hashes for heights `1..=max_height`; element `i` is height `i + 1`.
    pub fn type_hashes_up_to(&self, max_height: u32) -> Result<Vec<B256>> {
        (1..=max_height).map(bulk_order_type_hash).collect()
    }

    /// Encode `orders` into a tree of the minimal height, leaving `start_index` leading slots
    /// as padding.
    pub fn encode_batch(&self, orders: &[OrderComponents], start_index: usize) -> Result<BulkOrder> {
        let height = tree_height(orders.len(), start_index);
        self.encode_batch_with_height(orders, start_index, height)
    }

    /// Encode `orders` into a tree of an explicit height, which must hold the batch.
    pub fn encode_batch_with_height(
        &self,
        orders: &[OrderComponents],
        start_index: usize,
        height: u32,
    ) -> Result<BulkOrder> {
        check_height(height)?;
        let minimum = tree_height(orders.len(), start_index);
        if height < minimum {
            return Err(Error::HeightBelowMinimum { requested: height, minimum });
        }

        let order_hashes = orders
            .iter()
            .map(|order| self.order_hash(order))
            .collect::<Result<Vec<_>>>()?;
        let tree = Eip712MerkleTree::from_leaf_digests(
            self.type_hash(height)?,
            self.default_leaf()?,
            &order_hashes,
            height,
            start_index,
        )?;
        let digest = tree.signing_digest(&self.domain);

        let mut proofs = Vec::with_capacity(orders.len());
        for (i, (order, order_hash)) in orders.iter().zip(order_hashes).enumerate() {
            let index = start_index + i;
            let proof = tree.proof(index).ok_or(Error::CapacityExceeded {
                leaves: orders.len(),
                start_index,
                capacity: tree.leaves().len(),
            })?;
            proofs.push(OrderProof { index, order: order.clone(), order_hash, proof });
        }

        debug!(
            orders = orders.len(),
            start_index,
            height,
            root = %tree.root(),
            digest = %digest,
            "encoded bulk order"
        );

        Ok(BulkOrder { tree, digest, proofs })
    }
}
