use alloy_primitives::{Address, B256};
use anyhow::{Context, Result};
use bulk_order_encoder::{BulkOrder, BulkOrderEncoder, DigestSigner, LocalSigner};
use bulk_order_types::OrderComponents;
use serde::Serialize;

/// Machine-readable result of `encode`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeReport {
    pub height: u32,
    pub root: B256,
    pub type_hash: B256,
    pub struct_hash: B256,
    pub digest: B256,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<Address>,
    pub orders: Vec<OrderEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEntry {
    pub index: usize,
    pub order_hash: B256,
    pub proof: Vec<B256>,
    /// Encoded bulk signature, present when a key was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeHashEntry {
    pub height: u32,
    pub type_hash: B256,
}

pub fn parse_orders(json: &str) -> Result<Vec<OrderComponents>> {
    serde_json::from_str(json).context("orders must be a JSON array of OrderComponents")
}

pub fn encode_report(
    encoder: &BulkOrderEncoder,
    orders: &[OrderComponents],
    start_index: usize,
    height: Option<u32>,
    signer: Option<&LocalSigner>,
    generated_at: String,
) -> Result<EncodeReport> {
    let bulk = match height {
        Some(height) => encoder.encode_batch_with_height(orders, start_index, height),
        None => encoder.encode_batch(orders, start_index),
    }
    .context("failed encoding bulk order")?;

    let signatures = match signer {
        Some(signer) => Some(bulk.sign(signer).context("failed signing bulk order")?),
        None => None,
    };

    let entries = bulk
        .proofs()
        .iter()
        .enumerate()
        .map(|(i, entry)| OrderEntry {
            index: entry.index,
            order_hash: entry.order_hash,
            proof: entry.proof.clone(),
            signature: signatures
                .as_ref()
                .map(|all| format!("0x{}", hex::encode(all[i].encode()))),
        })
        .collect();

    Ok(report_header(&bulk, generated_at, signer.map(|signer| signer.address()), entries))
}

fn report_header(
    bulk: &BulkOrder,
    generated_at: String,
    signer: Option<Address>,
    orders: Vec<OrderEntry>,
) -> EncodeReport {
    EncodeReport {
        height: bulk.height(),
        root: bulk.root(),
        type_hash: bulk.type_hash(),
        struct_hash: bulk.struct_hash(),
        digest: bulk.digest(),
        generated_at,
        signer,
        orders,
    }
}

pub fn type_hash_table(encoder: &BulkOrderEncoder, max_height: u32) -> Result<Vec<TypeHashEntry>> {
    let hashes = encoder
        .type_hashes_up_to(max_height)
        .context("invalid --max-height")?;
    Ok((1..).zip(hashes).map(|(height, type_hash)| TypeHashEntry { height, type_hash }).collect())
}
