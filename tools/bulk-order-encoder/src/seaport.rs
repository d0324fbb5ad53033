//! Seaport EIP-712 schema and the mapping from [`OrderComponents`] to typed data.

use alloy_primitives::B256;
use bulk_order_types::{ConsiderationItem, OfferItem, OrderComponents};

use crate::error::Result;
use crate::merkle::check_height;
use crate::typed_data::{type_hash, TypeSchema, TypedValue};

pub const ORDER_COMPONENTS: &str = "OrderComponents";
pub const OFFER_ITEM: &str = "OfferItem";
pub const CONSIDERATION_ITEM: &str = "ConsiderationItem";
pub const BULK_ORDER: &str = "BulkOrder";
pub const BULK_ORDER_TREE_FIELD: &str = "tree";

/// The order schema as registered on-chain. Member order and spelling are part of the
/// wire contract.
pub fn order_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type(
            ORDER_COMPONENTS,
            [
                ("offerer", "address"),
                ("zone", "address"),
                ("offer", "OfferItem[]"),
                ("consideration", "ConsiderationItem[]"),
                ("orderType", "uint8"),
                ("startTime", "uint256"),
                ("endTime", "uint256"),
                ("zoneHash", "bytes32"),
                ("salt", "uint256"),
                ("conduitKey", "bytes32"),
                ("counter", "uint256"),
            ],
        )
        .with_type(
            OFFER_ITEM,
            [
                ("itemType", "uint8"),
                ("token", "address"),
                ("identifierOrCriteria", "uint256"),
                ("startAmount", "uint256"),
                ("endAmount", "uint256"),
            ],
        )
        .with_type(
            CONSIDERATION_ITEM,
            [
                ("itemType", "uint8"),
                ("token", "address"),
                ("identifierOrCriteria", "uint256"),
                ("startAmount", "uint256"),
                ("endAmount", "uint256"),
                ("recipient", "address"),
            ],
        )
}

/// `OrderComponents[2]...[2]` with one `[2]` per tree level.
pub fn bulk_order_tree_type(height: u32) -> String {
    let mut ty = String::from(ORDER_COMPONENTS);
    for _ in 0..height {
        ty.push_str("[2]");
    }
    ty
}

/// The order schema plus `BulkOrder(OrderComponents[2]...[2] tree)` for `height`.
pub fn bulk_order_schema(height: u32) -> TypeSchema {
    let tree_type = bulk_order_tree_type(height);
    order_schema().with_type(BULK_ORDER, [(BULK_ORDER_TREE_FIELD, tree_type.as_str())])
}

/// Type hash of the bulk order wrapper at `height`.
pub fn bulk_order_type_hash(height: u32) -> Result<B256> {
    check_height(height)?;
    type_hash(&bulk_order_schema(height), BULK_ORDER)
}

fn offer_item_value(item: &OfferItem) -> TypedValue {
    TypedValue::structure([
        ("itemType", TypedValue::from(u64::from(u8::from(item.item_type)))),
        ("token", item.token.into()),
        ("identifierOrCriteria", item.identifier_or_criteria.into()),
        ("startAmount", item.start_amount.into()),
        ("endAmount", item.end_amount.into()),
    ])
}

fn consideration_item_value(item: &ConsiderationItem) -> TypedValue {
    TypedValue::structure([
        ("itemType", TypedValue::from(u64::from(u8::from(item.item_type)))),
        ("token", item.token.into()),
        ("identifierOrCriteria", item.identifier_or_criteria.into()),
        ("startAmount", item.start_amount.into()),
        ("endAmount", item.end_amount.into()),
        ("recipient", item.recipient.into()),
    ])
}

/// Typed-data view of an order, shaped for [`order_schema`].
pub fn order_value(order: &OrderComponents) -> TypedValue {
    TypedValue::structure([
        ("offerer", order.offerer.into()),
        ("zone", order.zone.into()),
        ("offer", TypedValue::Array(order.offer.iter().map(offer_item_value).collect())),
        (
            "consideration",
            TypedValue::Array(order.consideration.iter().map(consideration_item_value).collect()),
        ),
        ("orderType", TypedValue::from(u64::from(u8::from(order.order_type)))),
        ("startTime", order.start_time.into()),
        ("endTime", order.end_time.into()),
        ("zoneHash", order.zone_hash.into()),
        ("salt", order.salt.into()),
        ("conduitKey", order.conduit_key.into()),
        ("counter", order.counter.into()),
    ])
}
