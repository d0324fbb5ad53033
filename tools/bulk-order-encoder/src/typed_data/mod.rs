//! Schema-driven EIP-712 typed data: type strings, type hashes, default values, and
//! struct hashing for arbitrary struct definitions.

pub mod defaults;
pub mod domain;
pub mod encode;
pub mod schema;
pub mod type_hash;
pub mod value;

pub use defaults::{default_for_type, default_value};
pub use domain::{signing_digest, Eip712Domain};
pub use encode::StructHasher;
pub use schema::{FieldType, TypeSchema, TypedField};
pub use type_hash::{encode_type, type_hash};
pub use value::TypedValue;
