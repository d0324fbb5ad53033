use std::collections::BTreeMap;

use alloy_primitives::{Address, B256, I256, U256};

/// A typed-data value, shaped to match a [`FieldType`](super::FieldType).
///
/// `Bytes` carries both `bytes` and `bytesN` payloads; the declared type decides
/// how it is encoded and what length is accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypedValue {
    Uint(U256),
    Int(I256),
    Address(Address),
    Bool(bool),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<TypedValue>),
    Struct(BTreeMap<String, TypedValue>),
}

impl TypedValue {
    /// Build a struct value from `(member, value)` pairs.
    pub fn structure<K: Into<String>>(members: impl IntoIterator<Item = (K, TypedValue)>) -> Self {
        TypedValue::Struct(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Member of a struct value.
    pub fn get(&self, member: &str) -> Option<&TypedValue> {
        match self {
            TypedValue::Struct(members) => members.get(member),
            _ => None,
        }
    }
}

impl From<U256> for TypedValue {
    fn from(value: U256) -> Self {
        TypedValue::Uint(value)
    }
}

impl From<u64> for TypedValue {
    fn from(value: u64) -> Self {
        TypedValue::Uint(U256::from(value))
    }
}

impl From<I256> for TypedValue {
    fn from(value: I256) -> Self {
        TypedValue::Int(value)
    }
}

impl From<Address> for TypedValue {
    fn from(value: Address) -> Self {
        TypedValue::Address(value)
    }
}

impl From<bool> for TypedValue {
    fn from(value: bool) -> Self {
        TypedValue::Bool(value)
    }
}

impl From<B256> for TypedValue {
    fn from(value: B256) -> Self {
        TypedValue::Bytes(value.to_vec())
    }
}

impl From<&str> for TypedValue {
    fn from(value: &str) -> Self {
        TypedValue::String(value.to_owned())
    }
}

impl From<String> for TypedValue {
    fn from(value: String) -> Self {
        TypedValue::String(value)
    }
}

impl From<Vec<TypedValue>> for TypedValue {
    fn from(value: Vec<TypedValue>) -> Self {
        TypedValue::Array(value)
    }
}
