//! Canonical zero values for typed-data structs.
//!
//! Padding leaves of a bulk order tree are the struct hash of these values, so they must
//! match what every other implementation of the standard produces.

use std::collections::BTreeMap;

use alloy_primitives::{Address, I256, U256};

use super::schema::{FieldType, TypeSchema};
use super::value::TypedValue;
use crate::error::{Error, Result};

/// Build a fresh default instance of `type_name`.
pub fn default_value(schema: &TypeSchema, type_name: &str) -> Result<TypedValue> {
    let mut visiting = Vec::new();
    default_struct(schema, type_name, &mut visiting)
}

/// Default for a single resolved type.
pub fn default_for_type(schema: &TypeSchema, ty: &FieldType) -> Result<TypedValue> {
    let mut visiting = Vec::new();
    default_for(schema, ty, &mut visiting)
}

fn default_struct(
    schema: &TypeSchema,
    type_name: &str,
    visiting: &mut Vec<String>,
) -> Result<TypedValue> {
    if visiting.iter().any(|name| name == type_name) {
        return Err(Error::RecursiveType(type_name.to_owned()));
    }
    let fields = schema.fields(type_name)?;

    visiting.push(type_name.to_owned());
    let mut members = BTreeMap::new();
    for field in fields {
        let ty = schema.resolve(field)?;
        members.insert(field.name.clone(), default_for(schema, &ty, visiting)?);
    }
    visiting.pop();

    Ok(TypedValue::Struct(members))
}

fn default_for(schema: &TypeSchema, ty: &FieldType, visiting: &mut Vec<String>) -> Result<TypedValue> {
    let value = match ty {
        FieldType::Uint(_) => TypedValue::Uint(U256::ZERO),
        FieldType::Int(_) => TypedValue::Int(I256::ZERO),
        FieldType::Address => TypedValue::Address(Address::ZERO),
        FieldType::Bool => TypedValue::Bool(false),
        FieldType::FixedBytes(size) => TypedValue::Bytes(vec![0u8; *size]),
        FieldType::Bytes => TypedValue::Bytes(Vec::new()),
        FieldType::String => TypedValue::String(String::new()),
        FieldType::Array { len: None, .. } => TypedValue::Array(Vec::new()),
        FieldType::Array { element, len: Some(len) } => TypedValue::Array(
            (0..*len)
                .map(|_| default_for(schema, element, visiting))
                .collect::<Result<Vec<_>>>()?,
        ),
        FieldType::Struct(name) => default_struct(schema, name, visiting)?,
    };
    Ok(value)
}
