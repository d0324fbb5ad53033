//! EIP-712 `encodeData` / `hashStruct`.

use std::collections::BTreeMap;

use alloy_primitives::{B256, U256};

use super::defaults::default_value;
use super::schema::{FieldType, TypeSchema};
use super::type_hash::type_hash;
use super::value::TypedValue;
use crate::error::{Error, Result};
use crate::hash::keccak256_bytes;

#[derive(Clone, Debug)]
struct ResolvedStruct {
    type_hash: B256,
    members: Vec<(String, FieldType)>,
}

/// Struct hasher for one schema.
///
/// Resolves every member type and computes every type hash up front, so a schema that
/// references an undefined type fails here rather than halfway through a tree.
#[derive(Clone, Debug)]
pub struct StructHasher {
    schema: TypeSchema,
    structs: BTreeMap<String, ResolvedStruct>,
}

impl StructHasher {
    pub fn new(schema: &TypeSchema) -> Result<Self> {
        let mut structs = BTreeMap::new();
        for name in schema.type_names() {
            let members = schema
                .fields(name)?
                .iter()
                .map(|field| Ok((field.name.clone(), schema.resolve(field)?)))
                .collect::<Result<Vec<_>>>()?;
            let resolved = ResolvedStruct { type_hash: type_hash(schema, name)?, members };
            structs.insert(name.to_owned(), resolved);
        }
        Ok(Self { schema: schema.clone(), structs })
    }

    pub fn schema(&self) -> &TypeSchema {
        &self.schema
    }

    pub fn type_hash(&self, name: &str) -> Result<B256> {
        self.resolved(name).map(|resolved| resolved.type_hash)
    }

    /// Fresh default instance of `name`.
    pub fn default_value(&self, name: &str) -> Result<TypedValue> {
        default_value(&self.schema, name)
    }

    /// `typeHash || enc(member_1) || ... || enc(member_n)`.
    pub fn encode_data(&self, name: &str, value: &TypedValue) -> Result<Vec<u8>> {
        let resolved = self.resolved(name)?;
        let members = match value {
            TypedValue::Struct(members) => members,
            _ => return Err(Error::UnexpectedValue { expected: name.to_owned() }),
        };

        let mut buf = Vec::with_capacity(32 * (resolved.members.len() + 1));
        buf.extend_from_slice(resolved.type_hash.as_slice());
        for (member, ty) in &resolved.members {
            let member_value = members.get(member).ok_or_else(|| Error::MissingField {
                ty: name.to_owned(),
                field: member.clone(),
            })?;
            buf.extend_from_slice(self.encode_field(ty, member_value)?.as_slice());
        }
        Ok(buf)
    }

    /// keccak256 of [`StructHasher::encode_data`].
    pub fn hash_struct(&self, name: &str, value: &TypedValue) -> Result<B256> {
        Ok(keccak256_bytes(&self.encode_data(name, value)?))
    }

    fn resolved(&self, name: &str) -> Result<&ResolvedStruct> {
        self.structs.get(name).ok_or_else(|| Error::UnknownType(name.to_owned()))
    }

    /// One 32-byte word per member. Dynamic and reference types are hashed.
    fn encode_field(&self, ty: &FieldType, value: &TypedValue) -> Result<B256> {
        let mut word = [0u8; 32];
        match (ty, value) {
            (FieldType::Uint(bits), TypedValue::Uint(v)) => {
                if v.bit_len() > usize::from(*bits) {
                    return Err(Error::IntegerOutOfRange { ty: ty.to_string() });
                }
                word = v.to_be_bytes::<32>();
            }
            (FieldType::Int(bits), TypedValue::Int(v)) => {
                let raw = v.into_raw();
                if *bits < 256 {
                    // Everything above the sign bit must be a sign extension.
                    let high = raw >> usize::from(*bits - 1);
                    if high != U256::ZERO && high != U256::MAX >> usize::from(*bits - 1) {
                        return Err(Error::IntegerOutOfRange { ty: ty.to_string() });
                    }
                }
                word = raw.to_be_bytes::<32>();
            }
            (FieldType::Address, TypedValue::Address(address)) => {
                word[12..32].copy_from_slice(address.as_slice());
            }
            (FieldType::Bool, TypedValue::Bool(flag)) => {
                word[31] = u8::from(*flag);
            }
            (FieldType::FixedBytes(size), TypedValue::Bytes(bytes)) => {
                if bytes.len() != *size {
                    return Err(Error::ByteLength {
                        ty: ty.to_string(),
                        expected: *size,
                        actual: bytes.len(),
                    });
                }
                word[..*size].copy_from_slice(bytes);
            }
            (FieldType::Bytes, TypedValue::Bytes(bytes)) => return Ok(keccak256_bytes(bytes)),
            (FieldType::String, TypedValue::String(s)) => return Ok(keccak256_bytes(s.as_bytes())),
            (FieldType::Array { element, len }, TypedValue::Array(items)) => {
                if let Some(expected) = len {
                    if items.len() != *expected {
                        return Err(Error::ArrayLength {
                            ty: ty.to_string(),
                            expected: *expected,
                            actual: items.len(),
                        });
                    }
                }
                let mut buf = Vec::with_capacity(32 * items.len());
                for item in items {
                    buf.extend_from_slice(self.encode_field(element, item)?.as_slice());
                }
                return Ok(keccak256_bytes(&buf));
            }
            (FieldType::Struct(name), TypedValue::Struct(_)) => return self.hash_struct(name, value),
            _ => return Err(Error::UnexpectedValue { expected: ty.to_string() }),
        }
        Ok(B256::from(word))
    }
}
