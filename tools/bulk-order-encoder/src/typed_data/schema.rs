use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// A named, typed struct member.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypedField {
    pub name: String,
    pub ty: String,
}

impl TypedField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }
}

/// EIP-712 type definitions: struct name to its ordered members.
///
/// Member order is part of the canonical type string and therefore of every hash.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeSchema {
    types: BTreeMap<String, Vec<TypedField>>,
}

impl TypeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TypeSchema::insert`] taking `(name, type)` pairs.
    pub fn with_type<'a>(
        mut self,
        name: &str,
        fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        let fields = fields.into_iter().map(|(name, ty)| TypedField::new(name, ty)).collect();
        self.insert(name, fields);
        self
    }

    /// Define or replace a struct type.
    pub fn insert(&mut self, name: impl Into<String>, fields: Vec<TypedField>) {
        self.types.insert(name.into(), fields);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn fields(&self, name: &str) -> Result<&[TypedField]> {
        self.types
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownType(name.to_owned()))
    }

    /// Struct names in lexicographic order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Resolve a member's declared type string against this schema.
    pub fn resolve(&self, field: &TypedField) -> Result<FieldType> {
        FieldType::parse(&field.ty, self).ok_or_else(|| Error::InvalidFieldType {
            field: field.name.clone(),
            ty: field.ty.clone(),
        })
    }

    /// Check that every member type of every struct resolves.
    pub fn validate(&self) -> Result<()> {
        for fields in self.types.values() {
            for field in fields {
                self.resolve(field)?;
            }
        }
        Ok(())
    }
}

/// A resolved member type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Uint(u16),
    Int(u16),
    Address,
    Bool,
    FixedBytes(usize),
    Bytes,
    String,
    /// `element[len]`, or `element[]` when `len` is `None`.
    Array { element: Box<FieldType>, len: Option<usize> },
    Struct(String),
}

impl FieldType {
    /// Parse a type string. Struct names must be defined in `schema`.
    pub fn parse(ty: &str, schema: &TypeSchema) -> Option<FieldType> {
        // The outermost dimension is the last suffix: `Foo[2][3]` is three `Foo[2]`.
        if let Some(stripped) = ty.strip_suffix(']') {
            let open = stripped.rfind('[')?;
            let len = match &stripped[open + 1..] {
                "" => None,
                digits => Some(parse_decimal(digits)?),
            };
            let element = FieldType::parse(&stripped[..open], schema)?;
            return Some(FieldType::Array { element: Box::new(element), len });
        }

        match ty {
            "address" => return Some(FieldType::Address),
            "bool" => return Some(FieldType::Bool),
            "string" => return Some(FieldType::String),
            "bytes" => return Some(FieldType::Bytes),
            _ => {}
        }
        if let Some(bits) = ty.strip_prefix("uint").and_then(parse_bits) {
            return Some(FieldType::Uint(bits));
        }
        if let Some(bits) = ty.strip_prefix("int").and_then(parse_bits) {
            return Some(FieldType::Int(bits));
        }
        if let Some(size) = ty.strip_prefix("bytes").and_then(parse_decimal) {
            if (1..=32).contains(&size) {
                return Some(FieldType::FixedBytes(size));
            }
        }
        schema.contains(ty).then(|| FieldType::Struct(ty.to_owned()))
    }

    /// Name of the struct at the innermost array element, if any.
    pub fn struct_name(&self) -> Option<&str> {
        match self {
            FieldType::Struct(name) => Some(name),
            FieldType::Array { element, .. } => element.struct_name(),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Uint(bits) => write!(f, "uint{bits}"),
            FieldType::Int(bits) => write!(f, "int{bits}"),
            FieldType::Address => f.write_str("address"),
            FieldType::Bool => f.write_str("bool"),
            FieldType::FixedBytes(size) => write!(f, "bytes{size}"),
            FieldType::Bytes => f.write_str("bytes"),
            FieldType::String => f.write_str("string"),
            FieldType::Array { element, len: Some(len) } => write!(f, "{element}[{len}]"),
            FieldType::Array { element, len: None } => write!(f, "{element}[]"),
            FieldType::Struct(name) => f.write_str(name),
        }
    }
}

fn parse_decimal(digits: &str) -> Option<usize> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Leading zeros would make a second spelling of the same type.
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

fn parse_bits(digits: &str) -> Option<u16> {
    let bits = parse_decimal(digits)?;
    (bits % 8 == 0 && (8..=256).contains(&bits)).then_some(bits as u16)
}
