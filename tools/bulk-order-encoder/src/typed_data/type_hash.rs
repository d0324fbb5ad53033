use std::collections::BTreeSet;

use alloy_primitives::B256;

use super::schema::TypeSchema;
use crate::error::Result;
use crate::hash::keccak256_bytes;

/// Canonical EIP-712 type string: the primary type followed by every struct it references
/// (transitively), each exactly once, sorted by name.
///
/// `Mail(Person from,Person to,string contents)Person(string name,address wallet)`
pub fn encode_type(schema: &TypeSchema, primary: &str) -> Result<String> {
    let mut dependencies = BTreeSet::new();
    collect_dependencies(schema, primary, &mut dependencies)?;
    dependencies.remove(primary);

    let mut out = struct_signature(schema, primary)?;
    for name in &dependencies {
        out.push_str(&struct_signature(schema, name)?);
    }
    Ok(out)
}

/// keccak256 of [`encode_type`].
pub fn type_hash(schema: &TypeSchema, primary: &str) -> Result<B256> {
    let encoded = encode_type(schema, primary)?;
    Ok(keccak256_bytes(encoded.as_bytes()))
}

/// `Name(type1 name1,type2 name2)` with member types exactly as declared.
fn struct_signature(schema: &TypeSchema, name: &str) -> Result<String> {
    let members = schema
        .fields(name)?
        .iter()
        .map(|field| format!("{} {}", field.ty, field.name))
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("{name}({members})"))
}

fn collect_dependencies(
    schema: &TypeSchema,
    name: &str,
    found: &mut BTreeSet<String>,
) -> Result<()> {
    if found.contains(name) {
        return Ok(());
    }
    let fields = schema.fields(name)?;
    found.insert(name.to_owned());

    for field in fields {
        if let Some(nested) = schema.resolve(field)?.struct_name() {
            collect_dependencies(schema, nested, found)?;
        }
    }
    Ok(())
}
