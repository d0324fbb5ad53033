use alloy_primitives::{address, b256, Address, B256, I256, U256};

use crate::error::{Error, ErrorKind};
use crate::hash::{hash_pair, keccak256_bytes};
use crate::merkle::{compute_root, tree_height, verify_proof, Eip712MerkleTree};
use crate::typed_data::{
    default_value, encode_type, type_hash, Eip712Domain, FieldType, StructHasher, TypeSchema,
    TypedValue,
};

fn mail_schema() -> TypeSchema {
    TypeSchema::new()
        .with_type("Person", [("name", "string"), ("wallet", "address")])
        .with_type("Mail", [("from", "Person"), ("to", "Person"), ("contents", "string")])
}

fn person(name: &str, wallet: Address) -> TypedValue {
    TypedValue::structure([("name", TypedValue::from(name)), ("wallet", wallet.into())])
}

fn mail() -> TypedValue {
    TypedValue::structure([
        ("from", person("Cow", address!("cd2a3d9f938e13cd947ec05abc7fe734df8dd826"))),
        ("to", person("Bob", address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"))),
        ("contents", TypedValue::from("Hello, Bob!")),
    ])
}

fn mail_domain() -> Eip712Domain {
    Eip712Domain::new("Ether Mail", "1", 1, address!("cccccccccccccccccccccccccccccccccccccccc"))
}

fn leaf_schema(height: u32) -> TypeSchema {
    let tree = format!("Leaf{}", "[2]".repeat(height as usize));
    TypeSchema::new()
        .with_type("Leaf", [("value", "uint256"), ("tag", "bytes4")])
        .with_type("Tree", [("tree", tree.as_str())])
}

fn leaf(value: u64) -> TypedValue {
    TypedValue::structure([
        ("value", TypedValue::from(value)),
        ("tag", TypedValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef])),
    ])
}

#[test]
fn test_keccak_of_empty_input() {
    assert_eq!(
        keccak256_bytes(&[]),
        b256!("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
    );
}

#[test]
fn test_mail_reference_vectors() {
    let schema = mail_schema();
    assert_eq!(
        encode_type(&schema, "Mail").unwrap(),
        "Mail(Person from,Person to,string contents)Person(string name,address wallet)"
    );
    assert_eq!(
        type_hash(&schema, "Mail").unwrap(),
        b256!("a0cedeb2dc280ba39b857546d74f5549c3a1d7bdc2dd96bf881f76108e23dac2")
    );

    let hasher = StructHasher::new(&schema).unwrap();
    let struct_hash = hasher.hash_struct("Mail", &mail()).unwrap();
    assert_eq!(
        struct_hash,
        b256!("c52c0ee5d84264471806290a3f2c4cecfc5490626bf912d01f240d7a274b371e")
    );

    let domain = mail_domain();
    assert_eq!(
        domain.separator(),
        b256!("f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f")
    );
    assert_eq!(
        domain.signing_digest(struct_hash),
        b256!("be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2")
    );
}

#[test]
fn test_domain_type_lists_present_fields_only() {
    assert_eq!(
        keccak256_bytes(mail_domain().encode_type().as_bytes()),
        b256!("8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f")
    );

    let domain = Eip712Domain { chain_id: Some(U256::from(10u64)), ..Default::default() };
    assert_eq!(domain.encode_type(), "EIP712Domain(uint256 chainId)");

    let salted = Eip712Domain { salt: Some(B256::repeat_byte(1)), ..mail_domain() };
    assert_ne!(salted.separator(), mail_domain().separator());
}

#[test]
fn test_encode_type_sorts_and_dedups_dependencies() {
    let schema = TypeSchema::new()
        .with_type("Zoo", [("b", "Bear"), ("a", "Ant[]"), ("again", "Bear[3]")])
        .with_type("Bear", [("cub", "Cub")])
        .with_type("Ant", [("cub", "Cub"), ("legs", "uint8")])
        .with_type("Cub", [("age", "uint16")])
        .with_type("Unused", [("x", "bool")]);
    assert_eq!(
        encode_type(&schema, "Zoo").unwrap(),
        "Zoo(Bear b,Ant[] a,Bear[3] again)Ant(Cub cub,uint8 legs)Bear(Cub cub)Cub(uint16 age)"
    );
    // The primary type is never repeated among its dependencies.
    assert_eq!(encode_type(&schema, "Cub").unwrap(), "Cub(uint16 age)");
}

#[test]
fn test_fixed_array_suffix_in_type_string() {
    let schema = leaf_schema(3);
    assert_eq!(
        encode_type(&schema, "Tree").unwrap(),
        "Tree(Leaf[2][2][2] tree)Leaf(uint256 value,bytes4 tag)"
    );
    assert_ne!(type_hash(&schema, "Tree").unwrap(), type_hash(&leaf_schema(2), "Tree").unwrap());
    assert_eq!(type_hash(&schema, "Tree").unwrap(), type_hash(&leaf_schema(3), "Tree").unwrap());
}

#[test]
fn test_parse_field_types() {
    let schema = leaf_schema(1);
    assert_eq!(FieldType::parse("uint256", &schema), Some(FieldType::Uint(256)));
    assert_eq!(FieldType::parse("int8", &schema), Some(FieldType::Int(8)));
    assert_eq!(FieldType::parse("bytes32", &schema), Some(FieldType::FixedBytes(32)));
    assert_eq!(FieldType::parse("uint7", &schema), None);
    assert_eq!(FieldType::parse("uint08", &schema), None);
    assert_eq!(FieldType::parse("bytes33", &schema), None);
    assert_eq!(FieldType::parse("Missing", &schema), None);
    assert_eq!(FieldType::parse("Leaf[2", &schema), None);

    let nested = FieldType::parse("Leaf[2][3]", &schema).unwrap();
    assert_eq!(
        nested,
        FieldType::Array {
            element: Box::new(FieldType::Array {
                element: Box::new(FieldType::Struct("Leaf".into())),
                len: Some(2),
            }),
            len: Some(3),
        }
    );
    assert_eq!(nested.to_string(), "Leaf[2][3]");
    assert_eq!(nested.struct_name(), Some("Leaf"));
    assert_eq!(FieldType::parse("address[]", &schema).unwrap().to_string(), "address[]");
}

#[test]
fn test_schema_errors_are_configuration_errors() {
    let schema = TypeSchema::new().with_type("Broken", [("x", "Nope")]);
    let err = type_hash(&schema, "Broken").unwrap_err();
    assert!(matches!(err, Error::InvalidFieldType { ref ty, .. } if ty == "Nope"));
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(schema.validate().is_err());
    assert!(StructHasher::new(&schema).is_err());

    let err = type_hash(&mail_schema(), "Letter").unwrap_err();
    assert!(matches!(err, Error::UnknownType(ref name) if name == "Letter"));
    assert!(mail_schema().validate().is_ok());
}

#[test]
fn test_default_value_shapes() {
    let schema = TypeSchema::new()
        .with_type(
            "Outer",
            [
                ("pair", "Inner[2]"),
                ("tag", "bytes4"),
                ("label", "string"),
                ("delta", "int8"),
                ("flag", "bool"),
                ("list", "uint256[]"),
            ],
        )
        .with_type("Inner", [("who", "address"), ("data", "bytes")]);

    let inner = TypedValue::structure([
        ("who", TypedValue::Address(Address::ZERO)),
        ("data", TypedValue::Bytes(vec![])),
    ]);
    let expected = TypedValue::structure([
        ("pair", TypedValue::Array(vec![inner.clone(), inner])),
        ("tag", TypedValue::Bytes(vec![0; 4])),
        ("label", TypedValue::String(String::new())),
        ("delta", TypedValue::Int(I256::ZERO)),
        ("flag", TypedValue::Bool(false)),
        ("list", TypedValue::Array(vec![])),
    ]);
    assert_eq!(default_value(&schema, "Outer").unwrap(), expected);

    // Every call builds a new value.
    let mut first = default_value(&schema, "Outer").unwrap();
    if let TypedValue::Struct(members) = &mut first {
        members.insert("flag".into(), TypedValue::Bool(true));
    }
    assert_eq!(default_value(&schema, "Outer").unwrap(), expected);

    // The default must also be encodable.
    let hasher = StructHasher::new(&schema).unwrap();
    hasher.hash_struct("Outer", &expected).unwrap();
}

#[test]
fn test_default_value_errors() {
    let direct = TypeSchema::new().with_type("Node", [("child", "Node")]);
    assert!(matches!(default_value(&direct, "Node"), Err(Error::RecursiveType(_))));

    let fixed = TypeSchema::new().with_type("Node", [("children", "Node[2]")]);
    assert!(matches!(default_value(&fixed, "Node"), Err(Error::RecursiveType(_))));

    let dynamic = TypeSchema::new().with_type("Node", [("children", "Node[]")]);
    assert_eq!(
        default_value(&dynamic, "Node").unwrap(),
        TypedValue::structure([("children", TypedValue::Array(vec![]))])
    );

    assert!(matches!(default_value(&dynamic, "Leaf"), Err(Error::UnknownType(_))));
}

#[test]
fn test_value_encoding_errors() {
    let schema = TypeSchema::new().with_type(
        "Values",
        [("small", "uint8"), ("signed", "int8"), ("word", "bytes32"), ("items", "uint8[2]")],
    );
    let hasher = StructHasher::new(&schema).unwrap();
    let valid = |small: u64, signed: i64, word: Vec<u8>, items: Vec<TypedValue>| {
        TypedValue::structure([
            ("small", TypedValue::from(small)),
            ("signed", TypedValue::Int(I256::try_from(signed).unwrap())),
            ("word", TypedValue::Bytes(word)),
            ("items", TypedValue::Array(items)),
        ])
    };
    let two = || vec![TypedValue::from(1u64), TypedValue::from(2u64)];

    assert!(hasher.hash_struct("Values", &valid(255, -128, vec![0; 32], two())).is_ok());
    assert!(hasher.hash_struct("Values", &valid(0, 127, vec![0; 32], two())).is_ok());

    let err = hasher.hash_struct("Values", &valid(256, 0, vec![0; 32], two())).unwrap_err();
    assert!(matches!(err, Error::IntegerOutOfRange { .. }));
    assert_eq!(err.kind(), ErrorKind::ValueEncoding);

    assert!(matches!(
        hasher.hash_struct("Values", &valid(0, -129, vec![0; 32], two())),
        Err(Error::IntegerOutOfRange { .. })
    ));
    assert!(matches!(
        hasher.hash_struct("Values", &valid(0, 128, vec![0; 32], two())),
        Err(Error::IntegerOutOfRange { .. })
    ));
    assert!(matches!(
        hasher.hash_struct("Values", &valid(0, 0, vec![0; 31], two())),
        Err(Error::ByteLength { expected: 32, actual: 31, .. })
    ));
    assert!(matches!(
        hasher.hash_struct("Values", &valid(0, 0, vec![0; 32], vec![TypedValue::from(1u64)])),
        Err(Error::ArrayLength { expected: 2, actual: 1, .. })
    ));

    let missing = TypedValue::structure([("small", TypedValue::from(1u64))]);
    assert!(matches!(
        hasher.hash_struct("Values", &missing),
        Err(Error::MissingField { ref field, .. }) if field == "signed"
    ));

    let wrong_shape = TypedValue::structure([
        ("small", TypedValue::from("one")),
        ("signed", TypedValue::Int(I256::ZERO)),
        ("word", TypedValue::Bytes(vec![0; 32])),
        ("items", TypedValue::Array(two())),
    ]);
    assert!(matches!(
        hasher.hash_struct("Values", &wrong_shape),
        Err(Error::UnexpectedValue { ref expected }) if expected == "uint8"
    ));
}

#[test]
fn test_tree_height() {
    assert_eq!(tree_height(0, 0), 1);
    assert_eq!(tree_height(1, 0), 1);
    assert_eq!(tree_height(2, 0), 1);
    assert_eq!(tree_height(3, 0), 2);
    assert_eq!(tree_height(4, 0), 2);
    assert_eq!(tree_height(5, 0), 3);
    assert_eq!(tree_height(1024, 0), 10);
    assert_eq!(tree_height(1025, 0), 11);
    assert_eq!(tree_height(1, 2), 2);
    assert_eq!(tree_height(0, 5), 3);
}

#[test]
fn test_merkle_tree_levels_and_padding() {
    let schema = leaf_schema(2);
    let leaves = vec![leaf(1), leaf(2), leaf(3)];
    let tree = Eip712MerkleTree::build(&schema, "Tree", "Leaf", &leaves, 2, 0).unwrap();

    let hasher = StructHasher::new(&schema).unwrap();
    let default_leaf = hasher.hash_struct("Leaf", &default_value(&schema, "Leaf").unwrap()).unwrap();
    assert_eq!(tree.default_leaf(), default_leaf);
    assert_eq!(tree.leaves().len(), 4);
    assert_eq!(tree.leaves()[3], default_leaf);
    assert_eq!(tree.level(1).unwrap().len(), 2);
    assert_eq!(tree.level(2).unwrap().len(), 1);
    assert!(tree.level(3).is_none());

    let l = tree.leaves();
    let expected_root = hash_pair(&hash_pair(&l[0], &l[1]), &hash_pair(&l[2], &l[3]));
    assert_eq!(tree.root(), expected_root);

    for index in 0..4 {
        let proof = tree.proof(index).unwrap();
        assert_eq!(proof.len(), 2);
        assert!(verify_proof(l[index], index, &proof, tree.root()));
    }
    assert!(tree.proof(4).is_none());
}

#[test]
fn test_merkle_struct_hash_matches_nested_array_encoding() {
    let schema = leaf_schema(2);
    let leaves = vec![leaf(10), leaf(20), leaf(30)];
    let tree = Eip712MerkleTree::build(&schema, "Tree", "Leaf", &leaves, 2, 0).unwrap();

    let padding = default_value(&schema, "Leaf").unwrap();
    let nested = TypedValue::structure([(
        "tree",
        TypedValue::Array(vec![
            TypedValue::Array(vec![leaf(10), leaf(20)]),
            TypedValue::Array(vec![leaf(30), padding]),
        ]),
    )]);
    let hasher = StructHasher::new(&schema).unwrap();
    assert_eq!(tree.struct_hash(), hasher.hash_struct("Tree", &nested).unwrap());
    assert_eq!(tree.type_hash(), type_hash(&schema, "Tree").unwrap());
}

#[test]
fn test_merkle_start_index_and_empty_tree() {
    let schema = leaf_schema(2);
    let tree = Eip712MerkleTree::build(&schema, "Tree", "Leaf", &[leaf(7)], 2, 2).unwrap();
    let default_leaf = tree.default_leaf();
    assert_eq!(tree.leaves()[0], default_leaf);
    assert_eq!(tree.leaves()[1], default_leaf);
    assert_ne!(tree.leaves()[2], default_leaf);
    assert_eq!(tree.leaves()[3], default_leaf);
    assert_eq!(tree.start_index(), 2);
    assert_eq!(tree.leaf_count(), 1);

    let empty = Eip712MerkleTree::build(&schema, "Tree", "Leaf", &[], 2, 0).unwrap();
    assert!(empty.leaves().iter().all(|leaf| *leaf == default_leaf));
    let pair = hash_pair(&default_leaf, &default_leaf);
    assert_eq!(empty.root(), hash_pair(&pair, &pair));
}

#[test]
fn test_merkle_configuration_errors() {
    let schema = leaf_schema(1);
    let leaves = vec![leaf(1), leaf(2), leaf(3)];

    let err = Eip712MerkleTree::build(&schema, "Tree", "Leaf", &leaves, 1, 0).unwrap_err();
    assert!(matches!(err, Error::CapacityExceeded { leaves: 3, start_index: 0, capacity: 2 }));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    assert!(matches!(
        Eip712MerkleTree::build(&schema, "Tree", "Leaf", &leaves[..1], 1, 2),
        Err(Error::CapacityExceeded { .. })
    ));
    assert!(matches!(
        Eip712MerkleTree::build(&schema, "Tree", "Leaf", &leaves, 0, 0),
        Err(Error::ZeroHeight)
    ));
    assert!(matches!(
        Eip712MerkleTree::from_leaf_digests(B256::ZERO, B256::ZERO, &[], 25, 0),
        Err(Error::HeightOutOfRange { height: 25, max: 24 })
    ));
    assert!(matches!(
        Eip712MerkleTree::build(&schema, "Forest", "Leaf", &leaves[..1], 1, 0),
        Err(Error::UnknownType(_))
    ));
}

#[test]
fn test_verify_proof_rejects_wrong_position() {
    let digests: Vec<B256> = (0u8..4).map(|i| keccak256_bytes(&[i])).collect();
    let tree = Eip712MerkleTree::from_leaf_digests(B256::ZERO, B256::ZERO, &digests, 2, 0).unwrap();
    let proof = tree.proof(1).unwrap();

    assert!(verify_proof(digests[1], 1, &proof, tree.root()));
    assert!(!verify_proof(digests[1], 0, &proof, tree.root()));
    assert!(!verify_proof(digests[2], 1, &proof, tree.root()));
    // Same low bits, but outside a height-2 tree.
    assert!(!verify_proof(digests[1], 5, &proof, tree.root()));
    assert_eq!(compute_root(digests[1], 5, &proof), tree.root());
}

#[test]
fn test_merkle_wrapper_must_match_height() {
    let leaves = vec![leaf(1), leaf(2), leaf(3)];

    // `Tree(Leaf[2] tree)` describes a height-1 tree only.
    let err = Eip712MerkleTree::build(&leaf_schema(1), "Tree", "Leaf", &leaves, 2, 0).unwrap_err();
    assert!(matches!(err, Error::WrapperMismatch { ref wrapper, height: 2 } if wrapper == "Tree"));
    assert_eq!(err.kind(), ErrorKind::Configuration);

    assert!(matches!(
        Eip712MerkleTree::build(&leaf_schema(3), "Tree", "Leaf", &leaves, 2, 0),
        Err(Error::WrapperMismatch { .. })
    ));

    let wrong_leaf = leaf_schema(2).with_type("Other", [("value", "uint256")]);
    assert!(matches!(
        Eip712MerkleTree::build(&wrong_leaf, "Tree", "Other", &[], 2, 0),
        Err(Error::WrapperMismatch { .. })
    ));

    let two_members = TypeSchema::new()
        .with_type("Leaf", [("value", "uint256"), ("tag", "bytes4")])
        .with_type("Tree", [("tree", "Leaf[2][2]"), ("extra", "bool")]);
    assert!(matches!(
        Eip712MerkleTree::build(&two_members, "Tree", "Leaf", &leaves, 2, 0),
        Err(Error::WrapperMismatch { .. })
    ));

    let dynamic = TypeSchema::new()
        .with_type("Leaf", [("value", "uint256"), ("tag", "bytes4")])
        .with_type("Tree", [("tree", "Leaf[][2]")]);
    assert!(matches!(
        Eip712MerkleTree::build(&dynamic, "Tree", "Leaf", &leaves, 2, 0),
        Err(Error::WrapperMismatch { .. })
    ));
}

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_public_types_are_send_sync() {
    assert_send_sync::<crate::BulkOrderEncoder>();
    assert_send_sync::<crate::BulkOrder>();
    assert_send_sync::<crate::OrderProof>();
    assert_send_sync::<Eip712MerkleTree>();
    assert_send_sync::<StructHasher>();
    assert_send_sync::<TypeSchema>();
    assert_send_sync::<TypedValue>();
    assert_send_sync::<Eip712Domain>();
    assert_send_sync::<crate::BulkSignature>();
    assert_send_sync::<crate::LocalSigner>();
    assert_send_sync::<Error>();
}
