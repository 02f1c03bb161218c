use nbted::{Error, KindRef, TagKind, Tree, Value, create_instance};

#[test]
fn test_ids_and_names_are_bijective() {
    for (i, kind) in TagKind::ALL.into_iter().enumerate() {
        assert_eq!(kind.id() as usize, i + 1);
        assert_eq!(TagKind::from_id(kind.id()), Some(kind));
        assert_eq!(TagKind::from_type_name(kind.type_name()), Some(kind));
        assert_eq!(kind.to_string(), kind.type_name());
    }
}

#[test]
fn test_type_names() {
    let names: Vec<&str> = TagKind::ALL.iter().map(|k| k.type_name()).collect();
    assert_eq!(
        names,
        [
            "byte",
            "short",
            "int",
            "long",
            "float",
            "double",
            "byte-array",
            "string",
            "list",
            "compound",
            "int-array",
            "long-array"
        ]
    );
}

#[test]
fn test_kind_families() {
    assert!(TagKind::Double.is_primitive());
    assert!(!TagKind::String.is_primitive());
    assert!(TagKind::LongArray.is_array());
    assert!(TagKind::List.is_composite());
    assert!(TagKind::IntArray.is_container());
    assert!(!TagKind::String.is_container());
    assert_eq!(TagKind::ByteArray.array_element(), Some(TagKind::Byte));
    assert_eq!(TagKind::List.array_element(), None);
}

#[test]
fn test_create_instance_by_every_reference() {
    let mut tree = Tree::new();
    let by_kind = create_instance(&mut tree, TagKind::Long, "a").unwrap();
    let by_id = create_instance(&mut tree, 8u8, "b").unwrap();
    let by_name = create_instance(&mut tree, "compound", "c").unwrap();

    assert!(matches!(tree.value(by_kind).unwrap(), Value::Long(0)));
    assert_eq!(tree.value(by_id).unwrap().as_str(), Some(""));
    assert_eq!(tree.kind(by_name).unwrap(), TagKind::Compound);
    assert_eq!(tree.name(by_name).unwrap(), "c");
    assert_eq!(tree.parent(by_name).unwrap(), None);
}

#[test]
fn test_zero_values() {
    for kind in TagKind::ALL {
        let value = Value::zero(kind);
        assert_eq!(value.kind(), kind);
    }
    match Value::zero(TagKind::List) {
        Value::List(list) => {
            assert!(list.is_empty());
            assert_eq!(list.element_kind(), None);
        }
        other => panic!("expected a list, got {other:?}"),
    }
}

#[test]
fn test_unknown_kinds() {
    let mut tree = Tree::new();
    match create_instance(&mut tree, 0u8, "") {
        Err(Error::UnknownType(_)) => {}
        other => panic!("expected UnknownType, got {other:?}"),
    }
    match create_instance(&mut tree, "uuid", "") {
        Err(Error::UnknownType(name)) => assert_eq!(name, "uuid"),
        other => panic!("expected UnknownType, got {other:?}"),
    }
    match KindRef::Id(99).resolve() {
        Err(Error::UnknownType(_)) => {}
        other => panic!("expected UnknownType, got {other:?}"),
    }
    assert_eq!(tree.node_count(), 0);
}
