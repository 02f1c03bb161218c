//! Tests for the arena tree

use nbted::{Error, TagKind, Target, Tree, Value, read_snbt};

fn sample() -> Tree {
    read_snbt("{a: {b: [1, 2, 3]}, name: \"x\", bytes: [B; 1b, 2b]}").unwrap()
}

fn child(tree: &Tree, parent: nbted::NodeId, name: &str) -> nbted::NodeId {
    tree.get(parent, name).unwrap().unwrap()
}

#[test]
fn test_empty_tree() {
    let tree = Tree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
    assert_eq!(tree.describe(None).unwrap(), "(empty)");
    tree.check().unwrap();
}

#[test]
fn test_put_and_get() {
    let mut tree = Tree::new();
    let root = tree.create("", Value::compound());
    tree.set_root(root).unwrap();
    let level = tree.create("Level", Value::Int(3));
    assert_eq!(tree.put(root, level).unwrap(), None);

    assert_eq!(tree.get(root, "Level").unwrap(), Some(level));
    assert!(tree.contains(root, "Level").unwrap());
    assert_eq!(tree.parent(level).unwrap(), Some(root));
    assert_eq!(tree.value(level).unwrap().as_i64(), Some(3));
    tree.check().unwrap();
}

#[test]
fn test_put_replaces_in_place() {
    let mut tree = read_snbt("{a: 1, b: 2, c: 3}").unwrap();
    let root = tree.root().unwrap();
    let replacement = tree.create("b", Value::String("two".into()));
    let previous = tree.put(root, replacement).unwrap().unwrap();

    assert_eq!(tree.parent(previous).unwrap(), None);
    tree.free(previous).unwrap();
    let names: Vec<&str> = tree.entries(root).unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, ["a", "b", "c"]);
    tree.check().unwrap();
}

#[test]
fn test_attach_twice_is_consistency_error() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let a = child(&tree, root, "a");
    let other = tree.create("other", Value::compound());
    match tree.put(other, a) {
        Err(Error::Consistency(_)) => {}
        other => panic!("expected Consistency, got {other:?}"),
    }
    tree.free(other).unwrap();
    tree.check().unwrap();
}

#[test]
fn test_attach_beneath_itself_is_rejected() {
    let mut tree = read_snbt("{a: {c: {}}}").unwrap();
    let root = tree.root().unwrap();
    let a = child(&tree, root, "a");
    tree.detach(a).unwrap();
    let c = child(&tree, a, "c");
    match tree.put(c, a) {
        Err(Error::Consistency(_)) => {}
        other => panic!("expected Consistency, got {other:?}"),
    }
    tree.put(root, a).unwrap();
    tree.check().unwrap();
}

#[test]
fn test_stale_id_after_free() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let name = child(&tree, root, "name");
    tree.delete(name).unwrap();
    match tree.value(name) {
        Err(Error::Consistency(_)) => {}
        other => panic!("expected Consistency, got {other:?}"),
    }
    assert!(!tree.contains_node(name));

    // the slot is reused with a new generation
    let fresh = tree.create("fresh", Value::Byte(1));
    assert_ne!(fresh, name);
    tree.free(fresh).unwrap();
    tree.check().unwrap();
}

#[test]
fn test_clear_invalidates_ids() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    tree.clear();
    assert!(tree.is_empty());
    let new_root = tree.create("", Value::compound());
    tree.set_root(new_root).unwrap();
    match tree.kind(root) {
        Err(Error::Consistency(_)) => {}
        other => panic!("expected Consistency, got {other:?}"),
    }
}

#[test]
fn test_list_kind_is_enforced() {
    let mut tree = Tree::new();
    let list = tree.create("", Value::list());
    tree.set_root(list).unwrap();
    assert_eq!(tree.element_kind(list).unwrap(), None);

    tree.add_value(list, Value::Int(1)).unwrap();
    assert_eq!(tree.element_kind(list).unwrap(), Some(TagKind::Int));
    match tree.add_value(list, Value::Long(2)) {
        Err(Error::IncompatibleType { expected, actual }) => {
            assert_eq!(expected, TagKind::Int);
            assert_eq!(actual, TagKind::Long);
        }
        other => panic!("expected IncompatibleType, got {other:?}"),
    }
    // the rejected element does not leak
    assert_eq!(tree.node_count(), 2);
    tree.check().unwrap();
}

#[test]
fn test_list_elements_lose_their_name() {
    let mut tree = Tree::new();
    let list = tree.create("list", Value::list());
    tree.set_root(list).unwrap();
    let item = tree.create("named", Value::Short(4));
    tree.add(list, item).unwrap();
    assert_eq!(tree.name(item).unwrap(), "");
}

#[test]
fn test_removing_last_element_resets_kind() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let b = child(&tree, child(&tree, root, "a"), "b");
    for _ in 0..3 {
        let removed = tree.remove_at(b, 0).unwrap();
        tree.free(removed).unwrap();
    }
    assert_eq!(tree.element_kind(b).unwrap(), None);
    tree.add_value(b, Value::String("now strings".into())).unwrap();
    assert_eq!(tree.element_kind(b).unwrap(), Some(TagKind::String));
    tree.check().unwrap();
}

#[test]
fn test_list_insert_and_set() {
    let mut tree = read_snbt("[1, 3]").unwrap();
    let list = tree.root().unwrap();
    let two = tree.create("", Value::Int(2));
    tree.insert(list, 1, two).unwrap();
    let ten = tree.create("", Value::Int(10));
    let old = tree.set(list, 0, ten).unwrap();
    tree.free(old).unwrap();

    let values: Vec<i64> = tree
        .children(list)
        .unwrap()
        .into_iter()
        .map(|id| tree.value(id).unwrap().as_i64().unwrap())
        .collect();
    assert_eq!(values, [10, 2, 3]);

    let far = tree.create("", Value::Int(0));
    match tree.insert(list, 9, far) {
        Err(Error::TagNotFound(_)) => {}
        other => panic!("expected TagNotFound, got {other:?}"),
    }
}

#[test]
fn test_array_elements() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let bytes = child(&tree, root, "bytes");
    assert_eq!(tree.array_len(bytes).unwrap(), 2);
    tree.array_push(bytes, Value::Byte(3)).unwrap();
    tree.array_insert(bytes, 0, Value::Byte(0)).unwrap();
    let old = tree.array_set(bytes, 1, Value::Byte(-1)).unwrap();
    assert_eq!(old.as_i64(), Some(1));
    let removed = tree.array_remove(bytes, 3).unwrap();
    assert_eq!(removed.as_i64(), Some(3));

    match tree.value(bytes).unwrap() {
        Value::ByteArray(values) => assert_eq!(values, &[0, -1, 2]),
        other => panic!("expected a byte array, got {other:?}"),
    }
    match tree.array_push(bytes, Value::Int(1)) {
        Err(Error::IncompatibleType { .. }) => {}
        other => panic!("expected IncompatibleType, got {other:?}"),
    }
    match tree.array_get(bytes, 7) {
        Err(Error::TagNotFound(_)) => {}
        other => panic!("expected TagNotFound, got {other:?}"),
    }
}

#[test]
fn test_replace_value_keeps_kind() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let name = child(&tree, root, "name");
    let old = tree.replace_value(name, Value::String("y".into())).unwrap();
    assert_eq!(old.as_str(), Some("x"));
    match tree.replace_value(name, Value::Int(1)) {
        Err(Error::IncompatibleType { expected, actual }) => {
            assert_eq!(expected, TagKind::String);
            assert_eq!(actual, TagKind::Int);
        }
        other => panic!("expected IncompatibleType, got {other:?}"),
    }
}

#[test]
fn test_clear_children_frees_subtree() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let a = child(&tree, root, "a");
    let before = tree.node_count();
    tree.clear_children(a).unwrap();
    // b and its three ints
    assert_eq!(tree.node_count(), before - 4);
    assert!(tree.compound(a).unwrap().is_empty());
    tree.check().unwrap();
}

#[test]
fn test_paths() {
    let tree = sample();
    let root = tree.root().unwrap();
    let b = child(&tree, child(&tree, root, "a"), "b");
    let second = tree.get_at(b, 2).unwrap().unwrap();
    assert_eq!(tree.path_of(root).unwrap(), "/");
    assert_eq!(tree.path_of(b).unwrap(), "/a/b");
    assert_eq!(tree.path_of(second).unwrap(), "/a/b[2]");

    let bytes = child(&tree, root, "bytes");
    let element = Target::Element {
        array: bytes,
        index: 1,
    };
    assert_eq!(tree.target_path(element).unwrap(), "/bytes[1]");
}

#[test]
fn test_root_list_paths() {
    let tree = read_snbt("[{}, {}]").unwrap();
    let list = tree.root().unwrap();
    let second = tree.get_at(list, 1).unwrap().unwrap();
    assert_eq!(tree.path_of(second).unwrap(), "/[1]");
}

#[test]
fn test_ancestors() {
    let tree = sample();
    let root = tree.root().unwrap();
    let a = child(&tree, root, "a");
    let b = child(&tree, a, "b");
    assert_eq!(tree.ancestors(b).unwrap(), vec![b, a, root]);
    assert!(tree.is_ancestor_or_self(a, b).unwrap());
    assert!(!tree.is_ancestor_or_self(b, a).unwrap());
}

#[test]
fn test_check_reports_detached_nodes() {
    let mut tree = sample();
    let root = tree.root().unwrap();
    let name = child(&tree, root, "name");
    tree.detach(name).unwrap();
    match tree.check() {
        Err(Error::Consistency(message)) => assert!(message.contains("detached")),
        other => panic!("expected Consistency, got {other:?}"),
    }
    tree.free(name).unwrap();
    tree.check().unwrap();
}

#[test]
fn test_structural_equality() {
    let left = read_snbt("{a: 1, b: [2L], c: {d: 1.5f}}").unwrap();
    let right = read_snbt("{c: {d: 1.5f}, b: [2L], a: 1}").unwrap();
    assert!(left == right);

    let different = read_snbt("{a: 1, b: [2], c: {d: 1.5f}}").unwrap();
    assert!(left != different);

    let doubles = read_snbt("[1.0d]").unwrap();
    let mut built = Tree::new();
    let list = built.create("", Value::list());
    built.set_root(list).unwrap();
    built.add_value(list, Value::Double(1.0)).unwrap();
    assert!(doubles == built);
}

#[test]
fn test_set_root_frees_previous() {
    let mut tree = sample();
    let old_root = tree.root().unwrap();
    let new_root = tree.create("", Value::Int(5));
    tree.set_root(new_root).unwrap();
    assert_eq!(tree.node_count(), 1);
    assert!(!tree.contains_node(old_root));
    tree.check().unwrap();
}
