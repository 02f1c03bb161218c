use nbted::{PrintOptions, RecurseMode, Target, Tree, Value, print_tag, read_snbt};

fn print(tree: &Tree, target: Target, infer: bool, recurse: RecurseMode) -> String {
    let mut out = Vec::new();
    print_tag(tree, target, &PrintOptions { infer, recurse }, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn print_root(snbt: &str, infer: bool, recurse: RecurseMode) -> String {
    let tree = read_snbt(snbt).unwrap();
    print(&tree, Target::Node(tree.root().unwrap()), infer, recurse)
}

#[test]
fn test_full_listing() {
    let text = print_root(
        "{b: 1b, s: hi, f: 1.0f, l: [I; 1, 2], nested: {x: 5L}}",
        false,
        RecurseMode::Full,
    );
    assert_eq!(
        text,
        "compound {\n  byte \"b\" 1\n  string \"s\" hi\n  float \"f\" 1.0\n  int[] \"l\" [1, 2]\n  compound \"nested\" {\n    long \"x\" 5\n  }\n}\n"
    );
}

#[test]
fn test_empty_containers() {
    let text = print_root("{e: {}, l: []}", false, RecurseMode::Full);
    assert_eq!(text, "compound {\n  compound \"e\" {}\n  list \"l\" []\n}\n");
}

#[test]
fn test_no_recursion_shows_child_count() {
    assert_eq!(
        print_root("{a: 1, b: 2, c: 3}", false, RecurseMode::None),
        "compound (3 children)\n"
    );
    let tree = read_snbt("{x: [1]}").unwrap();
    let root = tree.root().unwrap();
    let x = tree.get(root, "x").unwrap().unwrap();
    assert_eq!(
        print(&tree, Target::Node(x), false, RecurseMode::None),
        "list \"x\" (1 child)\n"
    );
}

#[test]
fn test_immediate_children() {
    let snbt = "{a: {deep: 1}, b: 1b}";
    assert_eq!(
        print_root(snbt, false, RecurseMode::ImmediateChildren),
        "compound {\n  compound \"a\" (1 child)\n  byte \"b\" 1\n}\n"
    );
    assert_eq!(
        print_root(snbt, false, RecurseMode::ImmediateChildrenOnly),
        "compound \"a\" (1 child)\nbyte \"b\" 1\n"
    );
}

#[test]
fn test_children_only_expands_list_elements() {
    let text = print_root(
        "[{x: 1}, {x: {y: 2}}]",
        false,
        RecurseMode::ImmediateChildrenOnly,
    );
    assert_eq!(
        text,
        "compound 0 {\n  int \"x\" 1\n}\ncompound 1 {\n  compound \"x\" (1 child)\n}\n"
    );
}

#[test]
fn test_list_indices_are_padded() {
    let text = print_root("[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]", false, RecurseMode::Full);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "list [");
    assert_eq!(lines[1], "  int  0 0");
    assert_eq!(lines[11], "  int 10 10");
    assert_eq!(lines[12], "]");
}

#[test]
fn test_array_element_target() {
    let tree = read_snbt("{bytes: [B; 5b, 6b]}").unwrap();
    let root = tree.root().unwrap();
    let bytes = tree.get(root, "bytes").unwrap().unwrap();
    let target = Target::Element {
        array: bytes,
        index: 1,
    };
    assert_eq!(print(&tree, target, false, RecurseMode::Full), "byte 1 6\n");
}

#[test]
fn test_inferred_booleans() {
    let text = print_root(
        "{hasWings: 1b, Locked: 0b, hardcore: 1b, count: 1b, isBig: 2b}",
        true,
        RecurseMode::Full,
    );
    assert_eq!(
        text,
        "compound {\n  ~bool \"hasWings\" true\n  ~bool \"Locked\" false\n  ~bool \"hardcore\" true\n  byte \"count\" 1\n  byte \"isBig\" 2\n}\n"
    );
}

#[test]
fn test_uuids_need_both_halves() {
    let snbt = "{ownerMost: 0L, ownerLeast: 1L, loneMost: 7L}";
    assert_eq!(
        print_root(snbt, true, RecurseMode::Full),
        "compound {\n  ~uuid \"owner\" 00000000-0000-0000-0000-000000000001\n  long \"loneMost\" 7\n}\n"
    );
    assert_eq!(
        print_root(snbt, false, RecurseMode::Full),
        "compound {\n  long \"ownerMost\" 0\n  long \"ownerLeast\" 1\n  long \"loneMost\" 7\n}\n"
    );
}

#[test]
fn test_inferred_json_strings() {
    let text = print_root(
        r#"{text: '{"a":1}', broken: "[oops"}"#,
        true,
        RecurseMode::Full,
    );
    assert_eq!(
        text,
        "compound {\n  ~json \"text\" {\n    \"a\": 1\n  }\n  string \"broken\" [oops\n}\n"
    );
}

#[test]
fn test_names_are_escaped() {
    let mut tree = Tree::new();
    let root = tree.create("", Value::compound());
    tree.set_root(root).unwrap();
    tree.put_value(root, "tab\there\\", Value::Short(3)).unwrap();
    assert_eq!(
        print(&tree, Target::Node(root), false, RecurseMode::Full),
        "compound {\n  short \"tab\\there\\\\\" 3\n}\n"
    );
}

#[test]
fn test_named_root() {
    let mut tree = Tree::new();
    let root = tree.create("Level", Value::Int(4));
    tree.set_root(root).unwrap();
    assert_eq!(
        print(&tree, Target::Node(root), false, RecurseMode::Full),
        "int \"Level\" 4\n"
    );
}
