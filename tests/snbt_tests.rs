use nbted::{Error, SnbtOptions, TagKind, Tree, Value, read_snbt, read_snbt_value, tree_to_snbt, write_snbt};

fn kind_of(tree: &Tree, name: &str) -> TagKind {
    let root = tree.root().unwrap();
    tree.kind(tree.get(root, name).unwrap().unwrap()).unwrap()
}

#[test]
fn test_bare_token_inference() {
    let tree = read_snbt(
        "{b: 1b, s: 2s, i: 3, l: 4L, f: 5.5f, d: 6.5d, bare_d: .5D, text: hello, num_text: 1x}",
    )
    .unwrap();
    assert_eq!(kind_of(&tree, "b"), TagKind::Byte);
    assert_eq!(kind_of(&tree, "s"), TagKind::Short);
    assert_eq!(kind_of(&tree, "i"), TagKind::Int);
    assert_eq!(kind_of(&tree, "l"), TagKind::Long);
    assert_eq!(kind_of(&tree, "f"), TagKind::Float);
    assert_eq!(kind_of(&tree, "d"), TagKind::Double);
    assert_eq!(kind_of(&tree, "bare_d"), TagKind::Double);
    assert_eq!(kind_of(&tree, "text"), TagKind::String);
    assert_eq!(kind_of(&tree, "num_text"), TagKind::String);
}

#[test]
fn test_root_is_unnamed() {
    let tree = read_snbt("{}").unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tree.name(root).unwrap(), "");
    assert!(tree.compound(root).unwrap().is_empty());
}

#[test]
fn test_arrays() {
    let tree = read_snbt("{a: [B; 1b, -2b], b: [I; 7, 8], c: [L; 9L, 10], d: [I;]}").unwrap();
    let root = tree.root().unwrap();
    let value = |name: &str| tree.value(tree.get(root, name).unwrap().unwrap()).unwrap();
    assert!(matches!(value("a"), Value::ByteArray(v) if v == &[1, -2]));
    assert!(matches!(value("b"), Value::IntArray(v) if v == &[7, 8]));
    assert!(matches!(value("c"), Value::LongArray(v) if v == &[9, 10]));
    assert!(matches!(value("d"), Value::IntArray(v) if v.is_empty()));
}

#[test]
fn test_quoted_strings_and_keys() {
    let tree = read_snbt(r#"{"key with spaces": 'it\'s', plain: "say \"hi\""}"#).unwrap();
    let root = tree.root().unwrap();
    let first = tree.get(root, "key with spaces").unwrap().unwrap();
    assert_eq!(tree.value(first).unwrap().as_str(), Some("it's"));
    let plain = tree.get(root, "plain").unwrap().unwrap();
    assert_eq!(tree.value(plain).unwrap().as_str(), Some("say \"hi\""));
}

#[test]
fn test_mixed_list_is_rejected() {
    match read_snbt("[1, 2L]") {
        Err(Error::IncompatibleType { expected, actual }) => {
            assert_eq!(expected, TagKind::Int);
            assert_eq!(actual, TagKind::Long);
        }
        other => panic!("expected IncompatibleType, got {other:?}"),
    }
}

#[test]
fn test_malformed_input() {
    for text in ["{a 1}", "{a: 1", "[1, 2", "{: 1}", "{a: 1} extra", "\"open", "[B; x]"] {
        match read_snbt(text) {
            Err(error) => assert!(
                error.is_malformed_input() || matches!(error, Error::BadNumber(_)),
                "{text}: {error}"
            ),
            Ok(_) => panic!("{text} should not parse"),
        }
    }
}

#[test]
fn test_out_of_range_number() {
    match read_snbt("300b") {
        Err(Error::BadNumber(token)) => assert_eq!(token, "300b"),
        other => panic!("expected BadNumber, got {other:?}"),
    }
}

#[test]
fn test_single_line_output() {
    let tree = read_snbt("{name: Steve, 'odd key': 1s, list: [1.5f, 2.0f], empty: {}}").unwrap();
    let text = tree_to_snbt(&tree, &SnbtOptions::default()).unwrap();
    assert_eq!(
        text,
        "{name: Steve, \"odd key\": 1s, list: [1.5f, 2f], empty: {}}"
    );
}

#[test]
fn test_multiline_output() {
    let tree = read_snbt("{a: [1, 2], b: {}}").unwrap();
    let options = SnbtOptions { multiline: true };
    let text = tree_to_snbt(&tree, &options).unwrap();
    assert_eq!(text, "{\n\ta: [\n\t\t1,\n\t\t2\n\t],\n\tb: {}\n}");
}

#[test]
fn test_strings_that_need_quotes() {
    let mut tree = Tree::new();
    let list = tree.create("", Value::list());
    tree.set_root(list).unwrap();
    for s in ["1", "", "a b", "say \"hi\"", "back\\slash"] {
        tree.add_value(list, Value::String(s.into())).unwrap();
    }
    let text = tree_to_snbt(&tree, &SnbtOptions::default()).unwrap();
    assert_eq!(
        text,
        r#"["1", "", "a b", 'say "hi"', "back\\slash"]"#
    );
    assert!(read_snbt(&text).unwrap() == tree);
}

#[test]
fn test_output_reparses() {
    let text = "{a: 1b, b: [L; 1L, 2L], c: {d: [[1], [2, 3]], e: -0.5d}, f: [{}, {g: x}]}";
    let tree = read_snbt(text).unwrap();
    for multiline in [false, true] {
        let written = tree_to_snbt(&tree, &SnbtOptions { multiline }).unwrap();
        assert!(read_snbt(&written).unwrap() == tree, "{written}");
    }
}

#[test]
fn test_subtree_value() {
    let mut tree = read_snbt("{}").unwrap();
    let root = tree.root().unwrap();
    let id = read_snbt_value(&mut tree, "[I; 1, 2]", "Pos").unwrap();
    tree.put(root, id).unwrap();
    assert_eq!(tree.name(id).unwrap(), "Pos");
    assert_eq!(
        write_snbt(&tree, id, &SnbtOptions::default()).unwrap(),
        "[I; 1, 2]"
    );
}

#[test]
fn test_empty_tree_renders_empty() {
    assert_eq!(
        tree_to_snbt(&Tree::new(), &SnbtOptions::default()).unwrap(),
        ""
    );
}

#[test]
fn test_failed_parse_leaves_tree_untouched() {
    let mut tree = read_snbt("{}").unwrap();
    let before = tree.node_count();
    for text in ["{a: 1, b: [1, x]}", "{a: {b: [I; 1, x]}}", "[{}, {c: ]", "{a: 1} trailing"] {
        assert!(read_snbt_value(&mut tree, text, "n").is_err(), "{text}");
        assert_eq!(tree.node_count(), before, "{text}");
        tree.check().unwrap();
    }
}

#[test]
fn test_non_finite_numbers() {
    let mut tree = read_snbt("{}").unwrap();
    let root = tree.root().unwrap();
    tree.put_value(root, "nan", Value::Float(f32::NAN)).unwrap();
    tree.put_value(root, "inf", Value::Double(f64::INFINITY)).unwrap();
    tree.put_value(root, "neg", Value::Float(f32::NEG_INFINITY)).unwrap();
    tree.put_value(root, "word", Value::String("NaNd".into())).unwrap();

    let text = tree_to_snbt(&tree, &SnbtOptions::default()).unwrap();
    assert_eq!(text, "{nan: NaNf, inf: Infinityd, neg: -Infinityf, word: \"NaNd\"}");

    let back = read_snbt(&text).unwrap();
    let back_root = back.root().unwrap();
    let value = |name: &str| back.value(back.get(back_root, name).unwrap().unwrap()).unwrap();
    assert!(matches!(value("nan"), Value::Float(v) if v.is_nan()));
    assert!(matches!(value("inf"), Value::Double(v) if *v == f64::INFINITY));
    assert!(matches!(value("neg"), Value::Float(v) if *v == f32::NEG_INFINITY));
    assert!(matches!(value("word"), Value::String(v) if v == "NaNd"));
}
