use nbted::{
    BigEndian, Endianness, LittleEndian, LoadOptions, SnbtOptions, load, read_roundtrip_json_slice,
    read_snbt, read_tree, tree_to_snbt, write_roundtrip_json, write_tree_to_vec,
};

/// Anything that decodes must encode again and decode to the same tree.
pub fn test_binary(data: &[u8]) {
    if let Ok(tree) = read_tree::<BigEndian>(data) {
        let bytes = write_tree_to_vec::<BigEndian>(&tree).unwrap();
        assert!(read_tree::<BigEndian>(&bytes).unwrap() == tree);
        let _ = write_tree_to_vec::<LittleEndian>(&tree);
    }
    if let Ok(tree) = read_tree::<LittleEndian>(data) {
        let bytes = write_tree_to_vec::<LittleEndian>(&tree).unwrap();
        assert!(read_tree::<LittleEndian>(&bytes).unwrap() == tree);
    }
    let _ = Endianness::detect(data, false);
    let _ = Endianness::detect(data, true);
}

pub fn test_text(data: &[u8]) {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(tree) = read_snbt(text) {
            let _ = tree_to_snbt(&tree, &SnbtOptions::default());
            let _ = write_roundtrip_json(&tree, false);
        }
    }
    if let Ok(tree) = read_roundtrip_json_slice(data) {
        let _ = write_roundtrip_json(&tree, true);
    }
}

pub fn test(data: &[u8]) {
    test_binary(data);
    test_text(data);
    let _ = load(data, &LoadOptions::default());
}
