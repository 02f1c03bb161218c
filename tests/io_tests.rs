use nbted::{
    Compression, Compressor, Endianness, Error, LoadOptions, SaveFormat, SaveOptions, Tree,
    encoded_size, load, load_file, read_snbt, save, save_file,
};

fn sample() -> Tree {
    read_snbt("{Data: {LevelName: \"New World\", SpawnX: 12, Seed: 123456789L, Tags: [a, b, c]}}")
        .unwrap()
}

fn stored(tree: &Tree, options: &SaveOptions) -> Vec<u8> {
    let mut out = Vec::new();
    save(tree, options, &mut out).unwrap();
    out
}

#[test]
fn test_compression_names() {
    for compression in Compression::ALL {
        assert_eq!(Compression::from_name(compression.name()), Some(compression));
        assert_eq!(compression.to_string(), compression.name());
    }
    assert_eq!(Compression::from_name("GZ"), Some(Compression::Gzip));
    assert_eq!(Compression::from_name("zlib"), Some(Compression::Deflate));
    assert_eq!(Compression::from_name("lz4"), None);
}

#[test]
fn test_compressor_round_trip() {
    let data = b"some bytes some bytes some bytes".to_vec();
    for compression in [Compression::None, Compression::Deflate, Compression::Gzip] {
        let wrapped = compression.wrap(&data).unwrap();
        assert_eq!(Compression::detect(&wrapped), compression);
        assert_eq!(compression.unwrap(&wrapped).unwrap(), data);
        assert_eq!(compression.compression(), compression);
    }
}

#[test]
fn test_autodetects_everything() {
    let tree = sample();
    let endiannesses = [Endianness::BIG, Endianness::LITTLE];
    for compression in [Compression::None, Compression::Deflate, Compression::Gzip] {
        for endianness in endiannesses {
            let options = SaveOptions {
                format: SaveFormat::Nbt,
                compression,
                endianness,
            };
            let loaded = load(&stored(&tree, &options), &LoadOptions::default()).unwrap();
            assert!(loaded.tree == tree);
            assert_eq!(loaded.info.compression, compression);
            assert!(loaded.info.compression_autodetected);
            assert_eq!(loaded.info.endianness, endianness);
            assert!(!loaded.info.is_json);
            assert_eq!(loaded.info.save_options(), options);
        }
    }
}

#[cfg(feature = "zstd")]
#[test]
fn test_zstd() {
    let tree = sample();
    let options = SaveOptions {
        compression: Compression::Zstd,
        ..Default::default()
    };
    let bytes = stored(&tree, &options);
    assert_eq!(Compression::detect(&bytes), Compression::Zstd);
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert_eq!(loaded.info.compression, Compression::Zstd);
    assert!(loaded.tree == tree);
}

#[test]
fn test_explicit_options() {
    let tree = sample();
    let options = SaveOptions {
        compression: Compression::Gzip,
        endianness: Endianness::OBFUSCATED,
        ..Default::default()
    };
    let bytes = stored(&tree, &options);
    let explicit = LoadOptions {
        compression: Some(Compression::Gzip),
        endianness: Some(Endianness::OBFUSCATED),
    };
    let loaded = load(&bytes, &explicit).unwrap();
    assert!(loaded.tree == tree);
    assert!(!loaded.info.compression_autodetected);
    assert_eq!(loaded.info.endianness, Endianness::OBFUSCATED);

    // obfuscation is never guessed
    match load(&bytes, &LoadOptions::default()) {
        Err(error @ Error::Undetected { .. }) => assert!(error.is_malformed_input()),
        other => panic!("expected Undetected, got {other:?}"),
    }
}

#[test]
fn test_wrong_explicit_endianness_fails() {
    let tree = sample();
    let bytes = stored(&tree, &SaveOptions::default());
    let options = LoadOptions {
        endianness: Some(Endianness::LITTLE),
        ..Default::default()
    };
    match load(&bytes, &options) {
        Err(error) => assert!(error.is_malformed_input(), "{error}"),
        Ok(_) => panic!("big-endian data should not parse as little-endian"),
    }
}

#[test]
fn test_json_documents() {
    let tree = sample();
    let options = SaveOptions {
        format: SaveFormat::RoundtripJson,
        compression: Compression::Gzip,
        ..Default::default()
    };
    let bytes = stored(&tree, &options);
    let loaded = load(&bytes, &LoadOptions::default()).unwrap();
    assert!(loaded.info.is_json);
    assert_eq!(loaded.info.compression, Compression::Gzip);
    assert_eq!(loaded.info.save_options().format, SaveFormat::RoundtripJson);
    assert!(loaded.tree == tree);

    let plain = stored(
        &tree,
        &SaveOptions {
            format: SaveFormat::RoundtripJson,
            ..Default::default()
        },
    );
    assert_eq!(plain.first(), Some(&b'{'));
    // written pretty
    assert!(plain.contains(&b'\n'));
}

#[test]
fn test_json_that_is_not_roundtrip() {
    match load(br#"{"hello": "world"}"#, &LoadOptions::default()) {
        Err(Error::NotRoundtripJson) => {}
        other => panic!("expected NotRoundtripJson, got {other:?}"),
    }
}

#[test]
fn test_empty_document() {
    let tree = Tree::new();
    let mut out = Vec::new();
    match save(&tree, &SaveOptions::default(), &mut out) {
        Err(Error::TagNotFound(message)) => assert_eq!(message, "nothing to write"),
        other => panic!("expected TagNotFound, got {other:?}"),
    }
    assert!(out.is_empty());

    match load(&[], &LoadOptions::default()) {
        Err(error) => assert!(error.is_malformed_input(), "{error}"),
        Ok(_) => panic!("empty input should not load"),
    }
}

#[test]
fn test_corrupt_gzip() {
    let mut bytes = stored(
        &sample(),
        &SaveOptions {
            compression: Compression::Gzip,
            ..Default::default()
        },
    );
    bytes.truncate(bytes.len() / 2);
    assert!(load(&bytes, &LoadOptions::default()).is_err());
}

#[test]
fn test_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level.dat");
    let tree = sample();
    let options = SaveOptions {
        compression: Compression::Gzip,
        ..Default::default()
    };
    save_file(&path, &tree, &options).unwrap();
    let loaded = load_file(&path, &LoadOptions::default()).unwrap();
    assert!(loaded.tree == tree);
    assert_eq!(loaded.info.save_options(), options);

    // a failed encode leaves no file behind
    let empty_path = dir.path().join("empty.dat");
    assert!(save_file(&empty_path, &Tree::new(), &options).is_err());
    assert!(!empty_path.exists());

    match load_file(dir.path().join("missing.dat"), &LoadOptions::default()) {
        Err(Error::IO(error)) => assert_eq!(error.kind(), std::io::ErrorKind::NotFound),
        other => panic!("expected IO, got {other:?}"),
    }
}

#[test]
fn test_encoded_size() {
    let mut tree = read_snbt("{}").unwrap();
    let root = tree.root().unwrap();
    tree.put_value(root, "zeros", nbted::Value::IntArray(vec![0; 4096]))
        .unwrap();

    let plain = encoded_size(&tree, &SaveOptions::default()).unwrap();
    assert_eq!(plain.raw, plain.compressed);
    assert_eq!(plain.raw, stored(&tree, &SaveOptions::default()).len());

    let options = SaveOptions {
        compression: Compression::Gzip,
        ..Default::default()
    };
    let gzip = encoded_size(&tree, &options).unwrap();
    assert_eq!(gzip.raw, plain.raw);
    assert!(gzip.compressed < gzip.raw / 10);
}

#[test]
fn test_options_serde() {
    let options: SaveOptions = serde_json::from_str(
        r#"{"format": "roundtripjson", "compression": "zstd", "endianness": {"order": "little"}}"#,
    )
    .unwrap();
    assert_eq!(options.format, SaveFormat::RoundtripJson);
    assert_eq!(options.compression, Compression::Zstd);
    assert_eq!(options.endianness, Endianness::LITTLE);

    let defaults: LoadOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(defaults, LoadOptions::default());
}
