use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use nbted::{
    BigEndian, Compression, LoadOptions, SaveOptions, Session, SetOptions, SnbtOptions, TagKind,
    Tree, Value, encoded_size, load, read_roundtrip_json, read_snbt, read_tree, save,
    tree_to_snbt, write_roundtrip_json, write_tree_to_vec,
};

/// A chunk-like document: a few hundred compounds with mixed payloads.
fn sample() -> Tree {
    let mut tree = read_snbt("{DataVersion: 3465, Level: {Entities: [], Sections: []}}").unwrap();
    let root = tree.root().unwrap();
    let level = tree.get(root, "Level").unwrap().unwrap();
    let sections = tree.get(level, "Sections").unwrap().unwrap();
    for y in 0..24 {
        let section = tree.create("", Value::compound());
        tree.add(sections, section).unwrap();
        tree.put_value(section, "Y", Value::Byte(y)).unwrap();
        tree.put_value(section, "BlockStates", Value::LongArray(vec![y as i64; 256]))
            .unwrap();
        tree.put_value(section, "SkyLight", Value::ByteArray(vec![15; 2048]))
            .unwrap();
    }
    let entities = tree.get(level, "Entities").unwrap().unwrap();
    for i in 0..200 {
        let entity = tree.create("", Value::compound());
        tree.add(entities, entity).unwrap();
        tree.put_value(entity, "id", Value::String(String::from("minecraft:zombie")))
            .unwrap();
        tree.put_value(entity, "UUIDMost", Value::Long(i)).unwrap();
        tree.put_value(entity, "UUIDLeast", Value::Long(-i)).unwrap();
        tree.put_value(entity, "Health", Value::Float(20.0)).unwrap();
        let pos = tree.put_value(entity, "Pos", Value::list()).unwrap();
        for axis in [i as f64, 64.0, -(i as f64)] {
            tree.add_value(pos, Value::Double(axis)).unwrap();
        }
    }
    tree
}

fn bench_binary(c: &mut Criterion) {
    let tree = sample();
    let bytes = write_tree_to_vec::<BigEndian>(&tree).unwrap();

    c.bench_function("binary_read", |b| {
        b.iter(|| read_tree::<BigEndian>(black_box(&bytes)).unwrap())
    });
    c.bench_function("binary_write", |b| {
        b.iter(|| write_tree_to_vec::<BigEndian>(black_box(&tree)).unwrap())
    });
}

fn bench_text(c: &mut Criterion) {
    let tree = sample();
    let snbt = tree_to_snbt(&tree, &SnbtOptions::default()).unwrap();
    let json = write_roundtrip_json(&tree, false).unwrap();

    c.bench_function("snbt_read", |b| b.iter(|| read_snbt(black_box(&snbt)).unwrap()));
    c.bench_function("snbt_write", |b| {
        b.iter(|| tree_to_snbt(black_box(&tree), &SnbtOptions::default()).unwrap())
    });
    c.bench_function("roundtrip_json_read", |b| {
        b.iter(|| read_roundtrip_json(black_box(&json)).unwrap())
    });
}

fn bench_gzip(c: &mut Criterion) {
    let tree = sample();
    let options = SaveOptions {
        compression: Compression::Gzip,
        ..Default::default()
    };
    let mut stored = Vec::new();
    save(&tree, &options, &mut stored).unwrap();

    c.bench_function("load_gzip_autodetect", |b| {
        b.iter(|| load(black_box(&stored), &LoadOptions::default()).unwrap())
    });
    c.bench_function("encoded_size_gzip", |b| {
        b.iter(|| encoded_size(black_box(&tree), &options).unwrap())
    });
}

fn bench_edit(c: &mut Criterion) {
    c.bench_function("session_set_200", |b| {
        b.iter(|| {
            let mut session = Session::new(sample());
            for i in 0..200 {
                session
                    .set(
                        &format!("/Level/Entities[{i}]/Health"),
                        "10",
                        Some(TagKind::Float.into()),
                        &SetOptions::default(),
                    )
                    .unwrap();
            }
            session
        })
    });
}

criterion_group!(benches, bench_binary, bench_text, bench_gzip, bench_edit);
criterion_main!(benches);
