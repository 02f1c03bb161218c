//! Whole-document load and save: compression, then either roundtrip JSON or
//! binary NBT.

use std::{fs, io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Compression, Compressor, Endianness, Error, Result, Tree, read_roundtrip_json_slice,
    write_roundtrip_json,
};

/// `None` fields are autodetected.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub compression: Option<Compression>,
    pub endianness: Option<Endianness>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    #[default]
    Nbt,
    /// The lossless JSON form, see [`write_roundtrip_json`].
    RoundtripJson,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
    pub format: SaveFormat,
    pub compression: Compression,
    /// Ignored for JSON.
    pub endianness: Endianness,
}

/// How a document was stored, as found by [`load`].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct FileInfo {
    pub compression: Compression,
    /// The compression came from the magic bytes rather than the options.
    pub compression_autodetected: bool,
    /// Meaningless when `is_json` is set.
    pub endianness: Endianness,
    pub is_json: bool,
}

impl FileInfo {
    /// Options that save the document back the way it was found.
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            format: if self.is_json {
                SaveFormat::RoundtripJson
            } else {
                SaveFormat::Nbt
            },
            compression: self.compression,
            endianness: self.endianness,
        }
    }
}

#[derive(Debug)]
pub struct Loaded {
    pub tree: Tree,
    pub info: FileInfo,
}

/// Sizes reported for a document: the encoded form and the form written to
/// disk.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct SizeReport {
    pub raw: usize,
    pub compressed: usize,
}

/// Decodes a stored document.
///
/// # Example
///
/// ```
/// use nbted::{Compression, Endianness, LoadOptions, SaveOptions, load, read_snbt, save};
///
/// let tree = read_snbt("{name: \"Steve\"}").unwrap();
/// let mut stored = Vec::new();
/// let options = SaveOptions { compression: Compression::Gzip, ..Default::default() };
/// save(&tree, &options, &mut stored).unwrap();
///
/// let loaded = load(&stored, &LoadOptions::default()).unwrap();
/// assert_eq!(loaded.info.compression, Compression::Gzip);
/// assert!(loaded.info.compression_autodetected);
/// assert_eq!(loaded.info.endianness, Endianness::BIG);
/// assert!(loaded.tree == tree);
/// ```
pub fn load(bytes: &[u8], options: &LoadOptions) -> Result<Loaded> {
    let detected = Compression::detect(bytes);
    let (compression, compression_autodetected) = match options.compression {
        Some(compression) => {
            if compression != detected {
                log::debug!("compression set as {compression}, but it looks like {detected}");
            }
            (compression, false)
        }
        None => {
            log::debug!("compression autodetected as {detected}");
            (detected, true)
        }
    };
    let data = compression.unwrap(bytes)?;

    if data.first() == Some(&b'{') {
        log::debug!("input looks like JSON");
        let tree = read_roundtrip_json_slice(&data)?;
        return Ok(Loaded {
            tree,
            info: FileInfo {
                compression,
                compression_autodetected,
                endianness: Endianness::BIG,
                is_json: true,
            },
        });
    }

    let (tree, endianness) = match options.endianness {
        Some(endianness) => (endianness.decode(&data)?, endianness),
        None => {
            let (tree, endianness) = Endianness::detect(&data, false)?;
            log::debug!("endianness autodetected as {:?}", endianness.order);
            (tree, endianness)
        }
    };
    Ok(Loaded {
        tree,
        info: FileInfo {
            compression,
            compression_autodetected,
            endianness,
            is_json: false,
        },
    })
}

pub fn load_file(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Loaded> {
    let path = path.as_ref();
    log::debug!("loading {}", path.display());
    load(&fs::read(path)?, options)
}

fn encode(tree: &Tree, options: &SaveOptions) -> Result<Vec<u8>> {
    if tree.is_empty() {
        return Err(Error::TagNotFound(String::from("nothing to write")));
    }
    match options.format {
        SaveFormat::Nbt => options.endianness.encode_to_vec(tree),
        SaveFormat::RoundtripJson => Ok(write_roundtrip_json(tree, true)?.into_bytes()),
    }
}

/// Encodes and compresses `tree` into `sink`.
pub fn save(tree: &Tree, options: &SaveOptions, mut sink: impl Write) -> Result<()> {
    let data = options.compression.wrap(&encode(tree, options)?)?;
    sink.write_all(&data)?;
    sink.flush()?;
    Ok(())
}

/// Writes the document to `path`. The file is only created once encoding
/// has succeeded.
pub fn save_file(path: impl AsRef<Path>, tree: &Tree, options: &SaveOptions) -> Result<()> {
    let path = path.as_ref();
    let data = options.compression.wrap(&encode(tree, options)?)?;
    log::debug!("writing {} bytes to {}", data.len(), path.display());
    fs::write(path, data)?;
    Ok(())
}

/// The `raw` size before compression and the `compressed` size on disk.
pub fn encoded_size(tree: &Tree, options: &SaveOptions) -> Result<SizeReport> {
    let raw = encode(tree, options)?;
    let compressed = match options.compression {
        Compression::None => raw.len(),
        compression => compression.wrap(&raw)?.len(),
    };
    Ok(SizeReport {
        raw: raw.len(),
        compressed,
    })
}
