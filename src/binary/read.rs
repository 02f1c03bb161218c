use std::marker::PhantomData;

use zerocopy::byteorder;

use crate::{ByteOrder, Error, MAX_DEPTH, NodeId, Result, TagKind, Tree, Value, cold_path};

/// Bounds-checked cursor over the raw stream.
struct Reader<'s, O: ByteOrder> {
    source: &'s [u8],
    pos: usize,
    _marker: PhantomData<O>,
}

macro_rules! read_number {
    ($name:ident, $type:ident, $out:ty, $size:literal) => {
        #[inline]
        fn $name(&mut self) -> Result<$out> {
            Ok(byteorder::$type::<O>::from_bytes(self.array::<$size>()?).get())
        }
    };
}

impl<'s, O: ByteOrder> Reader<'s, O> {
    fn new(source: &'s [u8]) -> Self {
        Self {
            source,
            pos: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn take(&mut self, len: usize) -> Result<&'s [u8]> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.source.len());
        let Some(end) = end else {
            cold_path();
            return Err(Error::EndOfFile);
        };
        let bytes = &self.source[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    #[inline]
    fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    read_number!(u16, U16, u16, 2);
    read_number!(i16, I16, i16, 2);
    read_number!(i32, I32, i32, 4);
    read_number!(i64, I64, i64, 8);
    read_number!(f32, F32, f32, 4);
    read_number!(f64, F64, f64, 8);

    fn string(&mut self) -> Result<String> {
        let len = self.u16()? as usize;
        let start = self.pos;
        let bytes = self.take(len)?;
        match simd_cesu8::mutf8::decode(bytes) {
            Ok(text) => Ok(text.into_owned()),
            Err(_) => {
                cold_path();
                Err(Error::malformed(format!(
                    "invalid modified UTF-8 in string at offset {start}"
                )))
            }
        }
    }

    /// A signed 4-byte element count.
    fn count(&mut self, what: &str) -> Result<usize> {
        let len = self.i32()?;
        if len < 0 {
            cold_path();
            return Err(Error::malformed(format!("negative {what} length {len}")));
        }
        let len = len as usize;
        // every element takes at least one byte, so longer counts are truncated streams
        if len > self.source.len() - self.pos {
            cold_path();
            return Err(Error::EndOfFile);
        }
        Ok(len)
    }

    fn remaining(&self) -> usize {
        self.source.len() - self.pos
    }
}

/// Reads one payload of `kind` and links it into `tree` as a detached node.
fn read_payload<O: ByteOrder>(
    tree: &mut Tree,
    reader: &mut Reader<'_, O>,
    kind: TagKind,
    name: String,
    depth: usize,
) -> Result<NodeId> {
    if depth > MAX_DEPTH {
        cold_path();
        return Err(Error::malformed(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }
    let value = match kind {
        TagKind::Byte => Value::Byte(reader.u8()? as i8),
        TagKind::Short => Value::Short(reader.i16()?),
        TagKind::Int => Value::Int(reader.i32()?),
        TagKind::Long => Value::Long(reader.i64()?),
        TagKind::Float => Value::Float(reader.f32()?),
        TagKind::Double => Value::Double(reader.f64()?),
        TagKind::ByteArray => {
            let len = reader.count("byte array")?;
            Value::ByteArray(reader.take(len)?.iter().map(|b| *b as i8).collect())
        }
        TagKind::String => Value::String(reader.string()?),
        TagKind::IntArray => {
            let len = reader.count("int array")?;
            let mut values = Vec::with_capacity(len.min(reader.remaining() / 4));
            for _ in 0..len {
                values.push(reader.i32()?);
            }
            Value::IntArray(values)
        }
        TagKind::LongArray => {
            let len = reader.count("long array")?;
            let mut values = Vec::with_capacity(len.min(reader.remaining() / 8));
            for _ in 0..len {
                values.push(reader.i64()?);
            }
            Value::LongArray(values)
        }
        TagKind::List => return read_list(tree, reader, name, depth),
        TagKind::Compound => return read_compound(tree, reader, name, depth),
    };
    Ok(tree.create(name, value))
}

fn read_list<O: ByteOrder>(
    tree: &mut Tree,
    reader: &mut Reader<'_, O>,
    name: String,
    depth: usize,
) -> Result<NodeId> {
    let element_id = reader.u8()?;
    let len = reader.count("list")?;
    let kind = match TagKind::from_id(element_id) {
        Some(kind) => kind,
        None if element_id == 0 && len == 0 => return Ok(tree.create(name, Value::list())),
        None => {
            cold_path();
            return Err(Error::InvalidTagType(element_id));
        }
    };
    let list = tree.create(name, Value::typed_list(kind));
    for _ in 0..len {
        let child = read_payload(tree, reader, kind, String::new(), depth + 1)?;
        tree.add(list, child)?;
    }
    Ok(list)
}

fn read_compound<O: ByteOrder>(
    tree: &mut Tree,
    reader: &mut Reader<'_, O>,
    name: String,
    depth: usize,
) -> Result<NodeId> {
    let compound = tree.create(name, Value::compound());
    loop {
        if reader.remaining() == 0 {
            cold_path();
            return Err(Error::malformed("missing compound terminator"));
        }
        let tag_id = reader.u8()?;
        if tag_id == 0 {
            return Ok(compound);
        }
        let Some(kind) = TagKind::from_id(tag_id) else {
            cold_path();
            return Err(Error::InvalidTagType(tag_id));
        };
        let name = reader.string()?;
        let child = read_payload(tree, reader, kind, name, depth + 1)?;
        if let Some(previous) = tree.put(compound, child)? {
            tree.free(previous)?;
        }
    }
}

/// Reads a whole binary NBT document in byte order `O`.
///
/// A leading end tag yields the empty tree. Bytes left after the root tag
/// are rejected with [`Error::TrailingData`].
///
/// # Example
///
/// ```
/// use nbted::{BigEndian, TagKind, read_tree};
///
/// let bytes = [0x0a, 0x00, 0x00, 0x01, 0x00, 0x01, b'a', 0x05, 0x00];
/// let tree = read_tree::<BigEndian>(&bytes).unwrap();
/// let root = tree.root().unwrap();
/// let a = tree.get(root, "a").unwrap().unwrap();
/// assert_eq!(tree.kind(a).unwrap(), TagKind::Byte);
/// ```
pub fn read_tree<O: ByteOrder>(source: &[u8]) -> Result<Tree> {
    let mut reader = Reader::<O>::new(source);
    let mut tree = Tree::new();

    let tag_id = reader.u8()?;
    if tag_id != 0 {
        let Some(kind) = TagKind::from_id(tag_id) else {
            cold_path();
            return Err(Error::InvalidTagType(tag_id));
        };
        let name = reader.string()?;
        let root = read_payload(&mut tree, &mut reader, kind, name, 0)?;
        tree.set_root(root)?;
    }

    if reader.remaining() > 0 {
        cold_path();
        return Err(Error::TrailingData(reader.remaining()));
    }

    Ok(tree)
}
