use zerocopy::byteorder;

use crate::{ByteOrder, Error, NodeId, Result, TagKind, Tree, Value, cold_path};

fn write_string<O: ByteOrder>(value: &str, out: &mut Vec<u8>) -> Result<()> {
    let bytes = simd_cesu8::mutf8::encode(value);
    if bytes.len() > u16::MAX as usize {
        cold_path();
        return Err(Error::StringTooLong(bytes.len()));
    }
    out.extend_from_slice(&byteorder::U16::<O>::new(bytes.len() as u16).to_bytes());
    out.extend_from_slice(&bytes);
    Ok(())
}

fn write_count<O: ByteOrder>(len: usize, out: &mut Vec<u8>) -> Result<()> {
    if len > i32::MAX as usize {
        cold_path();
        return Err(Error::ListTooLong(len));
    }
    out.extend_from_slice(&byteorder::I32::<O>::new(len as i32).to_bytes());
    Ok(())
}

/// Writes the payload of `id` (no type id, no name).
fn write_payload<O: ByteOrder>(tree: &Tree, id: NodeId, out: &mut Vec<u8>) -> Result<()> {
    match tree.value(id)? {
        Value::Byte(value) => out.push(*value as u8),
        Value::Short(value) => out.extend_from_slice(&byteorder::I16::<O>::new(*value).to_bytes()),
        Value::Int(value) => out.extend_from_slice(&byteorder::I32::<O>::new(*value).to_bytes()),
        Value::Long(value) => out.extend_from_slice(&byteorder::I64::<O>::new(*value).to_bytes()),
        Value::Float(value) => out.extend_from_slice(&byteorder::F32::<O>::new(*value).to_bytes()),
        Value::Double(value) => {
            out.extend_from_slice(&byteorder::F64::<O>::new(*value).to_bytes())
        }
        Value::ByteArray(values) => {
            write_count::<O>(values.len(), out)?;
            out.extend(values.iter().map(|v| *v as u8));
        }
        Value::String(value) => write_string::<O>(value, out)?,
        Value::IntArray(values) => {
            write_count::<O>(values.len(), out)?;
            out.reserve(values.len() * 4);
            for value in values {
                out.extend_from_slice(&byteorder::I32::<O>::new(*value).to_bytes());
            }
        }
        Value::LongArray(values) => {
            write_count::<O>(values.len(), out)?;
            out.reserve(values.len() * 8);
            for value in values {
                out.extend_from_slice(&byteorder::I64::<O>::new(*value).to_bytes());
            }
        }
        Value::List(list) => {
            // an untyped list is written as an empty list of end tags
            out.push(list.element_kind().map_or(0, |kind| kind.id()));
            write_count::<O>(list.len(), out)?;
            for child in list.ids() {
                write_payload::<O>(tree, *child, out)?;
            }
        }
        Value::Compound(compound) => {
            for (name, child) in compound.iter() {
                write_named::<O>(tree, child, name, out)?;
            }
            out.push(0);
        }
    }
    Ok(())
}

fn write_named<O: ByteOrder>(tree: &Tree, id: NodeId, name: &str, out: &mut Vec<u8>) -> Result<()> {
    out.push(tree.kind(id)?.id());
    write_string::<O>(name, out)?;
    write_payload::<O>(tree, id, out)
}

/// Appends the binary encoding of `tree` in byte order `O` to `out`.
///
/// The empty tree encodes as a single end tag.
pub fn write_tree<O: ByteOrder>(tree: &Tree, out: &mut Vec<u8>) -> Result<()> {
    match tree.root() {
        Some(root) => {
            let kind = tree.kind(root)?;
            if kind != TagKind::Compound {
                log::debug!("writing a {kind} root; most readers expect a compound");
            }
            let name = tree.name(root)?;
            write_named::<O>(tree, root, name, out)
        }
        None => {
            out.push(0);
            Ok(())
        }
    }
}

/// Encodes a detached or attached subtree as if it were a root.
pub fn write_subtree<O: ByteOrder>(tree: &Tree, id: NodeId, out: &mut Vec<u8>) -> Result<()> {
    write_named::<O>(tree, id, tree.name(id)?, out)
}

#[inline]
pub fn write_tree_to_vec<O: ByteOrder>(tree: &Tree) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    write_tree::<O>(tree, &mut out)?;
    Ok(out)
}
