use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value as Json};

use crate::{
    Error, MAX_DEPTH, NodeId, Result, TagKind, Tree, Value, float_to_json, render,
};

/// Highest envelope version this implementation reads and the one it writes.
pub const ROUNDTRIP_VERSION: u64 = 1;

const MARKER: &str = "_unbted";

/// The type prefix of a node: its type name, or `list<inner>` for lists.
///
/// A list takes the prefix of its elements. Inner lists of a list of lists
/// may differ only where one side is empty (`?`), since an empty inner list
/// reads back untyped; any other mix cannot be represented.
pub fn type_prefix(tree: &Tree, id: NodeId) -> Result<String> {
    let list = match tree.value(id)? {
        Value::List(list) => list,
        other => return Ok(other.kind().type_name().to_string()),
    };
    let Some(first) = list.get(0) else {
        return Ok(match list.element_kind() {
            None => String::from("list<?>"),
            Some(TagKind::List) => String::from("list<list<?>>"),
            Some(kind) => format!("list<{kind}>"),
        });
    };
    if list.element_kind() != Some(TagKind::List) {
        return Ok(format!("list<{}>", type_prefix(tree, first)?));
    }
    let mut inner = String::from("list<?>");
    for child in list.ids() {
        let other = match tree.value(*child)? {
            Value::List(child_list) if child_list.is_empty() => continue,
            _ => type_prefix(tree, *child)?,
        };
        inner = merge_prefixes(&inner, &other).ok_or_else(|| {
            Error::Message(format!(
                "cannot encode a list mixing {inner} and {other} as roundtrip JSON"
            ))
        })?;
    }
    Ok(format!("list<{inner}>"))
}

/// Unifies two list prefixes, `?` matching any element type.
fn merge_prefixes(a: &str, b: &str) -> Option<String> {
    if a == b {
        return Some(a.to_string());
    }
    let (Some(a_inner), Some(b_inner)) = (list_inner(a), list_inner(b)) else {
        return None;
    };
    match (a_inner, b_inner) {
        ("?", _) => Some(b.to_string()),
        (_, "?") => Some(a.to_string()),
        (a_inner, b_inner) => Some(format!("list<{}>", merge_prefixes(a_inner, b_inner)?)),
    }
}

fn list_inner(prefix: &str) -> Option<&str> {
    prefix.strip_prefix("list<")?.strip_suffix('>')
}

fn encode(tree: &Tree, id: NodeId) -> Result<Json> {
    Ok(match tree.value(id)? {
        Value::Byte(v) => Json::from(*v),
        Value::Short(v) => Json::from(*v),
        Value::Int(v) => Json::from(*v),
        Value::Long(v) => Json::from(*v),
        Value::Float(v) => float_to_json(*v as f64),
        Value::Double(v) => float_to_json(*v),
        Value::String(v) => Json::from(v.as_str()),
        Value::ByteArray(values) => {
            let bytes: Vec<u8> = values.iter().map(|b| *b as u8).collect();
            Json::from(STANDARD.encode(bytes))
        }
        Value::IntArray(values) => Json::from(values.clone()),
        Value::LongArray(values) => Json::from(values.clone()),
        Value::List(list) => Json::Array(
            list.ids()
                .iter()
                .map(|child| encode(tree, *child))
                .collect::<Result<_>>()?,
        ),
        Value::Compound(compound) => {
            let mut out = Map::with_capacity(compound.len());
            for (name, child) in compound.iter() {
                let key = format!("{}:{name}", type_prefix(tree, child)?);
                out.insert(key, encode(tree, child)?);
            }
            Json::Object(out)
        }
    })
}

/// Builds the roundtrip envelope for `tree`.
pub fn to_roundtrip_json(tree: &Tree) -> Result<Json> {
    let (root_type, root_name, root) = match tree.root() {
        Some(root) => (
            type_prefix(tree, root)?,
            tree.name(root)?.to_string(),
            encode(tree, root)?,
        ),
        None => (String::from("null"), String::new(), Json::Null),
    };
    let mut envelope = Map::new();
    envelope.insert(MARKER.to_string(), Json::from(ROUNDTRIP_VERSION));
    envelope.insert(String::from("rootType"), Json::from(root_type));
    envelope.insert(String::from("rootName"), Json::from(root_name));
    envelope.insert(String::from("root"), root);
    Ok(Json::Object(envelope))
}

/// Renders `tree` as roundtrip JSON text.
///
/// # Example
///
/// ```
/// use nbted::{read_roundtrip_json, read_snbt, write_roundtrip_json};
///
/// let tree = read_snbt("{seed: 42L, empty: [], Pos: [1.0d, 2.5d]}").unwrap();
/// let text = write_roundtrip_json(&tree, false).unwrap();
/// assert!(text.contains("\"long:seed\":42"));
/// assert!(text.contains("\"list<?>:empty\":[]"));
/// assert!(read_roundtrip_json(&text).unwrap() == tree);
/// ```
pub fn write_roundtrip_json(tree: &Tree, pretty: bool) -> Result<String> {
    render(&to_roundtrip_json(tree)?, pretty)
}

fn integer(json: &Json, what: &str) -> Result<i64> {
    json.as_i64()
        .ok_or_else(|| Error::malformed(format!("expected an integer for {what}, got {json}")))
}

fn narrow<T: TryFrom<i64>>(json: &Json, what: &str) -> Result<T> {
    let value = integer(json, what)?;
    T::try_from(value).map_err(|_| Error::BadNumber(format!("{value} ({what})")))
}

fn float(json: &Json, what: &str) -> Result<f64> {
    match json {
        Json::Number(n) => n.as_f64(),
        Json::String(s) => match s.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            _ => None,
        },
        _ => None,
    }
    .ok_or_else(|| Error::malformed(format!("expected a number for {what}, got {json}")))
}

fn array<'j>(json: &'j Json, what: &str) -> Result<&'j Vec<Json>> {
    json.as_array()
        .ok_or_else(|| Error::malformed(format!("expected an array for {what}")))
}

/// The element kind named by a list's inner prefix.
fn prefix_kind(prefix: &str) -> Result<TagKind> {
    if prefix.starts_with("list<") {
        return Ok(TagKind::List);
    }
    TagKind::from_type_name(prefix).ok_or_else(|| Error::UnknownType(prefix.to_string()))
}

fn decode(tree: &mut Tree, prefix: &str, name: &str, json: &Json, depth: usize) -> Result<NodeId> {
    if depth > MAX_DEPTH {
        return Err(Error::malformed(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }
    if let Some(rest) = prefix.strip_prefix("list<") {
        let inner = rest
            .strip_suffix('>')
            .ok_or_else(|| Error::malformed(format!("missing closing > in list type {prefix}")))?;
        if inner == "?" {
            if json.is_null() || json.as_array().is_some_and(|items| items.is_empty()) {
                return Ok(tree.create(name, Value::list()));
            }
            return Err(Error::malformed(format!(
                "list of unknown type has elements ({name})"
            )));
        }
        let kind = prefix_kind(inner)?;
        let list = tree.create(name, Value::typed_list(kind));
        for item in array(json, name)? {
            // inner lists that were empty carry no type of their own
            let child = match item.as_array() {
                Some(items) if kind == TagKind::List && items.is_empty() => {
                    tree.create("", Value::list())
                }
                _ => decode(tree, inner, "", item, depth + 1)?,
            };
            tree.add(list, child)?;
        }
        return Ok(list);
    }

    let kind = TagKind::from_type_name(prefix).ok_or_else(|| {
        Error::UnknownType(format!("{prefix} (for key {prefix}:{name})"))
    })?;
    let value = match kind {
        TagKind::Byte => Value::Byte(narrow(json, name)?),
        TagKind::Short => Value::Short(narrow(json, name)?),
        TagKind::Int => Value::Int(narrow(json, name)?),
        TagKind::Long => Value::Long(integer(json, name)?),
        TagKind::Float => Value::Float(float(json, name)? as f32),
        TagKind::Double => Value::Double(float(json, name)?),
        TagKind::String => Value::String(
            json.as_str()
                .ok_or_else(|| Error::malformed(format!("expected a string for {name}")))?
                .to_string(),
        ),
        TagKind::ByteArray => Value::ByteArray(match json {
            Json::String(text) => STANDARD
                .decode(text)
                .map_err(|e| Error::malformed(format!("invalid base64 for {name}: {e}")))?
                .into_iter()
                .map(|b| b as i8)
                .collect(),
            _ => array(json, name)?
                .iter()
                .map(|item| narrow(item, name))
                .collect::<Result<_>>()?,
        }),
        TagKind::IntArray => Value::IntArray(
            array(json, name)?
                .iter()
                .map(|item| narrow(item, name))
                .collect::<Result<_>>()?,
        ),
        TagKind::LongArray => Value::LongArray(
            array(json, name)?
                .iter()
                .map(|item| integer(item, name))
                .collect::<Result<_>>()?,
        ),
        TagKind::List => {
            return Err(Error::malformed(format!(
                "list {name} has no element type"
            )));
        }
        TagKind::Compound => {
            let object = json
                .as_object()
                .ok_or_else(|| Error::malformed(format!("expected an object for {name}")))?;
            let compound = tree.create(name, Value::compound());
            for (key, item) in object {
                if key == MARKER {
                    continue;
                }
                let (prefix, child_name) = split_key(key)?;
                let child = decode(tree, prefix, child_name, item, depth + 1)?;
                if let Some(previous) = tree.put(compound, child)? {
                    tree.free(previous)?;
                }
            }
            return Ok(compound);
        }
    };
    Ok(tree.create(name, value))
}

/// Splits `"type:name"` at the first colon.
fn split_key(key: &str) -> Result<(&str, &str)> {
    key.split_once(':').ok_or_else(|| {
        Error::malformed(format!("key {key:?} is not prefixed with its type"))
    })
}

/// Rebuilds a tree from a parsed roundtrip envelope.
pub fn from_roundtrip_json(json: &Json) -> Result<Tree> {
    let envelope = json.as_object().ok_or(Error::NotRoundtripJson)?;
    let marker = envelope.get(MARKER).ok_or(Error::NotRoundtripJson)?;
    let version = marker
        .as_u64()
        .ok_or_else(|| Error::malformed(format!("invalid {MARKER} version {marker}")))?;
    if version > ROUNDTRIP_VERSION {
        return Err(Error::UnsupportedVersion(version));
    }
    let root_type = envelope
        .get("rootType")
        .and_then(Json::as_str)
        .ok_or_else(|| Error::malformed("missing rootType"))?;
    let root_name = envelope
        .get("rootName")
        .and_then(Json::as_str)
        .unwrap_or_default();

    let mut tree = Tree::new();
    if root_type == "null" {
        return Ok(tree);
    }
    let root = envelope.get("root").unwrap_or(&Json::Null);
    let root = decode(&mut tree, root_type, root_name, root, 0)?;
    tree.set_root(root)?;
    Ok(tree)
}

/// Parses roundtrip JSON text.
pub fn read_roundtrip_json(text: &str) -> Result<Tree> {
    from_roundtrip_json(&serde_json::from_str(text)?)
}

pub fn read_roundtrip_json_slice(bytes: &[u8]) -> Result<Tree> {
    from_roundtrip_json(&serde_json::from_slice(bytes)?)
}
