use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Map, Value as Json};

use crate::{
    ByteArrayStyle, JsonOptions, NodeId, Result, Tree, Value, float_to_json, find_uuid_pair,
    render, split_uuid_half, uuid_from_int_array,
};

/// Converts the subtree at `id` to friendly JSON.
///
/// Compound keys are sorted. Two longs `<x>Most` and `<x>Least` become one
/// UUID string `<x>`, and so does any four-element int array.
///
/// # Example
///
/// ```
/// use nbted::{JsonOptions, read_snbt, to_friendly_json};
///
/// let tree = read_snbt("{idMost: 1L, idLeast: 2L, b: 1b}").unwrap();
/// let json = to_friendly_json(&tree, tree.root().unwrap(), &JsonOptions::default()).unwrap();
/// assert_eq!(json["id"], "00000000-0000-0001-0000-000000000002");
/// assert_eq!(json["b"], 1);
/// ```
pub fn to_friendly_json(tree: &Tree, id: NodeId, options: &JsonOptions) -> Result<Json> {
    Ok(match tree.value(id)? {
        Value::Byte(v) => Json::from(*v),
        Value::Short(v) => Json::from(*v),
        Value::Int(v) => Json::from(*v),
        Value::Long(v) => Json::from(*v),
        Value::Float(v) => float_to_json(*v as f64),
        Value::Double(v) => float_to_json(*v),
        Value::String(v) => Json::from(v.as_str()),
        Value::ByteArray(values) => match options.byte_arrays {
            ByteArrayStyle::Array => Json::from(values.clone()),
            ByteArrayStyle::Base64 => {
                let bytes: Vec<u8> = values.iter().map(|b| *b as u8).collect();
                Json::from(STANDARD.encode(bytes))
            }
        },
        Value::IntArray(values) => match uuid_from_int_array(values) {
            Some(uuid) => Json::from(uuid.to_string()),
            None => Json::from(values.clone()),
        },
        Value::LongArray(values) => Json::from(values.clone()),
        Value::List(list) => Json::Array(
            list.ids()
                .iter()
                .map(|child| to_friendly_json(tree, *child, options))
                .collect::<Result<_>>()?,
        ),
        Value::Compound(compound) => {
            let mut entries: Vec<(&str, NodeId)> = compound.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let mut out = Map::new();
            for (name, child) in entries {
                if let Some((base, most)) = split_uuid_half(name) {
                    if let Some(uuid) = find_uuid_pair(tree, id, base) {
                        if most {
                            out.insert(base.to_string(), Json::from(uuid.to_string()));
                        }
                        continue;
                    }
                }
                out.insert(name.to_string(), to_friendly_json(tree, child, options)?);
            }
            Json::Object(out)
        }
    })
}

/// Renders the whole tree as friendly JSON text; the empty tree is `null`.
pub fn write_friendly_json(tree: &Tree, options: &JsonOptions) -> Result<String> {
    let json = match tree.root() {
        Some(root) => to_friendly_json(tree, root, options)?,
        None => Json::Null,
    };
    render(&json, options.pretty)
}
