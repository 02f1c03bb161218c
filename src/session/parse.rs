use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{Error, NodeId, Result, TagKind, Tree, Value, decode_integer};

fn integer<T: TryFrom<i128>>(raw: &str, kind: TagKind) -> Result<T> {
    decode_integer(raw.trim())
        .and_then(|value| T::try_from(value).ok())
        .ok_or_else(|| Error::BadNumber(format!("{raw} for {kind}")))
}

/// Drops a trailing `f`/`d` type suffix from a decimal literal.
fn float_literal(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed
        .strip_suffix(['f', 'F', 'd', 'D'])
        .filter(|rest| rest.ends_with(|c: char| c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed)
}

fn float<T: std::str::FromStr>(raw: &str, kind: TagKind) -> Result<T> {
    float_literal(raw)
        .parse()
        .map_err(|_| Error::BadNumber(format!("{raw} for {kind}")))
}

/// Parses user input for a tag of `kind`.
///
/// `Ok(None)` is returned for kinds that cannot carry a value (containers
/// and int/long arrays), which only accept empty input.
pub(crate) fn parse_leaf(kind: TagKind, raw: &str) -> Result<Option<Value>> {
    let numeric = match raw {
        "true" => "1",
        "false" => "0",
        other => other,
    };
    Ok(Some(match kind {
        TagKind::Byte => Value::Byte(integer(numeric, kind)?),
        TagKind::Short => Value::Short(integer(numeric, kind)?),
        TagKind::Int => Value::Int(integer(numeric, kind)?),
        TagKind::Long => Value::Long(integer(numeric, kind)?),
        TagKind::Float => Value::Float(float(numeric, kind)?),
        TagKind::Double => Value::Double(float(numeric, kind)?),
        TagKind::String => Value::String(raw.to_string()),
        TagKind::ByteArray => Value::ByteArray(
            STANDARD
                .decode(raw)
                .map_err(|_| Error::BadUsage(format!("invalid base64 {raw}")))?
                .into_iter()
                .map(|b| b as i8)
                .collect(),
        ),
        TagKind::IntArray | TagKind::LongArray | TagKind::List | TagKind::Compound => {
            if !raw.trim().is_empty() {
                return Err(Error::BadUsage(format!(
                    "tags of type {kind} cannot be created with a value"
                )));
            }
            return Ok(None);
        }
    }))
}

/// A fresh value of `kind` holding `raw`.
pub(crate) fn new_value(kind: TagKind, raw: &str) -> Result<Value> {
    Ok(parse_leaf(kind, raw)?.unwrap_or_else(|| Value::zero(kind)))
}

/// Overwrites an existing tag with `raw`; value-less kinds are emptied.
pub(crate) fn assign(tree: &mut Tree, id: NodeId, raw: &str) -> Result<()> {
    match parse_leaf(tree.kind(id)?, raw)? {
        Some(value) => {
            tree.replace_value(id, value)?;
        }
        None => tree.clear_children(id)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_accept_booleans_and_radixes() {
        assert!(matches!(parse_leaf(TagKind::Byte, "true"), Ok(Some(Value::Byte(1)))));
        assert!(matches!(parse_leaf(TagKind::Short, "false"), Ok(Some(Value::Short(0)))));
        assert!(matches!(parse_leaf(TagKind::Int, "0x10"), Ok(Some(Value::Int(16)))));
        assert!(matches!(parse_leaf(TagKind::Long, " -#ff "), Ok(Some(Value::Long(-255)))));
        assert!(matches!(parse_leaf(TagKind::Float, "1.5f"), Ok(Some(Value::Float(v))) if v == 1.5));
        assert!(matches!(parse_leaf(TagKind::Double, "2"), Ok(Some(Value::Double(v))) if v == 2.0));
    }

    #[test]
    fn test_out_of_range_is_bad_number() {
        match parse_leaf(TagKind::Byte, "128") {
            Err(Error::BadNumber(_)) => {}
            other => panic!("expected BadNumber, got {other:?}"),
        }
        match parse_leaf(TagKind::Double, "one") {
            Err(Error::BadNumber(_)) => {}
            other => panic!("expected BadNumber, got {other:?}"),
        }
    }

    #[test]
    fn test_containers_take_no_value() {
        assert!(matches!(parse_leaf(TagKind::Compound, " "), Ok(None)));
        match parse_leaf(TagKind::IntArray, "1 2") {
            Err(Error::BadUsage(_)) => {}
            other => panic!("expected BadUsage, got {other:?}"),
        }
    }

    #[test]
    fn test_byte_array_is_base64() {
        assert!(matches!(
            parse_leaf(TagKind::ByteArray, "AQL/"),
            Ok(Some(Value::ByteArray(bytes))) if bytes == [1, 2, -1]
        ));
        match parse_leaf(TagKind::ByteArray, "not base64!") {
            Err(Error::BadUsage(_)) => {}
            other => panic!("expected BadUsage, got {other:?}"),
        }
    }
}
