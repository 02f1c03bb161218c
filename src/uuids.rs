//! UUIDs stored in NBT, either as a `<base>Most`/`<base>Least` pair of longs
//! or as a four-element int array (most significant int first).

use uuid::Uuid;

use crate::{Error, NodeId, Result, Tree, Value};

/// Suffix of the high half in the long-pair form.
pub const MOST_SUFFIX: &str = "Most";
/// Suffix of the low half in the long-pair form.
pub const LEAST_SUFFIX: &str = "Least";

#[inline]
pub fn uuid_from_halves(most: i64, least: i64) -> Uuid {
    Uuid::from_u64_pair(most as u64, least as u64)
}

#[inline]
pub fn uuid_to_halves(uuid: Uuid) -> (i64, i64) {
    let (most, least) = uuid.as_u64_pair();
    (most as i64, least as i64)
}

/// ```
/// use nbted::{uuid_from_int_array, uuid_to_int_array};
///
/// let uuid = uuid::Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap();
/// assert_eq!(uuid_from_int_array(&uuid_to_int_array(uuid)), Some(uuid));
/// ```
pub fn uuid_from_int_array(values: &[i32]) -> Option<Uuid> {
    let [a, b, c, d] = *values else {
        return None;
    };
    let most = ((a as u32 as u64) << 32) | b as u32 as u64;
    let least = ((c as u32 as u64) << 32) | d as u32 as u64;
    Some(Uuid::from_u64_pair(most, least))
}

pub fn uuid_to_int_array(uuid: Uuid) -> [i32; 4] {
    let (most, least) = uuid.as_u64_pair();
    [
        (most >> 32) as i32,
        most as i32,
        (least >> 32) as i32,
        least as i32,
    ]
}

pub fn parse_uuid(text: &str) -> Result<Uuid> {
    Uuid::parse_str(text.trim()).map_err(|_| Error::BadUsage(format!("invalid UUID {text}")))
}

fn long_child(tree: &Tree, compound: NodeId, name: &str) -> Option<i64> {
    let child = tree.get(compound, name).ok()??;
    match tree.value(child).ok()? {
        Value::Long(value) => Some(*value),
        _ => None,
    }
}

/// The UUID held by `<base>Most`/`<base>Least` in `compound`, if both exist
/// and are longs.
pub fn find_uuid_pair(tree: &Tree, compound: NodeId, base: &str) -> Option<Uuid> {
    let most = long_child(tree, compound, &format!("{base}{MOST_SUFFIX}"))?;
    let least = long_child(tree, compound, &format!("{base}{LEAST_SUFFIX}"))?;
    Some(uuid_from_halves(most, least))
}

/// Splits `xMost` into `("x", true)` and `xLeast` into `("x", false)`.
pub fn split_uuid_half(name: &str) -> Option<(&str, bool)> {
    if let Some(base) = name.strip_suffix(MOST_SUFFIX) {
        Some((base, true))
    } else {
        name.strip_suffix(LEAST_SUFFIX).map(|base| (base, false))
    }
}
