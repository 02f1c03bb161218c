#[inline(always)]
#[cold]
pub(crate) fn cold_path() {}

/// Byte orders the binary codec can be instantiated with:
/// [`BigEndian`](crate::BigEndian) (Java Edition) and
/// [`LittleEndian`](crate::LittleEndian) (legacy Pocket Edition).
pub trait ByteOrder: zerocopy::ByteOrder + Send + Sync + 'static {}

impl<T: zerocopy::ByteOrder + Send + Sync + 'static> ByteOrder for T {}

/// Nesting limit shared by every recursive decoder.
pub(crate) const MAX_DEPTH: usize = 512;

/// Java `Byte/Short/Integer/Long.decode` semantics: optional sign, then `0x`,
/// `0X` or `#` for hex, a leading `0` for octal, decimal otherwise.
pub(crate) fn decode_integer(literal: &str) -> Option<i128> {
    let (negative, body) = match literal.as_bytes().first()? {
        b'-' => (true, &literal[1..]),
        b'+' => (false, &literal[1..]),
        _ => (false, literal),
    };
    let (radix, digits) = if let Some(hex) = body
        .strip_prefix("0x")
        .or_else(|| body.strip_prefix("0X"))
        .or_else(|| body.strip_prefix('#'))
    {
        (16, hex)
    } else if body.len() > 1 && body.starts_with('0') {
        (8, &body[1..])
    } else {
        (10, body)
    };
    if digits.is_empty() || digits.starts_with(['-', '+']) {
        return None;
    }
    let magnitude = i128::from_str_radix(digits, radix).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::decode_integer;

    #[test]
    fn test_decode_integer_radixes() {
        assert_eq!(decode_integer("42"), Some(42));
        assert_eq!(decode_integer("-42"), Some(-42));
        assert_eq!(decode_integer("+7"), Some(7));
        assert_eq!(decode_integer("0x1F"), Some(31));
        assert_eq!(decode_integer("#ff"), Some(255));
        assert_eq!(decode_integer("-0x10"), Some(-16));
        assert_eq!(decode_integer("010"), Some(8));
        assert_eq!(decode_integer("0"), Some(0));
    }

    #[test]
    fn test_decode_integer_rejects_garbage() {
        assert_eq!(decode_integer(""), None);
        assert_eq!(decode_integer("-"), None);
        assert_eq!(decode_integer("0x"), None);
        assert_eq!(decode_integer("--1"), None);
        assert_eq!(decode_integer("12a"), None);
        assert_eq!(decode_integer("09"), None);
        assert_eq!(decode_integer("1.5"), None);
    }
}
