//! Error types for every layer of the editor: codecs, path resolution and
//! mutation.
//!
//! This module contains the [`Error`] type which represents all possible
//! failures, and the [`Result`] alias used throughout the crate.
//!
//! # Example
//!
//! ```
//! use nbted::{BigEndian, Error, read_tree};
//!
//! match read_tree::<BigEndian>(&[0x0a, 0x00, 0x00]) {
//!     Err(Error::EndOfFile) => println!("data was truncated"),
//!     Err(Error::InvalidTagType(id)) => println!("unknown tag type: {id:#04x}"),
//!     Err(e) if e.is_malformed_input() => println!("bad input: {e}"),
//!     Err(e) => println!("failed: {e}"),
//!     Ok(_) => unreachable!(),
//! }
//! ```

use std::fmt::{self, Display};

use crate::TagKind;

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// This type represents all possible errors raised by the editing core.
///
/// # Families
///
/// - Codec failures ([`EndOfFile`](Error::EndOfFile),
///   [`InvalidTagType`](Error::InvalidTagType),
///   [`MalformedInput`](Error::MalformedInput), ...) are never retried, except
///   that binary endianness autodetection tries the opposite byte order once.
/// - Path and mutation failures ([`TagNotFound`](Error::TagNotFound),
///   [`WontOverwrite`](Error::WontOverwrite), ...) are meant to be reported to
///   the user without ending the session.
/// - [`Consistency`](Error::Consistency) means a tree invariant was broken and
///   is never swallowed.
#[derive(Debug)]
pub enum Error {
    Message(String),

    /// An I/O error occurred.
    ///
    /// This happens when a file or sink fails, or when a compression stream
    /// is corrupt.
    IO(std::io::Error),

    /// The input ended unexpectedly.
    EndOfFile,

    /// Extra bytes remain after the root tag.
    TrailingData(usize),

    /// An invalid NBT tag type was encountered.
    ///
    /// NBT defines tag types 1-12 (0 being the terminator). If a byte outside
    /// this range is found where a tag type is expected, this error is
    /// returned with the invalid byte value.
    InvalidTagType(u8),

    /// Structurally invalid input: missing compound terminator, negative
    /// length, SNBT syntax error, malformed roundtrip JSON...
    MalformedInput(String),

    /// A string or name does not fit the 16-bit length prefix.
    StringTooLong(usize),

    ListTooLong(usize),

    Json(serde_json::Error),

    /// The roundtrip JSON envelope is newer than this implementation.
    UnsupportedVersion(u64),

    /// The JSON document has no `_unbted` envelope marker.
    NotRoundtripJson,

    /// Neither byte order could parse the input. `error` is the big-endian
    /// failure, `suppressed` the little-endian one.
    Undetected {
        error: Box<Error>,
        suppressed: Box<Error>,
    },

    /// An unregistered tag id or type name.
    UnknownType(String),

    /// A path segment is absent or a list index is out of range.
    TagNotFound(String),

    /// A destructive operation was blocked by a safety policy.
    WontOverwrite(String),

    /// Malformed caller input.
    BadUsage(String),

    /// A numeric literal could not be parsed for its target kind.
    BadNumber(String),

    /// A tag kind conflicts with the existing or list-adopted kind.
    IncompatibleType { expected: TagKind, actual: TagKind },

    /// A tree invariant was violated.
    Consistency(String),
}

impl Error {
    /// Returns `true` for the codec-level failures: truncated streams,
    /// missing terminators, unknown type ids, bad envelopes.
    pub fn is_malformed_input(&self) -> bool {
        match self {
            Error::EndOfFile
            | Error::TrailingData(_)
            | Error::InvalidTagType(_)
            | Error::MalformedInput(_)
            | Error::Json(_)
            | Error::UnsupportedVersion(_)
            | Error::NotRoundtripJson => true,
            Error::Undetected { error, .. } => error.is_malformed_input(),
            _ => false,
        }
    }

    #[inline]
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }

    #[inline]
    pub(crate) fn consistency(message: impl Into<String>) -> Self {
        Error::Consistency(message.into())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(message) => formatter.write_str(message),
            Error::IO(error) => formatter.write_str(&error.to_string()),
            Error::EndOfFile => formatter.write_str("unexpected end of input"),
            Error::TrailingData(remaining_bytes) => formatter.write_str(&format!(
                "trailing data after end of input: {remaining_bytes} bytes remaining"
            )),
            Error::InvalidTagType(tag) => {
                formatter.write_str(&format!("invalid NBT tag type: {tag:#04x}"))
            }
            Error::MalformedInput(message) => write!(formatter, "malformed input: {message}"),
            Error::StringTooLong(len) => {
                write!(formatter, "string too long: {len} bytes (max 65535)")
            }
            Error::ListTooLong(len) => formatter.write_str(&format!("list length too long: {len}")),
            Error::Json(error) => write!(formatter, "invalid JSON: {error}"),
            Error::UnsupportedVersion(version) => write!(
                formatter,
                "NBT JSON version {version} is newer than this implementation understands"
            ),
            Error::NotRoundtripJson => formatter.write_str("JSON document is not NBT JSON"),
            Error::Undetected { error, suppressed } => write!(
                formatter,
                "{error} (little-endian attempt also failed: {suppressed})"
            ),
            Error::UnknownType(name) => write!(formatter, "unknown tag type {name}"),
            Error::TagNotFound(message)
            | Error::WontOverwrite(message)
            | Error::BadUsage(message) => formatter.write_str(message),
            Error::BadNumber(literal) => write!(formatter, "invalid number {literal}"),
            Error::IncompatibleType { expected, actual } => write!(
                formatter,
                "incompatible type: expected {expected}, got {actual}"
            ),
            Error::Consistency(message) => write!(formatter, "consistency error: {message}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IO(error) => Some(error),
            Error::Json(error) => Some(error),
            Error::Undetected { suppressed, .. } => Some(suppressed.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::EndOfFile
        } else {
            Error::IO(error)
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json(error)
    }
}
