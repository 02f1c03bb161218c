//! JSON bridge.
//!
//! The *friendly* form is for people: bare keys sorted alphabetically, UUIDs
//! collapsed into strings, no type information. It cannot be read back.
//!
//! The *roundtrip* form keeps everything: every key is prefixed with the
//! type name of its value (`"long:seed"`), lists carry their element type
//! (`"list<string>:Tags"`, `"list<?>"` when untyped) and the document is
//! wrapped in a versioned envelope:
//!
//! ```json
//! { "_unbted": 1, "rootType": "compound", "rootName": "", "root": { ... } }
//! ```

use serde::{Deserialize, Serialize};

mod friendly;
mod roundtrip;

pub use friendly::*;
pub use roundtrip::*;

/// How friendly JSON renders byte arrays.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ByteArrayStyle {
    /// An array of numbers.
    #[default]
    Array,
    /// One base64 string.
    Base64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct JsonOptions {
    #[serde(default)]
    pub byte_arrays: ByteArrayStyle,
    /// Two-space indentation instead of a single line.
    #[serde(default)]
    pub pretty: bool,
}

/// Non-finite floats have no JSON number form and are written as the strings
/// `"NaN"`, `"Infinity"` and `"-Infinity"`.
pub(crate) fn float_to_json(value: f64) -> serde_json::Value {
    if value.is_nan() {
        serde_json::Value::from("NaN")
    } else if value.is_infinite() {
        serde_json::Value::from(if value > 0.0 { "Infinity" } else { "-Infinity" })
    } else {
        serde_json::Value::from(value)
    }
}

pub(crate) fn render(value: &serde_json::Value, pretty: bool) -> crate::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}
