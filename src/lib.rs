//! The editing core of an NBT (Named Binary Tag) editor.
//!
//! Documents are held as an arena-backed [`Tree`] and move between four
//! representations:
//!
//! - binary NBT, big- or little-endian, optionally obfuscated and
//!   compressed ([`Endianness`], [`Compression`], [`load`], [`save`]);
//! - SNBT text ([`read_snbt`], [`write_snbt`]);
//! - friendly and roundtrip JSON ([`to_friendly_json`],
//!   [`write_roundtrip_json`], [`read_roundtrip_json`]);
//! - a plain-text listing ([`print_tag`]).
//!
//! Tags are addressed with filesystem-like paths ([`resolve_path`]) and
//! edited through a [`Session`].
//!
//! # Example
//!
//! ```
//! use nbted::{BigEndian, RmOptions, Session, SetOptions, TagKind, read_snbt, read_tree, write_tree_to_vec};
//!
//! let mut session = Session::new(read_snbt("{Data: {Time: 0L}}").unwrap());
//! session.set("/Data/Time", "24000", None, &SetOptions::default()).unwrap();
//! session.set("/Data/Name", "World", Some(TagKind::String.into()), &SetOptions::default()).unwrap();
//! session.rm(&["/Data/Time"], &RmOptions::default()).unwrap();
//!
//! let bytes = write_tree_to_vec::<BigEndian>(session.tree()).unwrap();
//! assert!(read_tree::<BigEndian>(&bytes).unwrap() == *session.tree());
//! ```

pub use zerocopy::BigEndian;
pub use zerocopy::LittleEndian;

mod binary;
mod error;
mod io;
mod json;
mod path;
mod printer;
mod registry;
mod session;
mod snbt;
mod tag;
mod tree;
mod util;
mod uuids;

pub use binary::*;
pub use error::*;
pub use io::*;
pub use json::*;
pub use path::*;
pub use printer::*;
pub use registry::*;
pub use session::*;
pub use snbt::*;
pub use tag::*;
pub use tree::*;
pub use util::*;
pub use uuids::*;
