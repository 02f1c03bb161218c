//! Stringified NBT: a type-inferring reader and a single- or multi-line
//! writer.

mod read;
mod write;

pub use read::*;
pub use write::*;
