//! Binary NBT: the recursive reader and writer, the byte-order layer with its
//! XOR obfuscation variant, and the compression layer beneath it.

mod compression;
mod endianness;
mod read;
mod write;

pub use compression::*;
pub use endianness::*;
pub use read::*;
pub use write::*;
