use serde::{Deserialize, Serialize};

use crate::{BigEndian, Error, LittleEndian, Result, Tree, read_tree, write_tree};

/// XOR key of the obfuscated stream variant.
const OBFUSCATION_KEY: &[u8] = b"ZZAZZAAZZAAZZZAAZZZAZAZZAZAZAZZAAZZAAZAZAZAZZAZAZAZAZAZAZZAAZZAAZZAAZZAAAZAZAZAAZZAAZZAAZAZZAAZZAAZZAZAZAZZAZZAZZAZZAZZZZZAAZAZAZAZAZAZAZ";

/// Byte order of fixed-width fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Big,
    Little,
}

/// Byte order plus the optional XOR obfuscation layer, which composes with
/// either order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Endianness {
    pub order: Order,
    #[serde(default)]
    pub obfuscated: bool,
}

impl Endianness {
    /// Java Edition.
    pub const BIG: Self = Self {
        order: Order::Big,
        obfuscated: false,
    };

    /// Legacy Pocket Edition.
    pub const LITTLE: Self = Self {
        order: Order::Little,
        obfuscated: false,
    };

    pub const OBFUSCATED: Self = Self {
        order: Order::Big,
        obfuscated: true,
    };

    #[inline]
    pub const fn with_obfuscation(self, obfuscated: bool) -> Self {
        Self {
            order: self.order,
            obfuscated,
        }
    }

    /// Decodes a whole (already decompressed) document.
    pub fn decode(self, source: &[u8]) -> Result<Tree> {
        if self.obfuscated {
            let mut plain = source.to_vec();
            obfuscate(&mut plain);
            self.decode_plain(&plain)
        } else {
            self.decode_plain(source)
        }
    }

    fn decode_plain(self, source: &[u8]) -> Result<Tree> {
        match self.order {
            Order::Big => read_tree::<BigEndian>(source),
            Order::Little => read_tree::<LittleEndian>(source),
        }
    }

    /// Encodes `tree`, appending to `out`.
    pub fn encode(self, tree: &Tree, out: &mut Vec<u8>) -> Result<()> {
        let start = out.len();
        match self.order {
            Order::Big => write_tree::<BigEndian>(tree, out)?,
            Order::Little => write_tree::<LittleEndian>(tree, out)?,
        }
        if self.obfuscated {
            obfuscate(&mut out[start..]);
        }
        Ok(())
    }

    pub fn encode_to_vec(self, tree: &Tree) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(128);
        self.encode(tree, &mut out)?;
        Ok(out)
    }

    /// Tries big-endian, then little-endian (keeping the obfuscation flag).
    ///
    /// An empty root counts as a failed attempt. When both fail the
    /// big-endian error is returned with the little-endian one attached.
    pub fn detect(source: &[u8], obfuscated: bool) -> Result<(Tree, Endianness)> {
        let big = Self::BIG.with_obfuscation(obfuscated);
        let error = match big.decode(source).and_then(non_empty) {
            Ok(tree) => return Ok((tree, big)),
            Err(error) => error,
        };
        log::debug!("big-endian parse failed ({error}), trying little-endian");
        let little = Self::LITTLE.with_obfuscation(obfuscated);
        match little.decode(source).and_then(non_empty) {
            Ok(tree) => {
                log::debug!("detected little-endian NBT");
                Ok((tree, little))
            }
            Err(suppressed) => Err(Error::Undetected {
                error: Box::new(error),
                suppressed: Box::new(suppressed),
            }),
        }
    }
}

fn non_empty(tree: Tree) -> Result<Tree> {
    if tree.is_empty() {
        return Err(Error::malformed("document has no root tag"));
    }
    Ok(tree)
}

/// XORs byte `i` with `KEY[i % KEY.len()]`. Applying it twice is a no-op.
pub fn obfuscate(data: &mut [u8]) {
    for (byte, key) in data.iter_mut().zip(OBFUSCATION_KEY.iter().cycle()) {
        *byte ^= key;
    }
}
