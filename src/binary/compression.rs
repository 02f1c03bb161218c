use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

#[cfg(not(feature = "zstd"))]
use crate::Error;
use crate::Result;

/// Stream wrapper beneath the byte order: none, zlib deflate, gzip or zstd.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Deflate,
    Gzip,
    Zstd,
}

/// A pluggable compress/decompress pair over whole buffers.
pub trait Compressor: Send + Sync {
    fn compression(&self) -> Compression;
    fn wrap(&self, data: &[u8]) -> Result<Vec<u8>>;
    fn unwrap(&self, data: &[u8]) -> Result<Vec<u8>>;
}

impl Compression {
    pub const ALL: [Compression; 4] = [Self::None, Self::Deflate, Self::Gzip, Self::Zstd];

    pub fn name(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Deflate => "deflate",
            Compression::Gzip => "gzip",
            Compression::Zstd => "zstd",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "none" => Some(Compression::None),
            "deflate" | "zlib" => Some(Compression::Deflate),
            "gzip" | "gz" => Some(Compression::Gzip),
            "zstd" => Some(Compression::Zstd),
            _ => None,
        }
    }

    /// Guesses the wrapper from the first magic bytes of a raw stream.
    ///
    /// ```
    /// use nbted::Compression;
    ///
    /// assert_eq!(Compression::detect(&[0x1f, 0x8b, 0x08]), Compression::Gzip);
    /// assert_eq!(Compression::detect(&[0x78, 0x9c]), Compression::Deflate);
    /// assert_eq!(Compression::detect(&[0x0a, 0x00]), Compression::None);
    /// ```
    pub fn detect(data: &[u8]) -> Compression {
        match data {
            [0x1f, 0x8b, ..] => Compression::Gzip,
            [0x78, _, ..] => Compression::Deflate,
            [0x28, 0xb5, ..] => Compression::Zstd,
            _ => Compression::None,
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(not(feature = "zstd"))]
fn zstd_unavailable() -> Error {
    Error::Message(String::from("zstd support is not compiled in"))
}

impl Compressor for Compression {
    #[inline]
    fn compression(&self) -> Compression {
        *self
    }

    fn wrap(&self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Deflate => {
                let mut encoder =
                    flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data)?;
                Ok(encoder.finish()?)
            }
            Compression::Gzip => {
                let mut encoder =
                    flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
                encoder.write_all(data)?;
                Ok(encoder.finish()?)
            }
            #[cfg(feature = "zstd")]
            Compression::Zstd => Ok(zstd::encode_all(data, 0)?),
            #[cfg(not(feature = "zstd"))]
            Compression::Zstd => Err(zstd_unavailable()),
        }
    }

    fn unwrap(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len() * 4);
        match self {
            Compression::None => out.extend_from_slice(data),
            Compression::Deflate => {
                flate2::read::ZlibDecoder::new(data).read_to_end(&mut out)?;
            }
            Compression::Gzip => {
                flate2::read::MultiGzDecoder::new(data).read_to_end(&mut out)?;
            }
            #[cfg(feature = "zstd")]
            Compression::Zstd => out = zstd::decode_all(data)?,
            #[cfg(not(feature = "zstd"))]
            Compression::Zstd => return Err(zstd_unavailable()),
        }
        Ok(out)
    }
}
