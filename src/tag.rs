use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The twelve NBT tag kinds, keyed by their wire id.
///
/// Id `0` (the end tag) is not a kind: it only ever appears on the wire as an
/// empty root or a compound terminator, so readers model it as `None`.
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagKind {
    /// Every kind in id order.
    pub const ALL: [TagKind; 12] = [
        Self::Byte,
        Self::Short,
        Self::Int,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::ByteArray,
        Self::String,
        Self::List,
        Self::Compound,
        Self::IntArray,
        Self::LongArray,
    ];

    /// Looks up a kind by wire id. Returns `None` for `0` and anything above `12`.
    ///
    /// # Example
    ///
    /// ```
    /// use nbted::TagKind;
    ///
    /// assert_eq!(TagKind::from_id(10), Some(TagKind::Compound));
    /// assert_eq!(TagKind::from_id(0), None);
    /// assert_eq!(TagKind::from_id(13), None);
    /// ```
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Byte),
            2 => Some(Self::Short),
            3 => Some(Self::Int),
            4 => Some(Self::Long),
            5 => Some(Self::Float),
            6 => Some(Self::Double),
            7 => Some(Self::ByteArray),
            8 => Some(Self::String),
            9 => Some(Self::List),
            10 => Some(Self::Compound),
            11 => Some(Self::IntArray),
            12 => Some(Self::LongArray),
            _ => None,
        }
    }

    #[inline]
    pub const fn id(self) -> u8 {
        self as u8
    }

    /// The user-facing type name, as used by the `set` command and as the key
    /// prefix of roundtrip JSON.
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Short => "short",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::ByteArray => "byte-array",
            Self::String => "string",
            Self::List => "list",
            Self::Compound => "compound",
            Self::IntArray => "int-array",
            Self::LongArray => "long-array",
        }
    }

    /// Inverse of [`type_name`](Self::type_name).
    ///
    /// # Example
    ///
    /// ```
    /// use nbted::TagKind;
    ///
    /// assert_eq!(TagKind::from_type_name("int-array"), Some(TagKind::IntArray));
    /// assert_eq!(TagKind::from_type_name("uuid"), None);
    /// ```
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Returns `true` for the fixed-width numeric kinds.
    pub const fn is_primitive(self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Int | Self::Long | Self::Float | Self::Double
        )
    }

    /// Returns `true` for ByteArray, IntArray and LongArray.
    pub const fn is_array(self) -> bool {
        matches!(self, Self::ByteArray | Self::IntArray | Self::LongArray)
    }

    /// Returns `true` for List and Compound.
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::List | Self::Compound)
    }

    /// Returns `true` for every kind a path can descend into: lists, compounds
    /// and the typed arrays.
    pub const fn is_container(self) -> bool {
        self.is_composite() || self.is_array()
    }

    /// The scalar kind held by an array kind.
    pub const fn array_element(self) -> Option<Self> {
        match self {
            Self::ByteArray => Some(Self::Byte),
            Self::IntArray => Some(Self::Int),
            Self::LongArray => Some(Self::Long),
            _ => None,
        }
    }
}

impl Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
