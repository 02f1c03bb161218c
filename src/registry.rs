use std::fmt::{self, Display};

use crate::{Error, NodeId, Result, TagKind, Tree, Value};

/// A tag kind as named by a caller: the kind itself, its wire id or its type
/// name.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KindRef<'a> {
    Kind(TagKind),
    Id(u8),
    Name(&'a str),
}

impl KindRef<'_> {
    /// Looks the reference up in the registry.
    pub fn resolve(self) -> Result<TagKind> {
        match self {
            KindRef::Kind(kind) => Ok(kind),
            KindRef::Id(id) => {
                TagKind::from_id(id).ok_or_else(|| Error::UnknownType(format!("id {id}")))
            }
            KindRef::Name(name) => {
                TagKind::from_type_name(name).ok_or_else(|| Error::UnknownType(name.to_string()))
            }
        }
    }
}

impl From<TagKind> for KindRef<'_> {
    fn from(kind: TagKind) -> Self {
        KindRef::Kind(kind)
    }
}

impl From<u8> for KindRef<'_> {
    fn from(id: u8) -> Self {
        KindRef::Id(id)
    }
}

impl<'a> From<&'a str> for KindRef<'a> {
    fn from(name: &'a str) -> Self {
        KindRef::Name(name)
    }
}

impl Display for KindRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindRef::Kind(kind) => Display::fmt(kind, f),
            KindRef::Id(id) => write!(f, "id {id}"),
            KindRef::Name(name) => f.write_str(name),
        }
    }
}

/// Builds a detached zero-valued tag in `tree`.
///
/// # Example
///
/// ```
/// use nbted::{Tree, TagKind, create_instance};
///
/// let mut tree = Tree::new();
/// let id = create_instance(&mut tree, "int-array", "Pos").unwrap();
/// assert_eq!(tree.kind(id).unwrap(), TagKind::IntArray);
/// assert!(create_instance(&mut tree, 13u8, "").is_err());
/// ```
pub fn create_instance<'a>(
    tree: &mut Tree,
    kind: impl Into<KindRef<'a>>,
    name: impl Into<String>,
) -> Result<NodeId> {
    let kind = kind.into().resolve()?;
    Ok(tree.create(name, Value::zero(kind)))
}
