use indexmap::IndexMap;

use crate::{NodeId, TagKind};

/// The payload of one tag.
///
/// Container payloads ([`ListValue`], [`CompoundValue`]) hold child ids into
/// the owning [`Tree`](crate::Tree) and can only be populated through it, so a
/// `Value` handed to [`Tree::create`](crate::Tree::create) is always either a
/// leaf or an empty container.
#[derive(Debug)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(ListValue),
    Compound(CompoundValue),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Value {
    /// The zero value of `kind`: `0`, `""`, an empty array, an untyped empty
    /// list or an empty compound.
    pub fn zero(kind: TagKind) -> Self {
        match kind {
            TagKind::Byte => Value::Byte(0),
            TagKind::Short => Value::Short(0),
            TagKind::Int => Value::Int(0),
            TagKind::Long => Value::Long(0),
            TagKind::Float => Value::Float(0.0),
            TagKind::Double => Value::Double(0.0),
            TagKind::ByteArray => Value::ByteArray(Vec::new()),
            TagKind::String => Value::String(String::new()),
            TagKind::List => Value::List(ListValue::default()),
            TagKind::Compound => Value::Compound(CompoundValue::default()),
            TagKind::IntArray => Value::IntArray(Vec::new()),
            TagKind::LongArray => Value::LongArray(Vec::new()),
        }
    }

    #[inline]
    pub fn compound() -> Self {
        Value::Compound(CompoundValue::default())
    }

    #[inline]
    pub fn list() -> Self {
        Value::List(ListValue::default())
    }

    /// An empty list that has already adopted `kind`.
    #[inline]
    pub fn typed_list(kind: TagKind) -> Self {
        Value::List(ListValue {
            kind: Some(kind),
            items: Vec::new(),
        })
    }

    pub fn kind(&self) -> TagKind {
        match self {
            Value::Byte(_) => TagKind::Byte,
            Value::Short(_) => TagKind::Short,
            Value::Int(_) => TagKind::Int,
            Value::Long(_) => TagKind::Long,
            Value::Float(_) => TagKind::Float,
            Value::Double(_) => TagKind::Double,
            Value::ByteArray(_) => TagKind::ByteArray,
            Value::String(_) => TagKind::String,
            Value::List(_) => TagKind::List,
            Value::Compound(_) => TagKind::Compound,
            Value::IntArray(_) => TagKind::IntArray,
            Value::LongArray(_) => TagKind::LongArray,
        }
    }

    /// Integer kinds widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    /// Any numeric kind as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Copies a leaf value. Containers cannot be copied this way since their
    /// children belong to a tree.
    pub fn leaf_clone(&self) -> Option<Value> {
        Some(match self {
            Value::Byte(v) => Value::Byte(*v),
            Value::Short(v) => Value::Short(*v),
            Value::Int(v) => Value::Int(*v),
            Value::Long(v) => Value::Long(*v),
            Value::Float(v) => Value::Float(*v),
            Value::Double(v) => Value::Double(*v),
            Value::ByteArray(v) => Value::ByteArray(v.clone()),
            Value::String(v) => Value::String(v.clone()),
            Value::IntArray(v) => Value::IntArray(v.clone()),
            Value::LongArray(v) => Value::LongArray(v.clone()),
            Value::List(_) | Value::Compound(_) => return None,
        })
    }

    /// Compares two leaf values; floats are compared bit-for-bit.
    pub(crate) fn leaf_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::ByteArray(a), Value::ByteArray(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::IntArray(a), Value::IntArray(b)) => a == b,
            (Value::LongArray(a), Value::LongArray(b)) => a == b,
            _ => false,
        }
    }
}

/// Positional, kind-homogeneous children.
///
/// The element kind is adopted from the first inserted child and reset to
/// `None` when the last child is removed.
#[derive(Debug, Default)]
pub struct ListValue {
    pub(crate) kind: Option<TagKind>,
    pub(crate) items: Vec<NodeId>,
}

impl ListValue {
    #[inline]
    pub fn element_kind(&self) -> Option<TagKind> {
        self.kind
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    #[inline]
    pub fn ids(&self) -> &[NodeId] {
        &self.items
    }
}

/// Named children in insertion order.
#[derive(Debug, Default)]
pub struct CompoundValue {
    pub(crate) entries: IndexMap<String, NodeId>,
}

impl CompoundValue {
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.entries.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// `(name, child)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(name, id)| (name.as_str(), *id))
    }
}
