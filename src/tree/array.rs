use crate::{Error, NodeId, Result, TagKind, Tree, Value};

/// Borrowed view of one of the three typed arrays.
enum ArrayMut<'a> {
    Byte(&'a mut Vec<i8>),
    Int(&'a mut Vec<i32>),
    Long(&'a mut Vec<i64>),
}

macro_rules! with_array {
    ($array:expr, $values:ident => $body:expr) => {
        match $array {
            ArrayMut::Byte($values) => $body,
            ArrayMut::Int($values) => $body,
            ArrayMut::Long($values) => $body,
        }
    };
}

fn not_an_array(kind: TagKind) -> Error {
    Error::BadUsage(format!("{kind} is not an array"))
}

fn out_of_bounds(index: usize, len: usize) -> Error {
    Error::TagNotFound(format!("index {index} is out of bounds (length {len})"))
}

impl ArrayMut<'_> {
    fn element_kind(&self) -> TagKind {
        match self {
            ArrayMut::Byte(_) => TagKind::Byte,
            ArrayMut::Int(_) => TagKind::Int,
            ArrayMut::Long(_) => TagKind::Long,
        }
    }

    fn len(&self) -> usize {
        with_array!(self, values => values.len())
    }

    fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        match (self, value) {
            (ArrayMut::Byte(values), Value::Byte(v)) => values.insert(index, v),
            (ArrayMut::Int(values), Value::Int(v)) => values.insert(index, v),
            (ArrayMut::Long(values), Value::Long(v)) => values.insert(index, v),
            (array, value) => {
                return Err(Error::IncompatibleType {
                    expected: array.element_kind(),
                    actual: value.kind(),
                });
            }
        }
        Ok(())
    }

    fn replace(&mut self, index: usize, value: Value) -> Result<Value> {
        Ok(match (self, value) {
            (ArrayMut::Byte(values), Value::Byte(v)) => {
                Value::Byte(std::mem::replace(&mut values[index], v))
            }
            (ArrayMut::Int(values), Value::Int(v)) => {
                Value::Int(std::mem::replace(&mut values[index], v))
            }
            (ArrayMut::Long(values), Value::Long(v)) => {
                Value::Long(std::mem::replace(&mut values[index], v))
            }
            (array, value) => {
                return Err(Error::IncompatibleType {
                    expected: array.element_kind(),
                    actual: value.kind(),
                });
            }
        })
    }

    fn remove(&mut self, index: usize) -> Value {
        match self {
            ArrayMut::Byte(values) => Value::Byte(values.remove(index)),
            ArrayMut::Int(values) => Value::Int(values.remove(index)),
            ArrayMut::Long(values) => Value::Long(values.remove(index)),
        }
    }
}

impl Tree {
    fn array_mut(&mut self, id: NodeId) -> Result<ArrayMut<'_>> {
        match &mut self.node_mut(id)?.value {
            Value::ByteArray(values) => Ok(ArrayMut::Byte(values)),
            Value::IntArray(values) => Ok(ArrayMut::Int(values)),
            Value::LongArray(values) => Ok(ArrayMut::Long(values)),
            other => Err(not_an_array(other.kind())),
        }
    }

    pub fn array_len(&self, array: NodeId) -> Result<usize> {
        match &self.node(array)?.value {
            Value::ByteArray(values) => Ok(values.len()),
            Value::IntArray(values) => Ok(values.len()),
            Value::LongArray(values) => Ok(values.len()),
            other => Err(not_an_array(other.kind())),
        }
    }

    /// The element at `index` as a scalar [`Value`].
    pub fn array_get(&self, array: NodeId, index: usize) -> Result<Value> {
        let element = match &self.node(array)?.value {
            Value::ByteArray(values) => values.get(index).map(|v| Value::Byte(*v)),
            Value::IntArray(values) => values.get(index).map(|v| Value::Int(*v)),
            Value::LongArray(values) => values.get(index).map(|v| Value::Long(*v)),
            other => return Err(not_an_array(other.kind())),
        };
        element.ok_or_else(|| out_of_bounds(index, self.array_len(array).unwrap_or(0)))
    }

    /// Overwrites the element at `index`, returning the old value.
    pub fn array_set(&mut self, array: NodeId, index: usize, value: Value) -> Result<Value> {
        let mut values = self.array_mut(array)?;
        let len = values.len();
        if index >= len {
            return Err(out_of_bounds(index, len));
        }
        values.replace(index, value)
    }

    /// Inserts before `index`; `index` may equal the length.
    pub fn array_insert(&mut self, array: NodeId, index: usize, value: Value) -> Result<()> {
        let mut values = self.array_mut(array)?;
        let len = values.len();
        if index > len {
            return Err(out_of_bounds(index, len));
        }
        values.insert(index, value)
    }

    pub fn array_push(&mut self, array: NodeId, value: Value) -> Result<()> {
        let mut values = self.array_mut(array)?;
        let len = values.len();
        values.insert(len, value)
    }

    pub fn array_remove(&mut self, array: NodeId, index: usize) -> Result<Value> {
        let mut values = self.array_mut(array)?;
        let len = values.len();
        if index >= len {
            return Err(out_of_bounds(index, len));
        }
        Ok(values.remove(index))
    }
}
