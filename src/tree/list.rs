use crate::{Error, ListValue, NodeId, Result, TagKind, Tree, Value};

fn out_of_bounds(index: usize, len: usize) -> Error {
    Error::TagNotFound(format!("index {index} is out of bounds (length {len})"))
}

impl Tree {
    /// The list payload of `id`.
    pub fn list(&self, id: NodeId) -> Result<&ListValue> {
        match &self.node(id)?.value {
            Value::List(list) => Ok(list),
            other => Err(Error::IncompatibleType {
                expected: TagKind::List,
                actual: other.kind(),
            }),
        }
    }

    fn list_mut(&mut self, id: NodeId) -> Result<&mut ListValue> {
        match &mut self.node_mut(id)?.value {
            Value::List(list) => Ok(list),
            other => Err(Error::IncompatibleType {
                expected: TagKind::List,
                actual: other.kind(),
            }),
        }
    }

    #[inline]
    pub fn element_kind(&self, list: NodeId) -> Result<Option<TagKind>> {
        Ok(self.list(list)?.kind)
    }

    #[inline]
    pub fn list_len(&self, list: NodeId) -> Result<usize> {
        Ok(self.list(list)?.items.len())
    }

    #[inline]
    pub fn get_at(&self, list: NodeId, index: usize) -> Result<Option<NodeId>> {
        Ok(self.list(list)?.get(index))
    }

    /// Position of `child` in `list`, by identity.
    pub fn index_of(&self, list: NodeId, child: NodeId) -> Result<Option<usize>> {
        Ok(self.list(list)?.items.iter().position(|item| *item == child))
    }

    /// Validates `child` for `list`. A list whose
    /// element kind is unset adopts it; a different kind is rejected.
    fn adopt(&mut self, list: NodeId, child: NodeId) -> Result<()> {
        self.list(list)?;
        self.check_attachable(list, child)?;
        let kind = self.kind(child)?;
        let list_value = self.list_mut(list)?;
        match list_value.kind {
            Some(expected) if expected != kind => Err(Error::IncompatibleType {
                expected,
                actual: kind,
            }),
            _ => {
                list_value.kind = Some(kind);
                Ok(())
            }
        }
    }

    fn link_element(&mut self, list: NodeId, child: NodeId) -> Result<()> {
        let node = self.node_mut(child)?;
        node.parent = Some(list);
        node.name.clear();
        Ok(())
    }

    /// Appends a detached `child`. List elements lose their name.
    pub fn add(&mut self, list: NodeId, child: NodeId) -> Result<()> {
        self.adopt(list, child)?;
        self.list_mut(list)?.items.push(child);
        self.link_element(list, child)
    }

    /// Inserts a detached `child` at `index`, shifting later elements right.
    /// `index` may equal the length.
    pub fn insert(&mut self, list: NodeId, index: usize, child: NodeId) -> Result<()> {
        let len = self.list_len(list)?;
        if index > len {
            return Err(out_of_bounds(index, len));
        }
        self.adopt(list, child)?;
        self.list_mut(list)?.items.insert(index, child);
        self.link_element(list, child)
    }

    /// Replaces the element at `index`, returning the old one detached.
    pub fn set(&mut self, list: NodeId, index: usize, child: NodeId) -> Result<NodeId> {
        let len = self.list_len(list)?;
        if index >= len {
            return Err(out_of_bounds(index, len));
        }
        self.adopt(list, child)?;
        let previous = std::mem::replace(&mut self.list_mut(list)?.items[index], child);
        self.node_mut(previous)?.parent = None;
        self.link_element(list, child)?;
        Ok(previous)
    }

    /// Unlinks the element at `index`, returning it detached. Removing the
    /// last element resets the element kind.
    pub fn remove_at(&mut self, list: NodeId, index: usize) -> Result<NodeId> {
        let list_value = self.list_mut(list)?;
        let len = list_value.items.len();
        if index >= len {
            return Err(out_of_bounds(index, len));
        }
        let removed = list_value.items.remove(index);
        if list_value.items.is_empty() {
            list_value.kind = None;
        }
        self.node_mut(removed)?.parent = None;
        Ok(removed)
    }

    /// Creates an element from `value` and appends it.
    pub fn add_value(&mut self, list: NodeId, value: Value) -> Result<NodeId> {
        self.list(list)?;
        let child = self.create("", value);
        if let Err(error) = self.add(list, child) {
            self.free(child)?;
            return Err(error);
        }
        Ok(child)
    }
}
