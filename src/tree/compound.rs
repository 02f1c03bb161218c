use crate::{CompoundValue, Error, NodeId, Result, TagKind, Tree, Value};

impl Tree {
    /// The compound payload of `id`.
    pub fn compound(&self, id: NodeId) -> Result<&CompoundValue> {
        match &self.node(id)?.value {
            Value::Compound(compound) => Ok(compound),
            other => Err(Error::IncompatibleType {
                expected: TagKind::Compound,
                actual: other.kind(),
            }),
        }
    }

    fn compound_mut(&mut self, id: NodeId) -> Result<&mut CompoundValue> {
        match &mut self.node_mut(id)?.value {
            Value::Compound(compound) => Ok(compound),
            other => Err(Error::IncompatibleType {
                expected: TagKind::Compound,
                actual: other.kind(),
            }),
        }
    }

    /// Links a detached `child` into `compound` under the child's own name.
    ///
    /// An existing entry of that name keeps its position, is replaced and
    /// returned detached (still allocated).
    pub fn put(&mut self, compound: NodeId, child: NodeId) -> Result<Option<NodeId>> {
        self.compound(compound)?;
        self.check_attachable(compound, child)?;
        let name = self.node(child)?.name.clone();
        let previous = self.compound_mut(compound)?.entries.insert(name, child);
        if let Some(previous) = previous {
            self.node_mut(previous)?.parent = None;
        }
        self.node_mut(child)?.parent = Some(compound);
        Ok(previous)
    }

    #[inline]
    pub fn get(&self, compound: NodeId, name: &str) -> Result<Option<NodeId>> {
        Ok(self.compound(compound)?.get(name))
    }

    #[inline]
    pub fn contains(&self, compound: NodeId, name: &str) -> Result<bool> {
        Ok(self.compound(compound)?.contains(name))
    }

    /// Unlinks the entry `name`, returning it detached.
    pub fn remove(&mut self, compound: NodeId, name: &str) -> Result<Option<NodeId>> {
        let removed = self.compound_mut(compound)?.entries.shift_remove(name);
        if let Some(removed) = removed {
            self.node_mut(removed)?.parent = None;
        }
        Ok(removed)
    }

    /// Entries of a compound in insertion order.
    pub fn entries(&self, compound: NodeId) -> Result<Vec<(&str, NodeId)>> {
        Ok(self.compound(compound)?.iter().collect())
    }

    /// Creates a child from `value` and puts it under `name`, freeing any
    /// entry it replaces.
    pub fn put_value(
        &mut self,
        compound: NodeId,
        name: impl Into<String>,
        value: Value,
    ) -> Result<NodeId> {
        self.compound(compound)?;
        let child = self.create(name, value);
        if let Some(previous) = self.put(compound, child)? {
            self.free(previous)?;
        }
        Ok(child)
    }
}
