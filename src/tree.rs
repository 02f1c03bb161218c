//! The arena-backed tag tree.
//!
//! Every tag lives in a slot of a [`Tree`] and is addressed by a [`NodeId`].
//! Nodes know their name and their parent, containers own their children as
//! ids, and the tree has at most one root. Detached nodes (created but not yet
//! linked anywhere) are allowed and can be attached exactly once.

use crate::{Error, Result, TagKind};

mod array;
mod compound;
mod list;
mod value;

pub use value::*;

/// A handle to a node of a [`Tree`].
///
/// Ids carry a generation: once a node is freed, stale ids are rejected with
/// [`Error::Consistency`] instead of aliasing whatever reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

/// What a path or a cursor can point at: a tag, or one element of a typed
/// array (array elements are values, not nodes).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Target {
    Node(NodeId),
    Element { array: NodeId, index: usize },
}

#[derive(Debug)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) value: Value,
}

impl Node {
    /// The entry name. Always `""` for list elements.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[inline]
    pub fn kind(&self) -> TagKind {
        self.value.kind()
    }
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A document: an arena of nodes plus an optional root.
///
/// # Example
///
/// ```
/// use nbted::{Tree, Value};
///
/// let mut tree = Tree::new();
/// let root = tree.create("", Value::compound());
/// tree.set_root(root).unwrap();
/// let level = tree.create("Level", Value::Int(3));
/// tree.put(root, level).unwrap();
///
/// assert_eq!(tree.path_of(level).unwrap(), "/Level");
/// ```
#[derive(Debug, Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: Option<NodeId>,
    live: usize,
}

impl Tree {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns `true` when the tree has no root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of live nodes, detached ones included.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.live
    }

    /// Drops every node, leaving an empty tree. Ids handed out before stay
    /// stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.root = None;
        self.live = 0;
    }

    /// Allocates a detached node.
    pub fn create(&mut self, name: impl Into<String>, value: Value) -> NodeId {
        let node = Node {
            name: name.into(),
            parent: None,
            value,
        };
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    /// Makes a detached node the root. A previous root is freed.
    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        self.check_detached(id)?;
        if let Some(old) = self.root.take() {
            self.free_subtree(old);
        }
        self.root = Some(id);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
            .ok_or_else(|| Error::consistency(format!("stale node id {}", id.index)))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .ok_or_else(|| Error::consistency(format!("stale node id {}", id.index)))
    }

    #[inline]
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> Result<TagKind> {
        Ok(self.node(id)?.kind())
    }

    #[inline]
    pub fn value(&self, id: NodeId) -> Result<&Value> {
        Ok(&self.node(id)?.value)
    }

    #[inline]
    pub fn name(&self, id: NodeId) -> Result<&str> {
        Ok(&self.node(id)?.name)
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Replaces a leaf value in place. The new value must be of the same kind.
    pub fn replace_value(&mut self, id: NodeId, value: Value) -> Result<Value> {
        let node = self.node_mut(id)?;
        let actual = value.kind();
        let expected = node.value.kind();
        if actual != expected {
            return Err(Error::IncompatibleType { expected, actual });
        }
        if expected.is_composite() {
            return Err(Error::consistency(
                "container values are changed through their children",
            ));
        }
        Ok(std::mem::replace(&mut node.value, value))
    }

    /// Empties a container: frees every child of a list or compound and
    /// truncates a typed array. A list also forgets its element kind.
    pub fn clear_children(&mut self, id: NodeId) -> Result<()> {
        let children = self.children(id)?;
        match &mut self.node_mut(id)?.value {
            Value::List(list) => {
                list.items.clear();
                list.kind = None;
            }
            Value::Compound(compound) => compound.entries.clear(),
            Value::ByteArray(values) => values.clear(),
            Value::IntArray(values) => values.clear(),
            Value::LongArray(values) => values.clear(),
            other => {
                return Err(Error::BadUsage(format!(
                    "{} has no children",
                    other.kind()
                )));
            }
        }
        for child in children {
            self.free_subtree(child);
        }
        Ok(())
    }

    /// Child nodes of a list or compound, in order. Empty for leaves.
    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(match &self.node(id)?.value {
            Value::List(list) => list.items.clone(),
            Value::Compound(compound) => compound.entries.values().copied().collect(),
            _ => Vec::new(),
        })
    }

    /// The node and its ancestors, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = vec![id];
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            if chain.len() > self.live {
                return Err(Error::consistency("parent chain is cyclic"));
            }
            chain.push(parent);
            current = self.node(parent)?.parent;
        }
        Ok(chain)
    }

    /// Returns `true` if `ancestor` is `id` or one of its parents.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> Result<bool> {
        Ok(self.ancestors(id)?.contains(&ancestor))
    }

    /// Unlinks a node from its parent, or from the root slot. The node stays
    /// allocated and can be attached elsewhere.
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent;
        match parent {
            Some(parent) => {
                match &mut self.node_mut(parent)?.value {
                    Value::Compound(compound) => {
                        let name = compound
                            .entries
                            .iter()
                            .find(|(_, child)| **child == id)
                            .map(|(name, _)| name.clone())
                            .ok_or_else(|| {
                                Error::consistency("node missing from its parent compound")
                            })?;
                        compound.entries.shift_remove(&name);
                    }
                    Value::List(list) => {
                        let index = list
                            .items
                            .iter()
                            .position(|child| *child == id)
                            .ok_or_else(|| Error::consistency("node missing from its parent list"))?;
                        list.items.remove(index);
                        if list.items.is_empty() {
                            list.kind = None;
                        }
                    }
                    _ => return Err(Error::consistency("parent is not a container")),
                }
                self.node_mut(id)?.parent = None;
            }
            None if self.root == Some(id) => self.root = None,
            None => {}
        }
        Ok(())
    }

    /// Frees a detached subtree.
    pub fn free(&mut self, id: NodeId) -> Result<()> {
        self.check_detached(id)?;
        self.free_subtree(id);
        Ok(())
    }

    /// Detaches then frees a subtree.
    pub fn delete(&mut self, id: NodeId) -> Result<()> {
        self.detach(id)?;
        self.free_subtree(id);
        Ok(())
    }

    fn free_subtree(&mut self, id: NodeId) {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            let Some(slot) = self
                .slots
                .get_mut(id.index as usize)
                .filter(|slot| slot.generation == id.generation)
            else {
                continue;
            };
            let Some(node) = slot.node.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index);
            self.live -= 1;
            match node.value {
                Value::List(list) => pending.extend(list.items),
                Value::Compound(compound) => pending.extend(compound.entries.into_values()),
                _ => {}
            }
        }
    }

    /// A node may be attached only if it is live, has no parent and is not
    /// the root.
    fn check_detached(&self, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        if node.parent.is_some() || self.root == Some(id) {
            return Err(Error::consistency(format!(
                "tag '{}' is already attached to a tree",
                node.name
            )));
        }
        Ok(())
    }

    /// Checks that `child` can be linked beneath `parent`.
    pub(crate) fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_detached(child)?;
        if self.is_ancestor_or_self(child, parent)? {
            return Err(Error::consistency("cannot attach a tag beneath itself"));
        }
        Ok(())
    }

    /// The canonical path of a node: `/` for the root, `/a/b[2]` below it
    /// (`/[2]` for elements of a root list).
    /// Detached subtrees render relative to their top without the leading `/`
    /// and the empty tree renders as `(empty)`.
    pub fn path_of(&self, id: NodeId) -> Result<String> {
        let chain = self.ancestors(id)?;
        let mut path = String::new();
        for pair in chain.windows(2).rev() {
            let (child, parent) = (pair[0], pair[1]);
            match &self.node(parent)?.value {
                Value::List(list) => {
                    let index = list
                        .items
                        .iter()
                        .position(|item| *item == child)
                        .ok_or_else(|| Error::consistency("node missing from its parent list"))?;
                    path.push_str(&format!("[{index}]"));
                }
                _ => {
                    path.push('/');
                    path.push_str(&self.node(child)?.name);
                }
            }
        }
        let top = chain[chain.len() - 1];
        if self.root == Some(top) {
            if !path.starts_with('/') {
                path.insert(0, '/');
            }
        } else if let Some(stripped) = path.strip_prefix('/') {
            path = stripped.to_string();
        }
        Ok(path)
    }

    /// Canonical path of a [`Target`]; array elements render as `array[i]`.
    pub fn target_path(&self, target: Target) -> Result<String> {
        match target {
            Target::Node(id) => self.path_of(id),
            Target::Element { array, index } => {
                let mut path = self.path_of(array)?;
                path.push_str(&format!("[{index}]"));
                Ok(path)
            }
        }
    }

    /// Display path of an optional cursor.
    pub fn describe(&self, id: Option<NodeId>) -> Result<String> {
        match id {
            Some(id) => self.path_of(id),
            None => Ok(String::from("(empty)")),
        }
    }

    /// Verifies parent links, list homogeneity and name rules of the whole
    /// tree, and that no live tag other than the root lacks a parent.
    pub fn check(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.live > 0 {
                return Err(Error::consistency(format!(
                    "{} tags exist without a root",
                    self.live
                )));
            }
            return Ok(());
        };
        if self.node(root)?.parent.is_some() {
            return Err(Error::consistency("root has a parent"));
        }
        let mut pending = vec![root];
        let mut seen = 0usize;
        while let Some(id) = pending.pop() {
            seen += 1;
            if seen > self.live {
                return Err(Error::consistency("tree contains a cycle"));
            }
            match &self.node(id)?.value {
                Value::List(list) => {
                    if list.items.is_empty() {
                        continue;
                    }
                    let Some(kind) = list.kind else {
                        return Err(Error::consistency("non-empty list has no element kind"));
                    };
                    for child in &list.items {
                        let node = self.node(*child)?;
                        if node.parent != Some(id) {
                            return Err(Error::consistency("list element has a wrong parent"));
                        }
                        if !node.name.is_empty() {
                            return Err(Error::consistency("list element has a name"));
                        }
                        if node.kind() != kind {
                            return Err(Error::IncompatibleType {
                                expected: kind,
                                actual: node.kind(),
                            });
                        }
                        pending.push(*child);
                    }
                }
                Value::Compound(compound) => {
                    for (name, child) in &compound.entries {
                        let node = self.node(*child)?;
                        if node.parent != Some(id) {
                            return Err(Error::consistency("compound entry has a wrong parent"));
                        }
                        if node.name != *name {
                            return Err(Error::consistency(format!(
                                "compound entry '{name}' is named '{}'",
                                node.name
                            )));
                        }
                        pending.push(*child);
                    }
                }
                _ => {}
            }
        }
        if seen != self.live {
            return Err(Error::consistency(format!(
                "{} tags are detached from the tree",
                self.live - seen
            )));
        }
        Ok(())
    }

    /// Structural equality of two subtrees, possibly from different trees.
    /// Names of the two tops are ignored; compounds compare by key.
    pub fn subtree_eq(&self, a: NodeId, other: &Tree, b: NodeId) -> bool {
        let (Ok(left), Ok(right)) = (self.node(a), other.node(b)) else {
            return false;
        };
        match (&left.value, &right.value) {
            (Value::List(l), Value::List(r)) => {
                l.kind == r.kind
                    && l.items.len() == r.items.len()
                    && l.items
                        .iter()
                        .zip(&r.items)
                        .all(|(x, y)| self.subtree_eq(*x, other, *y))
            }
            (Value::Compound(l), Value::Compound(r)) => {
                l.entries.len() == r.entries.len()
                    && l.entries.iter().all(|(name, x)| {
                        r.entries
                            .get(name)
                            .is_some_and(|y| self.subtree_eq(*x, other, *y))
                    })
            }
            (l, r) => l.leaf_eq(r),
        }
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        match (self.root, other.root) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                let same_name = matches!(
                    (self.node(a), other.node(b)),
                    (Ok(l), Ok(r)) if l.name == r.name
                );
                same_name && self.subtree_eq(a, other, b)
            }
            _ => false,
        }
    }
}
