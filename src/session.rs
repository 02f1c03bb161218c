//! Editing commands over a loaded document.
//!
//! A [`Session`] owns the [`Tree`], a cursor that relative paths start from
//! and a dirty flag raised by every successful mutation. Node ids obtained
//! from one command should not be kept across commands, since deletions
//! invalidate them.

use serde::{Deserialize, Serialize};

use crate::{
    Error, NodeId, ResolveOptions, ResolvedPath, Result, TagKind, Target, Tree, resolve_path,
};

mod parse;
mod rm;
mod set;

/// The kind requested by `set`: a real tag kind, or the `uuid` convenience
/// that expands into a `Most`/`Least` pair of longs.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SetKind {
    Tag(TagKind),
    Uuid,
}

impl SetKind {
    /// Accepts every type name plus `uuid`.
    pub fn from_name(name: &str) -> Result<Self> {
        if name == "uuid" {
            return Ok(SetKind::Uuid);
        }
        TagKind::from_type_name(name)
            .map(SetKind::Tag)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }
}

impl From<TagKind> for SetKind {
    fn from(kind: TagKind) -> Self {
        SetKind::Tag(kind)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SetOptions {
    /// Fail with [`Error::WontOverwrite`] instead of replacing a tag.
    pub no_overwrite: bool,
    /// Insert into lists instead of overwriting, and append into an
    /// existing list or array leaf.
    pub shift: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RmOptions {
    /// Also delete non-empty compounds.
    pub recursive: bool,
    /// Skip paths that fail and keep going.
    pub force: bool,
}

#[derive(Debug, Default)]
pub struct Session {
    tree: Tree,
    cursor: Option<NodeId>,
    dirty: bool,
}

impl Session {
    /// Starts a clean session with the cursor on the root.
    pub fn new(tree: Tree) -> Self {
        let cursor = tree.root();
        Self {
            tree,
            cursor,
            dirty: false,
        }
    }

    #[inline]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    #[inline]
    pub fn into_tree(self) -> Tree {
        self.tree
    }

    #[inline]
    pub fn cursor(&self) -> Option<NodeId> {
        self.cursor
    }

    /// Whether the tree changed since the session started or since the last
    /// [`mark_clean`](Self::mark_clean).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Call after the tree was saved.
    #[inline]
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Canonical path of the cursor, `(empty)` when there is no tree.
    pub fn pwd(&self) -> Result<String> {
        self.tree.describe(self.cursor)
    }

    /// Moves a cursor whose node was freed to the first surviving candidate.
    fn repair_cursor(&mut self, candidates: &[Option<NodeId>]) {
        if self.cursor.is_some_and(|cursor| !self.tree.contains_node(cursor)) {
            self.cursor = candidates
                .iter()
                .flatten()
                .copied()
                .find(|id| self.tree.contains_node(*id));
            log::debug!("cursor was deleted, moved to {}", self.pwd().unwrap_or_default());
        }
    }

    /// Resolves `path` against the cursor.
    pub fn resolve(&mut self, path: &str, options: &ResolveOptions) -> Result<ResolvedPath> {
        resolve_path(&mut self.tree, self.cursor, path, options)
    }

    /// Moves the cursor to the container at `path`.
    ///
    /// # Example
    ///
    /// ```
    /// use nbted::{Session, read_snbt};
    ///
    /// let mut session = Session::new(read_snbt("{a: {b: [{}]}}").unwrap());
    /// session.cd("a/b[0]").unwrap();
    /// assert_eq!(session.pwd().unwrap(), "/a/b[0]");
    /// session.cd("../..").unwrap();
    /// assert_eq!(session.pwd().unwrap(), "/a");
    /// ```
    pub fn cd(&mut self, path: &str) -> Result<()> {
        let resolved = self.resolve(path, &ResolveOptions::parents_only())?;
        match resolved.leaf {
            Some(Target::Node(id)) => {
                self.cursor = Some(id);
                Ok(())
            }
            _ => Err(Error::TagNotFound(format!("{path} is not a container"))),
        }
    }

    /// Creates an empty compound at each path that does not exist yet,
    /// synthesizing missing parents along the way.
    pub fn mkdir<S: AsRef<str>>(&mut self, paths: &[S]) -> Result<()> {
        if paths.is_empty() {
            return Err(Error::BadUsage(String::from("missing argument")));
        }
        for path in paths {
            let path = path.as_ref();
            let resolved = self.resolve(path, &ResolveOptions::allow_missing())?;
            match resolved.leaf {
                None => self.set(
                    path,
                    "",
                    Some(SetKind::Tag(TagKind::Compound)),
                    &SetOptions::default(),
                )?,
                Some(Target::Node(id)) if self.tree.kind(id)? == TagKind::Compound => {}
                Some(_) => {
                    return Err(Error::WontOverwrite(format!(
                        "{path} already exists and is not a compound"
                    )));
                }
            }
        }
        Ok(())
    }
}
