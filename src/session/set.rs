use crate::{
    Error, LEAST_SUFFIX, MOST_SUFFIX, NodeId, ResolveOptions, Result, Session, SetKind,
    SetOptions, TagKind, Target, Tree, Value, parse_uuid, uuid_to_halves,
};

use super::parse::{assign, new_value, parse_leaf};

const SET_RESOLVE: ResolveOptions = ResolveOptions {
    allow_missing: false,
    parents_only: false,
    create_missing_parents: true,
    soft_out_of_bounds: true,
};

fn no_kind() -> Error {
    Error::BadUsage(String::from(
        "an explicit type must be specified to create new tags",
    ))
}

/// Element kind of a list or array, `None` for an untyped list.
fn element_kind(tree: &Tree, id: NodeId) -> Result<Option<TagKind>> {
    match tree.kind(id)? {
        TagKind::List => tree.element_kind(id),
        kind => Ok(kind.array_element()),
    }
}

fn is_indexed(kind: TagKind) -> bool {
    kind == TagKind::List || kind.is_array()
}

impl Session {
    /// Writes `raw` at `path`.
    ///
    /// - An existing tag is overwritten in place unless `no_overwrite`. With
    ///   `shift`, an existing list or array is appended into instead.
    /// - A missing compound entry is created with `kind`, which is required.
    /// - Under a list or array, an index equal to the length appends, a
    ///   smaller one overwrites (or inserts, with `shift`). The element kind
    ///   is used when `kind` is omitted.
    /// - On an empty tree the new tag becomes the root and the cursor.
    ///
    /// Without a kind, setting a missing `x` where `xMost` and `xLeast` are
    /// longs is taken as a UUID.
    ///
    /// # Example
    ///
    /// ```
    /// use nbted::{Session, SetOptions, TagKind, read_snbt, tree_to_snbt, SnbtOptions};
    ///
    /// let mut session = Session::new(read_snbt("{list: [1, 2]}").unwrap());
    /// let options = SetOptions::default();
    /// session.set("a/b", "0x10", Some(TagKind::Short.into()), &options).unwrap();
    /// session.set("list[2]", "3", None, &options).unwrap();
    /// let text = tree_to_snbt(session.tree(), &SnbtOptions::default()).unwrap();
    /// assert_eq!(text, "{list: [1, 2, 3], a: {b: 16s}}");
    /// ```
    pub fn set(
        &mut self,
        path: &str,
        raw: &str,
        kind: Option<SetKind>,
        options: &SetOptions,
    ) -> Result<()> {
        if self.tree.is_empty() {
            return self.set_root(path, raw, kind);
        }
        let base = path.trim_end_matches('/');
        let resolved = self.resolve(path, &SET_RESOLVE)?;

        let kind = match kind {
            None if resolved.leaf.is_none() && self.has_uuid_halves(base) => Some(SetKind::Uuid),
            kind => kind,
        };
        let kind = match kind {
            Some(SetKind::Uuid) => return self.set_uuid(base, raw),
            Some(SetKind::Tag(kind)) => Some(kind),
            None => None,
        };

        let parent = resolved.immediate_parent;
        let parent_indexed = match parent {
            Some(parent) => is_indexed(self.tree.kind(parent)?),
            None => false,
        };
        match (resolved.leaf, parent) {
            (Some(Target::Node(leaf)), _) if !parent_indexed => {
                if options.no_overwrite {
                    return Err(Error::WontOverwrite(format!(
                        "refusing to overwrite existing tag {}",
                        self.tree.path_of(leaf)?
                    )));
                }
                if options.shift && is_indexed(self.tree.kind(leaf)?) {
                    self.append_into(leaf, raw, kind)?;
                } else {
                    let actual = self.tree.kind(leaf)?;
                    if let Some(expected) = kind.filter(|kind| *kind != actual) {
                        return Err(Error::IncompatibleType {
                            expected: actual,
                            actual: expected,
                        });
                    }
                    assign(&mut self.tree, leaf, raw)?;
                }
            }
            (_, Some(parent)) => {
                let text = resolved
                    .segment
                    .as_ref()
                    .and_then(|segment| segment.text())
                    .ok_or_else(|| Error::BadUsage(format!("nothing to create at {path}")))?
                    .to_string();
                if parent_indexed {
                    self.set_element(parent, &text, raw, kind, options)?;
                } else {
                    let kind = kind.ok_or_else(no_kind)?;
                    let child = self.tree.create(text, new_value(kind, raw)?);
                    if let Some(previous) = self.tree.put(parent, child)? {
                        self.tree.free(previous)?;
                    }
                }
            }
            _ => return Err(Error::TagNotFound(format!("failed to resolve {path}"))),
        }
        let leaf = match resolved.leaf {
            Some(Target::Node(id)) => Some(id),
            _ => None,
        };
        self.repair_cursor(&[leaf, parent]);
        self.dirty = true;
        Ok(())
    }

    fn set_root(&mut self, path: &str, raw: &str, kind: Option<SetKind>) -> Result<()> {
        let kind = match kind {
            Some(SetKind::Uuid) => {
                return Err(Error::BadUsage(String::from(
                    "UUIDs are two tags and cannot be the root of a file",
                )));
            }
            Some(SetKind::Tag(kind)) => kind,
            None => return Err(no_kind()),
        };
        let root = self
            .tree
            .create(path.trim_matches('/'), new_value(kind, raw)?);
        self.tree.set_root(root)?;
        self.cursor = Some(root);
        self.dirty = true;
        Ok(())
    }

    fn has_uuid_halves(&mut self, base: &str) -> bool {
        [MOST_SUFFIX, LEAST_SUFFIX].iter().all(|suffix| {
            let half = format!("{base}{suffix}");
            match self.resolve(&half, &ResolveOptions::allow_missing()) {
                Ok(resolved) => match resolved.leaf {
                    Some(Target::Node(id)) => {
                        matches!(self.tree.kind(id), Ok(TagKind::Long))
                    }
                    _ => false,
                },
                Err(_) => false,
            }
        })
    }

    fn set_uuid(&mut self, base: &str, raw: &str) -> Result<()> {
        let (most, least) = uuid_to_halves(parse_uuid(raw)?);
        let long = Some(SetKind::Tag(TagKind::Long));
        let options = SetOptions::default();
        self.set(&format!("{base}{MOST_SUFFIX}"), &most.to_string(), long, &options)?;
        self.set(&format!("{base}{LEAST_SUFFIX}"), &least.to_string(), long, &options)
    }

    /// Appends `raw` as a new element of the list or array `target`.
    fn append_into(&mut self, target: NodeId, raw: &str, kind: Option<TagKind>) -> Result<()> {
        let element = match (element_kind(&self.tree, target)?, kind) {
            (Some(expected), Some(actual)) if expected != actual => {
                return Err(Error::IncompatibleType { expected, actual });
            }
            (Some(element), _) | (None, Some(element)) => element,
            (None, None) => {
                return Err(Error::BadUsage(String::from(
                    "an explicit type must be specified to add an initial tag to a list",
                )));
            }
        };
        if self.tree.kind(target)? == TagKind::List {
            let child = self.tree.create("", new_value(element, raw)?);
            self.attach_element(target, child, |tree, child| tree.add(target, child))
        } else {
            let value = element_value(element, raw)?;
            self.tree.array_push(target, value)
        }
    }

    fn set_element(
        &mut self,
        parent: NodeId,
        text: &str,
        raw: &str,
        kind: Option<TagKind>,
        options: &SetOptions,
    ) -> Result<()> {
        let is_list = self.tree.kind(parent)? == TagKind::List;
        let kind = kind
            .or(element_kind(&self.tree, parent)?)
            .ok_or_else(no_kind)?;
        let index: usize = text
            .parse()
            .map_err(|_| Error::TagNotFound(format!("{text} is not a valid list index")))?;
        let len = if is_list {
            self.tree.list_len(parent)?
        } else {
            self.tree.array_len(parent)?
        };
        if index > len {
            return Err(Error::TagNotFound(format!("{index} is out of bounds")));
        }
        let overwrite = index < len && !options.shift;
        if overwrite && options.no_overwrite {
            return Err(Error::WontOverwrite(format!(
                "refusing to overwrite element {index} of {}",
                self.tree.path_of(parent)?
            )));
        }

        if !is_list {
            let value = element_value(kind, raw)?;
            if overwrite {
                self.tree.array_set(parent, index, value)?;
            } else {
                self.tree.array_insert(parent, index, value)?;
            }
            return Ok(());
        }
        let child = self.tree.create("", new_value(kind, raw)?);
        if overwrite {
            self.attach_element(parent, child, |tree, child| {
                let previous = tree.set(parent, index, child)?;
                tree.free(previous)
            })
        } else {
            self.attach_element(parent, child, |tree, child| tree.insert(parent, index, child))
        }
    }

    /// Runs `attach` for a freshly created `child`, releasing it when the
    /// list refuses it.
    fn attach_element(
        &mut self,
        list: NodeId,
        child: NodeId,
        attach: impl FnOnce(&mut Tree, NodeId) -> Result<()>,
    ) -> Result<()> {
        if let Err(error) = attach(&mut self.tree, child) {
            if self.tree.parent(child)? != Some(list) {
                self.tree.free(child)?;
            }
            return Err(error);
        }
        Ok(())
    }
}

/// A scalar for a typed array slot.
fn element_value(kind: TagKind, raw: &str) -> Result<Value> {
    parse_leaf(kind, raw)?.ok_or_else(|| {
        Error::BadUsage(format!("tags of type {kind} cannot be array elements"))
    })
}
