use crate::{Error, NodeId, ResolveOptions, Result, RmOptions, Session, TagKind, Target};

/// What deleting one path did to the session.
enum Removed {
    Tag,
    Root,
}

impl Session {
    /// Deletes the tag (or array element) at each path.
    ///
    /// Non-empty compounds are kept unless `recursive`. Deleting the root
    /// empties the tree and ends the command. When the cursor or one of its
    /// ancestors goes, the cursor moves up to the closest survivor. With
    /// `force`, failing paths are skipped, though a consistency failure
    /// still aborts.
    ///
    /// # Example
    ///
    /// ```
    /// use nbted::{RmOptions, Session, read_snbt};
    ///
    /// let mut session = Session::new(read_snbt("{a: {b: {c: 1}}, d: [1, 2]}").unwrap());
    /// session.cd("a/b").unwrap();
    /// session.rm(&["/a", "/d[0]"], &RmOptions { recursive: true, force: false }).unwrap();
    /// assert_eq!(session.pwd().unwrap(), "/");
    /// assert!(session.is_dirty());
    /// ```
    pub fn rm<S: AsRef<str>>(&mut self, paths: &[S], options: &RmOptions) -> Result<()> {
        if paths.is_empty() {
            return Err(Error::BadUsage(String::from("missing argument")));
        }
        // innermost first: the cursor, then its parents up to the root
        let mut context = match self.cursor {
            Some(cursor) => self.tree.ancestors(cursor)?,
            None => Vec::new(),
        };
        for path in paths {
            let path = path.as_ref();
            match self.remove_one(path, options, &mut context) {
                Ok(Removed::Root) => break,
                Ok(Removed::Tag) => {}
                Err(error @ Error::Consistency(_)) => return Err(error),
                Err(error) if options.force => {
                    log::debug!("skipping {path}: {error}");
                }
                Err(error) => return Err(error),
            }
        }
        Ok(())
    }

    fn remove_one(
        &mut self,
        path: &str,
        options: &RmOptions,
        context: &mut Vec<NodeId>,
    ) -> Result<Removed> {
        let resolved = self.resolve(path, &ResolveOptions::default())?;
        let id = match resolved.leaf {
            Some(Target::Node(id)) => id,
            Some(Target::Element { array, index }) => {
                self.tree.array_remove(array, index)?;
                self.dirty = true;
                return Ok(Removed::Tag);
            }
            None => return Err(Error::TagNotFound(format!("{path} does not exist"))),
        };
        if !options.recursive && self.tree.kind(id)? == TagKind::Compound {
            let compound = self.tree.compound(id)?;
            if !compound.is_empty() {
                return Err(Error::WontOverwrite(format!(
                    "refusing to delete non-empty compound {}, delete recursively to override",
                    self.tree.path_of(id)?
                )));
            }
        }
        if self.tree.parent(id)?.is_none() {
            if self.tree.root() != Some(id) {
                return Err(Error::consistency("tag has no parent but isn't the root"));
            }
            self.tree.clear();
            self.cursor = None;
            context.clear();
            self.dirty = true;
            return Ok(Removed::Root);
        }

        self.tree.delete(id)?;
        self.dirty = true;
        if let Some(position) = context.iter().position(|node| *node == id) {
            log::debug!("deleted a parent of the cursor, walking up to the closest survivor");
            context.drain(..=position);
            self.cursor = context.first().copied();
        }
        Ok(Removed::Tag)
    }
}
