//! Filesystem-like addressing of tags.
//!
//! Paths are `/`-delimited. A leading `/` starts at the root, anything else
//! at the cursor. `.` anchors the immediate parent without moving, `..` goes
//! up one level, names look up compound keys and `[n]` (fused as `foo[2]` or
//! separate as `foo/[2]`) indexes lists and arrays.

use serde::{Deserialize, Serialize};

use crate::{Error, NodeId, Result, Target, TagKind, Tree, Value};

mod segment;

pub use segment::*;

/// Independently toggled resolution policies.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Turn "not found" failures into a result with no leaf.
    pub allow_missing: bool,
    /// Fail unless the final target is a list, compound or array.
    pub parents_only: bool,
    /// Create empty compounds for missing intermediate keys. The final
    /// segment is never created.
    pub create_missing_parents: bool,
    /// An index past the end of a list or array yields no leaf instead of
    /// failing.
    pub soft_out_of_bounds: bool,
}

impl ResolveOptions {
    pub const fn allow_missing() -> Self {
        Self {
            allow_missing: true,
            parents_only: false,
            create_missing_parents: false,
            soft_out_of_bounds: false,
        }
    }

    pub const fn parents_only() -> Self {
        Self {
            allow_missing: false,
            parents_only: true,
            create_missing_parents: false,
            soft_out_of_bounds: false,
        }
    }
}

/// Outcome of a resolution.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ResolvedPath {
    /// The container the last segment was looked up in.
    pub immediate_parent: Option<NodeId>,
    /// The addressed tag or array element; `None` when absent.
    pub leaf: Option<Target>,
    /// The path consumed before the last segment.
    pub parent_path: String,
    /// Canonical path of the leaf, when present.
    pub canonical_path: Option<String>,
    /// The last segment consumed, i.e. what to create when the leaf is
    /// absent.
    pub segment: Option<PathSegment>,
}

struct Walk {
    absolute: bool,
    immediate_parent: Option<NodeId>,
    parent_path: String,
    segment: Option<PathSegment>,
}

impl Walk {
    fn missing(self) -> ResolvedPath {
        ResolvedPath {
            immediate_parent: self.immediate_parent,
            leaf: None,
            parent_path: self.parent_path,
            canonical_path: None,
            segment: self.segment,
        }
    }
}

fn describe(tree: &Tree, target: Option<Target>) -> Result<String> {
    Ok(match target {
        None => String::from("nothing"),
        Some(Target::Node(id)) => tree.kind(id)?.to_string(),
        Some(Target::Element { array, .. }) => tree
            .kind(array)?
            .array_element()
            .map_or_else(|| String::from("element"), |kind| kind.to_string()),
    })
}

fn container(tree: &Tree, target: Option<Target>) -> Result<Option<(NodeId, TagKind)>> {
    match target {
        Some(Target::Node(id)) => {
            let kind = tree.kind(id)?;
            Ok(kind.is_container().then_some((id, kind)))
        }
        _ => Ok(None),
    }
}

/// Walks the segments. `Ok(None)` means the leaf is legitimately absent
/// (soft out of bounds, or a final missing key under `create_missing_parents`).
fn walk(
    tree: &mut Tree,
    state: &mut Walk,
    mut current: Option<Target>,
    segments: &[PathSegment],
    options: &ResolveOptions,
) -> Result<Option<Target>> {
    for (i, segment) in segments.iter().enumerate() {
        let is_last = i + 1 == segments.len();
        state.segment = Some(segment.clone());
        state.parent_path = render_segments(state.absolute, &segments[..i]);
        match segment {
            PathSegment::Current => {
                if let Some((id, _)) = container(tree, current)? {
                    state.immediate_parent = Some(id);
                }
            }
            PathSegment::Parent => {
                let parent = match current {
                    None => {
                        return Err(Error::TagNotFound(String::from(
                            "cannot traverse above nothing",
                        )));
                    }
                    Some(Target::Element { array, .. }) => array,
                    Some(Target::Node(id)) => tree.parent(id)?.ok_or_else(|| {
                        Error::TagNotFound(String::from("cannot traverse above root"))
                    })?,
                };
                current = Some(Target::Node(parent));
                state.immediate_parent = tree.parent(parent)?;
            }
            PathSegment::Key(text) | PathSegment::Index(text) => {
                let Some((id, kind)) = container(tree, current)? else {
                    return Err(Error::TagNotFound(format!(
                        "cannot traverse into {}",
                        describe(tree, current)?
                    )));
                };
                state.immediate_parent = Some(id);
                if kind == TagKind::Compound {
                    if let Some(child) = tree.get(id, text)? {
                        current = Some(Target::Node(child));
                    } else if options.create_missing_parents {
                        if is_last {
                            return Ok(None);
                        }
                        log::debug!("creating missing compound {text} under {}", state.parent_path);
                        let child = tree.put_value(id, text.as_str(), Value::compound())?;
                        current = Some(Target::Node(child));
                    } else {
                        return Err(Error::TagNotFound(format!(
                            "{} does not exist",
                            render_segments(state.absolute, &segments[..=i])
                        )));
                    }
                    continue;
                }
                let Ok(index) = text.parse::<usize>() else {
                    return Err(Error::TagNotFound(format!(
                        "{text} is not a valid list index"
                    )));
                };
                let len = if kind == TagKind::List {
                    tree.list_len(id)?
                } else {
                    tree.array_len(id)?
                };
                if index >= len {
                    if options.soft_out_of_bounds {
                        return Ok(None);
                    }
                    return Err(Error::TagNotFound(format!("{text} is out of bounds")));
                }
                current = Some(match tree.get_at(id, index) {
                    Ok(Some(child)) => Target::Node(child),
                    _ => Target::Element { array: id, index },
                });
            }
        }
    }
    if options.parents_only && container(tree, current)?.is_none() {
        return Err(Error::TagNotFound(format!(
            "{} is not valid here",
            describe(tree, current)?
        )));
    }
    Ok(current)
}

/// Resolves `path` against `cursor` (or the root for absolute paths).
///
/// Takes the tree mutably only for `create_missing_parents`.
///
/// # Example
///
/// ```
/// use nbted::{ResolveOptions, Target, read_snbt, resolve_path};
///
/// let mut tree = read_snbt("{a: {b: [1, 2, 3]}}").unwrap();
/// let root = tree.root();
/// let resolved = resolve_path(&mut tree, root, "a/b[2]", &ResolveOptions::default()).unwrap();
/// assert_eq!(resolved.parent_path, "a/b");
/// assert_eq!(resolved.canonical_path.as_deref(), Some("/a/b[2]"));
/// assert!(matches!(resolved.leaf, Some(Target::Node(_))));
/// ```
pub fn resolve_path(
    tree: &mut Tree,
    cursor: Option<NodeId>,
    path: &str,
    options: &ResolveOptions,
) -> Result<ResolvedPath> {
    let parsed = parse_path(path)?;
    let start = if parsed.absolute { tree.root() } else { cursor };
    let mut state = Walk {
        absolute: parsed.absolute,
        immediate_parent: match start {
            Some(id) => tree.parent(id)?,
            None => None,
        },
        parent_path: render_segments(parsed.absolute, &[]),
        segment: None,
    };
    let start = start.map(Target::Node);
    match walk(tree, &mut state, start, &parsed.segments, options) {
        Ok(Some(leaf)) => Ok(ResolvedPath {
            immediate_parent: state.immediate_parent,
            leaf: Some(leaf),
            parent_path: state.parent_path,
            canonical_path: Some(tree.target_path(leaf)?),
            segment: state.segment,
        }),
        Ok(None) => Ok(state.missing()),
        Err(Error::TagNotFound(message)) if options.allow_missing => {
            log::trace!("{path} not found: {message}");
            Ok(state.missing())
        }
        Err(error) => Err(error),
    }
}
