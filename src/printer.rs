//! Plain-text listing of tags, one `<type> "<name>" <value>` line per tag.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{
    LEAST_SUFFIX, MOST_SUFFIX, NodeId, Result, TagKind, Target, Tree, Value, uuid_from_halves,
};

/// How far below the printed tag to go.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecurseMode {
    /// The tag alone, with a child count for containers.
    None,
    /// The tag and its immediate children.
    ImmediateChildren,
    /// Only the immediate children.
    ImmediateChildrenOnly,
    /// The tag and every descendant.
    #[default]
    Full,
}

impl RecurseMode {
    #[inline]
    fn prints_root(self) -> bool {
        self != RecurseMode::ImmediateChildrenOnly
    }

    #[inline]
    fn prints_children(self) -> bool {
        self != RecurseMode::None
    }

    fn for_compound_child(self) -> Self {
        match self {
            RecurseMode::Full => RecurseMode::Full,
            _ => RecurseMode::None,
        }
    }

    /// List elements of a children-only listing still show their own
    /// children, since the elements themselves have no names to show.
    fn for_list_child(self) -> Self {
        match self {
            RecurseMode::Full => RecurseMode::Full,
            RecurseMode::ImmediateChildrenOnly => RecurseMode::ImmediateChildren,
            _ => RecurseMode::None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Guess at higher-level types: `~uuid` for long pairs, `~bool` for
    /// flag-like bytes and `~json` for strings holding JSON.
    pub infer: bool,
    pub recurse: RecurseMode,
}

const BOOLEAN_NAMES: &[&str] = &["hardcore"];
const BOOLEAN_PREFIXES: &[&str] = &["has", "is", "seen", "should", "on", "flag", "bool", "boolean"];
const BOOLEAN_SUFFIXES: &[&str] = &["ing", "locked", "flag", "boolean", "bool"];

fn looks_boolean(name: &str) -> bool {
    let lower = name.to_lowercase();
    BOOLEAN_NAMES.contains(&lower.as_str())
        || BOOLEAN_PREFIXES.iter().any(|p| lower.starts_with(p))
        || BOOLEAN_SUFFIXES.iter().any(|s| lower.ends_with(s))
}

fn printed_type(kind: TagKind) -> &'static str {
    match kind {
        TagKind::ByteArray => "byte[]",
        TagKind::IntArray => "int[]",
        TagKind::LongArray => "long[]",
        kind => kind.type_name(),
    }
}

/// Escapes control characters and backslashes in a name.
fn escape(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\u{b}' => out.push_str("\\v"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            '\u{1b}' => out.push_str("\\e"),
            '\\' => out.push_str("\\\\"),
            c if c < ' ' || c == '\u{7f}' => out.push_str(&format!("\\x{:02X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `index` right-aligned to the width of the largest index of `len`.
fn padded_index(index: usize, len: usize) -> String {
    let width = len.saturating_sub(1).to_string().len();
    format!("{index:>width$}")
}

fn children_summary(count: usize) -> String {
    let plural = if count == 1 { "" } else { "ren" };
    format!(" ({count} child{plural})")
}

struct Printer<'a, W> {
    tree: &'a Tree,
    infer: bool,
    out: &'a mut W,
}

impl<W: Write> Printer<'_, W> {
    /// The quoted name, or the padded index of a list element.
    fn label(&self, id: NodeId) -> Result<Option<String>> {
        let name = self.tree.name(id)?;
        if !name.is_empty() {
            return Ok(Some(escape(name)));
        }
        let Some(parent) = self.tree.parent(id)? else {
            return Ok(None);
        };
        if self.tree.kind(parent)? != TagKind::List {
            return Ok(None);
        }
        let len = self.tree.list_len(parent)?;
        Ok(self
            .tree
            .index_of(parent, id)?
            .map(|index| padded_index(index, len)))
    }

    fn head(&mut self, prefix: &str, kind: &str, label: Option<&str>) -> Result<()> {
        write!(self.out, "{prefix}{kind}")?;
        if let Some(label) = label {
            write!(self.out, " {label}")?;
        }
        Ok(())
    }

    fn basic(&mut self, prefix: &str, kind: &str, label: Option<&str>, value: &str) -> Result<()> {
        self.head(prefix, kind, label)?;
        writeln!(self.out, " {value}")?;
        Ok(())
    }

    fn element(&mut self, array: NodeId, index: usize, prefix: &str) -> Result<()> {
        let value = self.tree.array_get(array, index)?;
        let label = padded_index(index, self.tree.array_len(array)?);
        let text = match value.as_i64() {
            Some(number) => number.to_string(),
            None => format!("{value:?}"),
        };
        self.basic(prefix, printed_type(value.kind()), Some(&label), &text)
    }

    fn tag(&mut self, id: NodeId, prefix: &str, recurse: RecurseMode) -> Result<()> {
        let tree = self.tree;
        let name = tree.name(id)?;
        let label = self.label(id)?;
        let label = label.as_deref();
        match tree.value(id)? {
            Value::Compound(compound) => {
                if recurse.prints_root() {
                    self.head(prefix, "compound", label)?;
                }
                if !recurse.prints_children() {
                    writeln!(self.out, "{}", children_summary(compound.len()))?;
                    return Ok(());
                }
                if compound.is_empty() {
                    if recurse.prints_root() {
                        writeln!(self.out, " {{}}")?;
                    }
                    return Ok(());
                }
                if recurse.prints_root() {
                    writeln!(self.out, " {{")?;
                }
                let child_prefix = if recurse.prints_root() {
                    format!("{prefix}  ")
                } else {
                    prefix.to_string()
                };
                for (name, child) in compound.iter() {
                    if self.infer && self.uuid_half(id, name, &child_prefix)? {
                        continue;
                    }
                    self.tag(child, &child_prefix, recurse.for_compound_child())?;
                }
                if recurse.prints_root() {
                    writeln!(self.out, "{prefix}}}")?;
                }
            }
            Value::List(list) => {
                if recurse.prints_root() {
                    self.head(prefix, "list", label)?;
                }
                if !recurse.prints_children() {
                    writeln!(self.out, "{}", children_summary(list.len()))?;
                    return Ok(());
                }
                if list.is_empty() {
                    if recurse.prints_root() {
                        writeln!(self.out, " []")?;
                    }
                    return Ok(());
                }
                if recurse.prints_root() {
                    writeln!(self.out, " [")?;
                }
                let child_prefix = if recurse.prints_root() {
                    format!("{prefix}  ")
                } else {
                    prefix.to_string()
                };
                for child in list.ids() {
                    self.tag(*child, &child_prefix, recurse.for_list_child())?;
                }
                if recurse.prints_root() {
                    writeln!(self.out, "{prefix}]")?;
                }
            }
            Value::Byte(v @ (0 | 1)) if self.infer && looks_boolean(name) => {
                self.basic(prefix, "~bool", label, if *v == 1 { "true" } else { "false" })?;
            }
            Value::String(text) if self.infer && text.starts_with(['{', '[']) => {
                match serde_json::from_str::<serde_json::Value>(text) {
                    Ok(json) => {
                        let shown = if recurse.prints_children() {
                            serde_json::to_string_pretty(&json)?
                                .replace('\n', &format!("\n{prefix}"))
                        } else {
                            String::from("...")
                        };
                        self.basic(prefix, "~json", label, &shown)?;
                    }
                    Err(_) => self.basic(prefix, "string", label, text)?,
                }
            }
            Value::String(text) => self.basic(prefix, "string", label, text)?,
            Value::Float(v) => self.basic(prefix, "float", label, &format!("{v:?}"))?,
            Value::Double(v) => self.basic(prefix, "double", label, &format!("{v:?}"))?,
            Value::ByteArray(values) => {
                self.basic(prefix, "byte[]", label, &format!("{values:?}"))?
            }
            Value::IntArray(values) => self.basic(prefix, "int[]", label, &format!("{values:?}"))?,
            Value::LongArray(values) => {
                self.basic(prefix, "long[]", label, &format!("{values:?}"))?
            }
            value => {
                let text = value.as_i64().map(|v| v.to_string()).unwrap_or_default();
                self.basic(prefix, value.kind().type_name(), label, &text)?;
            }
        }
        Ok(())
    }

    /// Prints `<base>Most`/`<base>Least` longs as one `~uuid` line. Returns
    /// whether `name` was consumed as part of such a pair.
    fn uuid_half(&mut self, compound: NodeId, name: &str, prefix: &str) -> Result<bool> {
        let (base, is_most) = if let Some(base) = name.strip_suffix(MOST_SUFFIX) {
            (base, true)
        } else if let Some(base) = name.strip_suffix(LEAST_SUFFIX) {
            (base, false)
        } else {
            return Ok(false);
        };
        let long = |suffix: &str| -> Result<Option<i64>> {
            Ok(match self.tree.get(compound, &format!("{base}{suffix}"))? {
                Some(id) => match self.tree.value(id)? {
                    Value::Long(v) => Some(*v),
                    _ => None,
                },
                None => None,
            })
        };
        let (Some(most), Some(least)) = (long(MOST_SUFFIX)?, long(LEAST_SUFFIX)?) else {
            return Ok(false);
        };
        if is_most {
            let uuid = uuid_from_halves(most, least).to_string();
            let label = escape(base);
            self.basic(prefix, "~uuid", Some(&label), &uuid)?;
        }
        Ok(true)
    }
}

/// Prints `target` to `out`.
///
/// # Example
///
/// ```
/// use nbted::{PrintOptions, RecurseMode, Target, print_tag, read_snbt};
///
/// let tree = read_snbt("{isOnFire: 1b, idMost: 0L, idLeast: 5L, Pos: [1.5d]}").unwrap();
/// let options = PrintOptions { infer: true, recurse: RecurseMode::Full };
/// let mut out = Vec::new();
/// print_tag(&tree, Target::Node(tree.root().unwrap()), &options, &mut out).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "compound {\n  ~bool \"isOnFire\" true\n  ~uuid \"id\" 00000000-0000-0000-0000-000000000005\n  list \"Pos\" [\n    double 0 1.5\n  ]\n}\n"
/// );
/// ```
pub fn print_tag(
    tree: &Tree,
    target: Target,
    options: &PrintOptions,
    out: &mut impl Write,
) -> Result<()> {
    let mut printer = Printer {
        tree,
        infer: options.infer,
        out,
    };
    match target {
        Target::Node(id) => printer.tag(id, "", options.recurse),
        Target::Element { array, index } => printer.element(array, index, ""),
    }
}
