use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::{NodeId, Result, Tree, Value, non_finite};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct SnbtOptions {
    /// One entry per line, indented with one tab per level.
    #[serde(default)]
    pub multiline: bool,
}

/// Returns `true` if `s` can be written without quotes.
pub(crate) fn is_bare(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(crate) fn quote(s: &str, out: &mut String) {
    let quote = if s.contains('"') && !s.contains('\'') {
        '\''
    } else {
        '"'
    };
    out.push(quote);
    for c in s.chars() {
        if c == quote || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
}

fn string(s: &str, out: &mut String) {
    // `NaNf` and friends would read back as numbers
    if is_bare(s) && non_finite(s).is_none() {
        out.push_str(s);
    } else {
        quote(s, out);
    }
}

/// Writes a float or double; non-finite values use the `NaN`/`Infinity`
/// spellings the reader accepts.
fn decimal(v: f64, suffix: char, out: &mut String) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v.is_infinite() {
        out.push_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    } else if suffix == 'f' {
        let _ = write!(out, "{}", v as f32);
    } else {
        let _ = write!(out, "{v}");
    }
    out.push(suffix);
}

struct Writer<'t> {
    tree: &'t Tree,
    options: SnbtOptions,
    out: String,
}

impl Writer<'_> {
    fn newline(&mut self, depth: usize) {
        if self.options.multiline {
            self.out.push('\n');
            for _ in 0..depth {
                self.out.push('\t');
            }
        }
    }

    fn separator(&mut self) {
        self.out.push(',');
        if !self.options.multiline {
            self.out.push(' ');
        }
    }

    fn numbers<T: std::fmt::Display>(&mut self, marker: &str, values: &[T], suffix: &str) {
        self.out.push('[');
        self.out.push_str(marker);
        self.out.push(';');
        for (i, value) in values.iter().enumerate() {
            self.out.push_str(if i == 0 { " " } else { ", " });
            let _ = write!(self.out, "{value}{suffix}");
        }
        self.out.push(']');
    }

    fn value(&mut self, id: NodeId, depth: usize) -> Result<()> {
        let tree = self.tree;
        match tree.value(id)? {
            Value::Byte(v) => {
                let _ = write!(self.out, "{v}b");
            }
            Value::Short(v) => {
                let _ = write!(self.out, "{v}s");
            }
            Value::Int(v) => {
                let _ = write!(self.out, "{v}");
            }
            Value::Long(v) => {
                let _ = write!(self.out, "{v}L");
            }
            Value::Float(v) => decimal(f64::from(*v), 'f', &mut self.out),
            Value::Double(v) => decimal(*v, 'd', &mut self.out),
            Value::String(v) => string(v, &mut self.out),
            Value::ByteArray(values) => self.numbers("B", values, "b"),
            Value::IntArray(values) => self.numbers("I", values, ""),
            Value::LongArray(values) => self.numbers("L", values, "L"),
            Value::List(list) => {
                self.out.push('[');
                for (i, child) in list.ids().iter().enumerate() {
                    if i > 0 {
                        self.separator();
                    }
                    self.newline(depth + 1);
                    self.value(*child, depth + 1)?;
                }
                if !list.is_empty() {
                    self.newline(depth);
                }
                self.out.push(']');
            }
            Value::Compound(compound) => {
                self.out.push('{');
                for (i, (name, child)) in compound.iter().enumerate() {
                    if i > 0 {
                        self.separator();
                    }
                    self.newline(depth + 1);
                    string(name, &mut self.out);
                    self.out.push_str(": ");
                    self.value(child, depth + 1)?;
                }
                if !compound.is_empty() {
                    self.newline(depth);
                }
                self.out.push('}');
            }
        }
        Ok(())
    }
}

/// Renders the subtree at `id` as SNBT. The node's own name is not written.
///
/// # Example
///
/// ```
/// use nbted::{SnbtOptions, read_snbt, write_snbt};
///
/// let tree = read_snbt("{a: 1b, b: [L; 1L, 2L], c: \"two words\"}").unwrap();
/// let text = write_snbt(&tree, tree.root().unwrap(), &SnbtOptions::default()).unwrap();
/// assert_eq!(text, "{a: 1b, b: [L; 1L, 2L], c: \"two words\"}");
/// ```
pub fn write_snbt(tree: &Tree, id: NodeId, options: &SnbtOptions) -> Result<String> {
    let mut writer = Writer {
        tree,
        options: *options,
        out: String::new(),
    };
    writer.value(id, 0)?;
    Ok(writer.out)
}

/// Renders the whole tree; the empty tree renders as an empty string.
pub fn tree_to_snbt(tree: &Tree, options: &SnbtOptions) -> Result<String> {
    match tree.root() {
        Some(root) => write_snbt(tree, root, options),
        None => Ok(String::new()),
    }
}
