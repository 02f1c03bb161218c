use std::fmt::{self, Display};

use crate::{Error, Result};

/// One step of a path.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum PathSegment {
    /// `.` or an empty segment: stay, but anchor the immediate parent here.
    Current,
    /// `..`
    Parent,
    /// A compound key (or, against a list, an index written without brackets).
    Key(String),
    /// The text between `[` and `]`.
    Index(String),
}

impl PathSegment {
    /// The key or index text of a lookup segment.
    pub fn text(&self) -> Option<&str> {
        match self {
            PathSegment::Key(text) | PathSegment::Index(text) => Some(text),
            PathSegment::Current | PathSegment::Parent => None,
        }
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Current => f.write_str("."),
            PathSegment::Parent => f.write_str(".."),
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A tokenized path.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ParsedPath {
    /// Starts at the root rather than the cursor.
    pub absolute: bool,
    pub segments: Vec<PathSegment>,
}

/// Splits one `/`-delimited piece into a key and any number of fused
/// `[index]` suffixes.
fn split_piece(piece: &str, out: &mut Vec<PathSegment>) -> Result<()> {
    let (key, mut rest) = match piece.find('[') {
        Some(open) => piece.split_at(open),
        None => (piece, ""),
    };
    match key {
        "" if rest.is_empty() => out.push(PathSegment::Current),
        "" => {}
        "." => out.push(PathSegment::Current),
        ".." => out.push(PathSegment::Parent),
        key => out.push(PathSegment::Key(key.to_string())),
    }
    while !rest.is_empty() {
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(Error::BadUsage(format!(
                "unexpected '{rest}' after index in path segment {piece}"
            )));
        };
        let Some(close) = inner.find(']') else {
            return Err(Error::BadUsage(format!("unclosed [ in path segment {piece}")));
        };
        out.push(PathSegment::Index(inner[..close].to_string()));
        rest = &inner[close + 1..];
    }
    Ok(())
}

/// Tokenizes a path. `foo[2]` and `foo/[2]` produce the same segments, a
/// trailing `/` adds nothing and empty segments are [`PathSegment::Current`].
///
/// # Example
///
/// ```
/// use nbted::{PathSegment, parse_path};
///
/// let fused = parse_path("/a/b[2]").unwrap();
/// let split = parse_path("/a/b/[2]").unwrap();
/// assert_eq!(fused, split);
/// assert_eq!(fused.segments[2], PathSegment::Index("2".into()));
/// ```
pub fn parse_path(path: &str) -> Result<ParsedPath> {
    let absolute = path.starts_with('/');
    let body = if absolute { &path[1..] } else { path };
    let body = body.strip_suffix('/').unwrap_or(body);
    let mut segments = Vec::new();
    if !body.is_empty() {
        for piece in body.split('/') {
            split_piece(piece, &mut segments)?;
        }
    }
    Ok(ParsedPath { absolute, segments })
}

/// Renders consumed segments back into a path: indices fused to the
/// preceding segment, a leading `/` for absolute paths.
pub(crate) fn render_segments(absolute: bool, segments: &[PathSegment]) -> String {
    let mut out = String::new();
    if absolute {
        out.push('/');
    }
    for segment in segments {
        if !matches!(segment, PathSegment::Index(_)) && !out.is_empty() && !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(&segment.to_string());
    }
    out
}
