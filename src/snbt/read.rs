use crate::{Error, MAX_DEPTH, NodeId, Result, TagKind, Tree, Value, cold_path};

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

/// Stops a bare token. Spaces are allowed inside a bare string and trimmed
/// at its end; a colon only ends keys.
fn ends_bare_token(c: char, key: bool) -> bool {
    matches!(c, ',' | '}' | ']' | '\r' | '\n' | '\t') || (key && c == ':')
}

fn digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn strip_sign(s: &str) -> &str {
    s.strip_prefix(['-', '+']).unwrap_or(s)
}

/// `[-+]?\d+` followed by one of `suffixes`.
fn integer_with_suffix<'s>(token: &'s str, suffixes: [char; 2]) -> Option<&'s str> {
    let body = token.strip_suffix(suffixes)?;
    digits(strip_sign(body)).then_some(body)
}

/// `[-+]?(\d+(\.\d*)?|\.\d+)` followed by one of `suffixes`.
fn decimal_with_suffix<'s>(token: &'s str, suffixes: [char; 2]) -> Option<&'s str> {
    let body = token.strip_suffix(suffixes)?;
    let unsigned = strip_sign(body);
    let valid = match unsigned.split_once('.') {
        None => digits(unsigned),
        Some(("", fraction)) => digits(fraction),
        Some((whole, fraction)) => {
            digits(whole) && (fraction.is_empty() || digits(fraction))
        }
    };
    valid.then_some(body)
}

fn number<T: std::str::FromStr>(literal: &str, token: &str) -> Result<T> {
    literal.parse().map_err(|_| Error::BadNumber(token.to_string()))
}

/// `NaN`, `Infinity` or `-Infinity` with a float or double suffix.
pub(crate) fn non_finite(token: &str) -> Option<Value> {
    let (body, double) = match token.strip_suffix(['d', 'D']) {
        Some(body) => (body, true),
        None => (token.strip_suffix(['f', 'F'])?, false),
    };
    let value = match body {
        "NaN" => f64::NAN,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ => return None,
    };
    Some(if double {
        Value::Double(value)
    } else {
        Value::Float(value as f32)
    })
}

/// Frees the detached `id` when `result` failed, so a failed parse leaves
/// nothing behind in the caller's tree.
fn release_on_error<T>(tree: &mut Tree, id: NodeId, result: Result<T>) -> Result<T> {
    if result.is_err() {
        cold_path();
        tree.free(id)?;
    }
    result
}

/// Classifies a bare token by its shape: byte, double, float, int, long,
/// short, and a string when nothing matches.
pub(crate) fn classify_bare(token: &str) -> Result<Value> {
    if let Some(value) = non_finite(token) {
        return Ok(value);
    }
    if let Some(body) = integer_with_suffix(token, ['b', 'B']) {
        return Ok(Value::Byte(number(body, token)?));
    }
    if let Some(body) = decimal_with_suffix(token, ['d', 'D']) {
        return Ok(Value::Double(number(body, token)?));
    }
    if let Some(body) = decimal_with_suffix(token, ['f', 'F']) {
        return Ok(Value::Float(number(body, token)?));
    }
    if digits(strip_sign(token)) {
        return Ok(Value::Int(number(token, token)?));
    }
    if let Some(body) = integer_with_suffix(token, ['l', 'L']) {
        return Ok(Value::Long(number(body, token)?));
    }
    if let Some(body) = integer_with_suffix(token, ['s', 'S']) {
        return Ok(Value::Short(number(body, token)?));
    }
    Ok(Value::String(token.to_string()))
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(c) => Err(Error::malformed(format!(
                "expected '{expected}' but found '{c}' at offset {}",
                self.pos - c.len_utf8()
            ))),
            None => {
                cold_path();
                Err(Error::EndOfFile)
            }
        }
    }

    fn quoted(&mut self) -> Result<String> {
        let Some(quote) = self.bump() else {
            return Err(Error::EndOfFile);
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(Error::EndOfFile),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => {
                    cold_path();
                    return Err(Error::malformed("unterminated string"));
                }
            }
        }
    }

    fn bare(&mut self, key: bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if ends_bare_token(c, key) {
                break;
            }
            self.pos += c.len_utf8();
        }
        self.input[start..self.pos].trim_end_matches(' ')
    }

    fn key(&mut self) -> Result<String> {
        self.skip_whitespace();
        match self.peek() {
            Some('"' | '\'') => self.quoted(),
            Some(_) => {
                let key = self.bare(true);
                if key.is_empty() {
                    return Err(Error::malformed(format!(
                        "expected a key at offset {}",
                        self.pos
                    )));
                }
                Ok(key.to_string())
            }
            None => Err(Error::EndOfFile),
        }
    }

    fn value(&mut self, tree: &mut Tree, name: String, depth: usize) -> Result<NodeId> {
        if depth > MAX_DEPTH {
            cold_path();
            return Err(Error::malformed(format!(
                "nesting deeper than {MAX_DEPTH} levels"
            )));
        }
        self.skip_whitespace();
        match self.peek() {
            Some('{') => self.compound(tree, name, depth),
            Some('[') => match (self.peek_nth(1), self.peek_nth(2)) {
                (Some('B'), Some(';')) => self.array(tree, name, TagKind::ByteArray),
                (Some('I'), Some(';')) => self.array(tree, name, TagKind::IntArray),
                (Some('L'), Some(';')) => self.array(tree, name, TagKind::LongArray),
                _ => self.list(tree, name, depth),
            },
            Some('"' | '\'') => {
                let value = self.quoted()?;
                Ok(tree.create(name, Value::String(value)))
            }
            Some(_) => {
                let token = self.bare(false);
                if token.is_empty() {
                    return Err(Error::malformed(format!(
                        "expected a value at offset {}",
                        self.pos
                    )));
                }
                Ok(tree.create(name, classify_bare(token)?))
            }
            None => {
                cold_path();
                Err(Error::EndOfFile)
            }
        }
    }

    fn compound(&mut self, tree: &mut Tree, name: String, depth: usize) -> Result<NodeId> {
        self.expect('{')?;
        let compound = tree.create(name, Value::compound());
        let entries = self.compound_entries(tree, compound, depth);
        release_on_error(tree, compound, entries)?;
        Ok(compound)
    }

    fn compound_entries(&mut self, tree: &mut Tree, compound: NodeId, depth: usize) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            let key = self.key()?;
            self.expect(':')?;
            let child = self.value(tree, key, depth + 1)?;
            let put = tree.put(compound, child);
            if let Some(previous) = release_on_error(tree, child, put)? {
                tree.free(previous)?;
            }
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some('}') => return Ok(()),
                Some(c) => {
                    return Err(Error::malformed(format!(
                        "expected ',' or '}}' but found '{c}'"
                    )));
                }
                None => return Err(Error::EndOfFile),
            }
        }
    }

    fn list(&mut self, tree: &mut Tree, name: String, depth: usize) -> Result<NodeId> {
        self.expect('[')?;
        let list = tree.create(name, Value::list());
        let items = self.list_items(tree, list, depth);
        release_on_error(tree, list, items)?;
        Ok(list)
    }

    fn list_items(&mut self, tree: &mut Tree, list: NodeId, depth: usize) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            let child = self.value(tree, String::new(), depth + 1)?;
            let added = tree.add(list, child);
            release_on_error(tree, child, added)?;
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(()),
                Some(c) => {
                    return Err(Error::malformed(format!(
                        "expected ',' or ']' but found '{c}'"
                    )));
                }
                None => return Err(Error::EndOfFile),
            }
        }
    }

    fn array(&mut self, tree: &mut Tree, name: String, kind: TagKind) -> Result<NodeId> {
        self.expect('[')?;
        self.bump();
        self.expect(';')?;
        let array = tree.create(name, Value::zero(kind));
        let elements = self.array_elements(tree, array, kind);
        release_on_error(tree, array, elements)?;
        Ok(array)
    }

    fn array_elements(&mut self, tree: &mut Tree, array: NodeId, kind: TagKind) -> Result<()> {
        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(());
        }
        loop {
            self.skip_whitespace();
            let token = self.bare(false);
            let element = match kind {
                TagKind::ByteArray => {
                    let body = integer_with_suffix(token, ['b', 'B']).unwrap_or(token);
                    Value::Byte(number(body, token)?)
                }
                TagKind::LongArray => {
                    let body = integer_with_suffix(token, ['l', 'L']).unwrap_or(token);
                    Value::Long(number(body, token)?)
                }
                _ => Value::Int(number(token, token)?),
            };
            tree.array_push(array, element)?;
            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => return Ok(()),
                Some(c) => {
                    return Err(Error::malformed(format!(
                        "expected ',' or ']' but found '{c}'"
                    )));
                }
                None => return Err(Error::EndOfFile),
            }
        }
    }
}

/// Parses one SNBT value into `tree` as a detached node named `name`.
///
/// On failure `tree` is left as it was.
pub fn read_snbt_value(tree: &mut Tree, text: &str, name: impl Into<String>) -> Result<NodeId> {
    let mut parser = Parser {
        input: text,
        pos: 0,
    };
    let node = parser.value(tree, name.into(), 0)?;
    parser.skip_whitespace();
    let rest = if parser.pos < text.len() {
        Err(Error::malformed(format!(
            "trailing content at offset {}",
            parser.pos
        )))
    } else {
        Ok(node)
    };
    release_on_error(tree, node, rest)
}

/// Parses an SNBT document. The root is named `""`.
///
/// # Example
///
/// ```
/// use nbted::{TagKind, read_snbt};
///
/// let tree = read_snbt("{Health: 20.0f, Pos: [I; 1, 64, -3], Tags: [a, b]}").unwrap();
/// let root = tree.root().unwrap();
/// let pos = tree.get(root, "Pos").unwrap().unwrap();
/// assert_eq!(tree.kind(pos).unwrap(), TagKind::IntArray);
/// ```
pub fn read_snbt(text: &str) -> Result<Tree> {
    let mut tree = Tree::new();
    let root = read_snbt_value(&mut tree, text, "")?;
    tree.set_root(root)?;
    Ok(tree)
}
