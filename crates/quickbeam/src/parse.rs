//! Source text to AST

use std::rc::Rc;

use crate::ast::{Node, NodeKind};
use crate::error::ParseError;
use crate::value::Value;

/// Parse a whole script, numbering lines from 1.
///
/// The result is an expression node whose children are the script's
/// top-level statements.
pub fn parse(source: &str, script_name: &str) -> Result<Node, ParseError> {
    parse_numbered(source, script_name, 1)
}

/// Parse with an explicit starting line, for hosts that feed source in
/// line-oriented chunks and want diagnostics to line up.
pub fn parse_numbered(source: &str, script_name: &str, first_line: u32) -> Result<Node, ParseError> {
    let mut parser = Parser {
        bytes: source.as_bytes(),
        pos: 0,
        line: first_line,
        script_name,
        script: Rc::from(script_name),
    };
    let statements = parser.parse_sequence(true)?;
    Ok(Node {
        kind: NodeKind::Expr(statements),
        line: first_line,
        script: parser.script,
    })
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: u32,
    script_name: &'a str,
    script: Rc<str>,
}

impl<'a> Parser<'a> {
    /// Parse statements until a closing bracket (nested) or end of input
    /// (top level). Any opener closes any closer.
    fn parse_sequence(&mut self, top_level: bool) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        let mut current: Vec<Node> = Vec::new();

        loop {
            let Some(b) = self.peek() else {
                if !top_level {
                    return Err(self.error("missing closing bracket before end of input"));
                }
                flush_statement(&mut statements, &mut current, &self.script);
                return Ok(statements);
            };
            match b {
                b'#' => self.skip_comment(),
                b'\n' => {
                    self.pos += 1;
                    self.line += 1;
                    flush_statement(&mut statements, &mut current, &self.script);
                }
                b';' => {
                    self.pos += 1;
                    flush_statement(&mut statements, &mut current, &self.script);
                }
                b'(' | b'[' | b'{' => {
                    let line = self.line;
                    self.pos += 1;
                    let children = self.parse_sequence(false)?;
                    current.push(Node {
                        kind: NodeKind::Expr(children),
                        line,
                        script: Rc::clone(&self.script),
                    });
                }
                b')' | b']' | b'}' => {
                    self.pos += 1;
                    if top_level {
                        return Err(self.error("closing bracket without a matching opener"));
                    }
                    flush_statement(&mut statements, &mut current, &self.script);
                    return Ok(statements);
                }
                b'"' => {
                    let node = self.parse_string();
                    current.push(node);
                }
                b'\\' => self.skip_continuation(),
                b' ' | b'\t' | b'\r' | 0x0b | 0x0c => self.pos += 1,
                _ => {
                    let node = self.parse_token();
                    current.push(node);
                }
            }
        }
    }

    /// A quoted literal. The closing quote is any `"` whose immediately
    /// preceding byte is not a backslash; an unterminated literal runs to
    /// the end of input.
    fn parse_string(&mut self) -> Node {
        let line = self.line;
        self.pos += 1;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b'"' && self.bytes[self.pos - 1] != b'\\' {
                break;
            }
            if b == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        let raw = &self.bytes[start..self.pos];
        if self.peek() == Some(b'"') {
            self.pos += 1;
        }
        Node {
            kind: NodeKind::Value(Value::string(unescape(raw))),
            line,
            script: Rc::clone(&self.script),
        }
    }

    /// An unquoted token: a number, a `$name` reference, or a bare string.
    fn parse_token(&mut self) -> Node {
        let line = self.line;
        let start = self.pos;
        while let Some(b) = self.peek() {
            if is_delimiter(b) {
                break;
            }
            self.pos += 1;
        }
        let token = &self.bytes[start..self.pos];

        let kind = if looks_numeric(token) {
            NodeKind::Value(Value::number(double_prefix(token)))
        } else if token.len() > 1 && token[0] == b'$' {
            if token[1] == b'$' {
                // $$name is the literal string $name.
                NodeKind::Value(Value::string(token[1..].to_vec()))
            } else {
                NodeKind::Word(String::from_utf8_lossy(&token[1..]).into_owned())
            }
        } else {
            NodeKind::Value(Value::string(token.to_vec()))
        };
        Node {
            kind,
            line,
            script: Rc::clone(&self.script),
        }
    }

    /// Comments run to the end of the line; the newline itself still ends
    /// the statement.
    fn skip_comment(&mut self) {
        while let Some(b) = self.peek() {
            if b == b'\n' {
                break;
            }
            self.pos += 1;
        }
    }

    /// A backslash joins this line to the next; a backslash followed by
    /// anything else is silently dropped.
    fn skip_continuation(&mut self) {
        self.pos += 1;
        if self.peek() == Some(b'\r') {
            self.pos += 1;
        }
        if self.peek() == Some(b'\n') {
            self.pos += 1;
            self.line += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn error(&self, message: &str) -> ParseError {
        ParseError::new(self.script_name, self.line, message)
    }
}

/// End the statement being collected, skipping empty ones.
fn flush_statement(statements: &mut Vec<Node>, current: &mut Vec<Node>, script: &Rc<str>) {
    if current.is_empty() {
        return;
    }
    let line = current[0].line;
    statements.push(Node {
        kind: NodeKind::Expr(std::mem::take(current)),
        line,
        script: Rc::clone(script),
    });
}

fn is_delimiter(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c
            | b'(' | b')' | b'[' | b']' | b'{' | b'}'
            | b';' | b'"'
    )
}

/// A token is numeric when it starts with a digit, or with a sign followed
/// by a digit.
fn looks_numeric(token: &[u8]) -> bool {
    match token {
        [first, ..] if first.is_ascii_digit() => true,
        [b'+' | b'-', second, ..] => second.is_ascii_digit(),
        _ => false,
    }
}

/// Parse the longest numeric prefix of `bytes`, yielding 0 when no prefix
/// parses. Accepts optional sign, decimal digits with one point, an
/// exponent, and the spellings `inf`, `infinity`, and `nan`.
pub(crate) fn double_prefix(bytes: &[u8]) -> f64 {
    let mut start = 0;
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    let s = &bytes[start..];

    let mut i = 0;
    let negative = match s.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let rest = &s[i..];
    if has_prefix_ignore_case(rest, b"inf") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    if has_prefix_ignore_case(rest, b"nan") {
        return f64::NAN;
    }

    let mut end = i;
    let mut saw_digit = false;
    while i < s.len() && s[i].is_ascii_digit() {
        i += 1;
        saw_digit = true;
    }
    end = if saw_digit { i } else { end };
    if i < s.len() && s[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start || saw_digit {
            saw_digit = saw_digit || j > frac_start;
            i = j;
            end = i;
        }
    }
    if saw_digit && i < s.len() && (s[i] == b'e' || s[i] == b'E') {
        let mut j = i + 1;
        if j < s.len() && (s[j] == b'+' || s[j] == b'-') {
            j += 1;
        }
        let digits_start = j;
        while j < s.len() && s[j].is_ascii_digit() {
            j += 1;
        }
        if j > digits_start {
            end = j;
        }
    }

    if !saw_digit {
        return 0.0;
    }
    // The prefix is pure ASCII by construction.
    std::str::from_utf8(&s[..end])
        .ok()
        .and_then(|text| text.parse().ok())
        .unwrap_or(0.0)
}

fn has_prefix_ignore_case(bytes: &[u8], prefix: &[u8]) -> bool {
    bytes.len() >= prefix.len() && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Resolve the escape table in a raw string literal. Unknown escapes are
/// left exactly as written.
fn unescape(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' && i + 1 < raw.len() {
            let escaped = match raw[i + 1] {
                b'a' => Some(0x07),
                b'b' => Some(0x08),
                b'e' => Some(0x1b),
                b'f' => Some(0x0c),
                b'n' => Some(b'\n'),
                b'r' => Some(b'\r'),
                b't' => Some(b'\t'),
                b'v' => Some(0x0b),
                b'\\' => Some(b'\\'),
                b'\'' => Some(b'\''),
                b'"' => Some(b'"'),
                b'?' => Some(b'?'),
                b'0' => Some(0x00),
                _ => None,
            };
            if let Some(byte) = escaped {
                out.push(byte);
                i += 2;
                continue;
            }
        }
        out.push(raw[i]);
        i += 1;
    }
    out
}
