//! Placeholder rendering for predicate expressions.
//!
//! Predicates are always recorded with `?` markers. When a statement is built
//! for a Postgres backend the markers are renumbered into `$n`, continuing
//! after the parameters the base statement already uses.

use std::fmt::Write;

/// How `?` markers in predicate expressions are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Emit expressions verbatim (`?` markers, positional drivers).
    #[default]
    Question,
    /// Renumber markers as `$1, $2, ...` (PostgreSQL).
    ///
    /// `?` inside quoted literals (including `E'...'` escape strings and
    /// `$tag$...$tag$` bodies), quoted identifiers and comments is left
    /// alone. `??` emits a single literal `?` (e.g. the JSONB key operator)
    /// and does not consume a parameter.
    Dollar,
}

impl PlaceholderStyle {
    /// Append `expr` to `out`, rendering its markers in this style.
    ///
    /// `last` is the number of the last `$n` already used in the statement and
    /// is advanced by one per rendered marker. It is left untouched by
    /// `Question`.
    pub fn render_into(self, out: &mut String, expr: &str, last: &mut usize) {
        match self {
            PlaceholderStyle::Question => out.push_str(expr),
            PlaceholderStyle::Dollar => render_dollar(out, expr, last),
        }
    }

    /// Render a standalone expression, numbering from `$1`.
    pub fn render(self, expr: &str) -> String {
        let mut out = String::with_capacity(expr.len() + 8);
        let mut last = 0;
        self.render_into(&mut out, expr, &mut last);
        out
    }
}

fn render_dollar(out: &mut String, expr: &str, last: &mut usize) {
    let bytes = expr.as_bytes();
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\'' => {
                let escapes = i > 0
                    && matches!(bytes[i - 1], b'E' | b'e')
                    && (i < 2 || !is_ident_byte(bytes[i - 2]));
                i = skip_quoted(bytes, i + 1, b'\'', escapes);
            }
            b'"' => i = skip_quoted(bytes, i + 1, b'"', false),
            b'$' => match dollar_tag(bytes, i) {
                Some(len) => {
                    let tag = &expr[i..i + len];
                    let body = i + len;
                    i = expr[body..]
                        .find(tag)
                        .map_or(bytes.len(), |end| body + end + len);
                }
                None => i += 1,
            },
            b'-' if bytes.get(i + 1) == Some(&b'-') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !bytes[i..].starts_with(b"*/") {
                    i += 1;
                }
                i += 2;
            }
            b'?' => {
                out.push_str(&expr[copied..i]);
                if bytes.get(i + 1) == Some(&b'?') {
                    out.push('?');
                    i += 2;
                } else {
                    *last += 1;
                    let _ = write!(out, "${last}");
                    i += 1;
                }
                copied = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&expr[copied..]);
}

/// Index just past the closing `quote`, or the end of input if unterminated.
///
/// A doubled quote stays inside the literal. With `escapes` (an `E'...'`
/// string) a backslash also hides the byte after it.
fn skip_quoted(bytes: &[u8], mut i: usize, quote: u8, escapes: bool) -> usize {
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if escapes => i += 2,
            b if b == quote && bytes.get(i + 1) == Some(&quote) => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Length of a `$tag$` opener starting at `start`, both dollars included.
///
/// `$1` style parameters and `$` inside identifiers are not openers.
fn dollar_tag(bytes: &[u8], start: usize) -> Option<usize> {
    if start > 0 && is_ident_byte(bytes[start - 1]) {
        return None;
    }
    let rest = &bytes[start + 1..];
    if rest.first().is_some_and(u8::is_ascii_digit) {
        return None;
    }
    let end = rest
        .iter()
        .position(|&b| !(b.is_ascii_alphanumeric() || b == b'_'))?;
    (rest[end] == b'$').then_some(end + 2)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}
