use super::{indent_of, Outline, SignatureScanner, INDENT_ELISION};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static CLASS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*class\s+").expect("valid regex"));
static DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(async\s+)?def\s+").expect("valid regex"));
static CONSTANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*\s*[:=]").expect("valid regex"));

/// Signature scanner for indentation-scoped languages (Python).
///
/// Keeps imports, decorators, comments, UPPER_CASE constants, class headers
/// with their docstrings and method signatures, and `def` headers with
/// their docstrings. Function bodies become a single `...` line.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndentScanner;

impl SignatureScanner for IndentScanner {
    fn extract<'a>(&self, lines: &[&'a str]) -> Vec<Cow<'a, str>> {
        let mut out = Outline::new();
        let mut i = 0;
        while i < lines.len() {
            i = scan_line(lines, i, &mut out);
        }
        out.finish()
    }
}

/// Handle the line at `i` and return the next cursor.
///
/// Class bodies follow the same rules as module level, so after a class
/// header the cursor simply continues into the body. Only `def` bodies are
/// skipped, up to the first line back at the `def` column or further left.
fn scan_line<'a>(lines: &[&'a str], i: usize, out: &mut Outline<'a>) -> usize {
    let line = lines[i];
    let stripped = line.trim_start();

    if stripped.is_empty() {
        out.blank();
        return i + 1;
    }

    let indent = indent_of(line);

    if stripped.starts_with("import ") || stripped.starts_with("from ") || stripped.starts_with('@')
    {
        out.keep(line);
        return i + 1;
    }

    if CLASS_RE.is_match(line) {
        let next = keep_header(lines, i, out);
        return keep_docstring(lines, next, out);
    }

    if DEF_RE.is_match(line) {
        let next = keep_header(lines, i, out);
        let next = keep_docstring(lines, next, out);
        out.elide(indent + 4, INDENT_ELISION);
        return skip_block(lines, next, indent);
    }

    if stripped.starts_with('#') || CONSTANT_RE.is_match(stripped) {
        out.keep(line);
    }
    i + 1
}

/// Keep a `class`/`def` header plus continuation lines.
///
/// The header ends on the line that closes its brackets, so one-liners
/// such as `def f(): return 1` and trailing comments do not pull in the
/// following lines.
fn keep_header<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let mut depth = 0isize;
    let mut i = start;
    while i < lines.len() {
        out.keep(lines[i]);
        depth += bracket_delta(lines[i]);
        i += 1;
        if depth <= 0 {
            break;
        }
    }
    i
}

/// Net change in `(`/`[` nesting across a line.
///
/// A bracket inside a trailing `#` comment does not open anything; a `#`
/// inside a string default does not start a comment. Taking the smaller
/// count covers both.
fn bracket_delta(line: &str) -> isize {
    let code = line.split('#').next().unwrap_or_default();
    count_brackets(line).min(count_brackets(code))
}

fn count_brackets(text: &str) -> isize {
    let mut delta = 0isize;
    for ch in text.chars() {
        match ch {
            '(' | '[' => delta += 1,
            ')' | ']' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Keep the docstring starting at `i`, if any.
///
/// An unterminated docstring is kept to the end of the file.
fn keep_docstring<'a>(lines: &[&'a str], i: usize, out: &mut Outline<'a>) -> usize {
    let Some(line) = lines.get(i) else {
        return i;
    };
    let stripped = line.trim_start();
    let quote = if stripped.starts_with("\"\"\"") {
        "\"\"\""
    } else if stripped.starts_with("'''") {
        "'''"
    } else {
        return i;
    };

    out.keep(line);
    if stripped.matches(quote).count() >= 2 {
        return i + 1;
    }

    let mut j = i + 1;
    while j < lines.len() {
        out.keep(lines[j]);
        j += 1;
        if lines[j - 1].contains(quote) {
            break;
        }
    }
    j
}

/// First non-blank line at or left of `parent_indent`, starting from `start`
fn skip_block(lines: &[&str], start: usize, parent_indent: usize) -> usize {
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        if !line.trim().is_empty() && indent_of(line) <= parent_indent {
            return i;
        }
        i += 1;
    }
    i
}
