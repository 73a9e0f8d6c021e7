use super::{
    brace_delta, indent_of, is_block_comment_start, keep_block_comment, paren_delta,
    skip_braces, through_body_brace, Outline, SignatureScanner, BRACE_ELISION,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static IMPORT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?:import[\s{*'"]|export\s*\{|export\s+\*|(?:const|let|var)\s+[\w$\s{},]+=\s*require\()"#,
    )
    .expect("valid regex")
});

/// `export` forms that have a dedicated rule below
static EXPORT_DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*export\s+(?:default\s+)?(?:declare\s+)?(?:abstract\s+|async\s+)?(?:class|function|interface|type|enum|const|let|var|namespace)\b",
    )
    .expect("valid regex")
});

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\b")
        .expect("valid regex")
});

/// Declarative forms whose bodies are kept verbatim
static TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:interface\s|type\s+\w|(?:const\s+)?enum\s)",
    )
    .expect("valid regex")
});

static FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:async\s+)?function\b")
        .expect("valid regex")
});

static VAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:export\s+)?(?:declare\s+)?(?:const|let|var)\s+[\w$]+")
        .expect("valid regex")
});

static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|static|abstract|override|readonly|declare)\s+)*(?:async\s+)?(?:get\s+|set\s+)?(?:\*\s*)?(?P<name>constructor|[#\w$]+)\s*[?!]?\s*(?:<[^>]*>)?\s*\(",
    )
    .expect("valid regex")
});

static FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|static|readonly|abstract|override|declare)\s+)*[#\w$]+\s*[?!]?\s*[:=;]",
    )
    .expect("valid regex")
});

/// Statement keywords that look like method calls inside a class body
const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "return", "function"];

/// Signature scanner for JavaScript and TypeScript.
///
/// Keeps imports/exports, comments and decorators, interface/type/enum
/// declarations with their bodies, and function, variable and class
/// headers. Class bodies are scanned for constructors, methods, accessors
/// and fields; executable bodies become `// ...`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NestedBodyScanner;

impl SignatureScanner for NestedBodyScanner {
    fn extract<'a>(&self, lines: &[&'a str]) -> Vec<Cow<'a, str>> {
        let mut out = Outline::new();
        let mut i = 0;
        while i < lines.len() {
            i = scan_top_level(lines, i, &mut out);
        }
        out.finish()
    }
}

fn scan_top_level<'a>(lines: &[&'a str], i: usize, out: &mut Outline<'a>) -> usize {
    let line = lines[i];
    let stripped = line.trim_start();

    if stripped.is_empty() {
        out.blank();
        return i + 1;
    }
    if is_block_comment_start(stripped) {
        return keep_block_comment(lines, i, out);
    }
    if stripped.starts_with("//") || stripped.starts_with('@') {
        out.keep(line);
        return i + 1;
    }
    if IMPORT_RE.is_match(line) {
        return keep_import(lines, i, out);
    }
    if stripped.starts_with("export ") && !EXPORT_DECL_RE.is_match(line) {
        out.keep(line);
        return i + 1;
    }
    if CLASS_RE.is_match(line) {
        let (next, depth) = keep_until_open(lines, i, out, false);
        return match depth {
            Some(depth) if depth > 0 => scan_class_body(lines, next, out),
            _ => next,
        };
    }
    if TYPE_RE.is_match(line) {
        out.keep(line);
        let depth = brace_delta(line);
        let end = skip_braces(lines, i + 1, depth);
        out.keep_range(lines, i + 1, end);
        return end;
    }
    if FUNCTION_RE.is_match(line) {
        return keep_callable(lines, i, out);
    }
    if VAR_RE.is_match(line) {
        return keep_binding(lines, i, out);
    }
    // statements such as `app.get('/', (req, res) => {` or `describe(...)`
    skip_braces(lines, i + 1, brace_delta(line))
}

/// Keep an import/require statement until its braces balance.
///
/// A blank line always ends the statement.
fn keep_import<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    out.keep(lines[start]);
    let mut depth = brace_delta(lines[start]);
    let mut i = start + 1;
    while i < lines.len() && depth > 0 && !lines[i].trim().is_empty() {
        out.keep(lines[i]);
        depth += brace_delta(lines[i]);
        i += 1;
    }
    i
}

/// Keep header lines until one contains `{` (or `;` when `stop_at_semicolon`).
///
/// Returns the resume index and, when a brace was seen, the brace depth
/// accumulated over the header.
fn keep_until_open<'a>(
    lines: &[&'a str],
    start: usize,
    out: &mut Outline<'a>,
    stop_at_semicolon: bool,
) -> (usize, Option<isize>) {
    let mut depth = 0;
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        depth += brace_delta(line);
        i += 1;
        if line.contains('{') {
            out.keep(through_body_brace_if_single(line, start + 1 == i));
            return (i, Some(depth));
        }
        out.keep(line);
        if stop_at_semicolon && line.contains(';') {
            break;
        }
    }
    (i, None)
}

/// Single-line headers drop any inline body after the opening brace.
///
/// Continuation lines are kept whole so a multi-line destructured parameter
/// list is not cut at its own brace.
fn through_body_brace_if_single(line: &str, single: bool) -> &str {
    if single {
        through_body_brace(line)
    } else {
        line
    }
}

/// Function or method: signature kept, body replaced by `// ...`
fn keep_callable<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let indent = indent_of(lines[start]);
    let (next, depth) = keep_until_open(lines, start, out, true);
    match depth {
        Some(depth) => {
            out.elide(indent + 2, BRACE_ELISION);
            skip_braces(lines, next, depth)
        }
        None => next,
    }
}

/// `const`/`let`/`var`: header kept through any open parameter list; a
/// block-bodied initializer is elided.
fn keep_binding<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let line = lines[start];
    out.keep(line);
    let mut depth = brace_delta(line);
    let mut parens = paren_delta(line);
    let mut i = start + 1;
    while parens > 0 && i < lines.len() {
        out.keep(lines[i]);
        depth += brace_delta(lines[i]);
        parens += paren_delta(lines[i]);
        i += 1;
    }
    if depth > 0 {
        out.elide(indent_of(line) + 2, BRACE_ELISION);
        i = skip_braces(lines, i, depth);
    }
    i
}

/// Scan a class body starting just after its opening brace.
///
/// Returns the index after the closing `}` line, or the end of input.
fn scan_class_body<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        let stripped = line.trim_start();

        if stripped.is_empty() {
            out.blank();
            i += 1;
        } else if stripped.starts_with('}') {
            out.keep(line);
            return i + 1;
        } else if is_block_comment_start(stripped) {
            i = keep_block_comment(lines, i, out);
        } else if stripped.starts_with("//") || stripped.starts_with('@') {
            out.keep(line);
            i += 1;
        } else if is_method(line) {
            i = keep_callable(lines, i, out);
        } else if FIELD_RE.is_match(line) {
            i = keep_binding(lines, i, out);
        } else {
            // static blocks and other unrecognised members
            i = skip_braces(lines, i + 1, brace_delta(line));
        }
    }
    i
}

fn is_method(line: &str) -> bool {
    METHOD_RE
        .captures(line)
        .and_then(|caps| caps.name("name"))
        .is_some_and(|name| !CONTROL_KEYWORDS.contains(&name.as_str()))
}
