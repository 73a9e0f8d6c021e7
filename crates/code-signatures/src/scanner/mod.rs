//! Line-oriented signature scanners.
//!
//! Every scanner works on one borrowed line slice and returns the lines it
//! keeps. Kept lines borrow from the input; only elision markers allocate.
//! Sub-scanners take a start cursor and return the index where the caller
//! should resume, so nesting never depends on call-stack depth.

mod curly;
mod indent;
mod keyword;
mod nested;

pub use curly::CurlyScanner;
pub use indent::IndentScanner;
pub use keyword::KeywordScanner;
pub use nested::NestedBodyScanner;

use crate::language::{Language, ScannerFamily};
use std::borrow::Cow;

/// Body placeholder for indentation-scoped languages
pub const INDENT_ELISION: &str = "...";

/// Body placeholder for brace-scoped languages
pub const BRACE_ELISION: &str = "// ...";

/// Reduces a source file to declarations, eliding implementation bodies.
///
/// Scanners never fail: malformed input makes them run to the end of the
/// available lines.
pub trait SignatureScanner {
    fn extract<'a>(&self, lines: &[&'a str]) -> Vec<Cow<'a, str>>;
}

/// Select the scanner for a language
pub fn scanner_for(language: Language) -> Box<dyn SignatureScanner> {
    match language.family() {
        ScannerFamily::Indentation => Box::new(IndentScanner),
        ScannerFamily::NestedBody => Box::new(NestedBodyScanner),
        ScannerFamily::Curly => Box::new(CurlyScanner::for_language(language)),
        ScannerFamily::Keyword => Box::new(KeywordScanner),
    }
}

/// Accumulates kept lines for one file
pub(crate) struct Outline<'a> {
    lines: Vec<Cow<'a, str>>,
}

impl<'a> Outline<'a> {
    pub(crate) fn new() -> Self {
        Self { lines: Vec::new() }
    }

    pub(crate) fn keep(&mut self, line: &'a str) {
        self.lines.push(Cow::Borrowed(line));
    }

    /// Keep `lines[start..end]`, clamped to the slice
    pub(crate) fn keep_range(&mut self, lines: &[&'a str], start: usize, end: usize) {
        let end = end.min(lines.len());
        if start < end {
            self.lines.extend(lines[start..end].iter().map(|l| Cow::Borrowed(*l)));
        }
    }

    /// Runs of blank lines collapse to one, and never lead the output
    pub(crate) fn blank(&mut self) {
        if self
            .lines
            .last()
            .is_some_and(|last| !last.trim().is_empty())
        {
            self.lines.push(Cow::Borrowed(""));
        }
    }

    pub(crate) fn elide(&mut self, indent: usize, marker: &str) {
        self.lines
            .push(Cow::Owned(format!("{}{marker}", " ".repeat(indent))));
    }

    pub(crate) fn finish(self) -> Vec<Cow<'a, str>> {
        self.lines
    }
}

/// Width of the leading whitespace, in bytes
pub(crate) fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Opening minus closing braces on a line
pub(crate) fn brace_delta(line: &str) -> isize {
    let mut delta = 0isize;
    for ch in line.chars() {
        match ch {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Net change in parenthesis depth across a line
pub(crate) fn paren_delta(line: &str) -> isize {
    let mut delta = 0isize;
    for ch in line.chars() {
        match ch {
            '(' => delta += 1,
            ')' => delta -= 1,
            _ => {}
        }
    }
    delta
}

/// Cut a signature line just after the `{` that opens its body.
///
/// Braces inside parentheses (destructured parameters, default closures)
/// are not body braces. Lines without such a brace are returned whole.
pub(crate) fn through_body_brace(line: &str) -> &str {
    let mut parens = 0isize;
    for (pos, ch) in line.char_indices() {
        match ch {
            '(' => parens += 1,
            ')' => parens -= 1,
            '{' if parens <= 0 => return &line[..=pos],
            _ => {}
        }
    }
    line
}

/// Advance past a block whose brace depth is `depth` at `start`.
///
/// Returns the index of the first line after the block closes, or the end
/// of input for an unbalanced block.
pub(crate) fn skip_braces(lines: &[&str], start: usize, mut depth: isize) -> usize {
    let mut i = start;
    while i < lines.len() && depth > 0 {
        depth += brace_delta(lines[i]);
        i += 1;
    }
    i
}

/// Keep a `/* ... */` comment beginning at `start`, returning the index
/// after the line that closes it.
pub(crate) fn keep_block_comment<'a>(
    lines: &[&'a str],
    start: usize,
    out: &mut Outline<'a>,
) -> usize {
    let mut i = start;
    while i < lines.len() {
        out.keep(lines[i]);
        i += 1;
        if lines[i - 1].contains("*/") {
            break;
        }
    }
    i
}

pub(crate) fn is_block_comment_start(stripped: &str) -> bool {
    stripped.starts_with("/*")
}
