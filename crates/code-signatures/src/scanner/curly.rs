use super::{
    brace_delta, indent_of, is_block_comment_start, keep_block_comment, skip_braces,
    through_body_brace, Outline, SignatureScanner, BRACE_ELISION,
};
use crate::language::Language;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Type declarations: class/interface/struct/enum/trait/impl/record, plus Go `type X struct`
static DECL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:public|private|protected|internal|static|final|abstract|override|virtual|async|unsafe|sealed|partial|readonly|data|open)\s+)*(?:(?:class|interface|struct|enum|trait|impl|record)(?:\s|<|$)|type\s+\w+\s+(?:struct|interface|enum)\b)",
    )
    .expect("valid regex")
});

/// Free functions: Rust `fn`, Go/Swift `func`, Kotlin `fun`
static FUNC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:(?:const|async|unsafe|inline|private|public|internal)\s+)*(?:extern\s+"[^"]*"\s+)?(?:fn\s+\w+|func\s+|fun\s+)"#,
    )
    .expect("valid regex")
});

/// C/C++ function definitions and prototypes: an optional return type, then
/// a (possibly qualified) name and `(`, starting at column 0
static C_FUNC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_][\w:<>,*&~\s]*?[\s*&]+)?(?P<name>[A-Za-z_~][\w:~]*)\s*\(")
        .expect("valid regex")
});

/// Statements that look like calls at column 0
const C_CONTROL_KEYWORDS: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "return", "sizeof", "catch",
];

/// Signature scanner for brace-scoped languages (Java, Go, C#, Rust, ...).
///
/// Keeps comments, annotations/attributes and import-like lines verbatim.
/// Type declarations are kept up to their opening brace and their bodies
/// are scanned for members; free functions keep their signature and have
/// the body replaced by `// ...`.
#[derive(Debug, Clone, Copy)]
pub struct CurlyScanner {
    imports: &'static [&'static str],
    /// Recognise C-style `type name(...)` function headers
    c_functions: bool,
}

impl CurlyScanner {
    pub fn for_language(language: Language) -> Self {
        Self {
            imports: language.import_patterns(),
            c_functions: matches!(language, Language::C | Language::Cpp),
        }
    }

    fn is_import(&self, stripped: &str) -> bool {
        self.imports.iter().any(|kw| stripped.starts_with(kw))
    }

    fn is_c_function(&self, line: &str) -> bool {
        if !self.c_functions || !C_FUNC_RE.is_match(line) {
            return false;
        }
        let first_word = line
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .next()
            .unwrap_or_default();
        !C_CONTROL_KEYWORDS.contains(&first_word)
    }
}

impl Default for CurlyScanner {
    fn default() -> Self {
        Self::for_language(Language::Unknown)
    }
}

impl SignatureScanner for CurlyScanner {
    fn extract<'a>(&self, lines: &[&'a str]) -> Vec<Cow<'a, str>> {
        let mut out = Outline::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            let stripped = line.trim_start();

            if stripped.is_empty() {
                out.blank();
                i += 1;
            } else if is_block_comment_start(stripped) {
                i = keep_block_comment(lines, i, &mut out);
            } else if stripped.starts_with("//")
                || stripped.starts_with('#')
                || stripped.starts_with('@')
            {
                out.keep(line);
                i += 1;
            } else if self.is_import(stripped) {
                i = keep_import(lines, i, &mut out);
            } else if FUNC_RE.is_match(line) || self.is_c_function(line) {
                i = keep_function(lines, i, &mut out);
            } else if DECL_RE.is_match(line) {
                i = keep_type(lines, i, &mut out);
            } else {
                i += 1;
            }
        }

        out.finish()
    }
}

/// Keep an import line, following grouped forms such as Go's `import (`
/// or Rust's `use a::{` across lines.
fn keep_import<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let line = lines[start];
    let stripped = line.trim_start();
    out.keep(line);
    let mut i = start + 1;

    if line.contains('(') && !line.contains(')') {
        while i < lines.len() {
            out.keep(lines[i]);
            i += 1;
            if lines[i - 1].contains(')') {
                break;
            }
        }
    } else if stripped.starts_with("use ") || stripped.starts_with("pub use ") {
        let mut depth = brace_delta(line);
        while i < lines.len() && depth > 0 {
            out.keep(lines[i]);
            depth += brace_delta(lines[i]);
            i += 1;
        }
    }
    i
}

/// Keep header lines up to the one that opens the body.
///
/// Returns the resume index and the brace depth after the header, or `None`
/// for the depth when the header ends in `;` or at end of input without
/// opening a body.
fn keep_header<'a>(
    lines: &[&'a str],
    start: usize,
    out: &mut Outline<'a>,
    cut_at_brace: bool,
) -> (usize, Option<isize>) {
    let mut depth = 0;
    let mut i = start;
    while i < lines.len() {
        let line = lines[i];
        depth += brace_delta(line);
        i += 1;
        if line.contains('{') {
            if cut_at_brace {
                out.keep(through_body_brace(line));
            } else {
                out.keep(line);
            }
            return (i, Some(depth));
        }
        out.keep(line);
        if line.trim_end().ends_with(';') {
            break;
        }
    }
    (i, None)
}

fn keep_function<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let indent = indent_of(lines[start]);
    let (next, depth) = keep_header(lines, start, out, true);
    let Some(depth) = depth else {
        return next;
    };
    out.elide(indent + 2, BRACE_ELISION);
    skip_braces(lines, next, depth)
}

fn keep_type<'a>(lines: &[&'a str], start: usize, out: &mut Outline<'a>) -> usize {
    let (next, depth) = keep_header(lines, start, out, false);
    match depth {
        Some(depth) if depth > 0 => scan_members(lines, next, depth, out),
        _ => next,
    }
}

/// Scan a type body that is `depth` braces deep at `start`.
///
/// Returns the index after the closing brace of the type.
fn scan_members<'a>(
    lines: &[&'a str],
    start: usize,
    mut depth: isize,
    out: &mut Outline<'a>,
) -> usize {
    let mut i = start;

    while i < lines.len() && depth > 0 {
        let line = lines[i];
        let stripped = line.trim_start();
        let delta = brace_delta(line);

        if depth != 1 {
            depth += delta;
            i += 1;
            continue;
        }

        if stripped.starts_with('}') {
            out.keep(line);
            depth += delta;
            i += 1;
        } else if stripped.is_empty() {
            out.blank();
            i += 1;
        } else if is_block_comment_start(stripped) {
            i = keep_block_comment(lines, i, out);
        } else if stripped.starts_with("//")
            || stripped.starts_with('#')
            || stripped.starts_with('@')
        {
            out.keep(line);
            i += 1;
        } else if line.contains('{') {
            out.keep(through_body_brace(line));
            out.elide(indent_of(line) + 2, BRACE_ELISION);
            i = skip_braces(lines, i + 1, delta);
        } else {
            out.keep(line);
            i += 1;
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(language: Language, code: &str) -> Vec<String> {
        let lines: Vec<&str> = code.lines().collect();
        CurlyScanner::for_language(language)
            .extract(&lines)
            .into_iter()
            .map(Cow::into_owned)
            .collect()
    }

    #[test]
    fn java_class_methods_are_elided() {
        let code = r#"package com.acme;

import java.util.List;

/** Order lookups. */
@Service
public class OrderService {
    private final Repo repo;

    public int count() { return repo.size(); }

    public List<Order> recent(int n) {
        var all = repo.findAll();
        all.sort(null);
        return all.subList(0, n);
    }
}
"#;
        let out = extract(Language::Java, code);
        assert_eq!(
            out,
            vec![
                "package com.acme;",
                "",
                "import java.util.List;",
                "",
                "/** Order lookups. */",
                "@Service",
                "public class OrderService {",
                "    private final Repo repo;",
                "",
                "    public int count() {",
                "      // ...",
                "",
                "    public List<Order> recent(int n) {",
                "      // ...",
                "}",
            ]
        );
    }

    #[test]
    fn go_grouped_imports_and_funcs() {
        let code = r#"package main

import (
	"fmt"
	"os"
)

type Server struct {
	Addr string
}

func (s *Server) Run() error {
	fmt.Println(s.Addr)
	if s.Addr == "" {
		os.Exit(1)
	}
	return nil
}
"#;
        let out = extract(Language::Go, code);
        assert_eq!(
            out,
            vec![
                "package main",
                "",
                "import (",
                "\t\"fmt\"",
                "\t\"os\"",
                ")",
                "",
                "type Server struct {",
                "\tAddr string",
                "}",
                "",
                "func (s *Server) Run() error {",
                "  // ...",
            ]
        );
    }

    #[test]
    fn rust_items_keep_signatures_only() {
        let code = r#"use std::collections::{
    HashMap,
    HashSet,
};

/// A unit of work.
#[derive(Debug)]
pub struct Job(u32);

pub(crate) fn run(job: Job) -> u32 {
    let x = job.0;
    x * 2
}

impl<T: Clone> Queue<T> {
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    fn len(&self) -> usize { self.items.len() }
}

fn tiny() { 1 }
const AFTER: u32 = 3;
"#;
        let out = extract(Language::Rust, code);
        assert_eq!(
            out,
            vec![
                "use std::collections::{",
                "    HashMap,",
                "    HashSet,",
                "};",
                "",
                "/// A unit of work.",
                "#[derive(Debug)]",
                "pub struct Job(u32);",
                "",
                "pub(crate) fn run(job: Job) -> u32 {",
                "  // ...",
                "",
                "impl<T: Clone> Queue<T> {",
                "    pub fn push(&mut self, item: T) {",
                "      // ...",
                "",
                "    fn len(&self) -> usize {",
                "      // ...",
                "}",
                "",
                "fn tiny() {",
                "  // ...",
            ]
        );
    }

    #[test]
    fn unbalanced_body_runs_to_end() {
        let code = "fn broken() {\n    let x = {\n    1\n";
        let out = extract(Language::Rust, code);
        assert_eq!(out, vec!["fn broken() {", "  // ..."]);
    }

    #[test]
    fn c_functions_keep_signatures_and_prototypes() {
        let code = r#"#include <stdio.h>

struct point {
    int x;
};

int add(int a, int b);

int add(int a, int b) {
    struct point p = {0};
    if (a > b) {
        return a;
    }
    return a + b;
}

static const char *
name_of(struct point *p)
{
    return "p";
}
"#;
        let out = extract(Language::C, code);
        assert_eq!(
            out,
            vec![
                "#include <stdio.h>",
                "",
                "struct point {",
                "    int x;",
                "};",
                "",
                "int add(int a, int b);",
                "",
                "int add(int a, int b) {",
                "  // ...",
                "",
                "name_of(struct point *p)",
                "{",
                "  // ...",
            ]
        );
    }

    #[test]
    fn cpp_qualified_method_definition() {
        let code = "namespace geo {

std::vector<int> Shape::corners(const Box& b) const {
    return {};
}

}
";
        let out = extract(Language::Cpp, code);
        assert_eq!(
            out,
            vec![
                "namespace geo {",
                "",
                "std::vector<int> Shape::corners(const Box& b) const {",
                "  // ...",
                "",
            ]
        );
    }

    #[test]
    fn call_shaped_lines_are_not_functions_outside_c() {
        let code = "package main

var x = compute(1)
";
        let out = extract(Language::Go, code);
        assert_eq!(out, vec!["package main", ""]);
    }

    #[test]
    fn csharp_namespace_and_interface_members() {
        let code = r#"using System;

namespace Shop
{
    public interface IRepo
    {
        Task<Item> Get(int id);
    }
}
"#;
        let out = extract(Language::CSharp, code);
        assert_eq!(
            out,
            vec![
                "using System;",
                "",
                "namespace Shop",
                "    public interface IRepo",
                "    {",
                "        Task<Item> Get(int id);",
                "    }",
            ]
        );
    }
}
