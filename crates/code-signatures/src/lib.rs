//! # Context Code Signatures
//!
//! Heuristic, line-oriented signature extraction: reduce a source file to
//! its declarations (imports, types, function signatures, docstrings and
//! comments) with implementation bodies replaced by an elision marker.
//!
//! ## Architecture
//!
//! ```text
//! Source Code
//!     │
//!     ├──> Language Detection (from file name/extension)
//!     │
//!     ├──> Scanner Family
//!     │    ├─> Indentation  (Python)          body → `...`
//!     │    ├─> Curly        (Java/Go/C#/Rust) body → `// ...`
//!     │    ├─> NestedBody   (JS/TS)           body → `// ...`
//!     │    └─> Keyword      (everything else) structural lines only
//!     │
//!     └──> Signature text (kept lines joined with `\n`)
//! ```
//!
//! No grammar is involved, so output is a best-effort outline and is not
//! guaranteed to be valid source. Unbalanced braces or unterminated
//! docstrings make a scanner run to the end of the file instead of failing.
//!
//! ## Example
//!
//! ```rust
//! use context_code_signatures::{extract_signatures, Language};
//!
//! let code = "def area(w, h):\n    \"\"\"Area.\"\"\"\n    return w * h\n";
//! let outline = extract_signatures(code, Language::Python);
//! assert_eq!(outline, "def area(w, h):\n    \"\"\"Area.\"\"\"\n    ...");
//! ```

mod language;
mod scanner;

pub use language::{Language, ScannerFamily};
pub use scanner::{
    scanner_for, CurlyScanner, IndentScanner, KeywordScanner, NestedBodyScanner,
    SignatureScanner, BRACE_ELISION, INDENT_ELISION,
};

/// Extract the signature outline of `content`, dispatching on `language`
pub fn extract_signatures(content: &str, language: Language) -> String {
    let lines: Vec<&str> = content.lines().collect();
    scanner_for(language).extract(&lines).join("\n")
}
