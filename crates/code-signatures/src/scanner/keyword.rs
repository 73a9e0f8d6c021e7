use super::{Outline, SignatureScanner};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static STRUCTURAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:import |from |require\(|export |package |use |pub |class |struct |type |interface |enum |def |fn |func |function |const |let |var |public |private |protected |abstract |static )",
    )
    .expect("valid regex")
});

static ANNOTATION_OR_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:@|//|#|/\*)").expect("valid regex"));

/// Fallback scanner: keeps lines that open with a structural keyword, plus
/// comments and annotations. Everything else is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordScanner;

impl SignatureScanner for KeywordScanner {
    fn extract<'a>(&self, lines: &[&'a str]) -> Vec<Cow<'a, str>> {
        let mut out = Outline::new();
        for line in lines {
            if line.trim().is_empty() {
                out.blank();
            } else if STRUCTURAL_RE.is_match(line) || ANNOTATION_OR_COMMENT_RE.is_match(line) {
                out.keep(line);
            }
        }
        out.finish()
    }
}
