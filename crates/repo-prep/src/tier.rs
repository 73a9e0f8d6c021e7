use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority bucket for a textual file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Full content
    Key = 1,
    /// Signature outline only
    Source = 2,
    /// Path listing only
    Listed = 3,
}

impl Tier {
    pub const fn number(self) -> u8 {
        self as u8
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.number()
    }
}

impl TryFrom<u8> for Tier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Key),
            2 => Ok(Self::Source),
            3 => Ok(Self::Listed),
            other => Err(format!("tier must be 1, 2 or 3, got {other}")),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tier {}", self.number())
    }
}

const DOC_PREFIXES: &[&str] = &["readme", "contributing", "changelog"];

const ENTRY_POINT_NAMES: &[&str] = &[
    "main.py",
    "app.py",
    "server.py",
    "index.ts",
    "index.js",
    "server.js",
    "server.ts",
    "app.js",
    "app.ts",
    "main.go",
    "main.rs",
    "main.java",
    "application.java",
    "program.cs",
];

const CONFIG_FILE_NAMES: &[&str] = &[
    "docker-compose.yml",
    "docker-compose.yaml",
    "docker-compose.override.yml",
    "compose.yml",
    "compose.yaml",
    "dockerfile",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "package.json",
    "go.mod",
    "pyproject.toml",
    "cargo.toml",
    "requirements.txt",
    "gemfile",
    "makefile",
    "cmakelists.txt",
    "tsconfig.json",
    "webpack.config.js",
    "vite.config.ts",
    "vite.config.js",
];

const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "toml", "ini"];

const DOMAIN_KEYWORDS: &[&str] = &[
    "route",
    "controller",
    "handler",
    "endpoint",
    "model",
    "schema",
    "entity",
    "migration",
];

const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "java", "go", "js", "ts", "jsx", "tsx", "rb", "rs", "cs", "php", "sql", "graphql",
    "proto", "kt", "kts", "swift", "c", "h", "cpp", "cc", "cxx", "hpp",
];

/// Assign a tier to a textual file.
///
/// `relative` is the `/`-separated path from the repository root and `name`
/// its final component. Rules are evaluated in order; the first match wins.
pub fn classify(relative: &str, name: &str) -> Tier {
    let lower = name.to_lowercase();
    let (stem, ext) = split_name(&lower);

    if DOC_PREFIXES.iter().any(|prefix| stem.starts_with(prefix)) {
        return Tier::Key;
    }
    if ENTRY_POINT_NAMES.contains(&lower.as_str()) {
        return Tier::Key;
    }
    if CONFIG_FILE_NAMES.contains(&lower.as_str()) {
        return Tier::Key;
    }
    if stem == "dockerfile" || lower.starts_with("dockerfile.") {
        return Tier::Key;
    }
    if lower.starts_with("docker-compose") {
        return Tier::Key;
    }

    let is_source = SOURCE_EXTENSIONS.contains(&ext);
    if is_source && DOMAIN_KEYWORDS.iter().any(|kw| stem.contains(kw)) {
        return Tier::Key;
    }
    if CONFIG_EXTENSIONS.contains(&ext) && is_config_location(relative) {
        return Tier::Key;
    }
    if is_source {
        return Tier::Source;
    }
    Tier::Listed
}

/// Repository root, or directly inside a top-level `config/` directory
fn is_config_location(relative: &str) -> bool {
    let parts: Vec<&str> = relative.split('/').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [_] => true,
        [dir, _] => dir.eq_ignore_ascii_case("config"),
        _ => false,
    }
}

/// Split a lowercased file name into stem and extension.
///
/// A leading dot does not start an extension (`.env` has stem `.env`).
fn split_name(lower: &str) -> (&str, &str) {
    match lower.rfind('.') {
        Some(pos) if pos > 0 => (&lower[..pos], &lower[pos + 1..]),
        _ => (lower, ""),
    }
}
