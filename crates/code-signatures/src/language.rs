use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Language tag attached to every file that reaches the manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
    Go,
    JavaScript,
    TypeScript,
    Ruby,
    Rust,
    CSharp,
    Php,
    Sql,
    GraphQl,
    Protobuf,
    Kotlin,
    Swift,
    C,
    Cpp,
    Yaml,
    Toml,
    Json,
    Xml,
    Ini,
    Markdown,
    RestructuredText,
    Text,
    Bash,
    Zsh,
    Dockerfile,
    Unknown,
}

/// Scanner family used to reduce a file of this language to its signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScannerFamily {
    /// Indentation-scoped blocks (Python)
    Indentation,
    /// Brace-scoped type and function bodies (Java, Go, C#, Rust, ...)
    Curly,
    /// Brace-scoped with declarative interface/type bodies (JavaScript, TypeScript)
    NestedBody,
    /// Structural keyword lines only
    Keyword,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "py" | "pyi" => Language::Python,
            "java" => Language::Java,
            "go" => Language::Go,
            "js" | "jsx" | "mjs" | "cjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "rb" => Language::Ruby,
            "rs" => Language::Rust,
            "cs" => Language::CSharp,
            "php" => Language::Php,
            "sql" => Language::Sql,
            "graphql" | "gql" => Language::GraphQl,
            "proto" => Language::Protobuf,
            "kt" | "kts" => Language::Kotlin,
            "swift" => Language::Swift,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "yaml" | "yml" => Language::Yaml,
            "toml" => Language::Toml,
            "json" => Language::Json,
            "xml" => Language::Xml,
            "ini" | "cfg" => Language::Ini,
            "md" => Language::Markdown,
            "rst" => Language::RestructuredText,
            "txt" => Language::Text,
            "sh" | "bash" => Language::Bash,
            "zsh" => Language::Zsh,
            "dockerfile" => Language::Dockerfile,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    ///
    /// `Dockerfile`, `Dockerfile.prod` and friends are recognised by name
    /// before the extension is consulted.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let is_dockerfile = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_lowercase().starts_with("dockerfile"));
        if is_dockerfile {
            return Language::Dockerfile;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Java => "java",
            Language::Go => "go",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Ruby => "ruby",
            Language::Rust => "rust",
            Language::CSharp => "csharp",
            Language::Php => "php",
            Language::Sql => "sql",
            Language::GraphQl => "graphql",
            Language::Protobuf => "protobuf",
            Language::Kotlin => "kotlin",
            Language::Swift => "swift",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Yaml => "yaml",
            Language::Toml => "toml",
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Ini => "ini",
            Language::Markdown => "markdown",
            Language::RestructuredText => "restructuredtext",
            Language::Text => "text",
            Language::Bash => "bash",
            Language::Zsh => "zsh",
            Language::Dockerfile => "dockerfile",
            Language::Unknown => "unknown",
        }
    }

    /// Scanner family that extracts signatures for this language
    pub fn family(self) -> ScannerFamily {
        match self {
            Language::Python => ScannerFamily::Indentation,
            Language::JavaScript | Language::TypeScript => ScannerFamily::NestedBody,
            Language::Java
            | Language::Go
            | Language::CSharp
            | Language::Rust
            | Language::Kotlin
            | Language::Swift
            | Language::C
            | Language::Cpp => ScannerFamily::Curly,
            _ => ScannerFamily::Keyword,
        }
    }

    /// Line prefixes that introduce imports, packages and namespaces
    pub fn import_patterns(self) -> &'static [&'static str] {
        match self {
            Language::Java | Language::Go | Language::Kotlin => &["import ", "package "],
            Language::Swift => &["import "],
            Language::CSharp => &["using ", "namespace "],
            Language::Rust => &["use ", "mod ", "extern crate ", "pub use ", "pub mod "],
            Language::C | Language::Cpp => &["#include", "using ", "namespace "],
            _ => &["import ", "package ", "use "],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(Language::from_extension("rs"), Language::Rust);
        assert_eq!(Language::from_extension("RS"), Language::Rust);
        assert_eq!(Language::from_extension("py"), Language::Python);
        assert_eq!(Language::from_extension("pyi"), Language::Python);
        assert_eq!(Language::from_extension("jsx"), Language::JavaScript);
        assert_eq!(Language::from_extension("tsx"), Language::TypeScript);
        assert_eq!(Language::from_extension("gql"), Language::GraphQl);
        assert_eq!(Language::from_extension("cfg"), Language::Ini);
        assert_eq!(Language::from_extension("unknown"), Language::Unknown);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Language::from_path("test.rs"), Language::Rust);
        assert_eq!(Language::from_path("src/main.py"), Language::Python);
        assert_eq!(Language::from_path("index.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("Dockerfile"), Language::Dockerfile);
        assert_eq!(Language::from_path("deploy/Dockerfile.prod"), Language::Dockerfile);
        assert_eq!(Language::from_path("no_extension"), Language::Unknown);
    }

    #[test]
    fn test_families() {
        assert_eq!(Language::Python.family(), ScannerFamily::Indentation);
        assert_eq!(Language::TypeScript.family(), ScannerFamily::NestedBody);
        assert_eq!(Language::Go.family(), ScannerFamily::Curly);
        assert_eq!(Language::Rust.family(), ScannerFamily::Curly);
        assert_eq!(Language::Ruby.family(), ScannerFamily::Keyword);
        assert_eq!(Language::Unknown.family(), ScannerFamily::Keyword);
    }

    #[test]
    fn test_tags_match_serde() {
        for lang in [Language::CSharp, Language::GraphQl, Language::RestructuredText] {
            let json = serde_json::to_string(&lang).unwrap();
            assert_eq!(json, format!("\"{}\"", lang.as_str()));
        }
    }

    #[test]
    fn test_import_patterns() {
        assert!(Language::Rust.import_patterns().contains(&"use "));
        assert!(Language::CSharp.import_patterns().contains(&"namespace "));
        assert!(Language::Go.import_patterns().contains(&"package "));
    }
}
