use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Directory names skipped wherever they appear in a path
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    ".venv",
    "venv",
    "__pycache__",
    "target",
    "build",
    "dist",
    ".git",
    ".idea",
    ".vscode",
];

/// Default cost-unit budget for a whole manifest
pub const DEFAULT_MAX_TOKENS: usize = 150_000;

/// Files larger than this are skipped during the walk
pub const DEFAULT_MAX_FILE_SIZE: u64 = 500_000;

/// Configuration for repository preparation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrepConfig {
    /// Directory (or file) names excluded at any depth
    pub skip_dirs: BTreeSet<String>,

    /// Maximum estimated size of the manifest, in cost units
    pub max_tokens: usize,

    /// Maximum size of a single file, in bytes
    pub max_file_size: u64,

    /// Also honour `.gitignore`/`.git/info/exclude` rules during the walk
    pub respect_gitignore: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|d| (*d).to_string()).collect(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            respect_gitignore: false,
        }
    }
}

impl PrepConfig {
    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    #[must_use]
    pub fn with_skip_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs = dirs.into_iter().map(Into::into).collect();
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(PrepError::invalid_config("max_tokens must be > 0"));
        }
        if self.max_file_size == 0 {
            return Err(PrepError::invalid_config("max_file_size must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config_valid() {
        let config = PrepConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.skip_dirs.contains("node_modules"));
        assert_eq!(config.max_tokens, 150_000);
        assert_eq!(config.max_file_size, 500_000);
    }

    #[test]
    fn test_config_validation() {
        assert!(PrepConfig::default().with_max_tokens(0).validate().is_err());
        assert!(PrepConfig::default().with_max_file_size(0).validate().is_err());
        assert!(PrepConfig::default().with_max_tokens(1).validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PrepConfig::from_toml_str("max_tokens = 8000\n").unwrap();
        assert_eq!(config.max_tokens, 8000);
        assert_eq!(config.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert_eq!(config.skip_dirs, PrepConfig::default().skip_dirs);
    }

    #[test]
    fn test_toml_overrides_skip_dirs() {
        let config =
            PrepConfig::from_toml_str("skip_dirs = [\"out\"]\nrespect_gitignore = true\n").unwrap();
        assert_eq!(config.skip_dirs.len(), 1);
        assert!(config.skip_dirs.contains("out"));
        assert!(config.respect_gitignore);
    }

    #[test]
    fn test_toml_rejects_unknown_keys_and_invalid_values() {
        assert!(matches!(
            PrepConfig::from_toml_str("max_tokenz = 1\n"),
            Err(PrepError::ConfigParse(_))
        ));
        assert!(matches!(
            PrepConfig::from_toml_str("max_tokens = 0\n"),
            Err(PrepError::InvalidConfig(_))
        ));
    }
}
