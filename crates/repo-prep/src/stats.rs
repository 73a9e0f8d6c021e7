use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters collected while preparing one repository
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrepStats {
    /// Files excluded as binary or lock files
    pub skipped_binary: usize,

    /// Files above the size ceiling
    pub skipped_oversized: usize,

    /// Text files whose content could not be read
    pub unreadable: usize,

    /// Tier-2 files moved to the listing by the budgeter
    pub demoted: usize,

    /// Tier-1 files cut down by the budgeter
    pub truncated: usize,

    /// Reported files per language tag
    pub languages: BTreeMap<String, usize>,

    /// Time taken in milliseconds
    pub time_ms: u64,
}

impl PrepStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, language: &str) {
        *self.languages.entry(language.to_string()).or_insert(0) += 1;
    }
}
