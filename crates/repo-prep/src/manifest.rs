use crate::budget::estimate_tokens;
use crate::stats::PrepStats;
use context_code_signatures::Language;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::path::PathBuf;

/// Hex digits kept from the manifest digest
const FINGERPRINT_LEN: usize = 20;

/// A file presented with its full text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier1Record {
    pub path: String,
    pub content: String,
    pub language: Language,
}

impl Tier1Record {
    pub fn tokens(&self) -> usize {
        estimate_tokens(&self.content)
    }
}

/// A source file presented as its signature outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier2Record {
    pub path: String,
    pub signatures: String,
    pub language: Language,
}

impl Tier2Record {
    pub fn tokens(&self) -> usize {
        estimate_tokens(&self.signatures)
    }
}

/// Budgeted view of one repository snapshot.
///
/// Every reported file appears exactly once across `tier1_files`,
/// `tier2_files` and `tier3_files`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoManifest {
    pub repo_name: String,
    pub repo_path: PathBuf,
    pub file_tree: String,
    pub tier1_files: Vec<Tier1Record>,
    pub tier2_files: Vec<Tier2Record>,
    /// Sorted paths, demoted Tier-2 files included
    pub tier3_files: Vec<String>,
    pub total_files: usize,
    pub estimated_tokens: usize,
    pub stats: PrepStats,
}

impl RepoManifest {
    pub fn is_empty(&self) -> bool {
        self.total_files == 0
    }

    pub fn within_budget(&self, limit: usize) -> bool {
        self.estimated_tokens <= limit
    }

    /// One-line overview, e.g. `12 files (3 key, 7 signatures, 2 listed)`
    pub fn summary(&self) -> String {
        format!(
            "{} files ({} key, {} signatures, {} listed)",
            self.total_files,
            self.tier1_files.len(),
            self.tier2_files.len(),
            self.tier3_files.len()
        )
    }

    /// Stable content key: changes whenever the tree or any presented
    /// content changes. Listing-only files affect it through the tree.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.file_tree.as_bytes());
        for record in &self.tier1_files {
            hasher.update(record.path.as_bytes());
            hasher.update([0]);
            hasher.update(record.content.as_bytes());
            hasher.update([0]);
        }
        for record in &self.tier2_files {
            hasher.update(record.path.as_bytes());
            hasher.update([0]);
            hasher.update(record.signatures.as_bytes());
            hasher.update([0]);
        }
        let digest = hasher.finalize();

        let mut out = String::with_capacity(digest.len() * 2);
        for b in digest.iter() {
            let _ = write!(out, "{b:02x}");
        }
        out.truncate(FINGERPRINT_LEN);
        out
    }
}
