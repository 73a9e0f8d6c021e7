//! # Context Repo Prep
//!
//! Budgeted triage of a whole repository for a reader with a limited
//! context window.
//!
//! ## Pipeline
//!
//! ```text
//! Directory
//!     │
//!     ├──> Repo Scanner (skip dirs, size ceiling, binary sniff)
//!     │      └─> FileEntry { tier, language }
//!     │
//!     ├──> Reader
//!     │      ├─> Tier 1: full content
//!     │      ├─> Tier 2: signature outline
//!     │      └─> Tier 3: path only
//!     │
//!     ├──> Tree Renderer
//!     │
//!     └──> Token Budget (demote Tier 2, then truncate Tier 1)
//!            └─> RepoManifest
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use context_repo_prep::{PrepConfig, RepoPreparer};
//!
//! fn main() -> context_repo_prep::Result<()> {
//!     let preparer = RepoPreparer::new(PrepConfig::default().with_max_tokens(60_000))?;
//!     let manifest = preparer.prepare("/path/to/repo")?;
//!
//!     println!("{}: {}", manifest.repo_name, manifest.summary());
//!     Ok(())
//! }
//! ```

mod binary;
mod budget;
mod config;
mod error;
mod manifest;
mod preparer;
mod scanner;
mod stats;
mod tier;
mod tree;

pub use binary::{classify_file, has_binary_extension, is_lock_file, sniff_binary, FileClass};
pub use budget::{
    estimate_tokens, truncate_lines, BudgetOutcome, TokenBudget, CHARS_PER_TOKEN,
    PROMPT_OVERHEAD_TOKENS, TRUNCATED_TIER1_LINES, TRUNCATION_MARKER,
};
pub use config::{PrepConfig, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_TOKENS, DEFAULT_SKIP_DIRS};
pub use error::{PrepError, Result};
pub use manifest::{RepoManifest, Tier1Record, Tier2Record};
pub use preparer::RepoPreparer;
pub use scanner::{FileEntry, RepoScanner, ScanResult};
pub use stats::PrepStats;
pub use tier::{classify as classify_tier, Tier};
pub use tree::{render_file_tree, EMPTY_TREE};

pub use context_code_signatures::Language;
