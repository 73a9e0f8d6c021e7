use crate::budget::TokenBudget;
use crate::config::PrepConfig;
use crate::error::{PrepError, Result};
use crate::manifest::{RepoManifest, Tier1Record, Tier2Record};
use crate::scanner::{FileEntry, RepoScanner};
use crate::stats::PrepStats;
use crate::tier::Tier;
use crate::tree::render_file_tree;
use context_code_signatures::extract_signatures;
use std::path::Path;
use std::time::Instant;

/// Builds a [`RepoManifest`] for a repository on disk
#[derive(Debug, Clone)]
pub struct RepoPreparer {
    config: PrepConfig,
}

impl RepoPreparer {
    pub fn new(config: PrepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PrepConfig {
        &self.config
    }

    /// Walk, classify, read, outline and budget one repository.
    ///
    /// Only an invalid root is an error. Files that cannot be read are
    /// logged and left out of every collection and the tree.
    pub fn prepare(&self, root: impl AsRef<Path>) -> Result<RepoManifest> {
        let start = Instant::now();
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(PrepError::InvalidPath(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        let repo_path = root.canonicalize()?;
        let repo_name = repo_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| repo_path.display().to_string());

        let scan = RepoScanner::new(&repo_path, &self.config).scan();
        let mut stats = PrepStats::new();
        stats.skipped_binary = scan.skipped_binary;
        stats.skipped_oversized = scan.skipped_oversized;

        let mut listed: Vec<&FileEntry> = Vec::new();
        let mut tier1 = Vec::new();
        let mut tier2 = Vec::new();
        let mut tier3 = Vec::new();

        for entry in &scan.entries {
            match entry.tier {
                Tier::Listed => tier3.push(entry.relative.clone()),
                Tier::Key | Tier::Source => {
                    let Some(content) = read_text(entry) else {
                        stats.unreadable += 1;
                        continue;
                    };
                    if entry.tier == Tier::Key {
                        tier1.push(Tier1Record {
                            path: entry.relative.clone(),
                            content,
                            language: entry.language,
                        });
                    } else {
                        tier2.push(Tier2Record {
                            path: entry.relative.clone(),
                            signatures: extract_signatures(&content, entry.language),
                            language: entry.language,
                        });
                    }
                }
            }
            stats.add_file(entry.language.as_str());
            listed.push(entry);
        }

        let file_tree = render_file_tree(&repo_name, listed.iter().map(|e| e.relative.as_str()));
        let outcome = TokenBudget::new(self.config.max_tokens).fit(&file_tree, tier1, tier2);

        stats.demoted = outcome.demoted.len();
        stats.truncated = outcome.truncated;
        tier3.extend(outcome.demoted);
        tier3.sort();
        stats.time_ms = start.elapsed().as_millis() as u64;

        let manifest = RepoManifest {
            repo_name,
            repo_path,
            file_tree,
            tier1_files: outcome.tier1,
            tier2_files: outcome.tier2,
            tier3_files: tier3,
            total_files: listed.len(),
            estimated_tokens: outcome.estimated_tokens,
            stats,
        };

        log::info!(
            "Prepared {}: {} (~{} tokens, {} demoted, {} truncated) in {}ms",
            manifest.repo_name,
            manifest.summary(),
            manifest.estimated_tokens,
            manifest.stats.demoted,
            manifest.stats.truncated,
            manifest.stats.time_ms
        );
        Ok(manifest)
    }
}

fn read_text(entry: &FileEntry) -> Option<String> {
    match std::fs::read(&entry.path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            log::warn!("Failed to read {}: {e}", entry.path.display());
            None
        }
    }
}
