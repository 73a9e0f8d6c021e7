use crate::binary::{classify_file, FileClass};
use crate::config::PrepConfig;
use crate::tier::{self, Tier};
use context_code_signatures::Language;
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// A textual file discovered during the walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path on disk
    pub path: PathBuf,
    /// `/`-separated path relative to the repository root
    pub relative: String,
    /// Size in bytes
    pub size: u64,
    pub language: Language,
    pub tier: Tier,
}

/// Walk result: classified textual files plus exclusion counts
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Sorted by relative path
    pub entries: Vec<FileEntry>,
    pub skipped_binary: usize,
    pub skipped_oversized: usize,
}

/// Walks a repository and classifies every regular file it finds
pub struct RepoScanner {
    root: PathBuf,
    skip_dirs: BTreeSet<String>,
    max_file_size: u64,
    respect_gitignore: bool,
}

impl RepoScanner {
    pub fn new(root: impl AsRef<Path>, config: &PrepConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            skip_dirs: config.skip_dirs.clone(),
            max_file_size: config.max_file_size,
            respect_gitignore: config.respect_gitignore,
        }
    }

    pub fn scan(&self) -> ScanResult {
        let mut result = ScanResult::default();

        let root = self.root.clone();
        let skip_dirs = self.skip_dirs.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(self.respect_gitignore)
            .git_global(false)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .follow_links(false);
        builder.filter_entry(move |entry| !is_skipped_scope(entry.path(), &root, &skip_dirs));

        for walked in builder.build() {
            let entry = match walked {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Failed to read entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    log::warn!("Failed to stat {}: {e}", path.display());
                    continue;
                }
            };

            match classify_file(path, size, self.max_file_size) {
                FileClass::Oversized => {
                    log::debug!(
                        "Skipping large file {} ({size} bytes > {})",
                        path.display(),
                        self.max_file_size
                    );
                    result.skipped_oversized += 1;
                }
                FileClass::Binary => {
                    log::debug!("Skipping binary file {}", path.display());
                    result.skipped_binary += 1;
                }
                FileClass::Text => {
                    let Some(relative) = relative_path(path, &self.root) else {
                        continue;
                    };
                    let name = relative.rsplit('/').next().unwrap_or(&relative);
                    let tier = tier::classify(&relative, name);
                    result.entries.push(FileEntry {
                        path: path.to_path_buf(),
                        language: Language::from_path(path),
                        relative,
                        size,
                        tier,
                    });
                }
            }
        }

        result.entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        log::debug!(
            "Found {} text files ({} binary, {} oversized skipped)",
            result.entries.len(),
            result.skipped_binary,
            result.skipped_oversized
        );
        result
    }
}

/// True when any component of the path below `root` is in `skip_dirs`
fn is_skipped_scope(path: &Path, root: &Path, skip_dirs: &BTreeSet<String>) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    relative.components().any(|component| match component {
        Component::Normal(name) => skip_dirs.contains(name.to_string_lossy().as_ref()),
        _ => false,
    })
}

fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
