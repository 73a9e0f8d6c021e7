use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes inspected when sniffing for binary content
pub const SNIFF_BYTES: usize = 8192;

#[rustfmt::skip]
const BINARY_EXTENSIONS: &[&str] = &[
    // images
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp", "tiff",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
    // archives
    "zip", "tar", "gz", "bz2", "xz", "rar", "7z",
    // compiled artifacts
    "pyc", "pyo", "class", "o", "so", "dylib", "dll", "exe", "jar", "war", "ear",
    // media
    "mp3", "mp4", "avi", "mov", "wav", "flac",
    // documents / databases
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "db", "sqlite", "sqlite3",
];

/// Dependency lock files: textual, but noise for a reader
const LOCK_FILES: &[&str] = &[
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "poetry.lock",
    "Cargo.lock",
    "go.sum",
    "Gemfile.lock",
    "composer.lock",
    "Pipfile.lock",
];

/// Outcome of classifying a walked file before any content is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileClass {
    Text,
    Binary,
    /// Above the size ceiling; excluded without being inspected
    Oversized,
}

/// Classify a file by size, extension, lock-file name and a null-byte sniff,
/// in that order.
pub fn classify_file(path: &Path, size: u64, max_file_size: u64) -> FileClass {
    if size > max_file_size {
        return FileClass::Oversized;
    }
    if has_binary_extension(path) || is_lock_file(path) || sniff_binary(path) {
        return FileClass::Binary;
    }
    FileClass::Text
}

pub fn has_binary_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            BINARY_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
}

pub fn is_lock_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            LOCK_FILES
                .iter()
                .any(|candidate| name.eq_ignore_ascii_case(candidate))
        })
}

/// A null byte in the first [`SNIFF_BYTES`] means binary.
/// Files that cannot be opened or read are treated as binary too.
pub fn sniff_binary(path: &Path) -> bool {
    let mut buf = [0u8; SNIFF_BYTES];
    let read = File::open(path).and_then(|file| {
        let mut filled = 0;
        let mut limited = file.take(SNIFF_BYTES as u64);
        loop {
            let n = limited.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    });
    match read {
        Ok(n) => buf[..n].contains(&0),
        Err(e) => {
            log::debug!("Treating {} as binary: {e}", path.display());
            true
        }
    }
}
