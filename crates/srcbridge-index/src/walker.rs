//! Deterministic file enumeration under an index root.
//!
//! Walks a directory tree with the `ignore` crate, admits only configured
//! source/header extensions, skips hidden and excluded directories, and
//! returns root-relative paths in lexicographic order so repeated walks of
//! an unchanged tree are byte-for-byte identical.

use ignore::WalkBuilder;
use srcbridge_core::{BridgeError, IndexConfig};
use std::path::Path;

/// Result of one directory walk.
#[derive(Debug)]
pub struct WalkOutcome {
    /// Root-relative, '/'-separated paths, sorted lexicographically.
    pub files: Vec<String>,
    /// Subtrees or entries that could not be read. Never fatal.
    pub warnings: Vec<String>,
}

/// Enumerates eligible source files under a root.
pub struct FileWalker<'a> {
    config: &'a IndexConfig,
}

impl<'a> FileWalker<'a> {
    pub fn new(config: &'a IndexConfig) -> Self {
        Self { config }
    }

    /// Walk `root` and collect every admitted file.
    ///
    /// Fails with `NotFound` if the root does not exist or is not a
    /// directory, and `PermissionDenied` if the root itself cannot be read.
    /// Unreadable subtrees below the root degrade to recorded warnings.
    pub fn walk(&self, root: &Path) -> Result<WalkOutcome, BridgeError> {
        let meta = std::fs::metadata(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                BridgeError::PermissionDenied(root.display().to_string())
            }
            _ => BridgeError::NotFound(root.display().to_string()),
        })?;
        if !meta.is_dir() {
            return Err(BridgeError::NotFound(format!(
                "{} is not a directory",
                root.display()
            )));
        }

        let excluded = self.config.excluded_dirs.clone();
        // No ignore-file semantics of any kind: admission is decided solely
        // by extension and the configured directory excludes.
        let walker = WalkBuilder::new(root)
            .hidden(true)
            .ignore(false)
            .parents(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    let name = entry.file_name().to_string_lossy();
                    !excluded.iter().any(|d| *d == name)
                } else {
                    true
                }
            })
            .build();

        let mut files = Vec::new();
        let mut warnings = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("Walk error under {}: {}", root.display(), err);
                    warnings.push(format!("skipped: {err}"));
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            let path = entry.path();
            let ext = match path.extension().and_then(|e| e.to_str()) {
                Some(e) => e.to_lowercase(),
                None => continue,
            };
            if !self.config.admits_extension(&ext) {
                continue;
            }

            match path.strip_prefix(root) {
                Ok(rel) => files.push(relative_string(rel)),
                Err(_) => {
                    // Walker yielded a path outside the root; record and move on.
                    warnings.push(format!("skipped: {} outside root", path.display()));
                }
            }
        }

        files.sort();
        Ok(WalkOutcome { files, warnings })
    }
}

/// Join path components with '/' regardless of platform separator.
fn relative_string(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
