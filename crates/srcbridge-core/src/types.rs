//! Index data model: RepoIndex, FileIndex, SymbolEntry, Stats.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::BridgeError;

// ── Symbols ─────────────────────────────────────────────────────────────────

/// The kind of a recognized declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Function,
    Class,
    Struct,
    Method,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Class => write!(f, "class"),
            Self::Struct => write!(f, "struct"),
            Self::Method => write!(f, "method"),
        }
    }
}

impl std::str::FromStr for SymbolKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "function" => Ok(Self::Function),
            "class" => Ok(Self::Class),
            "struct" => Ok(Self::Struct),
            "method" => Ok(Self::Method),
            _ => Err(BridgeError::InvalidSymbolKind(s.to_string())),
        }
    }
}

/// One recognized declaration within a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    /// Simple name (e.g., "draw").
    pub name: String,
    /// What kind of declaration this is.
    pub kind: SymbolKind,
    /// 1-based line number of the declaration.
    pub line: usize,
    /// Raw declaration text as matched, whitespace-collapsed.
    pub signature: Option<String>,
}

// ── Files ───────────────────────────────────────────────────────────────────

/// Per-file record within a RepoIndex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileIndex {
    /// Root-relative path, '/'-separated, unique within the index.
    pub path: String,
    /// Number of lines in the file (see line-counting rule in the indexer).
    pub line_count: usize,
    /// Symbols in source order, top to bottom. Never re-sorted.
    pub symbols: Vec<SymbolEntry>,
}

impl FileIndex {
    /// File name component of the relative path.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Directory component of the relative path, "." for top-level files.
    pub fn directory(&self) -> &str {
        match self.path.rfind('/') {
            Some(pos) => &self.path[..pos],
            None => ".",
        }
    }

    /// Lower-cased extension, empty if none.
    pub fn extension(&self) -> String {
        self.file_name()
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default()
    }
}

// ── Aggregates ──────────────────────────────────────────────────────────────

/// Aggregate counters over all files in a RepoIndex. Always derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_files: usize,
    pub cpp_files: usize,
    pub header_files: usize,
    pub total_lines: usize,
    pub total_symbols: usize,
}

impl Stats {
    /// Derive stats from a file list. `source_extensions` decides which
    /// extensions count as source files; everything else admitted by the
    /// walker is a header.
    pub fn from_files(files: &[FileIndex], source_extensions: &[String]) -> Self {
        let mut stats = Self::default();
        for file in files {
            stats.total_files += 1;
            stats.total_lines += file.line_count;
            stats.total_symbols += file.symbols.len();
            if source_extensions.iter().any(|e| *e == file.extension()) {
                stats.cpp_files += 1;
            } else {
                stats.header_files += 1;
            }
        }
        stats
    }
}

/// Immutable snapshot of one indexed source tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoIndex {
    /// Identifying tag for this codebase (e.g. "original" or "next").
    pub label: String,
    /// Absolute path that was indexed.
    pub root: PathBuf,
    /// When this snapshot was built.
    pub indexed_at: DateTime<Utc>,
    /// Aggregate counters; always equal to the sums over `files`.
    pub stats: Stats,
    /// Indexed files in walker (lexicographic) order.
    pub files: Vec<FileIndex>,
    /// Soft warnings recorded during the build (skipped subtrees/files).
    /// Non-empty means the index is partial, which is not an error.
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl RepoIndex {
    /// Look up a file by its root-relative path.
    pub fn file(&self, path: &str) -> Option<&FileIndex> {
        self.files.iter().find(|f| f.path == path)
    }
}
