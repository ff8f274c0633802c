//! Snapshot construction: walk a tree, extract symbols in parallel,
//! aggregate one immutable `RepoIndex`.

use crate::extract::{ExtractStrategy, HeuristicExtractor};
use crate::walker::FileWalker;
use chrono::Utc;
use srcbridge_core::{BridgeError, FileIndex, IndexConfig, RepoIndex, Stats};
use std::path::Path;
use std::sync::Arc;

/// Builds `RepoIndex` snapshots. Walking is sequential; per-file reading
/// and extraction run on a bounded worker pool.
pub struct Indexer {
    config: IndexConfig,
    strategy: Arc<dyn ExtractStrategy>,
}

impl Indexer {
    pub fn new(config: IndexConfig) -> Self {
        Self::with_strategy(config, Arc::new(HeuristicExtractor::new()))
    }

    pub fn with_strategy(config: IndexConfig, strategy: Arc<dyn ExtractStrategy>) -> Self {
        Self { config, strategy }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Index the tree rooted at `root` under the given snapshot label.
    ///
    /// Fails only when the root itself is missing or unreadable. Failures
    /// below the root (unreadable subtrees, undecodable files) are recorded
    /// in the snapshot's diagnostics and the affected entries are skipped.
    pub fn index_repo(&self, root: &Path, label: &str) -> Result<RepoIndex, BridgeError> {
        let root = root.canonicalize().map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                BridgeError::PermissionDenied(root.display().to_string())
            }
            _ => BridgeError::NotFound(root.display().to_string()),
        })?;

        let walker = FileWalker::new(&self.config);
        let outcome = walker.walk(&root)?;
        let mut diagnostics = outcome.warnings;

        let files = self.extract_all(&root, &outcome.files, &mut diagnostics);
        let stats = Stats::from_files(&files, &self.config.source_extensions);

        tracing::info!(
            label,
            files = stats.total_files,
            symbols = stats.total_symbols,
            lines = stats.total_lines,
            diagnostics = diagnostics.len(),
            "indexed {}",
            root.display()
        );

        Ok(RepoIndex {
            label: label.to_string(),
            root,
            indexed_at: Utc::now(),
            stats,
            files,
            diagnostics,
        })
    }

    /// Fan relative paths out to workers, collect per-file indexes back in
    /// walker order. Failed files become diagnostics.
    fn extract_all(
        &self,
        root: &Path,
        rel_paths: &[String],
        diagnostics: &mut Vec<String>,
    ) -> Vec<FileIndex> {
        if rel_paths.is_empty() {
            return Vec::new();
        }

        let workers = self.config.effective_workers().clamp(1, rel_paths.len());
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, &str)>();
        let (result_tx, result_rx) =
            crossbeam_channel::unbounded::<(usize, &str, Result<FileIndex, String>)>();

        for job in rel_paths.iter().map(|p| p.as_str()).enumerate() {
            // Unbounded channel; send cannot block and receivers are alive.
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                let strategy = &self.strategy;
                scope.spawn(move || {
                    while let Ok((idx, rel)) = job_rx.recv() {
                        let result = index_file(root, rel, strategy.as_ref());
                        let _ = result_tx.send((idx, rel, result));
                    }
                });
            }
        });
        drop(result_tx);

        let mut indexed: Vec<(usize, FileIndex)> = Vec::with_capacity(rel_paths.len());
        for (idx, rel, result) in result_rx {
            match result {
                Ok(file) => indexed.push((idx, file)),
                Err(message) => {
                    tracing::warn!("skipping {rel}: {message}");
                    diagnostics.push(format!("skipped {rel}: {message}"));
                }
            }
        }
        indexed.sort_by_key(|(idx, _)| *idx);
        indexed.into_iter().map(|(_, file)| file).collect()
    }
}

fn index_file(root: &Path, rel: &str, strategy: &dyn ExtractStrategy) -> Result<FileIndex, String> {
    let bytes = std::fs::read(root.join(rel)).map_err(|e| e.to_string())?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(FileIndex {
        path: rel.to_string(),
        line_count: count_lines(&content),
        symbols: strategy.extract(&content),
    })
}

/// Newline-terminated line count, plus one for a non-empty final line
/// without a trailing newline. CRLF counts the same as LF.
pub fn count_lines(content: &str) -> usize {
    if content.is_empty() {
        return 0;
    }
    let terminated = content.bytes().filter(|&b| b == b'\n').count();
    if content.ends_with('\n') {
        terminated
    } else {
        terminated + 1
    }
}
