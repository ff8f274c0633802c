//! Named snapshot slots.
//!
//! Each label ("original", "next", ...) holds at most one completed
//! `RepoIndex` behind an `Arc`. Builds run outside the lock; publishing a
//! snapshot is a single swap, so readers always see either the old or the
//! new generation in full.

use crate::extract::ExtractStrategy;
use crate::indexer::Indexer;
use srcbridge_core::{BridgeError, IndexConfig, RepoIndex};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

struct Slot {
    /// Canonical root recorded at first index time, used by `reindex`.
    root: PathBuf,
    index: Arc<RepoIndex>,
}

/// Thread-safe registry of labeled snapshots.
pub struct IndexStore {
    indexer: Indexer,
    slots: RwLock<HashMap<String, Slot>>,
}

impl IndexStore {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            indexer: Indexer::new(config),
            slots: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_strategy(config: IndexConfig, strategy: Arc<dyn ExtractStrategy>) -> Self {
        Self {
            indexer: Indexer::with_strategy(config, strategy),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Build a snapshot of `root` and publish it under `label`, replacing
    /// any previous snapshot for that label.
    pub fn index(&self, root: &Path, label: &str) -> Result<Arc<RepoIndex>, BridgeError> {
        let index = Arc::new(self.indexer.index_repo(root, label)?);
        let slot = Slot {
            root: index.root.clone(),
            index: Arc::clone(&index),
        };
        self.write_slots()?.insert(label.to_string(), slot);
        Ok(index)
    }

    /// Rebuild the snapshot for a known label from its recorded root.
    ///
    /// The old snapshot stays published (and queryable) until the new one
    /// is complete; a failed rebuild leaves it untouched.
    pub fn reindex(&self, label: &str) -> Result<Arc<RepoIndex>, BridgeError> {
        let root = {
            let slots = self.read_slots()?;
            let slot = slots
                .get(label)
                .ok_or_else(|| BridgeError::NotFound(format!("no index labeled '{label}'")))?;
            slot.root.clone()
        };

        let index = Arc::new(self.indexer.index_repo(&root, label)?);
        let slot = Slot {
            root: index.root.clone(),
            index: Arc::clone(&index),
        };
        self.write_slots()?.insert(label.to_string(), slot);
        Ok(index)
    }

    /// Current snapshot for a label, if one has been built.
    pub fn get(&self, label: &str) -> Result<Option<Arc<RepoIndex>>, BridgeError> {
        Ok(self
            .read_slots()?
            .get(label)
            .map(|slot| Arc::clone(&slot.index)))
    }

    /// All labels with a published snapshot, sorted.
    pub fn labels(&self) -> Result<Vec<String>, BridgeError> {
        let mut labels: Vec<String> = self.read_slots()?.keys().cloned().collect();
        labels.sort();
        Ok(labels)
    }

    fn read_slots(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Slot>>, BridgeError> {
        self.slots
            .read()
            .map_err(|e| BridgeError::LockPoisoned(e.to_string()))
    }

    fn write_slots(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<String, Slot>>, BridgeError> {
        self.slots
            .write()
            .map_err(|e| BridgeError::LockPoisoned(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn store() -> IndexStore {
        IndexStore::new(IndexConfig::default())
    }

    #[test]
    fn get_unknown_label_is_none() {
        let store = store();
        assert!(store.get("original").unwrap().is_none());
        assert!(store.labels().unwrap().is_empty());
    }

    #[test]
    fn reindex_unknown_label_is_not_found() {
        let store = store();
        let result = store.reindex("original");
        assert!(matches!(result, Err(BridgeError::NotFound(_))));
    }

    #[test]
    fn index_publishes_under_label() {
        let dir = fixture("srcbridge_store_publish");
        fs::write(dir.join("a.cpp"), "int a() {\n    return 1;\n}\n").unwrap();

        let store = store();
        let built = store.index(&dir, "original").unwrap();
        assert_eq!(built.label, "original");

        let fetched = store.get("original").unwrap().unwrap();
        assert!(Arc::ptr_eq(&built, &fetched));
        assert_eq!(store.labels().unwrap(), vec!["original"]);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn labels_are_independent_slots() {
        let orig = fixture("srcbridge_store_orig");
        let next = fixture("srcbridge_store_next");
        fs::write(orig.join("legacy.c"), "int legacy() {\n    return 0;\n}\n").unwrap();
        fs::write(next.join("modern.cpp"), "int modern() {\n    return 0;\n}\n").unwrap();

        let store = store();
        store.index(&orig, "original").unwrap();
        store.index(&next, "next").unwrap();

        assert_eq!(store.labels().unwrap(), vec!["next", "original"]);
        let o = store.get("original").unwrap().unwrap();
        let n = store.get("next").unwrap().unwrap();
        assert!(o.file("legacy.c").is_some());
        assert!(n.file("modern.cpp").is_some());

        let _ = fs::remove_dir_all(&orig);
        let _ = fs::remove_dir_all(&next);
    }

    #[test]
    fn reindex_swaps_in_fresh_snapshot() {
        let dir = fixture("srcbridge_store_reindex");
        fs::write(dir.join("a.cpp"), "int a() {\n    return 1;\n}\n").unwrap();

        let store = store();
        let first = store.index(&dir, "original").unwrap();
        assert_eq!(first.stats.total_files, 1);

        fs::write(dir.join("b.cpp"), "int b() {\n    return 2;\n}\n").unwrap();
        let second = store.reindex("original").unwrap();
        assert_eq!(second.stats.total_files, 2);

        // The old snapshot is still self-consistent for holders.
        assert_eq!(first.stats.total_files, 1);
        let current = store.get("original").unwrap().unwrap();
        assert!(Arc::ptr_eq(&second, &current));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn reindex_is_idempotent_apart_from_timestamp() {
        let dir = fixture("srcbridge_store_idempotent");
        fs::write(
            dir.join("w.h"),
            "class Widget { public: Widget(); void draw(); };\n",
        )
        .unwrap();

        let store = store();
        let first = store.index(&dir, "original").unwrap();
        let second = store.reindex("original").unwrap();

        assert_eq!(first.stats, second.stats);
        assert_eq!(first.files, second.files);
        assert_eq!(first.root, second.root);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn readers_see_one_generation_during_reindex() {
        let dir = fixture("srcbridge_store_generations");
        for i in 0..30 {
            fs::write(
                dir.join(format!("f{i:02}.cpp")),
                format!("int fn_{i}() {{\n    return {i};\n}}\n"),
            )
            .unwrap();
        }

        let store = Arc::new(store());
        store.index(&dir, "original").unwrap();

        std::thread::scope(|scope| {
            let reader_store = Arc::clone(&store);
            let reader = scope.spawn(move || {
                for _ in 0..200 {
                    let snapshot = reader_store.get("original").unwrap().unwrap();
                    // A snapshot is internally consistent regardless of
                    // which generation the reader observed.
                    let lines: usize = snapshot.files.iter().map(|f| f.line_count).sum();
                    assert_eq!(snapshot.stats.total_lines, lines);
                    assert_eq!(snapshot.stats.total_files, snapshot.files.len());
                }
            });

            for _ in 0..5 {
                store.reindex("original").unwrap();
            }
            reader.join().unwrap();
        });

        let _ = fs::remove_dir_all(&dir);
    }
}
