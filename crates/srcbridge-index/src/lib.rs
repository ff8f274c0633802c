//! srcbridge-index: Heuristic C/C++ source indexing for migration comparison.
//!
//! Scans a directory tree of C/C++ source and header files, extracts
//! structural symbols (functions, classes, structs, methods) through lexical
//! pattern matching, and builds an immutable, queryable snapshot. Two
//! parallel codebases (e.g. the legacy tree and its rewrite) are indexed
//! independently and compared through the query and report layers.
//!
//! # Architecture
//!
//! - **walker** — deterministic enumeration of eligible files under a root
//! - **extract** — extraction strategy trait + the heuristic regex extractor
//! - **indexer** — pipeline: walk, extract in parallel, aggregate a snapshot
//! - **query** — glob file lookups and regex symbol lookups over a snapshot
//! - **store** — named snapshot slots with atomic copy-and-swap replacement
//! - **report** — read-only text/JSON rendering for human consumption

pub mod extract;
pub mod indexer;
pub mod query;
pub mod report;
pub mod store;
pub mod walker;

pub use extract::{ExtractStrategy, HeuristicExtractor};
pub use indexer::Indexer;
pub use query::{find_files, find_symbols, SymbolHit};
pub use store::IndexStore;
pub use walker::{FileWalker, WalkOutcome};
