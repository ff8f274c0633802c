//! Read-only queries over a built snapshot.
//!
//! File lookups use glob patterns, symbol lookups use regular expressions
//! matched against symbol names. Both borrow from the snapshot; results
//! follow index order (files as walked, symbols as declared).

use globset::GlobBuilder;
use regex::Regex;
use srcbridge_core::{BridgeError, FileIndex, RepoIndex, SymbolEntry};

/// One symbol match, tied to the file that declares it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolHit<'a> {
    pub file: &'a str,
    pub symbol: &'a SymbolEntry,
}

/// Find files whose path matches a glob pattern.
///
/// A pattern containing '/' is matched against the full root-relative path
/// with `*` confined to one segment; a pattern without '/' is matched
/// against the file name alone, so `*.cpp` finds sources at any depth.
pub fn find_files<'a>(
    index: &'a RepoIndex,
    pattern: &str,
) -> Result<Vec<&'a FileIndex>, BridgeError> {
    let glob = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|e| BridgeError::InvalidPattern(format!("{pattern}: {e}")))?
        .compile_matcher();
    let on_basename = !pattern.contains('/');

    Ok(index
        .files
        .iter()
        .filter(|file| {
            if on_basename {
                glob.is_match(file.file_name())
            } else {
                glob.is_match(&file.path)
            }
        })
        .collect())
}

/// Find symbols whose name matches a regular expression.
///
/// The pattern is unanchored: `draw` matches `redraw_all`, `^draw$` only
/// an exact `draw`. Hits come back in file order, then declaration order.
pub fn find_symbols<'a>(
    index: &'a RepoIndex,
    pattern: &str,
) -> Result<Vec<SymbolHit<'a>>, BridgeError> {
    let re = Regex::new(pattern)
        .map_err(|e| BridgeError::InvalidPattern(format!("{pattern}: {e}")))?;

    let mut hits = Vec::new();
    for file in &index.files {
        for symbol in &file.symbols {
            if re.is_match(&symbol.name) {
                hits.push(SymbolHit {
                    file: &file.path,
                    symbol,
                });
            }
        }
    }
    Ok(hits)
}
