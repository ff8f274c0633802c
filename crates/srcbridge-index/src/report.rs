//! Read-only text rendering of snapshots for human consumption.
//!
//! The renderers never mutate an index. Alphabetical orderings here are
//! display-only; the index itself stays in walk/declaration order.

use srcbridge_core::{RepoIndex, SymbolKind};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Render a markdown repository map: statistics, files grouped by
/// directory, and an alphabetical listing of classes and structs.
pub fn render_repo_map(index: &RepoIndex) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Repository Map: {}", index.label);
    let _ = writeln!(out, "Root: {}", index.root.display());
    let _ = writeln!(out, "Indexed: {}", index.indexed_at.to_rfc3339());
    out.push('\n');

    let _ = writeln!(out, "## Statistics");
    let _ = writeln!(out, "- Total C/C++ files: {}", index.stats.total_files);
    let _ = writeln!(out, "- Source files (.c/.cpp): {}", index.stats.cpp_files);
    let _ = writeln!(out, "- Header files (.h/.hpp): {}", index.stats.header_files);
    let _ = writeln!(
        out,
        "- Total lines: {}",
        group_thousands(index.stats.total_lines)
    );
    let _ = writeln!(
        out,
        "- Total symbols: {}",
        group_thousands(index.stats.total_symbols)
    );
    out.push('\n');

    let mut by_dir: BTreeMap<String, Vec<&srcbridge_core::FileIndex>> = BTreeMap::new();
    for file in &index.files {
        by_dir.entry(file.directory().to_string()).or_default().push(file);
    }

    let _ = writeln!(out, "## Directory Structure");
    for (dir, files) in &by_dir {
        let dir_lines: usize = files.iter().map(|f| f.line_count).sum();
        let dir_symbols: usize = files.iter().map(|f| f.symbols.len()).sum();
        let _ = writeln!(
            out,
            "\n### {}/ ({} files, {} lines, {} symbols)",
            dir,
            files.len(),
            group_thousands(dir_lines),
            dir_symbols
        );
        for file in files {
            let types: Vec<&str> = file
                .symbols
                .iter()
                .filter(|s| matches!(s.kind, SymbolKind::Class | SymbolKind::Struct))
                .map(|s| s.name.as_str())
                .take(3)
                .collect();
            let extra = if types.is_empty() {
                String::new()
            } else {
                format!(" [{}]", types.join(", "))
            };
            let _ = writeln!(out, "  {} ({} lines){}", file.path, file.line_count, extra);
        }
    }

    let _ = writeln!(out, "\n## Key Classes & Structs");
    let mut types: Vec<(&str, SymbolKind, &str, usize)> = index
        .files
        .iter()
        .flat_map(|f| {
            f.symbols
                .iter()
                .filter(|s| matches!(s.kind, SymbolKind::Class | SymbolKind::Struct))
                .map(|s| (s.name.as_str(), s.kind, f.path.as_str(), s.line))
        })
        .collect();
    types.sort_by(|a, b| a.0.cmp(b.0).then(a.2.cmp(b.2)));

    for (name, kind, file, line) in types {
        let _ = writeln!(out, "- {kind} `{name}` in `{file}:{line}`");
    }

    out
}

/// Render the two compared snapshots side by side: one stats row per
/// metric with the delta from `original` to `next`.
pub fn render_comparison(original: &RepoIndex, next: &RepoIndex) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "# Comparison: {} vs {}",
        original.label, next.label
    );
    let _ = writeln!(out, "Original root: {}", original.root.display());
    let _ = writeln!(out, "Next root:     {}", next.root.display());
    out.push('\n');

    let rows = [
        ("Total files", original.stats.total_files, next.stats.total_files),
        ("Source files", original.stats.cpp_files, next.stats.cpp_files),
        ("Header files", original.stats.header_files, next.stats.header_files),
        ("Total lines", original.stats.total_lines, next.stats.total_lines),
        ("Total symbols", original.stats.total_symbols, next.stats.total_symbols),
    ];

    let _ = writeln!(out, "| Metric | {} | {} | Delta |", original.label, next.label);
    let _ = writeln!(out, "|---|---|---|---|");
    for (metric, before, after) in rows {
        let delta = after as i64 - before as i64;
        let _ = writeln!(
            out,
            "| {} | {} | {} | {:+} |",
            metric,
            group_thousands(before),
            group_thousands(after),
            delta
        );
    }

    let diagnostics = original.diagnostics.len() + next.diagnostics.len();
    if diagnostics > 0 {
        let _ = writeln!(out, "\n{diagnostics} indexing diagnostics recorded.");
    }

    out
}

/// `1234567` -> `1,234,567`.
fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use srcbridge_core::{FileIndex, Stats, SymbolEntry};
    use std::path::PathBuf;

    fn symbol(name: &str, kind: SymbolKind, line: usize) -> SymbolEntry {
        SymbolEntry {
            name: name.to_string(),
            kind,
            line,
            signature: None,
        }
    }

    fn build_index(label: &str, files: Vec<FileIndex>) -> RepoIndex {
        let stats = Stats::from_files(&files, &["c".into(), "cpp".into()]);
        RepoIndex {
            label: label.to_string(),
            root: PathBuf::from("/repo"),
            indexed_at: Utc::now(),
            stats,
            files,
            diagnostics: Vec::new(),
        }
    }

    fn sample() -> RepoIndex {
        build_index(
            "original",
            vec![
                FileIndex {
                    path: "main.cpp".to_string(),
                    line_count: 50,
                    symbols: vec![symbol("main", SymbolKind::Function, 3)],
                },
                FileIndex {
                    path: "ui/widget.h".to_string(),
                    line_count: 2000,
                    symbols: vec![
                        symbol("Widget", SymbolKind::Class, 5),
                        symbol("Anchor", SymbolKind::Struct, 40),
                    ],
                },
            ],
        )
    }

    #[test]
    fn map_contains_stats_block() {
        let map = render_repo_map(&sample());
        assert!(map.contains("# Repository Map: original"));
        assert!(map.contains("- Total C/C++ files: 2"));
        assert!(map.contains("- Total lines: 2,050"));
    }

    #[test]
    fn map_groups_files_by_directory() {
        let map = render_repo_map(&sample());
        assert!(map.contains("### ./ (1 files, 50 lines, 1 symbols)"));
        assert!(map.contains("### ui/ (1 files, 2,000 lines, 2 symbols)"));
        assert!(map.contains("  ui/widget.h (2000 lines) [Widget, Anchor]"));
    }

    #[test]
    fn key_types_are_alphabetical() {
        let map = render_repo_map(&sample());
        let anchor = map.find("- struct `Anchor`").expect("Anchor listed");
        let widget = map.find("- class `Widget`").expect("Widget listed");
        assert!(anchor < widget);
        assert!(map.contains("`ui/widget.h:5`"));
    }

    #[test]
    fn functions_do_not_appear_in_key_types() {
        let map = render_repo_map(&sample());
        assert!(!map.contains("`main` in"));
    }

    #[test]
    fn comparison_shows_deltas() {
        let original = sample();
        let next = build_index(
            "next",
            vec![FileIndex {
                path: "main.cpp".to_string(),
                line_count: 30,
                symbols: vec![symbol("main", SymbolKind::Function, 1)],
            }],
        );
        let report = render_comparison(&original, &next);
        assert!(report.contains("# Comparison: original vs next"));
        assert!(report.contains("| Total files | 2 | 1 | -1 |"));
        assert!(report.contains("| Total lines | 2,050 | 30 | -2020 |"));
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
    }
}
