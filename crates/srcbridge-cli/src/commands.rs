//! Command implementations: index, map, files, symbols, compare.

use srcbridge_core::IndexConfig;
use srcbridge_index::{find_files, find_symbols, report, IndexStore, Indexer};
use std::path::Path;

pub(crate) fn cmd_index(config: &IndexConfig, path: &Path, label: &str) -> anyhow::Result<()> {
    let index = Indexer::new(config.clone()).index_repo(path, label)?;

    println!("Indexed '{}' at {}", index.label, index.root.display());
    println!("  Files:   {}", index.stats.total_files);
    println!("  Source:  {}", index.stats.cpp_files);
    println!("  Headers: {}", index.stats.header_files);
    println!("  Lines:   {}", index.stats.total_lines);
    println!("  Symbols: {}", index.stats.total_symbols);
    if !index.diagnostics.is_empty() {
        eprintln!("{} diagnostics:", index.diagnostics.len());
        for diagnostic in &index.diagnostics {
            eprintln!("  {diagnostic}");
        }
    }
    Ok(())
}

pub(crate) fn cmd_map(
    config: &IndexConfig,
    path: &Path,
    label: &str,
    json: bool,
) -> anyhow::Result<()> {
    let index = Indexer::new(config.clone()).index_repo(path, label)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&index)?);
    } else {
        print!("{}", report::render_repo_map(&index));
    }
    Ok(())
}

pub(crate) fn cmd_files(config: &IndexConfig, path: &Path, pattern: &str) -> anyhow::Result<()> {
    let index = Indexer::new(config.clone()).index_repo(path, "query")?;
    let files = find_files(&index, pattern)?;
    for file in &files {
        println!("{}", file.path);
    }
    eprintln!("{} files matched.", files.len());
    Ok(())
}

pub(crate) fn cmd_symbols(config: &IndexConfig, path: &Path, pattern: &str) -> anyhow::Result<()> {
    let index = Indexer::new(config.clone()).index_repo(path, "query")?;
    let hits = find_symbols(&index, pattern)?;
    for hit in &hits {
        println!(
            "{} ({}) in {}:{}",
            hit.symbol.name, hit.symbol.kind, hit.file, hit.symbol.line
        );
    }
    eprintln!("{} symbols matched.", hits.len());
    Ok(())
}

pub(crate) fn cmd_compare(config: &IndexConfig, original: &Path, next: &Path) -> anyhow::Result<()> {
    let store = IndexStore::new(config.clone());
    let original = store.index(original, "original")?;
    let next = store.index(next, "next")?;
    print!("{}", report::render_comparison(&original, &next));
    Ok(())
}
