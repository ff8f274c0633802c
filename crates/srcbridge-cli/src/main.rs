//! srcbridge-cli: CLI entry point for the migration source index.

mod commands;

use clap::{Parser, Subcommand};
use srcbridge_core::IndexConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "srcbridge",
    about = "Heuristic C/C++ source indexer for comparing parallel codebases"
)]
#[command(version, propagate_version = true)]
struct Cli {
    /// Config file (defaults to ~/.srcbridge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index a source tree and print a summary
    Index {
        /// Directory to index
        path: PathBuf,

        /// Snapshot label (defaults to the directory name)
        #[arg(short, long)]
        label: Option<String>,
    },

    /// Render a repository map for a source tree
    Map {
        /// Directory to index
        path: PathBuf,

        /// Snapshot label (defaults to the directory name)
        #[arg(short, long)]
        label: Option<String>,

        /// Emit the raw index as JSON instead of markdown
        #[arg(long)]
        json: bool,
    },

    /// Find files matching a glob pattern
    Files {
        /// Directory to index
        path: PathBuf,

        /// Glob pattern (e.g. '*.cpp', 'src/ui/*')
        pattern: String,
    },

    /// Find symbols matching a regex pattern
    Symbols {
        /// Directory to index
        path: PathBuf,

        /// Regex pattern for symbol names
        pattern: String,
    },

    /// Index two trees and compare their statistics
    Compare {
        /// The legacy codebase
        original: PathBuf,

        /// The replacement codebase
        next: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Tracing goes to stderr; stdout carries command output only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("srcbridge=info".parse().expect("valid tracing directive")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Index { path, label } => {
            let label = resolve_label(label, &path);
            commands::cmd_index(&config, &path, &label)?;
        }
        Commands::Map { path, label, json } => {
            let label = resolve_label(label, &path);
            commands::cmd_map(&config, &path, &label, json)?;
        }
        Commands::Files { path, pattern } => {
            commands::cmd_files(&config, &path, &pattern)?;
        }
        Commands::Symbols { path, pattern } => {
            commands::cmd_symbols(&config, &path, &pattern)?;
        }
        Commands::Compare { original, next } => {
            commands::cmd_compare(&config, &original, &next)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<IndexConfig> {
    match path {
        Some(p) => Ok(IndexConfig::load(p)?),
        None => Ok(IndexConfig::load_or_default()),
    }
}

/// Explicit label, or the last path component of the indexed directory.
fn resolve_label(label: Option<String>, path: &std::path::Path) -> String {
    label.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn parse_index_command() {
        let cli = Cli::try_parse_from(["srcbridge", "index", "/repo/original"]).unwrap();
        match cli.command {
            Commands::Index { path, label } => {
                assert_eq!(path, PathBuf::from("/repo/original"));
                assert!(label.is_none());
            }
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn parse_index_with_label() {
        let cli =
            Cli::try_parse_from(["srcbridge", "index", "/repo", "--label", "original"]).unwrap();
        match cli.command {
            Commands::Index { label, .. } => assert_eq!(label.as_deref(), Some("original")),
            _ => panic!("Expected Index command"),
        }
    }

    #[test]
    fn parse_map_json_flag() {
        let cli = Cli::try_parse_from(["srcbridge", "map", "/repo", "--json"]).unwrap();
        match cli.command {
            Commands::Map { json, .. } => assert!(json),
            _ => panic!("Expected Map command"),
        }
    }

    #[test]
    fn parse_files_command() {
        let cli = Cli::try_parse_from(["srcbridge", "files", "/repo", "*.cpp"]).unwrap();
        match cli.command {
            Commands::Files { pattern, .. } => assert_eq!(pattern, "*.cpp"),
            _ => panic!("Expected Files command"),
        }
    }

    #[test]
    fn parse_symbols_command() {
        let cli = Cli::try_parse_from(["srcbridge", "symbols", "/repo", "^draw$"]).unwrap();
        match cli.command {
            Commands::Symbols { pattern, .. } => assert_eq!(pattern, "^draw$"),
            _ => panic!("Expected Symbols command"),
        }
    }

    #[test]
    fn parse_compare_command() {
        let cli = Cli::try_parse_from(["srcbridge", "compare", "/old", "/new"]).unwrap();
        match cli.command {
            Commands::Compare { original, next } => {
                assert_eq!(original, PathBuf::from("/old"));
                assert_eq!(next, PathBuf::from("/new"));
            }
            _ => panic!("Expected Compare command"),
        }
    }

    #[test]
    fn parse_global_config_flag() {
        let cli = Cli::try_parse_from([
            "srcbridge",
            "files",
            "/repo",
            "*.h",
            "--config",
            "/etc/srcbridge.toml",
        ])
        .unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/srcbridge.toml")));
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["srcbridge"]).is_err());
    }

    #[test]
    fn label_defaults_to_directory_name() {
        assert_eq!(resolve_label(None, Path::new("/repo/app-next")), "app-next");
        assert_eq!(
            resolve_label(Some("orig".into()), Path::new("/repo/x")),
            "orig"
        );
    }
}
