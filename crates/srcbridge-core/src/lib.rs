//! srcbridge-core: Shared types, errors, and configuration for the srcbridge indexer.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::*;
pub use types::*;
