//! Configuration module for nppa-isbn
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Only the `[source]` section is mandatory; every other section falls back to
//! its defaults.
//!
//! # Example
//!
//! ```no_run
//! use nppa_isbn::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Incremental budget: {}", config.collector.incremental_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CollectorConfig, Config, FetcherConfig, NotificationConfig, SchemeKind, SourceConfig,
    StorageBackend, StorageConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
