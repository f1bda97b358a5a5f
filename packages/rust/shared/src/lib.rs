//! Shared types, error model, and configuration for payloadforge.
//!
//! This crate is the foundation depended on by all other payloadforge crates.
//! It provides:
//! - [`PayloadForgeError`] — the unified error type
//! - Domain types ([`NormalizedRecord`], [`Block`], [`ErrorRecord`], [`UpstreamItem`])
//! - Configuration ([`AppConfig`], [`NormalizeConfig`], [`InputConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DEFAULT_BLOCK_CONTENT, DEFAULT_BLOCK_TYPE, DEFAULT_DESCRIPTION,
    DEFAULT_INPUT_FIELDS, DEFAULT_TITLE, DefaultsConfig, InputConfig, InputSection,
    NormalizeConfig, config_dir, config_file_path, init_config, load_config, load_config_from,
    render_config, validate_config,
};
pub use error::{PayloadForgeError, Result};
pub use types::{Block, ErrorRecord, Meta, NormalizedRecord, Outcome, UpstreamItem};
