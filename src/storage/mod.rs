//! # Storage Layer
//!
//! Everything that touches the filesystem: loading task lists and reading
//! configuration. Tasks themselves are never persisted.
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Task lists | JSON, JSONL or YAML | any file, or stdin |
//! | Project config | TOML | `.triage/config.toml` |
//! | Global config | TOML | platform config dir, `config.toml` |
//!
//! ## Key Types
//!
//! - [`TaskInput`] - A task list plus the strategy named in its envelope
//! - [`Config`] - Project and global configuration

mod input;
mod config;

pub use input::{InputError, InputFormat, TaskInput};
pub use config::{Config, ConfigError, GlobalConfig, ProjectConfig, PROJECT_DIR};
