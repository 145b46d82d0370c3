//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `init` | Write a default `.triage/config.toml` |
//! | `analyze` | Score and rank tasks, with an explanation per task |
//! | `matrix` | Group ranked tasks into Eisenhower quadrants |
//! | `cycles` | Show tasks flagged as circular dependencies |
//! | `strategies` | List scoring strategies |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - `{"status": "success", "data": ...}` envelope
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output:
//! ```bash
//! triage --verbose analyze tasks.json --today 2025-01-15
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod rank;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use rank::{InputArgs, ScoringArgs};
