//! Triage - explainable priority ranking for task lists
//!
//! Scores every task in a list and returns the list ordered from most to
//! least urgent, with a short explanation per task. Scoring looks at due
//! dates (in business days), importance, hour estimates, how many tasks each
//! one blocks, and flags circular dependencies.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use serde_json::json;
//!
//! let tasks = vec![
//!     json!({"id": 1, "title": "Fix login", "importance": 9, "due_date": "2025-01-16"}),
//!     json!({"id": 2, "title": "Update docs", "dependencies": [1]}),
//! ];
//! let today = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
//! let ranked = triage_cli::analyze(&tasks, "smart", today).unwrap();
//! assert_eq!(ranked[0].record.id, triage_cli::TaskId::Int(1));
//! ```

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{analyze, AnalyzeError, AnalyzedTask, Analyzer, Strategy, TaskId, TaskRecord};
