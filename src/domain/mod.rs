//! Domain models for triage
//!
//! Contains the scoring engine without any I/O concerns.

mod id;
mod task;
mod graph;
mod urgency;
mod strategy;
mod analyzer;
mod matrix;

pub use id::{IdError, TaskId};
pub use task::{
    normalize, AnalyzedTask, NormalizeError, TaskLookup, TaskRecord, DEFAULT_ESTIMATED_HOURS,
    DEFAULT_IMPORTANCE,
};
pub use graph::{DependencyGraph, ImpactIndex, IMPACT_PER_DEPENDENT};
pub use urgency::{business_days_between, days_left, parse_due_date, urgency, DUE_DATE_FORMAT};
pub use strategy::{score, Factors, ScoreError, Scored, SmartWeights, Strategy, CYCLIC_SCORE};
pub use analyzer::{analyze, AnalyzeError, Analyzer};
pub use matrix::{EisenhowerMatrix, MatrixThresholds, Quadrant};
