//! Task record model
//!
//! A task record is a loosely typed JSON mapping supplied by the caller.
//! [`TaskRecord`] keeps that mapping untouched and exposes the fields used
//! for scoring in canonical form. Numeric defaults are applied at the point
//! of use through [`TaskRecord::importance`] and
//! [`TaskRecord::estimated_hours`].

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

use super::id::{IdError, TaskId};

/// Importance used when a record has none (or an unusable value)
pub const DEFAULT_IMPORTANCE: f64 = 5.0;

/// Hour estimate used when a record has none (or an unusable value)
pub const DEFAULT_ESTIMATED_HOURS: f64 = 5.0;

/// Structural problems that make a record unusable
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("task at position {0} is not a mapping")]
    NotAMapping(usize),

    #[error("task at position {position} has an invalid id: {source}")]
    InvalidId {
        position: usize,
        #[source]
        source: IdError,
    },

    #[error("task {0} has a `dependencies` field that is not a list")]
    InvalidDependencies(TaskId),

    #[error("task {id} lists an invalid dependency: {source}")]
    InvalidDependency {
        id: TaskId,
        #[source]
        source: IdError,
    },
}

/// A caller-supplied task record in canonical form
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRecord {
    /// Explicit `id`, or the record's position when absent
    pub id: TaskId,

    /// Zero-based position in the input sequence
    pub position: usize,

    /// Display title (not used for scoring)
    pub title: Option<String>,

    /// Raw due date string, if the record has one
    pub due_date: Option<String>,

    /// Ids this task depends on, in input order (duplicates kept)
    pub dependencies: Vec<TaskId>,

    importance: Option<f64>,
    estimated_hours: Option<f64>,
    raw: Map<String, Value>,
}

impl TaskRecord {
    /// Normalizes one raw record found at `position` in the input
    pub fn from_value(position: usize, value: &Value) -> Result<Self, NormalizeError> {
        let raw = value
            .as_object()
            .ok_or(NormalizeError::NotAMapping(position))?
            .clone();

        let id = match raw.get("id") {
            Some(value) => TaskId::from_value(value)
                .map_err(|source| NormalizeError::InvalidId { position, source })?,
            None => TaskId::from_position(position),
        };

        let dependencies = match raw.get("dependencies") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    TaskId::from_value(item).map_err(|source| NormalizeError::InvalidDependency {
                        id: id.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(NormalizeError::InvalidDependencies(id)),
        };

        Ok(Self {
            title: raw.get("title").and_then(display_string),
            due_date: raw.get("due_date").and_then(Value::as_str).map(str::to_string),
            importance: coerce_number(raw.get("importance")),
            estimated_hours: coerce_number(raw.get("estimated_hours")),
            id,
            position,
            dependencies,
            raw,
        })
    }

    /// Importance rating, defaulting to [`DEFAULT_IMPORTANCE`]
    pub fn importance(&self) -> f64 {
        self.importance.unwrap_or(DEFAULT_IMPORTANCE)
    }

    /// Hour estimate, defaulting to [`DEFAULT_ESTIMATED_HOURS`]
    pub fn estimated_hours(&self) -> f64 {
        self.estimated_hours.unwrap_or(DEFAULT_ESTIMATED_HOURS)
    }

    /// The record exactly as supplied
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

/// Coerces a JSON number or numeric string to a finite float
fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn display_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Normalizes every record of the input, failing on the first structural error
pub fn normalize(tasks: &[Value]) -> Result<Vec<TaskRecord>, NormalizeError> {
    tasks
        .iter()
        .enumerate()
        .map(|(position, value)| TaskRecord::from_value(position, value))
        .collect()
}

/// Identifier lookup over normalized records
///
/// Ids are kept in order of first appearance. When several records share an
/// id, the last one wins.
#[derive(Debug, Default)]
pub struct TaskLookup {
    order: Vec<TaskId>,
    by_id: HashMap<TaskId, usize>,
}

impl TaskLookup {
    /// Builds the lookup from records in input order
    pub fn build(records: &[TaskRecord]) -> Self {
        let mut lookup = Self::default();
        for (index, record) in records.iter().enumerate() {
            if lookup.by_id.insert(record.id.clone(), index).is_none() {
                lookup.order.push(record.id.clone());
            } else {
                tracing::warn!(id = %record.id, position = record.position, "duplicate task id, last record wins");
            }
        }
        lookup
    }

    /// Index into the record slice for `id`
    pub fn get(&self, id: &TaskId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Unique ids in order of first appearance
    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.order.iter()
    }

    /// Number of unique ids
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if there are no records
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A task record paired with the results of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedTask {
    pub record: TaskRecord,
    pub urgency: i64,
    pub impact: i64,
    pub cyclic: bool,
    pub score: f64,
    pub explanation: String,
}

impl AnalyzedTask {
    pub fn id(&self) -> &TaskId {
        &self.record.id
    }
}

impl Serialize for AnalyzedTask {
    /// Serializes as the original record with `score` and `explanation` set
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw = self.record.raw();
        let passthrough = raw
            .iter()
            .filter(|(key, _)| key.as_str() != "score" && key.as_str() != "explanation");

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in passthrough {
            map.serialize_entry(key, value)?;
        }
        // Cyclic tasks carry the integral sentinel score
        if self.cyclic {
            map.serialize_entry("score", &(self.score as i64))?;
        } else {
            map.serialize_entry("score", &self.score)?;
        }
        map.serialize_entry("explanation", &self.explanation)?;
        map.end()
    }
}
