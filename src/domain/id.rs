//! Task identifiers
//!
//! Task records carry loosely typed identifiers: integers, strings, or any
//! other JSON scalar. A task without an `id` is identified by its zero-based
//! position in the input.
//!
//! Numeric identifiers compare by value, so `2` and `2.0` name the same task
//! while `"2"` (a string) names a different one.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("identifier must be a scalar value, got {0}")]
    Unhashable(String),
}

/// Identifier of a task within one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskId {
    /// Integral numbers (including floats with no fractional part)
    Int(i64),
    /// String identifiers
    Text(String),
    /// Any other scalar (fractional numbers, booleans, null), keyed by its JSON form
    Other(String),
}

impl TaskId {
    /// Identifier for a task that has no explicit `id`
    pub fn from_position(position: usize) -> Self {
        TaskId::Int(position as i64)
    }

    /// Converts a JSON value into an identifier
    ///
    /// Arrays and objects cannot identify a task.
    pub fn from_value(value: &Value) -> Result<Self, IdError> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(TaskId::Int(i));
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(TaskId::Int(f as i64))
                    }
                    _ => Ok(TaskId::Other(n.to_string())),
                }
            }
            Value::String(s) => Ok(TaskId::Text(s.clone())),
            Value::Bool(b) => Ok(TaskId::Other(b.to_string())),
            Value::Null => Ok(TaskId::Other("null".to_string())),
            Value::Array(_) | Value::Object(_) => Err(IdError::Unhashable(value.to_string())),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Int(i) => write!(f, "{}", i),
            TaskId::Text(s) | TaskId::Other(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        TaskId::Int(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        TaskId::Text(value.to_string())
    }
}

impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TaskId::Int(i) => serializer.serialize_i64(*i),
            TaskId::Text(s) | TaskId::Other(s) => serializer.serialize_str(s),
        }
    }
}
