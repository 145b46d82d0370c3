//! Task input loading
//!
//! Task lists arrive as JSON, JSONL (one record per line) or YAML, either as
//! a bare list or wrapped in a request envelope:
//!
//! ```json
//! {"tasks": [{"id": 1, "title": "Ship it"}], "strategy": "deadline"}
//! ```
//!
//! Records are passed on untouched; the analyzer does all coercion.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read stdin: {0}")]
    Stdin(#[source] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid JSON at line {line}: {source}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Expected a list of tasks or an object with a `tasks` list, got {0}")]
    UnexpectedShape(&'static str),
}

/// Document format of a task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InputFormat {
    #[default]
    Json,
    Jsonl,
    Yaml,
}

impl InputFormat {
    /// Guesses the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("jsonl") | Some("ndjson") => InputFormat::Jsonl,
            Some("yaml") | Some("yml") => InputFormat::Yaml,
            _ => InputFormat::Json,
        }
    }
}

/// A loaded task list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskInput {
    /// Raw task records in input order
    pub tasks: Vec<Value>,

    /// Strategy named by the envelope, if any
    pub strategy: Option<String>,
}

impl TaskInput {
    /// Reads a task list from a file, or from stdin when `path` is `None` or `-`
    pub fn read(path: Option<&Path>, format: Option<InputFormat>) -> Result<Self, InputError> {
        match path.filter(|p| p.as_os_str() != "-") {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| InputError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let format = format.unwrap_or_else(|| InputFormat::from_path(path));
                Self::parse(&content, format)
            }
            None => {
                let mut content = String::new();
                io::stdin()
                    .read_to_string(&mut content)
                    .map_err(InputError::Stdin)?;
                Self::parse(&content, format.unwrap_or_default())
            }
        }
    }

    /// Parses a document in the given format
    pub fn parse(content: &str, format: InputFormat) -> Result<Self, InputError> {
        match format {
            InputFormat::Json => Self::from_value(serde_json::from_str(content)?),
            InputFormat::Yaml => Self::from_value(serde_yaml::from_str(content)?),
            InputFormat::Jsonl => {
                let mut tasks = Vec::new();
                for (line_num, line) in content.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let task = serde_json::from_str(line).map_err(|source| {
                        InputError::JsonLine {
                            line: line_num + 1,
                            source,
                        }
                    })?;
                    tasks.push(task);
                }
                Ok(Self {
                    tasks,
                    strategy: None,
                })
            }
        }
    }

    /// Accepts a bare list or a `{"tasks": [...], "strategy": "..."}` envelope
    pub fn from_value(value: Value) -> Result<Self, InputError> {
        match value {
            Value::Array(tasks) => Ok(Self {
                tasks,
                strategy: None,
            }),
            Value::Object(mut envelope) => {
                let strategy = envelope
                    .get("strategy")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let tasks = match envelope.remove("tasks") {
                    None => Vec::new(),
                    Some(Value::Array(tasks)) => tasks,
                    Some(other) => return Err(InputError::UnexpectedShape(kind(&other))),
                };
                Ok(Self { tasks, strategy })
            }
            other => Err(InputError::UnexpectedShape(kind(&other))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn bare_json_list() {
        let input = TaskInput::parse(r#"[{"id": 1}, {"id": 2}]"#, InputFormat::Json).unwrap();
        assert_eq!(input.tasks.len(), 2);
        assert!(input.strategy.is_none());
    }

    #[test]
    fn json_envelope() {
        let input = TaskInput::parse(
            r#"{"tasks": [{"id": 1}], "strategy": "fastest"}"#,
            InputFormat::Json,
        )
        .unwrap();
        assert_eq!(input.tasks, vec![json!({"id": 1})]);
        assert_eq!(input.strategy.as_deref(), Some("fastest"));
    }

    #[test]
    fn envelope_without_tasks_is_empty() {
        let input = TaskInput::parse(r#"{"strategy": "impact"}"#, InputFormat::Json).unwrap();
        assert!(input.tasks.is_empty());
    }

    #[test]
    fn non_list_documents_are_rejected() {
        assert!(matches!(
            TaskInput::parse("42", InputFormat::Json),
            Err(InputError::UnexpectedShape("a number"))
        ));
        assert!(matches!(
            TaskInput::parse(r#"{"tasks": "all"}"#, InputFormat::Json),
            Err(InputError::UnexpectedShape("a string"))
        ));
    }

    #[test]
    fn malformed_json() {
        assert!(matches!(
            TaskInput::parse("[{", InputFormat::Json),
            Err(InputError::Json(_))
        ));
    }

    #[test]
    fn jsonl_skips_blank_lines() {
        let content = "{\"id\": 1}\n\n{\"id\": 2, \"dependencies\": [1]}\n";
        let input = TaskInput::parse(content, InputFormat::Jsonl).unwrap();
        assert_eq!(input.tasks.len(), 2);
    }

    #[test]
    fn jsonl_reports_line_numbers() {
        let content = "{\"id\": 1}\nnot json\n";
        match TaskInput::parse(content, InputFormat::Jsonl) {
            Err(InputError::JsonLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn yaml_list() {
        let content = r#"
- id: 1
  title: Write report
  due_date: 2025-01-20
  importance: 8
  dependencies: [2]
- id: 2
  title: Gather data
"#;
        let input = TaskInput::parse(content, InputFormat::Yaml).unwrap();
        assert_eq!(input.tasks.len(), 2);
        assert_eq!(input.tasks[0]["due_date"], json!("2025-01-20"));
        assert_eq!(input.tasks[0]["dependencies"], json!([2]));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(InputFormat::from_path(Path::new("t.jsonl")), InputFormat::Jsonl);
        assert_eq!(InputFormat::from_path(Path::new("t.yml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("t.yaml")), InputFormat::Yaml);
        assert_eq!(InputFormat::from_path(Path::new("t.json")), InputFormat::Json);
        assert_eq!(InputFormat::from_path(Path::new("tasks")), InputFormat::Json);
    }

    #[test]
    fn read_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.yaml");
        fs::write(&path, "tasks:\n  - id: a\nstrategy: deadline\n").unwrap();

        let input = TaskInput::read(Some(&path), None).unwrap();
        assert_eq!(input.tasks, vec![json!({"id": "a"})]);
        assert_eq!(input.strategy.as_deref(), Some("deadline"));
    }

    #[test]
    fn missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            TaskInput::read(Some(&path), None),
            Err(InputError::Read { .. })
        ));
    }
}
