//! Error types for task storage and manipulation.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::task::TaskId;

/// Errors returned by the task model and its persistence layer
#[derive(Error, Debug)]
pub enum TaskError {
    /// A persisted record is missing a field or has a field of the wrong type
    #[error("Malformed task record: {0}")]
    MalformedRecord(String),

    /// The task file is not valid JSON
    #[error("Failed to parse task file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the task file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Tasks could not be encoded as JSON
    #[error("Failed to encode tasks: {0}")]
    Encoding(#[source] serde_json::Error),

    /// No task with the given id is in the list
    #[error("Task with ID {0} not found")]
    TaskNotFound(TaskId),

    /// User supplied input (dates, priorities, keys) could not be understood
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl TaskError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TaskError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_includes_id() {
        let err = TaskError::TaskNotFound(TaskId::from("ABC-123"));
        assert_eq!(err.to_string(), "Task with ID ABC-123 not found");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = TaskError::io(
            "/tmp/tasks.json",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, TaskError::Io { .. }));
        assert!(err.to_string().contains("/tmp/tasks.json"));
    }
}
