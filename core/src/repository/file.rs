use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TaskError};
use crate::model::task::{is_valid_priority, Task, TaskRecord};
use crate::repository::traits::TaskStore;

/// Stores tasks as a pretty-printed JSON array in a single file.
///
/// Saves overwrite the file in place; there is no locking against other writers.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    file_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_records(&self) -> Result<Vec<Value>> {
        let contents =
            fs::read(&self.file_path).map_err(|e| TaskError::io(&self.file_path, e))?;
        let document: Value =
            serde_json::from_slice(&contents).map_err(|source| TaskError::Parse {
                path: self.file_path.clone(),
                source,
            })?;

        match document {
            Value::Array(records) => Ok(records),
            other => Err(TaskError::MalformedRecord(format!(
                "expected a top-level array in {}, found {}",
                self.file_path.display(),
                json_kind(&other)
            ))),
        }
    }

    fn write_records(&self, records: &[TaskRecord]) -> Result<()> {
        let encoded = serde_json::to_vec_pretty(records).map_err(TaskError::Encoding)?;
        let file = File::create(&self.file_path).map_err(|e| TaskError::io(&self.file_path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&encoded)
            .and_then(|_| writer.flush())
            .map_err(|e| TaskError::io(&self.file_path, e))?;
        Ok(())
    }
}

impl TaskStore for JsonFileStore {
    fn exists(&self) -> bool {
        self.file_path.is_file()
    }

    fn load(&self) -> Result<Vec<Task>> {
        let records = self.read_records()?;
        let tasks = records
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Task::from_value(value).map_err(|e| match e {
                    TaskError::MalformedRecord(reason) => {
                        TaskError::MalformedRecord(format!("element {}: {}", index, reason))
                    }
                    other => other,
                })
            })
            .collect::<Result<Vec<Task>>>()?;
        debug!(path = %self.file_path.display(), count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        // Checked before the file is truncated so a bad task never clobbers a loadable file
        if let Some((index, task)) = tasks
            .iter()
            .enumerate()
            .find(|(_, t)| !is_valid_priority(t.priority))
        {
            return Err(TaskError::MalformedRecord(format!(
                "element {}: priority {} of task {} is outside [0, 1]",
                index,
                task.priority,
                task.id()
            )));
        }

        let records: Vec<TaskRecord> = tasks.iter().map(TaskRecord::from).collect();
        self.write_records(&records)?;
        debug!(path = %self.file_path.display(), count = records.len(), "Saved tasks");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
