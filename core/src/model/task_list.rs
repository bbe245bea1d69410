use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{Result, TaskError};
use crate::model::task::{Task, TaskId};
use crate::repository::{JsonFileStore, TaskStore};

/// Unordered store of tasks with a derived, urgency-sorted view.
///
/// Ids are expected to be unique; `add` does not check. Nothing is persisted
/// until `save` is called.
#[derive(Debug, Clone, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Loads `path` if it exists, otherwise starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_store(&JsonFileStore::new(path.as_ref()))
    }

    /// Loads whatever `store` holds, or starts empty when it has nothing yet.
    pub fn open_store<S: TaskStore>(store: &S) -> Result<Self> {
        if store.exists() {
            Ok(Self::from_tasks(store.load()?))
        } else {
            info!("No stored tasks yet, starting with an empty list");
            Ok(Self::new())
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let tasks = JsonFileStore::new(path.as_ref()).load()?;
        Ok(Self::from_tasks(tasks))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        JsonFileStore::new(path.as_ref()).save(&self.tasks)
    }

    pub fn add(&mut self, task: Task) {
        debug!(id = %task.id(), "Adding task");
        self.tasks.push(task);
    }

    pub fn remove(&mut self, task: &Task) -> Result<Task> {
        self.remove_by_id(task.id())
    }

    pub fn remove_by_id(&mut self, id: &TaskId) -> Result<Task> {
        let pos = self
            .tasks
            .iter()
            .position(|t| t.id() == id)
            .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;
        debug!(%id, "Removing task");
        Ok(self.tasks.remove(pos))
    }

    /// All tasks, most urgent first, scored against the current time.
    pub fn ordered_tasks(&self) -> Vec<&Task> {
        self.ordered_tasks_at(Utc::now())
    }

    pub fn ordered_tasks_at(&self, now: DateTime<Utc>) -> Vec<&Task> {
        let mut scored: Vec<(f64, &Task)> = self
            .tasks
            .iter()
            .map(|t| (t.weighted_score_at(now), t))
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        scored.into_iter().map(|(_, t)| t).collect()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    /// Finds the single task whose id starts with `prefix`, ignoring case.
    pub fn find_by_prefix(&self, prefix: &str) -> Result<&Task> {
        let prefix = prefix.trim().to_uppercase();
        if prefix.is_empty() {
            return Err(TaskError::InvalidInput("Empty task id".to_string()));
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id().as_str().to_uppercase().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [task] => Ok(*task),
            [] => Err(TaskError::TaskNotFound(TaskId::from(prefix))),
            _ => Err(TaskError::InvalidInput(format!(
                "Ambiguous task id '{}' matches {} tasks",
                prefix,
                matches.len()
            ))),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn as_slice(&self) -> &[Task] {
        &self.tasks
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        Self::from_tasks(tasks)
    }
}
