use tracing::warn;

use crate::error::{Result, TaskError};
use crate::model::task::{is_valid_priority, Task, TaskId};
use crate::model::task_list::TaskList;
use crate::repository::TaskStore;
use crate::service::draft::TaskDraft;

/// Owns the task list for a front end and persists it after every mutation.
///
/// A failed save leaves the in-memory change in place; call [`TaskService::reload`]
/// to fall back to what is on disk.
pub struct TaskService<S: TaskStore> {
    store: S,
    tasks: TaskList,
}

impl<S: TaskStore> TaskService<S> {
    /// Loads the stored list, or starts empty on first run.
    pub fn open(store: S) -> Result<Self> {
        let tasks = TaskList::open_store(&store)?;
        Ok(Self { store, tasks })
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ordered_tasks(&self) -> Vec<&Task> {
        self.tasks.ordered_tasks()
    }

    /// Position of `id` in the current urgency ordering.
    pub fn rank_of(&self, id: &TaskId) -> Option<usize> {
        self.tasks.ordered_tasks().iter().position(|t| t.id() == id)
    }

    pub fn add_task(&mut self, task: Task) -> Result<()> {
        check_priority(task.priority)?;
        self.tasks.add(task);
        self.save()
    }

    pub fn remove_task(&mut self, id: &TaskId) -> Result<Task> {
        let removed = self.tasks.remove_by_id(id).inspect_err(|_| {
            warn!(%id, "Attempted to remove a task that is not in the list");
        })?;
        self.save()?;
        Ok(removed)
    }

    /// Inserts a new draft or applies an edit draft to its task, then saves.
    pub fn commit(&mut self, draft: TaskDraft) -> Result<TaskId> {
        check_priority(draft.priority)?;
        let id = match draft.target().cloned() {
            Some(id) => {
                let task = self
                    .tasks
                    .get_mut(&id)
                    .ok_or_else(|| TaskError::TaskNotFound(id.clone()))?;
                draft.apply_to(task);
                id
            }
            None => {
                let task = draft.into_task();
                let id = task.id().clone();
                self.tasks.add(task);
                id
            }
        };
        self.save()?;
        Ok(id)
    }

    /// Discards in-memory state and re-reads the store.
    pub fn reload(&mut self) -> Result<()> {
        self.tasks = TaskList::open_store(&self.store)?;
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.store.save(self.tasks.as_slice())
    }
}

fn check_priority(priority: f32) -> Result<()> {
    if is_valid_priority(priority) {
        Ok(())
    } else {
        Err(TaskError::InvalidInput(format!(
            "Priority {} is outside [0, 1]",
            priority
        )))
    }
}
