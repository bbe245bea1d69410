use chrono::{DateTime, Utc};

use crate::model::task::{Task, TaskId};

/// Pending edits for one task, committed through `TaskService::commit`.
///
/// Dropping a draft without committing it discards the edits.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    target: Option<TaskId>,
    pub name: String,
    pub due_date: DateTime<Utc>,
    pub priority: f32,
}

impl TaskDraft {
    /// A draft for a brand new task, pre-filled with the new task defaults.
    pub fn new() -> Self {
        let template = Task::new();
        Self {
            target: None,
            name: template.name,
            due_date: template.due_date,
            priority: template.priority,
        }
    }

    pub fn edit(task: &Task) -> Self {
        Self {
            target: Some(task.id().clone()),
            name: task.name.clone(),
            due_date: task.due_date,
            priority: task.priority,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target.is_none()
    }

    pub fn target(&self) -> Option<&TaskId> {
        self.target.as_ref()
    }

    pub fn set_priority(&mut self, priority: f32) {
        self.priority = if priority.is_nan() { 0.0 } else { priority.clamp(0.0, 1.0) };
    }

    pub(crate) fn apply_to(&self, task: &mut Task) {
        task.name = self.name.clone();
        task.due_date = self.due_date;
        task.priority = self.priority;
    }

    pub(crate) fn into_task(self) -> Task {
        Task::with_details(self.name, self.due_date, self.priority)
    }
}

impl Default for TaskDraft {
    fn default() -> Self {
        TaskDraft::new()
    }
}
