use crate::error::Result;
use crate::model::task::Task;

/// Whole-collection persistence for tasks. Every save replaces everything previously stored.
pub trait TaskStore {
    fn exists(&self) -> bool;
    fn load(&self) -> Result<Vec<Task>>;
    fn save(&self, tasks: &[Task]) -> Result<()>;
}
