pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use error::{Result, TaskError};
pub use input::{expand_key, parse_args, parse_priority, ParsedInput, TASK_KEYS};
pub use model::task::{Task, TaskId, TaskRecord};
pub use model::task_list::TaskList;
pub use repository::{JsonFileStore, TaskStore};
pub use service::draft::TaskDraft;
pub use service::task_service::TaskService;
pub use time::{parse_due, parse_duration, parse_human_date};
