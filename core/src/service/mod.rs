pub mod draft;
pub mod task_service;
