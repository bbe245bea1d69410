pub mod file;
pub mod traits;

pub use file::JsonFileStore;
pub use traits::TaskStore;
