// tasktrack - personal task tracking persisted to a local JSON file

pub mod filter;
pub mod lock;
pub mod models;
pub mod persist;
pub mod store;

// Re-export main types for convenience
pub use filter::Filter;
pub use models::{STATUS_DONE, STATUS_IN_PROGRESS, STATUS_TODO, Task, now};
pub use store::{DEFAULT_FILE, TaskStore};
