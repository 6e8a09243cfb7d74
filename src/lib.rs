// taskdeck - Task list with priorities, due dates and JSON file persistence

pub mod config;
pub mod error;
pub mod filter;
pub mod jsonfile;
pub mod models;
pub mod seed;
pub mod store;

// Re-export main types for convenience
pub use config::StoreConfig;
pub use error::{Result, TaskStoreError};
pub use filter::{TaskFilter, TaskQuery};
pub use models::{DueDateParts, DueUpdate, Priority, Task, TaskEdit, TaskStats, now};
pub use store::TaskStore;
