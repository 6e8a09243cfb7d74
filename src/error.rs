// Error types for task store operations

use std::path::PathBuf;

/// Boxed underlying cause of a persistence failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`crate::TaskStore`] operations
#[derive(Debug, thiserror::Error)]
pub enum TaskStoreError {
    /// Caller-supplied input was rejected; store state is unchanged
    #[error("validation failed: {0}")]
    Validation(String),

    /// No task with the given id (or id prefix)
    #[error("task not found: {0}")]
    NotFound(String),

    /// Reading or writing a task file failed
    #[error("persistence failed for {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
}

impl TaskStoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TaskStoreError::Validation(msg.into())
    }

    pub fn persistence(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        TaskStoreError::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, TaskStoreError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskStoreError::NotFound(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, TaskStoreError::Persistence { .. })
    }
}

pub type Result<T> = std::result::Result<T, TaskStoreError>;
