// Query filtering and display ordering for tasks

use crate::error::{Result, TaskStoreError};
use crate::models::{Priority, Task};
use std::cmp::Ordering;
use std::str::FromStr;

/// Which tasks a query selects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
    /// High and critical priority
    HighPriority,
}

impl TaskFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
            TaskFilter::HighPriority => task.priority >= Priority::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Pending => "pending",
            TaskFilter::Completed => "completed",
            TaskFilter::HighPriority => "high_priority",
        }
    }
}

impl std::fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = TaskStoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TaskFilter::All),
            "pending" | "open" => Ok(TaskFilter::Pending),
            "completed" | "done" => Ok(TaskFilter::Completed),
            "high_priority" | "high-priority" | "high" => Ok(TaskFilter::HighPriority),
            other => Err(TaskStoreError::validation(format!(
                "unknown filter '{}' (expected all, pending, completed or high_priority)",
                other
            ))),
        }
    }
}

/// A filter plus optional case-insensitive search text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    /// Lowercased search needle; empty means no search. Whitespace is
    /// significant, so " " only matches tasks containing a space.
    needle: String,
}

impl TaskQuery {
    pub fn new(filter: TaskFilter, search: &str) -> Self {
        Self {
            filter,
            needle: search.to_lowercase(),
        }
    }

    pub fn search(&self) -> &str {
        &self.needle
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.filter.matches(task) && self.matches_search(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        self.needle.is_empty()
            || task.text.to_lowercase().contains(&self.needle)
            || task.notes.to_lowercase().contains(&self.needle)
    }

    /// Select matching tasks and sort them for display
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        let mut selected: Vec<Task> = tasks.iter().filter(|t| self.matches(t)).cloned().collect();
        sort_for_display(&mut selected);
        selected
    }
}

/// Priority descending, then newest first. Stable, so equal keys keep
/// collection order.
pub fn sort_for_display(tasks: &mut [Task]) {
    tasks.sort_by(display_order);
}

fn display_order(a: &Task, b: &Task) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| b.created_at.cmp(&a.created_at))
}
