// JSON task file operations

use crate::models::Task;
use fs2::FileExt;
use serde_json::Value;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Why a task file could not be read
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("failed to read file: {0}")]
    Io(#[from] io::Error),

    #[error("file is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("expected a JSON array of tasks, found {0}")]
    NotAnArray(&'static str),

    #[error("entry {index} is not a valid task: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("duplicate task id '{0}'")]
    DuplicateId(String),
}

impl ReadError {
    /// True when the file was readable JSON but not a list of tasks
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            ReadError::NotAnArray(_) | ReadError::InvalidRecord { .. } | ReadError::DuplicateId(_)
        )
    }
}

/// Read a task file in full, under a shared lock on `<file>.lock`.
///
/// Returns `Ok(None)` if the file does not exist. Nothing is returned unless
/// every entry is a valid task, so callers never see a partial collection.
pub fn read_tasks(path: &Path) -> Result<Option<Vec<Task>>, ReadError> {
    read_tasks_inner(path, true)
}

/// Like [`read_tasks`] but without a lock file, for one-off files such as
/// imports that should not gain a `.lock` sibling
pub fn read_tasks_unlocked(path: &Path) -> Result<Option<Vec<Task>>, ReadError> {
    read_tasks_inner(path, false)
}

fn read_tasks_inner(path: &Path, lock: bool) -> Result<Option<Vec<Task>>, ReadError> {
    if !path.exists() {
        debug!(file = ?path, "Task file does not exist");
        return Ok(None);
    }

    let content = {
        // Read-only locations cannot hold a lock file; read unlocked there
        let _lock = if lock {
            FileLock::shared(path)
                .inspect_err(|e| debug!(file = ?path, error = %e, "Reading without lock"))
                .ok()
        } else {
            None
        };
        fs::read_to_string(path)?
    };

    let tasks = parse_tasks(&content)?;

    info!(file = ?path, count = tasks.len(), "Loaded tasks from JSON file");
    Ok(Some(tasks))
}

/// Parse and validate the contents of a task file
pub fn parse_tasks(content: &str) -> Result<Vec<Task>, ReadError> {
    let value: Value = serde_json::from_str(content)?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => return Err(ReadError::NotAnArray(json_kind(&other))),
    };

    let mut seen = HashSet::with_capacity(entries.len());
    let mut tasks = Vec::with_capacity(entries.len());

    for (index, entry) in entries.into_iter().enumerate() {
        if !entry.is_object() {
            return Err(ReadError::InvalidRecord {
                index,
                reason: format!("expected an object, found {}", json_kind(&entry)),
            });
        }

        let mut task: Task = serde_json::from_value(entry).map_err(|e| ReadError::InvalidRecord {
            index,
            reason: e.to_string(),
        })?;

        if task.id.trim().is_empty() {
            return Err(ReadError::InvalidRecord {
                index,
                reason: "id is empty".to_string(),
            });
        }
        if task.text.trim().is_empty() {
            return Err(ReadError::InvalidRecord {
                index,
                reason: "text is empty".to_string(),
            });
        }
        if !seen.insert(task.id.clone()) {
            return Err(ReadError::DuplicateId(task.id));
        }

        if task.normalize() {
            warn!(id = %task.id, completed = task.completed, "Repaired inconsistent completed_at");
        }

        tasks.push(task);
    }

    Ok(tasks)
}

/// Write tasks to a file atomically (temp file -> fsync -> rename), holding
/// an exclusive lock on `<file>.lock`.
///
/// A failure at any step leaves the previous file untouched.
pub fn write_tasks_atomic(path: &Path, tasks: &[Task]) -> io::Result<()> {
    write_tasks_inner(path, tasks, true)
}

/// Like [`write_tasks_atomic`] but without a lock file, for exports
pub fn write_tasks_atomic_unlocked(path: &Path, tasks: &[Task]) -> io::Result<()> {
    write_tasks_inner(path, tasks, false)
}

fn write_tasks_inner(path: &Path, tasks: &[Task], lock: bool) -> io::Result<()> {
    let json = serde_json::to_string_pretty(tasks).map_err(io::Error::other)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let _lock = if lock { Some(FileLock::exclusive(path)?) } else { None };
    let tmp_path = sibling_path(path, ".tmp");

    let result = (|| {
        let mut file = File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        warn!(file = ?path, error = %e, "Atomic write failed, discarding temp file");
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    debug!(file = ?path, count = tasks.len(), "Wrote tasks to JSON file");
    Ok(())
}

/// Advisory lock on `<file>.lock`, released on drop
struct FileLock {
    _file: File,
}

impl FileLock {
    fn exclusive(path: &Path) -> io::Result<Self> {
        let file = Self::open(path)?;
        file.lock_exclusive()?;
        Ok(Self { _file: file })
    }

    fn shared(path: &Path) -> io::Result<Self> {
        let file = Self::open(path)?;
        file.lock_shared()?;
        Ok(Self { _file: file })
    }

    fn open(path: &Path) -> io::Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(sibling_path(path, ".lock"))
    }
}

/// `path` with `suffix` appended to its file name
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_else(|| OsString::from("tasks"));
    name.push(suffix);
    path.with_file_name(name)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
