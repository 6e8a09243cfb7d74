// Task store: in-memory task list backed by a single JSON file

use crate::config::StoreConfig;
use crate::error::{Result, TaskStoreError};
use crate::filter::{TaskFilter, TaskQuery};
use crate::jsonfile;
use crate::models::{DueDateParts, DueUpdate, Priority, Task, TaskEdit, TaskStats, new_id, now};
use crate::seed;
use chrono::NaiveDateTime;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Authoritative task collection
///
/// Tasks are kept newest-first (insertion order). Every mutating call
/// rewrites the backing file before returning. If that write fails the
/// change stays applied in memory and a [`TaskStoreError::Persistence`] is
/// returned so the caller can warn that it was not saved.
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Empty store bound to `path`; nothing is read or written
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            tasks: Vec::new(),
        }
    }

    /// Open a store from config: load the backing file, and seed it with
    /// onboarding tasks if it did not exist yet and seeding is enabled.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let mut store = Self::new(&config.data_file);
        let fresh = !store.path.exists();

        store.load()?;

        if fresh && config.seed_on_empty {
            info!(file = ?store.path, "Fresh store, adding welcome tasks");
            store.tasks = seed::welcome_tasks(now());
            store.save()?;
        }

        Ok(store)
    }

    /// Open the store at `path` without seeding
    pub fn open_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self::new(path);
        store.load()?;
        Ok(store)
    }

    /// Backing file of this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All tasks in collection order (newest first)
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a task at the front of the collection
    pub fn add(&mut self, text: &str, priority: Priority, due_date: Option<DueDateParts>) -> Result<Task> {
        let text = Self::validate_text(text)?;
        let due_date = due_date.map(|parts| parts.resolve()).transpose()?;

        let mut task = Task::new(text, priority, due_date, now());
        while self.get(&task.id).is_some() {
            task.id = new_id();
        }

        info!(id = %task.id, %priority, "Adding task");
        self.tasks.insert(0, task.clone());
        self.save()?;

        Ok(task)
    }

    /// Flip a task between pending and completed
    pub fn toggle(&mut self, id: &str) -> Result<Task> {
        let index = self.index_of(id)?;

        let task = &mut self.tasks[index];
        let completed = !task.completed;
        task.set_completed(completed, now());
        let task = task.clone();

        info!(id, completed, "Toggled task");
        self.save()?;

        Ok(task)
    }

    /// Apply `edit` to a task. Everything is validated before anything changes.
    pub fn edit(&mut self, id: &str, edit: TaskEdit) -> Result<Task> {
        let index = self.index_of(id)?;

        let text = edit.text.as_deref().map(Self::validate_text).transpose()?;
        let due_date: Option<Option<NaiveDateTime>> = match edit.due_date {
            Some(DueUpdate::Set(parts)) => Some(Some(parts.resolve()?)),
            Some(DueUpdate::Clear) => Some(None),
            None => None,
        };

        let task = &mut self.tasks[index];
        if let Some(text) = text {
            task.text = text;
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if let Some(due_date) = due_date {
            task.set_due_date(due_date);
        }
        if let Some(notes) = edit.notes {
            task.notes = notes.trim().to_string();
        }
        task.updated_at = Some(now());
        let task = task.clone();

        info!(id, "Edited task");
        self.save()?;

        Ok(task)
    }

    /// Remove a task. Unknown ids are an error rather than a silent no-op.
    pub fn delete(&mut self, id: &str) -> Result<Task> {
        let index = self.index_of(id)?;
        let task = self.tasks.remove(index);

        info!(id, "Deleted task");
        self.save()?;

        Ok(task)
    }

    /// Remove every task
    pub fn clear_all(&mut self) -> Result<()> {
        let count = self.tasks.len();
        self.tasks.clear();

        info!(count, "Cleared all tasks");
        self.save()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks matching `filter` and `search` (case-insensitive over text and
    /// notes), sorted by priority descending then newest first.
    pub fn query(&self, filter: TaskFilter, search: &str) -> Vec<Task> {
        TaskQuery::new(filter, search).apply(&self.tasks)
    }

    pub fn stats(&self) -> TaskStats {
        self.stats_at(now())
    }

    /// Counts with overdue judged against `now`
    pub fn stats_at(&self, now: NaiveDateTime) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
            overdue: self.tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    /// Resolve a full id or a unique id prefix to a full id
    pub fn resolve_id(&self, prefix: &str) -> Result<String> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(TaskStoreError::validation("task id cannot be empty"));
        }
        if let Some(task) = self.get(prefix) {
            return Ok(task.id.clone());
        }

        let matches: Vec<&Task> = self.tasks.iter().filter(|t| t.id.starts_with(prefix)).collect();
        match matches.as_slice() {
            [] => Err(TaskStoreError::NotFound(prefix.to_string())),
            [task] => Ok(task.id.clone()),
            many => Err(TaskStoreError::validation(format!(
                "id prefix '{}' is ambiguous ({} tasks match)",
                prefix,
                many.len()
            ))),
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Replace the collection with the backing file's contents.
    ///
    /// A missing file is not an error and leaves the collection as it is.
    /// On failure the collection is untouched.
    pub fn load(&mut self) -> Result<()> {
        let Some(tasks) = jsonfile::read_tasks(&self.path).map_err(|e| TaskStoreError::persistence(&self.path, e))?
        else {
            debug!(file = ?self.path, "No backing file, keeping in-memory tasks");
            return Ok(());
        };

        debug!(file = ?self.path, count = tasks.len(), "Loaded store");
        self.tasks = tasks;
        Ok(())
    }

    /// Atomically rewrite the backing file with the full collection
    pub fn save(&self) -> Result<()> {
        jsonfile::write_tasks_atomic(&self.path, &self.tasks).map_err(|e| {
            warn!(file = ?self.path, error = %e, "Failed to save tasks; in-memory state kept");
            TaskStoreError::persistence(&self.path, e)
        })
    }

    /// Write the collection to an arbitrary file. Only the backing file is
    /// locked, so no `.lock` file appears next to the export.
    pub fn export_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        jsonfile::write_tasks_atomic_unlocked(path, &self.tasks).map_err(|e| TaskStoreError::persistence(path, e))?;

        info!(file = ?path, count = self.tasks.len(), "Exported tasks");
        Ok(())
    }

    /// Replace the collection with the tasks in `path`, then save.
    ///
    /// Content that is JSON but not an array of tasks is a validation error;
    /// unreadable or unparsable files are persistence errors. Either way the
    /// collection is left as it was.
    pub fn import_from<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();

        let tasks = match jsonfile::read_tasks_unlocked(path) {
            Ok(Some(tasks)) => tasks,
            Ok(None) => {
                let missing = io::Error::new(io::ErrorKind::NotFound, "import file does not exist");
                return Err(TaskStoreError::persistence(path, missing));
            }
            Err(e) if e.is_shape_error() => {
                return Err(TaskStoreError::validation(format!("cannot import {}: {}", path.display(), e)));
            }
            Err(e) => return Err(TaskStoreError::persistence(path, e)),
        };

        info!(file = ?path, count = tasks.len(), "Imported tasks");
        self.tasks = tasks;
        self.save()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn index_of(&self, id: &str) -> Result<usize> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::NotFound(id.to_string()))
    }

    fn validate_text(text: &str) -> Result<String> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(TaskStoreError::validation("task text cannot be empty"));
        }
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::TempDir;

    fn new_store(temp: &TempDir) -> TaskStore {
        TaskStore::open_path(temp.path().join("tasks.json")).unwrap()
    }

    /// Make the next atomic write fail by occupying the temp file name
    fn break_saves(store: &TaskStore) {
        let mut tmp = store.path().as_os_str().to_os_string();
        tmp.push(".tmp");
        fs::create_dir(PathBuf::from(tmp)).unwrap();
    }

    #[test]
    fn test_open_path_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = new_store(&temp);

        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_then_query() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let existing = store.add("Existing", Priority::Low, None).unwrap();

        let due = DueDateParts::date(2030, 1, 15).at(9, 0);
        let task = store.add("  Book flights  ", Priority::High, Some(due)).unwrap();

        assert_eq!(task.text, "Book flights");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.due_date, Some("2030-01-15T09:00:00".parse().unwrap()));
        assert!(!task.completed);
        assert_eq!(task.completed_at, None);
        assert_eq!(task.updated_at, None);
        assert_ne!(task.id, existing.id);

        let all = store.query(TaskFilter::All, "");
        assert_eq!(all.len(), 2);
        assert_eq!(all.iter().filter(|t| t.id == task.id).count(), 1);
        assert_eq!(store.tasks()[0].id, task.id);
        assert!(store.path().exists());
    }

    #[test]
    fn test_add_rejects_empty_text() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        let err = store.add("   ", Priority::Low, None).unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_add_rejects_invalid_due_date() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        let err = store
            .add("Pay rent", Priority::Medium, Some(DueDateParts::date(2025, 4, 31)))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        for i in 0..20 {
            store.add(&format!("Task {}", i), Priority::Low, None).unwrap();
        }

        let ids: HashSet<&str> = store.tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let task = store.add("Stretch", Priority::Low, None).unwrap();

        let done = store.toggle(&task.id).unwrap();
        assert!(done.completed);
        assert!(done.completed_at.is_some());

        let reopened = store.toggle(&task.id).unwrap();
        assert_eq!(reopened.completed, task.completed);
        assert_eq!(reopened.completed_at, task.completed_at);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        assert!(store.toggle("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_edit_updates_fields() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let task = store.add("Draft", Priority::Low, None).unwrap();

        let edit = TaskEdit::new()
            .text("Final draft")
            .priority(Priority::Critical)
            .due(DueDateParts::date(2031, 6, 1))
            .notes("  send to editor ");
        let edited = store.edit(&task.id, edit).unwrap();

        assert_eq!(edited.text, "Final draft");
        assert_eq!(edited.priority, Priority::Critical);
        assert_eq!(edited.due_date, Some("2031-06-01T23:59:00".parse().unwrap()));
        assert_eq!(edited.notes, "send to editor");
        assert_eq!(edited.created_at, task.created_at);
        assert_eq!(edited.id, task.id);
        assert!(edited.updated_at.is_some());

        let cleared = store.edit(&task.id, TaskEdit::new().clear_due()).unwrap();
        assert_eq!(cleared.due_date, None);
        assert_eq!(cleared.text, "Final draft");
    }

    #[test]
    fn test_edit_invalid_due_date_leaves_task_unchanged() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let task = store.add("Dentist", Priority::Medium, None).unwrap();

        let edit = TaskEdit::new()
            .text("Changed")
            .due(DueDateParts::date(2025, 2, 29).at(10, 0));
        let err = store.edit(&task.id, edit).unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.get(&task.id), Some(&task));
    }

    #[test]
    fn test_edit_empty_text_leaves_task_unchanged() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let task = store.add("Dentist", Priority::Medium, None).unwrap();

        let err = store.edit(&task.id, TaskEdit::new().text(" \t")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get(&task.id), Some(&task));
    }

    #[test]
    fn test_edit_unknown_id() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        let err = store.edit("missing", TaskEdit::new().text("x")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let keep = store.add("Keep", Priority::Low, None).unwrap();
        let drop = store.add("Drop", Priority::Low, None).unwrap();

        let removed = store.delete(&drop.id).unwrap();
        assert_eq!(removed.id, drop.id);
        assert!(store.get(&drop.id).is_none());
        assert!(store.get(&keep.id).is_some());

        assert!(store.delete(&drop.id).unwrap_err().is_not_found());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        store.add("One", Priority::Low, None).unwrap();
        store.add("Two", Priority::High, None).unwrap();

        store.clear_all().unwrap();
        assert!(store.is_empty());

        let reloaded = TaskStore::open_path(store.path()).unwrap();
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_query_sort_order() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        let low = store.add("low", Priority::Low, None).unwrap();
        let crit_first = store.add("critical 1", Priority::Critical, None).unwrap();
        let medium = store.add("medium", Priority::Medium, None).unwrap();
        let crit_second = store.add("critical 2", Priority::Critical, None).unwrap();

        let ids: Vec<String> = store.query(TaskFilter::All, "").into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![crit_second.id, crit_first.id, medium.id, low.id]);
    }

    #[test]
    fn test_query_pending_and_completed_partition() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let a = store.add("a", Priority::Low, None).unwrap();
        store.add("b", Priority::High, None).unwrap();
        store.add("c", Priority::Critical, None).unwrap();
        store.toggle(&a.id).unwrap();

        let pending = store.query(TaskFilter::Pending, "");
        let completed = store.query(TaskFilter::Completed, "");
        assert!(pending.iter().all(|t| !t.completed));
        assert!(completed.iter().all(|t| t.completed));
        assert_eq!(pending.len() + completed.len(), store.len());

        let high = store.query(TaskFilter::HighPriority, "");
        assert_eq!(high.len(), 2);
    }

    #[test]
    fn test_query_search_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let rocket = store.add("Deploy Rocket", Priority::Low, None).unwrap();
        store.add("Water plants", Priority::Low, None).unwrap();

        let found = store.query(TaskFilter::All, "rocket");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, rocket.id);
    }

    #[test]
    fn test_query_does_not_mutate() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        store.add("b", Priority::Low, None).unwrap();
        store.add("a", Priority::Critical, None).unwrap();
        let before = store.tasks().to_vec();

        let _ = store.query(TaskFilter::Pending, "a");
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_save_load_round_trip() {
        for count in [0, 1, 5] {
            let temp = TempDir::new().unwrap();
            let mut store = new_store(&temp);
            for i in 0..count {
                let priority = Priority::ALL[i % Priority::ALL.len()];
                let task = store.add(&format!("Task {}", i), priority, None).unwrap();
                if i % 2 == 0 {
                    store.toggle(&task.id).unwrap();
                }
            }
            store.save().unwrap();

            let reloaded = TaskStore::open_path(store.path()).unwrap();
            assert_eq!(reloaded.tasks(), store.tasks());
            assert_eq!(reloaded.query(TaskFilter::All, ""), store.query(TaskFilter::All, ""));
        }
    }

    #[test]
    fn test_load_failure_leaves_collection_unchanged() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        store.add("Survivor", Priority::High, None).unwrap();
        let before = store.tasks().to_vec();

        fs::write(store.path(), "{ definitely not a task list").unwrap();
        let err = store.load().unwrap_err();

        assert!(err.is_persistence());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_failed_save_keeps_memory_and_previous_file() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        store.add("Saved", Priority::Low, None).unwrap();
        let on_disk = fs::read_to_string(store.path()).unwrap();

        break_saves(&store);
        let err = store.add("Unsaved", Priority::High, None).unwrap_err();

        assert!(err.is_persistence());
        assert_eq!(store.len(), 2);
        assert_eq!(store.tasks()[0].text, "Unsaved");
        assert_eq!(fs::read_to_string(store.path()).unwrap(), on_disk);
    }

    #[test]
    fn test_load_without_backing_file_keeps_unsaved_tasks() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        break_saves(&store);
        let err = store.add("Unsaved work", Priority::Medium, None).unwrap_err();
        assert!(err.is_persistence());
        assert!(!store.path().exists());

        store.load().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].text, "Unsaved work");
    }

    #[test]
    fn test_edit_due_date_rewrites_legacy_due_time() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id":"legacy-1","text":"Old task","due_date":"2024-05-03T17:00:00","due_time":"17:00",
                 "created_at":"2024-05-01T10:00:00"}]"#,
        )
        .unwrap();
        let mut store = TaskStore::open_path(&path).unwrap();

        let edited = store
            .edit("legacy-1", TaskEdit::new().due(DueDateParts::date(2024, 6, 1).at(8, 15)))
            .unwrap();
        assert_eq!(edited.extra.get("due_time").and_then(|v| v.as_str()), Some("08:15"));
        assert!(fs::read_to_string(&path).unwrap().contains("\"due_time\": \"08:15\""));

        let cleared = store.edit("legacy-1", TaskEdit::new().clear_due()).unwrap();
        assert!(!cleared.extra.contains_key("due_time"));
        assert!(!fs::read_to_string(&path).unwrap().contains("due_time"));

        let untouched = store.edit("legacy-1", TaskEdit::new().text("Renamed")).unwrap();
        assert!(!untouched.extra.contains_key("due_time"));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id":"legacy-1","text":"Old task","completed":false,"priority":"medium",
                 "due_date":"2024-05-03T17:00:00","due_time":"17:00",
                 "created_at":"2024-05-01T10:00:00.123456","notes":""}]"#,
        )
        .unwrap();

        let mut store = TaskStore::open_path(&path).unwrap();
        store.toggle("legacy-1").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"due_time\": \"17:00\""));
        assert!(content.contains("\"completed\": true"));
    }

    #[test]
    fn test_export_and_import() {
        let temp = TempDir::new().unwrap();
        let mut source = new_store(&temp);
        source.add("Export me", Priority::High, None).unwrap();
        source.add("Me too", Priority::Low, None).unwrap();

        let export_path = temp.path().join("backup/export.json");
        source.export_to(&export_path).unwrap();

        let other = TempDir::new().unwrap();
        let mut target = new_store(&other);
        target.add("Will be replaced", Priority::Critical, None).unwrap();
        target.import_from(&export_path).unwrap();

        assert_eq!(target.tasks(), source.tasks());
        let persisted = TaskStore::open_path(target.path()).unwrap();
        assert_eq!(persisted.tasks(), source.tasks());
    }

    #[test]
    fn test_export_and_import_leave_no_lock_file() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        store.add("Share me", Priority::Medium, None).unwrap();

        let shared = TempDir::new().unwrap();
        let export_path = shared.path().join("export.json");
        store.export_to(&export_path).unwrap();
        store.import_from(&export_path).unwrap();

        assert!(!shared.path().join("export.json.lock").exists());
        let names: Vec<_> = fs::read_dir(shared.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("export.json")]);
    }

    #[test]
    fn test_import_object_is_validation_error() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        store.add("Existing", Priority::Low, None).unwrap();
        let before = store.tasks().to_vec();

        let bad = temp.path().join("object.json");
        fs::write(&bad, r#"{"id":"x","text":"not a list"}"#).unwrap();

        let err = store.import_from(&bad).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn test_import_non_task_entries_is_validation_error() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let bad = temp.path().join("numbers.json");
        fs::write(&bad, "[1, 2, 3]").unwrap();

        assert!(store.import_from(&bad).unwrap_err().is_validation());
        assert!(store.is_empty());
    }

    #[test]
    fn test_import_unreadable_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);

        let err = store.import_from(temp.path().join("missing.json")).unwrap_err();
        assert!(err.is_persistence());

        let garbage = temp.path().join("garbage.json");
        fs::write(&garbage, "not json at all").unwrap();
        assert!(store.import_from(&garbage).unwrap_err().is_persistence());
    }

    #[test]
    fn test_open_seeds_fresh_store_only() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path().join("tasks.json"));

        let mut store = TaskStore::open(&config).unwrap();
        assert_eq!(store.len(), 4);
        assert!(store.path().exists());

        store.clear_all().unwrap();
        let reopened = TaskStore::open(&config).unwrap();
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_open_without_seeding() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new(temp.path().join("tasks.json")).with_seed(false);

        let store = TaskStore::open(&config).unwrap();
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_stats() {
        let temp = TempDir::new().unwrap();
        let mut store = new_store(&temp);
        let past = DueDateParts::date(2020, 1, 1);
        let future = DueDateParts::date(2099, 1, 1);

        let a = store.add("overdue", Priority::High, Some(past)).unwrap();
        store.add("future", Priority::Low, Some(future)).unwrap();
        let c = store.add("done late", Priority::Low, Some(past)).unwrap();
        store.toggle(&c.id).unwrap();

        let stats = store.stats_at("2024-01-01T00:00:00".parse().unwrap());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.overdue, 1);
        assert!(store.get(&a.id).unwrap().is_overdue("2024-01-01T00:00:00".parse().unwrap()));
    }

    #[test]
    fn test_resolve_id() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasks.json");
        fs::write(
            &path,
            r#"[{"id":"abc-111","text":"one","created_at":"2024-05-01T10:00:00"},
                {"id":"abc-222","text":"two","created_at":"2024-05-01T10:00:00"},
                {"id":"xyz","text":"three","created_at":"2024-05-01T10:00:00"}]"#,
        )
        .unwrap();
        let store = TaskStore::open_path(&path).unwrap();

        assert_eq!(store.resolve_id("xyz").unwrap(), "xyz");
        assert_eq!(store.resolve_id("abc-2").unwrap(), "abc-222");
        assert!(store.resolve_id("abc").unwrap_err().is_validation());
        assert!(store.resolve_id("nope").unwrap_err().is_not_found());
        assert!(store.resolve_id("  ").unwrap_err().is_validation());
    }
}
