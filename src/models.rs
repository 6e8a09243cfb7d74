// Data models for taskdeck

use crate::error::{Result, TaskStoreError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Hour and minute used when a due date is given without a time
pub const END_OF_DAY: (u32, u32) = (23, 59);

/// Older files store the due time separately as "HH:MM"
const LEGACY_DUE_TIME: &str = "due_time";

/// Task priority, ordered from least to most urgent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskStoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" | "crit" => Ok(Priority::Critical),
            other => Err(TaskStoreError::validation(format!(
                "unknown priority '{}' (expected low, medium, high or critical)",
                other
            ))),
        }
    }
}

/// A single tracked task
///
/// Fields not listed here are kept in `extra` so files written by other
/// tools survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub completed_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Create a pending task with a fresh id
    pub fn new(text: impl Into<String>, priority: Priority, due_date: Option<NaiveDateTime>, created_at: NaiveDateTime) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            completed: false,
            priority,
            due_date,
            created_at,
            completed_at: None,
            updated_at: None,
            notes: String::new(),
            extra: Map::new(),
        }
    }

    /// Set the completion flag, keeping `completed_at` in step with it
    pub fn set_completed(&mut self, completed: bool, now: NaiveDateTime) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }

    /// Change the due date. A legacy `due_time` ("HH:MM") carried in `extra`
    /// is rewritten to match, or dropped when the due date is cleared.
    pub fn set_due_date(&mut self, due_date: Option<NaiveDateTime>) {
        self.due_date = due_date;
        if self.extra.contains_key(LEGACY_DUE_TIME) {
            match due_date {
                Some(due) => {
                    self.extra
                        .insert(LEGACY_DUE_TIME.to_string(), Value::String(due.format("%H:%M").to_string()));
                }
                None => {
                    self.extra.remove(LEGACY_DUE_TIME);
                }
            }
        }
    }

    /// Pending and past its due date
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Repair a stale or missing `completed_at`. Returns true if anything changed.
    pub fn normalize(&mut self) -> bool {
        match (self.completed, self.completed_at) {
            (true, None) => {
                self.completed_at = Some(self.updated_at.unwrap_or(self.created_at));
                true
            }
            (false, Some(_)) => {
                self.completed_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Generate a new task id (time-ordered UUID)
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// Calendar components of a due date, validated on [`DueDateParts::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
}

impl DueDateParts {
    pub fn date(year: i32, month: u32, day: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour: None,
            minute: None,
        }
    }

    pub fn at(mut self, hour: u32, minute: u32) -> Self {
        self.hour = Some(hour);
        self.minute = Some(minute);
        self
    }

    /// Build a timestamp, failing on anything that is not a real calendar date/time.
    /// Missing hour or minute fall back to [`END_OF_DAY`].
    pub fn resolve(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            TaskStoreError::validation(format!(
                "invalid due date {:04}-{:02}-{:02}",
                self.year, self.month, self.day
            ))
        })?;

        let hour = self.hour.unwrap_or(END_OF_DAY.0);
        let minute = self.minute.unwrap_or(END_OF_DAY.1);
        date.and_hms_opt(hour, minute, 0)
            .ok_or_else(|| TaskStoreError::validation(format!("invalid due time {:02}:{:02}", hour, minute)))
    }
}

impl From<NaiveDateTime> for DueDateParts {
    fn from(ts: NaiveDateTime) -> Self {
        use chrono::{Datelike, Timelike};
        DueDateParts::date(ts.year(), ts.month(), ts.day()).at(ts.hour(), ts.minute())
    }
}

impl FromStr for DueDateParts {
    type Err = TaskStoreError;

    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` and `YYYY-MM-DDTHH:MM`.
    /// Only the shape is checked here; calendar validity is checked by `resolve`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = || TaskStoreError::validation(format!("malformed due date '{}' (expected YYYY-MM-DD[ HH:MM])", s));

        let (date_part, time_part) = match s.split_once([' ', 'T']) {
            Some((d, t)) => (d, Some(t.trim())),
            None => (s, None),
        };

        let mut fields = date_part.splitn(3, '-');
        let year = parse_number::<i32>(fields.next()).ok_or_else(bad)?;
        let month = parse_number::<u32>(fields.next()).ok_or_else(bad)?;
        let day = parse_number::<u32>(fields.next()).ok_or_else(bad)?;
        let mut parts = DueDateParts::date(year, month, day);

        if let Some(time) = time_part {
            let (h, m) = time.split_once(':').ok_or_else(bad)?;
            let hour = parse_number::<u32>(Some(h)).ok_or_else(bad)?;
            let minute = parse_number::<u32>(Some(m)).ok_or_else(bad)?;
            parts = parts.at(hour, minute);
        }

        Ok(parts)
    }
}

fn parse_number<T: FromStr>(field: Option<&str>) -> Option<T> {
    let field = field?;
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Change to a task's due date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueUpdate {
    Clear,
    Set(DueDateParts),
}

/// Fields to change in [`crate::TaskStore::edit`]; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskEdit {
    pub text: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DueUpdate>,
    pub notes: Option<String>,
}

impl TaskEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due(mut self, parts: DueDateParts) -> Self {
        self.due_date = Some(DueUpdate::Set(parts));
        self
    }

    pub fn clear_due(mut self) -> Self {
        self.due_date = Some(DueUpdate::Clear);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.priority.is_none() && self.due_date.is_none() && self.notes.is_none()
    }
}

/// Summary counts over the whole collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// Current local wall-clock time
pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}
