// Onboarding tasks for a fresh store

use crate::models::{Priority, Task};
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Sample tasks covering every priority, one of them already completed.
///
/// Creation times are staggered a minute apart so the list has a
/// predictable order, newest first.
pub fn welcome_tasks(now: NaiveDateTime) -> Vec<Task> {
    let at = |days: i64, hour: u32, minute: u32| {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
        (now.date() + Duration::days(days)).and_time(time)
    };

    let mut tasks = vec![
        seed(
            "Welcome to taskdeck",
            Priority::High,
            Some(at(7, 17, 0)),
            now,
            "Tasks carry a priority and an optional due date and time. Toggle, edit or delete them by id.",
        ),
        seed(
            "Add a task with a due time",
            Priority::Medium,
            Some(at(1, 9, 0)),
            now - Duration::minutes(1),
            "Due dates without a time default to the end of the day.",
        ),
        seed(
            "Edit this task's notes",
            Priority::Critical,
            Some(at(0, 17, 30)),
            now - Duration::minutes(2),
            "Notes are searched together with the task text.",
        ),
        seed(
            "Filter by pending, completed or high priority",
            Priority::Low,
            None,
            now - Duration::minutes(3),
            "Critical tasks sort first, then high, medium and low; newest first within a priority.",
        ),
    ];

    let last = tasks.len() - 1;
    tasks[last].set_completed(true, now);
    tasks
}

fn seed(text: &str, priority: Priority, due: Option<NaiveDateTime>, created_at: NaiveDateTime, notes: &str) -> Task {
    let mut task = Task::new(text, priority, due, created_at);
    task.notes = notes.to_string();
    task
}
