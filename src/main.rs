use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::{Context, Result, bail};
use std::path::PathBuf;
use taskdeck::{DueDateParts, Priority, StoreConfig, Task, TaskEdit, TaskFilter, TaskStore, now};
use tracing::Level;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "taskdeck - Track tasks with priorities and due dates in a JSON file")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Task file to use (overrides the config file)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Config file (default: <config dir>/taskdeck/config.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task text
        #[arg(required = true)]
        text: Vec<String>,

        /// low, medium, high or critical
        #[arg(short, long, default_value = "low")]
        priority: Priority,

        /// Due date: YYYY-MM-DD or "YYYY-MM-DD HH:MM"
        #[arg(short, long)]
        due: Option<DueDateParts>,
    },

    /// List tasks, most urgent first
    List {
        /// all, pending, completed or high_priority
        #[arg(short, long, default_value = "all")]
        filter: TaskFilter,

        /// Only tasks whose text or notes contain this (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Mark a task completed, or reopen it
    Toggle {
        /// Task id or unique id prefix
        id: String,
    },

    /// Change a task's fields
    Edit {
        /// Task id or unique id prefix
        id: String,

        #[arg(long)]
        text: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        #[arg(short, long, conflicts_with = "clear_due")]
        due: Option<DueDateParts>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(short, long)]
        notes: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task id or unique id prefix
        id: String,
    },

    /// Delete every task
    Clear {
        /// Confirm deletion
        #[arg(long)]
        yes: bool,
    },

    /// Write all tasks to a JSON file
    Export { path: PathBuf },

    /// Replace all tasks with the contents of a JSON file
    Import { path: PathBuf },

    /// Show task counts
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing; stdout is reserved for listings
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let config = load_config(&cli)?;
    let mut store = TaskStore::open(&config).wrap_err("Failed to open task store")?;

    match cli.command {
        Commands::Add { text, priority, due } => {
            let task = store.add(&text.join(" "), priority, due)?;
            println!("Added {}", describe(&task, id_width(store.tasks())));
        }
        Commands::List { filter, search } => {
            let tasks = store.query(filter, &search);
            if tasks.is_empty() {
                println!("No tasks");
            } else {
                let width = id_width(store.tasks());
                let now = now();
                for task in &tasks {
                    print_task(task, width, now);
                }
            }
        }
        Commands::Toggle { id } => {
            let id = store.resolve_id(&id)?;
            let task = store.toggle(&id)?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            println!("{} {}", verb, describe(&task, id_width(store.tasks())));
        }
        Commands::Edit {
            id,
            text,
            priority,
            due,
            clear_due,
            notes,
        } => {
            let id = store.resolve_id(&id)?;
            let mut edit = TaskEdit {
                text,
                priority,
                notes,
                ..TaskEdit::default()
            };
            if let Some(due) = due {
                edit = edit.due(due);
            } else if clear_due {
                edit = edit.clear_due();
            }
            if edit.is_empty() {
                bail!("Nothing to edit; pass --text, --priority, --due, --clear-due or --notes");
            }
            let task = store.edit(&id, edit)?;
            println!("Updated {}", describe(&task, id_width(store.tasks())));
        }
        Commands::Delete { id } => {
            let id = store.resolve_id(&id)?;
            // Width is taken before removal so the prefix matches the last listing
            let width = id_width(store.tasks());
            let task = store.delete(&id)?;
            println!("Deleted {}", describe(&task, width));
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to delete {} tasks without --yes", store.len());
            }
            let count = store.len();
            store.clear_all()?;
            println!("Deleted {} tasks", count);
        }
        Commands::Export { path } => {
            store.export_to(&path)?;
            println!("Exported {} tasks to {}", store.len(), path.display());
        }
        Commands::Import { path } => {
            store.import_from(&path)?;
            println!("Imported {} tasks from {}", store.len(), path.display());
        }
        Commands::Stats => {
            let stats = store.stats();
            println!("Total:     {}", stats.total);
            println!("Pending:   {}", stats.pending);
            println!("Completed: {}", stats.completed);
            println!("Overdue:   {}", stats.overdue);
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::load_default()?,
    };
    if let Some(file) = &cli.file {
        config.data_file = file.clone();
    }
    Ok(config)
}

fn describe(task: &Task, width: usize) -> String {
    format!("{} \"{}\"", short_id(&task.id, width), task.text)
}

fn short_id(id: &str, width: usize) -> &str {
    id.get(..width).unwrap_or(id)
}

/// Shortest prefix length (at least 8) that tells all ids apart.
/// Ids created close together share their leading timestamp digits.
fn id_width(tasks: &[Task]) -> usize {
    let max = tasks.iter().map(|t| t.id.len()).max().unwrap_or(0);
    let mut width = 8;
    while width < max {
        let mut prefixes: Vec<&str> = tasks.iter().map(|t| short_id(&t.id, width)).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        if prefixes.len() == tasks.len() {
            break;
        }
        width += 1;
    }
    width
}

fn print_task(task: &Task, width: usize, now: NaiveDateTime) {
    let check = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let text = if task.completed {
        task.text.dimmed().strikethrough()
    } else {
        task.text.bold()
    };

    let mut line = format!(
        "{} {} {:<8} {}",
        check,
        short_id(&task.id, width).cyan(),
        priority_badge(task.priority),
        text
    );

    if let Some(due) = task.due_date {
        let due_str = format!("due {}", due.format("%Y-%m-%d %H:%M"));
        if task.is_overdue(now) {
            line.push_str(&format!("  {} {}", due_str.red(), "OVERDUE".red().bold()));
        } else {
            line.push_str(&format!("  {}", due_str.dimmed()));
        }
    }
    println!("{}", line);

    if !task.notes.is_empty() {
        for note_line in task.notes.lines() {
            println!("      {}", note_line.dimmed());
        }
    }
}

fn priority_badge(priority: Priority) -> ColoredString {
    let label = priority.as_str().to_uppercase();
    match priority {
        Priority::Low => label.green(),
        Priority::Medium => label.yellow(),
        Priority::High => label.red(),
        Priority::Critical => label.red().bold(),
    }
}
