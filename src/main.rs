use chrono::{DateTime, Local, Utc};
use clap::{ArgAction, Parser, Subcommand};
use colored::{ColoredString, Colorize};
use eyre::Result;
use std::path::PathBuf;
use std::process::ExitCode;
use tasktrack::{DEFAULT_FILE, Filter, STATUS_DONE, STATUS_IN_PROGRESS, STATUS_TODO, Task, TaskStore};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "task-cli")]
#[command(about = "Track personal tasks in a local JSON file")]
#[command(version)]
struct Cli {
    /// Path to the task file
    #[arg(short, long, global = true, default_value = DEFAULT_FILE)]
    file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Add a new task
    Add {
        #[arg(value_parser = non_empty)]
        description: String,
        /// Initial status (default: todo)
        status: Option<String>,
    },

    /// List tasks, optionally only those with the given status
    List { status: Option<String> },

    /// Replace a task's description and optionally its status
    Update {
        id: u64,
        /// New description; empty keeps the current one
        description: String,
        status: Option<String>,
    },

    /// Delete a task
    Delete { id: u64 },

    /// Set a task's status to in-progress
    MarkInProgress { id: u64 },

    /// Set a task's status to done
    MarkDone { id: u64 },

    /// Set a task's status back to todo
    MarkTodo { id: u64 },
}

fn non_empty(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("description cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup tracing; stdout is reserved for command output
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut store = TaskStore::open(&cli.file)?;

    match cli.command {
        Commands::Add { description, status } => {
            let id = store.add(description, status.as_deref())?;
            println!("Task added successfully (ID: {})", id);
        }
        Commands::List { status } => {
            let filter = Filter::from_status(status);
            if store.is_empty() {
                println!("No tasks found.");
                return Ok(ExitCode::SUCCESS);
            }

            let tasks = store.list(&filter);
            if tasks.is_empty() {
                println!("No tasks match {}.", filter);
                return Ok(ExitCode::SUCCESS);
            }

            println!("Task List:");
            for task in tasks {
                println!("{}", render_task(task));
            }
        }
        Commands::Update {
            id,
            description,
            status,
        } => {
            let updated = store.update(id, Some(&description), status.as_deref())?;
            return Ok(report(id, updated.map(|_| format!("Task updated: {}", id))));
        }
        Commands::Delete { id } => {
            let removed = store.delete(id)?;
            return Ok(report(id, removed.map(|_| format!("Task deleted: {}", id))));
        }
        Commands::MarkInProgress { id } => return mark(&mut store, id, STATUS_IN_PROGRESS),
        Commands::MarkDone { id } => return mark(&mut store, id, STATUS_DONE),
        Commands::MarkTodo { id } => return mark(&mut store, id, STATUS_TODO),
    }

    Ok(ExitCode::SUCCESS)
}

fn mark(store: &mut TaskStore, id: u64, status: &str) -> Result<ExitCode> {
    let marked = store.mark(id, status)?;
    Ok(report(id, marked.map(|t| format!("Task {} marked as {}", id, paint_status(&t.status)))))
}

/// Print the success message, or a not-found message and fail
fn report(id: u64, message: Option<String>) -> ExitCode {
    match message {
        Some(m) => {
            println!("{}", m);
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("{} {}", "Task not found:".red(), id);
            ExitCode::FAILURE
        }
    }
}

fn render_task(task: &Task) -> String {
    format!(
        "[{}] {} | Status: {} | Created: {} | Updated: {}",
        task.id,
        task.description,
        paint_status(&task.status),
        local_minutes(task.created_at),
        local_minutes(task.updated_at),
    )
}

fn paint_status(status: &str) -> ColoredString {
    match status {
        STATUS_TODO => status.yellow(),
        STATUS_IN_PROGRESS => status.cyan(),
        STATUS_DONE => status.green(),
        _ => status.normal(),
    }
}

fn local_minutes(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("task-cli").chain(args.iter().copied()))
    }

    #[test]
    fn test_parse_add_default_status() {
        let cli = parse(&["add", "buy milk"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Add {
                description: "buy milk".to_string(),
                status: None
            }
        );
        assert_eq!(cli.file, PathBuf::from(DEFAULT_FILE));
    }

    #[test]
    fn test_parse_add_rejects_empty_description() {
        assert!(parse(&["add", ""]).is_err());
        assert!(parse(&["add"]).is_err());
    }

    #[test]
    fn test_parse_mark_commands() {
        assert_eq!(parse(&["mark-done", "3"]).unwrap().command, Commands::MarkDone { id: 3 });
        assert_eq!(
            parse(&["mark-in-progress", "4"]).unwrap().command,
            Commands::MarkInProgress { id: 4 }
        );
    }

    #[test]
    fn test_parse_update_optional_status() {
        let cli = parse(&["update", "2", "", "done"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Update {
                id: 2,
                description: String::new(),
                status: Some("done".to_string())
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["delete", "abc"]).is_err());
        assert!(parse(&["delete"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn test_parse_global_file_flag() {
        let cli = parse(&["list", "--file", "/tmp/other.json", "-vv"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("/tmp/other.json"));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Commands::List { status: None });
    }

    #[test]
    fn test_render_task() {
        colored::control::set_override(false);
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let task = Task::new(1, "buy milk", STATUS_TODO, ts);

        let line = render_task(&task);
        let stamp = local_minutes(ts);
        assert_eq!(
            line,
            format!("[1] buy milk | Status: todo | Created: {} | Updated: {}", stamp, stamp)
        );
    }
}
