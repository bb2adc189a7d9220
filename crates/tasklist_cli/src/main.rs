//! Terminal front end for the task list.
//!
//! # Responsibility
//! - Map one command-line invocation onto one controller intent.
//! - Re-render the list through the controller after every mutation.

mod output;

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tasklist_core::{
    default_log_level, init_logging_with, open_repository, LogConfig, StoreConfig, SubmitOutcome,
    TaskFilter, TaskId, TaskListController, TaskListView, TaskRepository,
};

#[derive(Debug, Parser)]
#[command(name = "tasklist", version, about = "Manage a short task list")]
struct Cli {
    /// Backing store.
    #[arg(long, value_enum, default_value_t = StoreKind::Sqlite)]
    store: StoreKind,

    /// SQLite file for `--store sqlite`.
    #[arg(long, env = "TASKLIST_DB_PATH", default_value = "tasklist.sqlite3")]
    db: PathBuf,

    /// Task resource URL for `--store remote`.
    #[arg(
        long,
        env = "TASKLIST_API_URL",
        default_value = "http://localhost:3000/api/tasks"
    )]
    api_url: String,

    /// Request timeout for `--store remote`.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off without it.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StoreKind {
    /// Demo data held in this process only.
    Memory,
    Sqlite,
    Remote,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show tasks.
    List {
        #[arg(long, short, default_value = "all", value_parser = parse_filter)]
        filter: TaskFilter,
    },
    /// Add a task.
    Add {
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Flip a task between active and completed.
    Toggle { id: String },
    /// Replace a task's title.
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
    },
    /// Delete a task.
    Delete { id: String },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => "list",
            Self::Add { .. } => "add",
            Self::Toggle { .. } => "toggle",
            Self::Edit { .. } => "edit",
            Self::Delete { .. } => "delete",
        }
    }
}

fn parse_filter(value: &str) -> Result<TaskFilter, String> {
    value.parse::<TaskFilter>().map_err(|err| err.to_string())
}

impl Cli {
    fn store_config(&self) -> StoreConfig {
        match self.store {
            StoreKind::Memory => StoreConfig::Memory { seed_sample: true },
            StoreKind::Sqlite => StoreConfig::Sqlite {
                path: self.db.clone(),
            },
            StoreKind::Remote => StoreConfig::Remote {
                base_url: self.api_url.clone(),
                timeout: Duration::from_secs(self.timeout_secs),
            },
        }
    }

    fn log_config(&self) -> Option<LogConfig> {
        self.log_dir.as_ref().map(|log_dir| LogConfig {
            level: self
                .log_level
                .clone()
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir: log_dir.clone(),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    if let Some(log_config) = cli.log_config() {
        init_logging_with(&log_config)?;
    }

    let repo = open_repository(&cli.store_config()).map_err(|err| err.to_string())?;
    let mut controller = TaskListController::new(repo);

    // Intents that address a task by id need the current list loaded.
    if let TaskListView::Error(message) = controller.view() {
        return Err(format!("Error fetching tasks: {message}"));
    }

    let filter = match execute(&mut controller, &cli.command) {
        Ok(filter) => {
            info!(
                "event=cli_command module=cli status=ok command={}",
                cli.command.name()
            );
            filter
        }
        Err(message) => {
            warn!(
                "event=cli_command module=cli status=error command={}",
                cli.command.name()
            );
            return Err(message);
        }
    };
    controller.set_filter(filter);

    match controller.view() {
        TaskListView::Ready(page) => {
            print!("{}", output::render_page(&page));
            Ok(())
        }
        TaskListView::Error(message) => Err(format!("Error fetching tasks: {message}")),
        TaskListView::Loading => Err("task list is still loading".to_string()),
    }
}

/// Runs one command and returns the filter the result is shown with.
fn execute<R: TaskRepository>(
    controller: &mut TaskListController<R>,
    command: &Command,
) -> Result<TaskFilter, String> {
    match command {
        Command::List { filter } => Ok(*filter),
        Command::Add { title } => {
            controller.set_input(title.join(" "));
            match controller.submit().map_err(|err| err.to_string())? {
                SubmitOutcome::Created(task) => {
                    println!("added {}", task.id);
                    Ok(TaskFilter::All)
                }
                SubmitOutcome::Ignored => Err("title cannot be blank".to_string()),
                SubmitOutcome::Updated(task) => {
                    Err(format!("unexpected update of {} while adding", task.id))
                }
            }
        }
        Command::Toggle { id } => {
            let task = controller
                .toggle_id(&TaskId::new(id.as_str()))
                .map_err(|err| err.to_string())?;
            let state = if task.completed { "completed" } else { "active" };
            println!("marked {} {state}", task.id);
            Ok(TaskFilter::All)
        }
        Command::Edit { id, title } => {
            controller
                .begin_edit_id(&TaskId::new(id.as_str()))
                .map_err(|err| err.to_string())?;
            controller.set_input(title.join(" "));
            match controller.submit().map_err(|err| err.to_string())? {
                SubmitOutcome::Updated(task) => {
                    println!("updated {}", task.id);
                    Ok(TaskFilter::All)
                }
                SubmitOutcome::Ignored => {
                    controller.cancel_edit();
                    Err("title cannot be blank".to_string())
                }
                SubmitOutcome::Created(task) => {
                    Err(format!("unexpected create of {} while editing", task.id))
                }
            }
        }
        Command::Delete { id } => {
            let id = TaskId::new(id.as_str());
            if controller.delete(&id).map_err(|err| err.to_string())? {
                println!("deleted {id}");
            } else {
                println!("no task {id}; nothing deleted");
            }
            Ok(TaskFilter::All)
        }
    }
}
