mod config;
mod list;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use prioritask_core::{
    expand_key, parse_args, parse_due, parse_priority, JsonFileStore, TaskDraft, TaskService,
    TASK_KEYS,
};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "prioritask")]
#[command(about = "A to-do list ordered by urgency", long_about = None)]
struct Cli {
    /// Task file to use instead of ~/.prioritask/tasks.json
    #[arg(short, long, global = true, env = "PRIORITASK_FILE")]
    file: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Add a new task (usage: add "Task Name" due:tom pri:0.8)
    Add {
        /// Task name followed by optional due:<when> and priority:<0-1|h|m|l>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List tasks, most urgent first
    List,
    /// Change a task's name, due date or priority
    Edit {
        /// ID (or unique ID prefix) of the task
        id: String,
        /// New name words and/or due:<when> priority:<p>
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Delete a task
    Remove {
        /// ID (or unique ID prefix) of the task
        id: String,
    },
}

/// Applies `due:` and `priority:` metadata to a draft. Unknown keys are reported and skipped.
fn apply_metadata(draft: &mut TaskDraft, metadata: HashMap<String, String>) -> Result<()> {
    for (key, value) in metadata {
        let full_key = match expand_key(&key, TASK_KEYS) {
            Ok(full_key) => full_key,
            Err(e) => {
                warn!(%key, "Skipping metadata: {}", e);
                continue;
            }
        };

        match full_key.as_str() {
            "due" => {
                draft.due_date =
                    parse_due(&value).with_context(|| format!("Invalid due date '{}'", value))?;
            }
            "priority" => {
                draft.priority = parse_priority(&value)?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(cli.verbose);

    let path = config::resolve_storage_path(cli.file)?;
    debug!(path = %path.display(), "Using task file");

    let mut service = TaskService::open(JsonFileStore::new(&path))
        .with_context(|| format!("Failed to open task file {}", path.display()))?;

    match cli.command {
        Some(Commands::Add { args }) => {
            let parsed = parse_args(&args);
            if parsed.name.is_empty() {
                bail!("Task name is required.");
            }

            let mut draft = TaskDraft::new();
            draft.name = parsed.name;
            apply_metadata(&mut draft, parsed.metadata)?;

            let id = service.commit(draft)?;
            let rank = service.rank_of(&id).map(|r| r + 1).unwrap_or_default();
            println!("Task added (ID: {}), now #{} of {}", id.short(), rank, service.tasks().len());
        }
        Some(Commands::Edit { id, args }) => {
            let task = service.tasks().find_by_prefix(&id)?;
            let mut draft = TaskDraft::edit(task);

            let parsed = parse_args(&args);
            if parsed.name.is_empty() && parsed.metadata.is_empty() {
                bail!("Nothing to change. Give a new name and/or due:<when> priority:<p>.");
            }
            if !parsed.name.is_empty() {
                draft.name = parsed.name;
            }
            apply_metadata(&mut draft, parsed.metadata)?;

            let id = service.commit(draft)?;
            let rank = service.rank_of(&id).map(|r| r + 1).unwrap_or_default();
            println!("Task {} updated, now #{} of {}", id.short(), rank, service.tasks().len());
        }
        Some(Commands::Remove { id }) => {
            let id = service.tasks().find_by_prefix(&id)?.id().clone();
            let removed = service.remove_task(&id)?;
            println!("Removed: {} (ID: {})", removed.name, removed.id().short());
        }
        Some(Commands::List) | None => {
            list::show_tasks(&service.ordered_tasks());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn metadata(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_cli_parses_global_file() {
        let cli = Cli::try_parse_from(["prioritask", "--file", "/tmp/t.json", "remove", "ABCD"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("/tmp/t.json")));
        assert!(matches!(cli.command, Some(Commands::Remove { id }) if id == "ABCD"));
    }

    #[test]
    fn test_cli_add_collects_name_and_metadata() {
        let cli = Cli::try_parse_from(["prioritask", "add", "Buy", "milk", "due:tom"]).unwrap();
        match cli.command {
            Some(Commands::Add { args }) => assert_eq!(args, vec!["Buy", "milk", "due:tom"]),
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn test_apply_metadata() {
        let mut draft = TaskDraft::new();
        apply_metadata(&mut draft, metadata(&[("d", "3h"), ("pri", "h"), ("color", "red")])).unwrap();
        assert_eq!(draft.priority, 1.0);
        let offset = draft.due_date - Utc::now();
        assert!(offset > Duration::minutes(179) && offset <= Duration::hours(3));
    }

    #[test]
    fn test_apply_metadata_skips_unknown_keys() {
        let mut draft = TaskDraft::new();
        let due = draft.due_date;
        apply_metadata(&mut draft, metadata(&[("colour", "red"), ("x", "1")])).unwrap();
        assert_eq!(draft.due_date, due);
        assert_eq!(draft.priority, 0.5);
    }

    #[test]
    fn test_apply_metadata_rejects_bad_values() {
        let mut draft = TaskDraft::new();
        assert!(apply_metadata(&mut draft, metadata(&[("priority", "2")])).is_err());
        assert!(apply_metadata(&mut draft, metadata(&[("due", "someday")])).is_err());
    }
}
