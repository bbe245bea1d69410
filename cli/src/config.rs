use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

const APP_DIR_NAME: &str = ".prioritask";
const DEFAULT_FILE_NAME: &str = "tasks.json";

/// The standard storage location, `~/.prioritask/tasks.json`.
pub fn standard_storage_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(APP_DIR_NAME).join(DEFAULT_FILE_NAME))
}

/// Picks the task file (`--file`/`PRIORITASK_FILE`, else the standard location)
/// and makes sure its directory exists.
pub fn resolve_storage_path(explicit: Option<PathBuf>) -> Result<PathBuf> {
    let path = match explicit {
        Some(path) => path,
        None => standard_storage_path()?,
    };
    ensure_parent_dir(&path)?;
    Ok(path)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

/// `RUST_LOG` wins when set; otherwise `--verbose` turns on debug output for our crates.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("prioritask=debug,prioritask_core=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
