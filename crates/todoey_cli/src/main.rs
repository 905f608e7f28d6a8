//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `todoey_core` linkage with deterministic output.
//! - Optionally summarize an existing store (category names and item counts).

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use todoey_core::{open_store, ItemSort, StoreConfig, TodoService};

#[derive(Debug, Parser)]
#[command(name = "todoey", version, about = "Linkage probe for the todoey storage core")]
struct Args {
    /// Store file to summarize; `.sqlite3`, `.sqlite` and `.db` open as SQLite,
    /// anything else as a JSON document.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_dir) = args.log_dir.as_deref() {
        let level = todoey_core::default_log_level();
        if let Err(err) = todoey_core::init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("logging disabled: {err}");
        }
    }

    println!("todoey_core ping={}", todoey_core::ping());
    println!("todoey_core version={}", todoey_core::core_version());

    let Some(path) = args.db else {
        return ExitCode::SUCCESS;
    };

    match summarize(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("event=cli_summary module=cli status=error error={err}");
            eprintln!("failed to read store `{}`: {err}", path.display());
            ExitCode::FAILURE
        }
    }
}

fn summarize(path: &Path) -> Result<(), todoey_core::RepoError> {
    let service = TodoService::new(open_store(&config_for(path))?);
    let categories = service.list_categories()?;
    if categories.is_empty() {
        println!("No categories added yet");
        return Ok(());
    }

    for category in categories {
        let items = service.items_for_category(category.id, ItemSort::ByTitle)?;
        let done = items.iter().filter(|item| item.done).count();
        println!(
            "{} [{}] items={} done={}",
            category.name,
            category.colour_tag,
            items.len(),
            done
        );
    }
    Ok(())
}

fn config_for(path: &Path) -> StoreConfig {
    let is_sqlite = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| matches!(ext, "sqlite3" | "sqlite" | "db"));
    if is_sqlite {
        StoreConfig::Sqlite {
            path: path.to_path_buf(),
        }
    } else {
        StoreConfig::Document {
            path: path.to_path_buf(),
        }
    }
}
