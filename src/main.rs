//! Blockpad - A block-based notes editor for the terminal.
//!
//! # Usage
//!
//! ```bash
//! blockpad
//! blockpad --store notes.json --watch
//! blockpad --no-seed --log-file blockpad.log
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use blockpad::app::App;
use blockpad::config::{
    ConfigFlags, clear_config_flags, default_store_path, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use blockpad::store::JsonFileStore;

/// A block-based notes editor for the terminal
#[derive(Parser, Debug)]
#[command(name = "blockpad", version, about, long_about = None)]
struct Cli {
    /// JSON file holding the projects
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,

    /// Reload when another process writes the store
    #[arg(short, long)]
    watch: bool,

    /// Start an empty store without the sample projects
    #[arg(long)]
    no_seed: bool,

    /// Write log events to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            store: self.store.clone(),
            watch: self.watch,
            no_seed: self.no_seed,
            log_file: self.log_file.clone(),
        }
    }
}

/// The terminal belongs to the UI, so without a log file only warnings
/// reach stderr.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_directive = if log_file.is_some() {
        "blockpad=info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    let store_path = effective.store.clone().unwrap_or_else(default_store_path);
    let store = JsonFileStore::open(&store_path)
        .with_context(|| format!("Failed to open store {}", store_path.display()))?;

    // Run the application
    let mut app = App::new(Box::new(store))
        .with_watch(effective.watch)
        .with_seed(!effective.no_seed)
        .with_config_paths(
            Some(global_path),
            local_path.exists().then_some(local_path),
        );

    app.run().context("Application error")
}
