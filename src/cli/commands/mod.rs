//! CLI command implementations.

mod config;
mod list;
mod practice;
mod progress;
mod search;
mod serve;
mod show;

pub use config::{effective_path, run_config};
pub use list::run_list;
pub use practice::run_practice;
pub use progress::{run_complete, run_continue, run_favorite, run_favorites, run_track};
pub use search::run_search;
pub use serve::run_serve;
pub use show::{run_navigate, run_show, Direction};

use crate::cli::Output;
use crate::config::Settings;
use crate::library::Library;
use crate::progress::ProgressStore;
use anyhow::Result;

/// Build the library and wait for its index.
async fn open_library(settings: Settings) -> Result<Library> {
    let library = Library::new(settings)?;

    let spinner = Output::spinner("Loading episode index...");
    let started = library.start().await;
    spinner.finish_and_clear();

    if let Err(e) = started {
        Output::error(&format!("Could not load the episode index: {}", e));
        Output::info(&format!(
            "Check the [source] section of {}",
            Settings::default_config_path().display()
        ));
        return Err(e.into());
    }

    Ok(library)
}

fn open_progress(settings: &Settings) -> ProgressStore {
    ProgressStore::open(settings.progress_path(), settings.progress.completion_threshold)
}
