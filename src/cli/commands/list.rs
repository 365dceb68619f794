//! List command implementation.

use super::{open_library, open_progress};
use crate::browse::{BrowseState, LevelFilter};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Run the list command.
pub async fn run_list(level: &str, pages: usize, settings: Settings) -> Result<()> {
    let progress = open_progress(&settings);
    let page_size = settings.browse.page_size;
    let library = open_library(settings).await?;
    let snapshot = library.index().await?;

    let filter: LevelFilter = level.parse()?;
    let mut state = BrowseState::new(page_size);
    state.set_filter(filter.clone());
    state.show_at_least(pages.max(1).saturating_mul(page_size));

    let page = state.page(&snapshot);
    if page.total == 0 {
        Output::info(&format!("No episodes at level '{}'.", filter));
        return Ok(());
    }

    Output::header(&format!("Episodes: {} ({})", filter, page.total));
    println!();

    for descriptor in &page.items {
        let marker = if progress.is_completed(&descriptor.id) {
            Some("done")
        } else if progress.is_favorite(&descriptor.id) {
            Some("*")
        } else {
            None
        };
        Output::episode(&descriptor.id, &descriptor.title, descriptor.level.as_str(), marker);
    }

    if page.remaining > 0 {
        println!();
        Output::info(&format!(
            "{} more. Use --pages {} to see more.",
            page.remaining,
            pages.max(1).saturating_add(1)
        ));
    }

    Ok(())
}
