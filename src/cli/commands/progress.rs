//! Learner progress command implementations.

use super::{open_library, open_progress};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Check that `id` is a catalog episode before recording anything for it.
async fn ensure_episode(id: &str, settings: &Settings) -> Result<String> {
    let library = open_library(settings.clone()).await?;
    let snapshot = library.index().await?;
    match snapshot.get(id) {
        Some(descriptor) => Ok(descriptor.title.clone()),
        None => {
            Output::error(&format!("Episode {} does not exist.", id));
            Err(anyhow::anyhow!("Episode not found: {}", id))
        }
    }
}

/// Run the favorite command.
pub async fn run_favorite(id: &str, settings: Settings) -> Result<()> {
    let title = ensure_episode(id, &settings).await?;
    let mut progress = open_progress(&settings);

    if progress.toggle_favorite(id)? {
        Output::success(&format!("Added '{}' to favorites", title));
    } else {
        Output::info(&format!("Removed '{}' from favorites", title));
    }
    Ok(())
}

/// Run the favorites command.
pub async fn run_favorites(settings: Settings) -> Result<()> {
    let progress = open_progress(&settings);
    if progress.favorites().is_empty() {
        Output::info("No favorites yet. Use 'hark favorite <id>' to add one.");
        return Ok(());
    }

    let library = open_library(settings).await?;
    let snapshot = library.index().await?;

    Output::header(&format!("Favorites ({})", progress.favorites().len()));
    println!();
    for id in progress.favorites() {
        // Favorites of episodes dropped from the catalog are skipped.
        if let Some(descriptor) = snapshot.get(id) {
            let marker = progress.is_completed(id).then_some("done");
            Output::episode(&descriptor.id, &descriptor.title, descriptor.level.as_str(), marker);
        }
    }
    Ok(())
}

/// Run the complete command.
pub async fn run_complete(id: &str, settings: Settings) -> Result<()> {
    let title = ensure_episode(id, &settings).await?;
    let mut progress = open_progress(&settings);

    if progress.mark_completed(id)? {
        Output::success(&format!("Completed '{}'", title));
    } else {
        Output::info(&format!("'{}' was already completed", title));
    }
    Ok(())
}

/// Run the track command.
pub async fn run_track(id: &str, position: f64, duration: f64, settings: Settings) -> Result<()> {
    let title = ensure_episode(id, &settings).await?;
    let mut progress = open_progress(&settings);

    let entry = progress.save_progress(id, position, duration)?;
    Output::progress(&title, entry.percentage);
    if progress.is_completed(id) {
        Output::success(&format!("Completed '{}'", title));
    }
    Ok(())
}

/// Run the continue command.
pub async fn run_continue(settings: Settings) -> Result<()> {
    let progress = open_progress(&settings);
    let library = open_library(settings).await?;
    let snapshot = library.index().await?;

    Output::header("Your Learning Progress");
    Output::progress(
        &format!("{} of {} completed", progress.completed().len(), snapshot.len()),
        progress.overall_percentage(snapshot.len()),
    );

    match progress
        .continue_learning()
        .and_then(|(id, p)| snapshot.get(id).map(|d| (d, p)))
    {
        Some((descriptor, p)) => {
            Output::header("Continue Learning");
            Output::episode(&descriptor.id, &descriptor.title, descriptor.level.as_str(), None);
            Output::progress("Played", p.percentage);
            Output::kv("Resume at", &format_position(p.current_time));
        }
        None => Output::info("Nothing in progress. Pick an episode with 'hark list'."),
    }
    Ok(())
}

fn format_position(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_position() {
        assert_eq!(format_position(0.0), "0:00");
        assert_eq!(format_position(125.7), "2:05");
    }
}
