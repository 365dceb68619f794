//! Show and navigation command implementations.

use super::{open_library, open_progress};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;

/// Navigation direction through the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Run the show command.
pub async fn run_show(id: &str, transcript: bool, vocab: bool, settings: Settings) -> Result<()> {
    let progress = open_progress(&settings);
    let library = open_library(settings).await?;

    let spinner = Output::spinner("Loading episode...");
    let record = library.get_or_load(id).await;
    spinner.finish_and_clear();

    let record = match record {
        Ok(Some(record)) => record,
        Ok(None) => {
            Output::error(&format!("Episode {} does not exist.", id));
            return Err(anyhow::anyhow!("Episode not found: {}", id));
        }
        Err(e) => {
            Output::error(&format!("Failed to load episode {}: {}", id, e));
            return Err(e.into());
        }
    };

    Output::header(&format!("#{} {}", record.id, record.title));
    Output::kv("Level", record.level.as_str());
    Output::kv("Audio", &record.mp3_url);
    Output::kv("Lines", &record.transcript.len().to_string());
    Output::kv("Vocabulary", &record.vocabulary.len().to_string());
    if progress.is_favorite(&record.id) {
        Output::kv("Favorite", "yes");
    }
    if progress.is_completed(&record.id) {
        Output::kv("Completed", "yes");
    } else if let Some(p) = progress.progress(&record.id) {
        Output::progress("Played", p.percentage);
    }

    if transcript {
        Output::header("Transcript");
        for line in &record.transcript {
            Output::dialogue(&line.speaker, &line.text);
        }
    }

    if vocab {
        Output::header("Key vocabulary");
        for entry in &record.vocabulary.key {
            Output::vocab(&entry.word, &entry.kind, &entry.definition);
        }
        if !record.vocabulary.supplementary.is_empty() {
            Output::header("Supplementary vocabulary");
            for entry in &record.vocabulary.supplementary {
                Output::vocab(&entry.word, &entry.kind, &entry.definition);
            }
        }
    }

    Ok(())
}

/// Run the next/prev commands.
pub async fn run_navigate(id: &str, direction: Direction, settings: Settings) -> Result<()> {
    let library = open_library(settings).await?;

    let neighbour = match direction {
        Direction::Next => library.next(id).await?,
        Direction::Previous => library.previous(id).await?,
    };

    match neighbour {
        Some(descriptor) => {
            Output::episode(&descriptor.id, &descriptor.title, descriptor.level.as_str(), None);
        }
        None if library.get_index().is_some_and(|s| s.get(id).is_none()) => {
            Output::error(&format!("Episode {} does not exist.", id));
            return Err(anyhow::anyhow!("Episode not found: {}", id));
        }
        None => {
            let edge = match direction {
                Direction::Next => "last",
                Direction::Previous => "first",
            };
            Output::info(&format!("Episode {} is the {} episode.", id, edge));
        }
    }

    Ok(())
}
