//! Practice command implementation.

use super::open_library;
use crate::cli::Output;
use crate::config::Settings;
use crate::practice::{assess, Feedback};
use anyhow::Result;

/// Score a spoken attempt at one transcript line of an episode.
pub async fn run_practice(id: &str, line: usize, said: &str, settings: Settings) -> Result<()> {
    let library = open_library(settings).await?;

    let Some(record) = library.get_or_load(id).await? else {
        Output::error(&format!("Episode {} does not exist.", id));
        return Err(anyhow::anyhow!("Episode not found: {}", id));
    };

    let Some(expected) = line.checked_sub(1).and_then(|i| record.transcript.get(i)) else {
        Output::error(&format!(
            "Episode {} has {} transcript lines.",
            id,
            record.transcript.len()
        ));
        return Err(anyhow::anyhow!("No line {} in episode {}", line, id));
    };

    let attempt = assess(&expected.text, said);

    Output::dialogue(&expected.speaker, &expected.text);
    Output::kv("You said", said);
    Output::progress("Score", attempt.score);
    match attempt.feedback {
        Feedback::Excellent | Feedback::Great => Output::success(attempt.feedback.message()),
        Feedback::Good | Feedback::KeepPracticing => Output::warning(attempt.feedback.message()),
    }

    Ok(())
}
