//! Search command implementation.

use super::open_library;
use crate::cli::Output;
use crate::config::Settings;
use crate::search::SearchOutcome;
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, settings: Settings) -> Result<()> {
    let min_len = settings.search.min_query_len;
    let library = open_library(settings).await?;

    let spinner = Output::spinner("Searching...");
    let outcome = library.search(query).await;
    spinner.finish_and_clear();

    match outcome {
        Ok(SearchOutcome::Cleared) => {
            Output::warning(&format!(
                "Queries need at least {} characters. Use 'hark list' to browse.",
                min_len
            ));
        }
        Ok(SearchOutcome::Results(results)) => {
            if results.is_empty() {
                Output::warning("No episodes match your query.");
            } else {
                Output::success(&format!("Found {} episodes", results.len()));
                println!();
                for result in results.iter() {
                    Output::search_result(
                        &result.descriptor.id,
                        &result.descriptor.title,
                        result.descriptor.level.as_str(),
                        result.score,
                    );
                }
            }
        }
        // Only one search runs per invocation.
        Ok(SearchOutcome::Stale) => {}
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
