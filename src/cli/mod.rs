//! CLI module for Hark.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Hark - Episode Library for Audio Lessons
///
/// Browse, search and track progress through a catalog of audio lessons.
#[derive(Parser, Debug)]
#[command(name = "hark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse episodes in catalog order
    List {
        /// Level to show (all, beginner, intermediate, advanced, ...)
        #[arg(short, long, default_value = "all")]
        level: String,

        /// Number of pages to show
        #[arg(short, long, default_value = "1")]
        pages: usize,
    },

    /// Search episodes by title, level, vocabulary and transcript
    Search {
        /// Search query
        query: String,
    },

    /// Show an episode with its transcript and vocabulary
    Show {
        /// Episode ID
        id: String,

        /// Print the transcript
        #[arg(short, long)]
        transcript: bool,

        /// Print the vocabulary
        #[arg(long)]
        vocab: bool,
    },

    /// Show the episode after the given one
    Next {
        /// Episode ID
        id: String,
    },

    /// Show the episode before the given one
    Prev {
        /// Episode ID
        id: String,
    },

    /// Add or remove an episode from favorites
    Favorite {
        /// Episode ID
        id: String,
    },

    /// List favorite episodes
    Favorites,

    /// Mark an episode as completed
    Complete {
        /// Episode ID
        id: String,
    },

    /// Record the playback position of an episode
    Track {
        /// Episode ID
        id: String,

        /// Position in seconds
        position: f64,

        /// Episode length in seconds
        duration: f64,
    },

    /// Show the episode to continue with and overall progress
    Continue,

    /// Score a spoken attempt at a transcript line
    Practice {
        /// Episode ID
        id: String,

        /// Transcript line number, starting at 1
        line: usize,

        /// What was said, as recognized text
        said: String,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Open configuration file in editor
    Edit,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_defaults() {
        let cli = Cli::try_parse_from(["hark", "list"]).unwrap();
        match cli.command {
            Commands::List { level, pages } => {
                assert_eq!(level, "all");
                assert_eq!(pages, 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_track() {
        let cli = Cli::try_parse_from(["hark", "-vv", "track", "12", "30.5", "300"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Track { ref id, position, duration } if id == "12" && position == 30.5 && duration == 300.0
        ));
    }

    #[test]
    fn test_parse_practice() {
        let cli = Cli::try_parse_from(["hark", "practice", "1", "2", "a flat white please"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Practice { ref id, line: 2, ref said } if id == "1" && said == "a flat white please"
        ));
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
