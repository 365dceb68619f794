//! Hark - Episode Library for Audio Lessons
//!
//! Browsing, lazy loading and ranked search over a catalog of audio-lesson
//! episodes with transcripts and vocabulary.
//!
//! # Overview
//!
//! A catalog is published as one lightweight episode index plus numbered
//! chunks of full episode records. Hark:
//! - Loads the index once and keeps it read-only for the session
//! - Fetches each chunk at most once, on demand
//! - Scores episodes by title, level, vocabulary and transcript matches
//! - Caches ranked results and discards results of superseded searches
//! - Tracks favorites, completion and playback progress
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `catalog` - Episode data model and validation
//! - `source` - Where the index and chunks are fetched from
//! - `index` - The eventually-available episode index
//! - `store` - Chunk loading and the record memo
//! - `search` - Scored search, query cache and debouncing
//! - `browse` - Level filter, paging and navigation
//! - `progress` - Learner progress
//! - `practice` - Pronunciation attempt scoring
//! - `library` - Wires everything into one session object
//!
//! # Example
//!
//! ```rust,no_run
//! use hark::config::Settings;
//! use hark::library::Library;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let library = Library::new(settings)?;
//!     library.start().await?;
//!
//!     let outcome = library.search("coffee").await?;
//!     for result in outcome.results().unwrap_or_default() {
//!         println!("{} ({})", result.descriptor.title, result.score);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod browse;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod library;
pub mod practice;
pub mod progress;
pub mod search;
pub mod source;
pub mod store;

pub use error::{HarkError, Result};
