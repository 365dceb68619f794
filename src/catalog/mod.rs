//! Episode data model.
//!
//! Descriptors are the lightweight entries of the episode index; records hold
//! the full content (audio URL, transcript, vocabulary) and arrive in chunks.
//! Raw JSON is decoded into private wire types and validated here, so the
//! rest of the crate only ever sees well-formed values.

#[cfg(test)]
pub(crate) mod fixtures;
mod wire;

use crate::error::{HarkError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Difficulty level of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    /// Any label the catalog uses that has no dedicated variant.
    Other(String),
}

impl Level {
    /// Display label, as matched by search and shown to learners.
    pub fn as_str(&self) -> &str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
            Level::Other(label) => label,
        }
    }
}

impl From<String> for Level {
    fn from(label: String) -> Self {
        match label.trim().to_lowercase().as_str() {
            "beginner" => Level::Beginner,
            "intermediate" => Level::Intermediate,
            "advanced" => Level::Advanced,
            _ => Level::Other(label.trim().to_string()),
        }
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl std::str::FromStr for Level {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Level::from(s.to_string()))
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lightweight per-episode metadata from the episode index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeDescriptor {
    pub id: String,
    pub title: String,
    pub level: Level,
    /// Number of the chunk holding this episode's full record.
    pub chunk: u32,
}

/// One line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub speaker: String,
    pub text: String,
}

/// A vocabulary item taught in an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabEntry {
    pub word: String,
    /// Part of speech or phrase kind ("noun", "phrasal verb", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub definition: String,
}

/// Key and supplementary vocabulary lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub key: Vec<VocabEntry>,
    pub supplementary: Vec<VocabEntry>,
}

impl Vocabulary {
    /// All entries, key list first.
    pub fn entries(&self) -> impl Iterator<Item = &VocabEntry> {
        self.key.iter().chain(self.supplementary.iter())
    }

    pub fn len(&self) -> usize {
        self.key.len() + self.supplementary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Full content of an episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EpisodeRecord {
    pub id: String,
    pub title: String,
    pub level: Level,
    pub mp3_url: String,
    pub transcript: Vec<TranscriptLine>,
    pub vocabulary: Vocabulary,
}

impl EpisodeRecord {
    /// True if any vocabulary word contains `needle` (already lower-cased).
    pub fn vocabulary_contains(&self, needle: &str) -> bool {
        self.vocabulary
            .entries()
            .any(|entry| entry.word.to_lowercase().contains(needle))
    }

    /// True if any transcript line contains `needle` (already lower-cased).
    pub fn transcript_contains(&self, needle: &str) -> bool {
        self.transcript
            .iter()
            .any(|line| line.text.to_lowercase().contains(needle))
    }
}

/// Decode and validate the episode index.
///
/// Entries with a blank id or title are rejected. A repeated id keeps its
/// first occurrence so that index order stays canonical.
pub fn parse_index(bytes: &[u8]) -> Result<Vec<EpisodeDescriptor>> {
    let raw: Vec<wire::RawDescriptor> = serde_json::from_slice(bytes)
        .map_err(|e| HarkError::InvalidData(format!("episode index: {}", e)))?;

    let mut seen = HashSet::with_capacity(raw.len());
    let mut descriptors = Vec::with_capacity(raw.len());

    for (position, entry) in raw.into_iter().enumerate() {
        let descriptor = entry.validate().map_err(|reason| {
            HarkError::InvalidData(format!("episode index entry {}: {}", position, reason))
        })?;

        if !seen.insert(descriptor.id.clone()) {
            warn!("Duplicate episode id {} in index, keeping first", descriptor.id);
            continue;
        }
        descriptors.push(descriptor);
    }

    Ok(descriptors)
}

/// Decode and validate the records of one chunk.
///
/// Any malformed record fails the whole chunk.
pub fn parse_chunk(chunk: u32, bytes: &[u8]) -> Result<Vec<EpisodeRecord>> {
    let raw: Vec<wire::RawRecord> =
        serde_json::from_slice(bytes).map_err(|e| HarkError::chunk_load(chunk, e))?;

    raw.into_iter()
        .enumerate()
        .map(|(position, record)| {
            record.validate().map_err(|reason| {
                HarkError::InvalidData(format!(
                    "chunk {} record {}: {}",
                    chunk, position, reason
                ))
            })
        })
        .collect()
}
