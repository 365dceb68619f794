//! Raw JSON shapes of the index and chunk resources.

use super::{EpisodeDescriptor, EpisodeRecord, Level, TranscriptLine, Vocabulary};
use serde::Deserialize;

/// Ids are strings in newer catalogs and bare numbers in older ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawId {
    Text(String),
    Number(u64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s.trim().to_string(),
            RawId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RawDescriptor {
    id: RawId,
    title: String,
    level: String,
    chunk: u32,
}

impl RawDescriptor {
    pub(super) fn validate(self) -> Result<EpisodeDescriptor, String> {
        let id = self.id.into_string();
        if id.is_empty() {
            return Err("empty id".to_string());
        }
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(format!("episode {} has an empty title", id));
        }

        Ok(EpisodeDescriptor {
            id,
            title,
            level: Level::from(self.level),
            chunk: self.chunk,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RawRecord {
    id: RawId,
    title: String,
    level: String,
    #[serde(default, alias = "mp3Url")]
    mp3: String,
    #[serde(default, rename = "transcriptData", alias = "transcript")]
    transcript: Vec<TranscriptLine>,
    #[serde(default)]
    vocabulary: Vocabulary,
}

impl RawRecord {
    pub(super) fn validate(self) -> Result<EpisodeRecord, String> {
        let id = self.id.into_string();
        if id.is_empty() {
            return Err("empty id".to_string());
        }
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(format!("episode {} has an empty title", id));
        }

        Ok(EpisodeRecord {
            id,
            title,
            level: Level::from(self.level),
            mp3_url: self.mp3.trim().to_string(),
            transcript: self.transcript,
            vocabulary: self.vocabulary,
        })
    }
}
