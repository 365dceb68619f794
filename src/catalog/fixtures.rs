//! Record builders shared by unit tests.

use super::{EpisodeRecord, Level, TranscriptLine, VocabEntry, Vocabulary};

pub(crate) fn record(id: &str, title: &str, level: Level) -> EpisodeRecord {
    EpisodeRecord {
        id: id.to_string(),
        title: title.to_string(),
        level,
        mp3_url: format!("https://cdn.example.com/{}.mp3", id),
        transcript: Vec::new(),
        vocabulary: Vocabulary::default(),
    }
}

pub(crate) fn with_key_word(mut record: EpisodeRecord, word: &str) -> EpisodeRecord {
    record.vocabulary.key.push(VocabEntry {
        word: word.to_string(),
        kind: "noun".to_string(),
        definition: format!("meaning of {}", word),
    });
    record
}

pub(crate) fn with_supplementary_word(mut record: EpisodeRecord, word: &str) -> EpisodeRecord {
    record.vocabulary.supplementary.push(VocabEntry {
        word: word.to_string(),
        kind: "phrase".to_string(),
        definition: format!("meaning of {}", word),
    });
    record
}

pub(crate) fn with_line(mut record: EpisodeRecord, speaker: &str, text: &str) -> EpisodeRecord {
    record.transcript.push(TranscriptLine {
        speaker: speaker.to_string(),
        text: text.to_string(),
    });
    record
}
