//! Pronunciation practice scoring.
//!
//! Compares what the learner said (as recognized text) with the line they
//! were asked to repeat. The score is the edit-distance similarity of the
//! two, as a whole percentage.

use serde::Serialize;

/// How an attempt is rated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// 90 and above.
    Excellent,
    /// 75 to 89.
    Great,
    /// 60 to 74.
    Good,
    KeepPracticing,
}

impl Feedback {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Feedback::Excellent,
            75..=89 => Feedback::Great,
            60..=74 => Feedback::Good,
            _ => Feedback::KeepPracticing,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Excellent => "Excellent! Perfect pronunciation!",
            Feedback::Great => "Great job! Keep practicing!",
            Feedback::Good => "Good effort! Try again for better clarity.",
            Feedback::KeepPracticing => "Keep practicing! Focus on clarity.",
        }
    }
}

/// A scored attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assessment {
    pub score: u8,
    pub feedback: Feedback,
}

/// Similarity of `expected` and `said` from 0 to 100, ignoring case and
/// surrounding whitespace. Two empty strings are a perfect match.
pub fn similarity(expected: &str, said: &str) -> u8 {
    let expected = expected.trim().to_lowercase();
    let said = said.trim().to_lowercase();

    let longest = expected.chars().count().max(said.chars().count());
    if longest == 0 {
        return 100;
    }

    let distance = strsim::levenshtein(&expected, &said);
    let ratio = 1.0 - distance as f64 / longest as f64;
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Score an attempt and rate it.
pub fn assess(expected: &str, said: &str) -> Assessment {
    let score = similarity(expected, said);
    Assessment {
        score,
        feedback: Feedback::from_score(score),
    }
}
