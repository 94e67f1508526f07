//! Lexicon-based sentiment of a user's message.
//!
//! Deterministic and pure. The text is lower-cased and every lexicon term
//! found as a substring moves the score by [`TERM_WEIGHT`]. There is no
//! tokenization or stemming, so a word can match more than one term
//! ("hopeless" matches both `hope` and `hopeless`).

/// Score change contributed by one matched term.
pub const TERM_WEIGHT: f64 = 0.1;

pub const POSITIVE_TERMS: &[&str] = &[
    "good",
    "great",
    "happy",
    "hope",
    "hopeful",
    "better",
    "excited",
    "grateful",
    "thankful",
    "proud",
    "confident",
    "calm",
    "motivated",
    "love",
    "glad",
    "strong",
    "progress",
    "optimistic",
    "relieved",
    "peace",
];

pub const NEGATIVE_TERMS: &[&str] = &[
    "sad",
    "lost",
    "alone",
    "lonely",
    "depressed",
    "anxious",
    "angry",
    "hopeless",
    "worthless",
    "afraid",
    "scared",
    "tired",
    "hurt",
    "empty",
    "stuck",
    "frustrated",
    "bad",
    "worse",
    "hate",
    "cry",
];

/// Sentiment of `text` in `[-1.0, 1.0]`.
pub fn score(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let positive = POSITIVE_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .count() as i64;
    let negative = NEGATIVE_TERMS
        .iter()
        .filter(|term| lowered.contains(*term))
        .count() as i64;

    ((positive - negative) as f64 * TERM_WEIGHT).clamp(-1.0, 1.0)
}
