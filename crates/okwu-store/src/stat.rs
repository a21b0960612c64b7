//! Platform statistic rows.
//!
//! A stat is a counter keyed by `(stat type, author id)`, created lazily and
//! overwritten on every aggregation pass. Overwrite-by-recompute rather than
//! increment keeps the counters drift-free when individual updates are missed.

use chrono::{DateTime, Utc};
use okwu_core::UserId;
use serde::{Deserialize, Serialize};

/// The fixed set of platform-wide counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatType {
    SufficientExamples,
    CompleteExamples,
    NsibidiWordSuggestions,
    NsibidiWords,
    StandardIgbo,
    HeadwordAudioPronunciations,
    SufficientWords,
    CompleteWords,
    DialectalVariations,
}

impl StatType {
    pub const fn all() -> &'static [StatType] {
        use StatType::*;
        &[
            SufficientExamples,
            CompleteExamples,
            NsibidiWordSuggestions,
            NsibidiWords,
            StandardIgbo,
            HeadwordAudioPronunciations,
            SufficientWords,
            CompleteWords,
            DialectalVariations,
        ]
    }

    pub fn value(&self) -> &'static str {
        match self {
            StatType::SufficientExamples => "SUFFICIENT_EXAMPLES",
            StatType::CompleteExamples => "COMPLETE_EXAMPLES",
            StatType::NsibidiWordSuggestions => "NSIBIDI_WORD_SUGGESTIONS",
            StatType::NsibidiWords => "NSIBIDI_WORDS",
            StatType::StandardIgbo => "STANDARD_IGBO",
            StatType::HeadwordAudioPronunciations => "HEADWORD_AUDIO_PRONUNCIATIONS",
            StatType::SufficientWords => "SUFFICIENT_WORDS",
            StatType::CompleteWords => "COMPLETE_WORDS",
            StatType::DialectalVariations => "DIALECTAL_VARIATIONS",
        }
    }
}

/// Key of a stat row. Platform-wide rows use [`UserId::system`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatKey {
    pub stat_type: StatType,
    pub author_id: UserId,
}

impl StatKey {
    pub fn system(stat_type: StatType) -> Self {
        Self {
            stat_type,
            author_id: UserId::system(),
        }
    }
}

/// A stored counter row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    #[serde(flatten)]
    pub key: StatKey,
    pub value: u64,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_type_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&StatType::HeadwordAudioPronunciations).unwrap(),
            "\"HEADWORD_AUDIO_PRONUNCIATIONS\""
        );
        assert_eq!(
            serde_json::to_string(&StatType::NsibidiWords).unwrap(),
            format!("\"{}\"", StatType::NsibidiWords.value())
        );
    }

    #[test]
    fn all_covers_every_type_once() {
        let all = StatType::all();
        assert_eq!(all.len(), 9);
        let mut seen = std::collections::BTreeSet::new();
        for t in all {
            assert!(seen.insert(*t));
        }
    }
}
