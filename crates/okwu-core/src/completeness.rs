//! Completeness classification for words and examples.
//!
//! Evaluation is pure and never fails: the result is a tier plus every
//! missing requirement, collected in declaration order with no fail-fast.
//! The Complete rule set is a superset of the Sufficient rule set, so
//! Complete implies Sufficient by construction.
//!
//! The tier is derived on demand and never stored as a source of truth.

use crate::document::{ExamplePayload, WordPayload};

/// Requirement sentence for a missing headword. Exposed because the word
/// statistics counter treats a word whose only missing Complete requirement
/// is the headword as still complete.
pub const HEADWORD_REQUIREMENT: &str = "The headword is needed";

const DEFINITION_REQUIREMENT: &str = "At least one definition is needed";
const WORD_CLASS_REQUIREMENT: &str = "The word class is needed";
const AUDIO_OR_ACCENT_REQUIREMENT: &str = "An audio pronunciation or accent markings are needed";
const EXAMPLE_REQUIREMENT: &str = "At least one example sentence is needed";

const IGBO_LENGTH_REQUIREMENT: &str = "Igbo text longer than three characters is needed";
const ENGLISH_LENGTH_REQUIREMENT: &str =
    "English text at least as long as the Igbo text is needed";
const ASSOCIATED_WORD_REQUIREMENT: &str = "At least one associated word is needed";
const EXAMPLE_AUDIO_REQUIREMENT: &str = "An audio pronunciation is needed";

/// Derived completeness classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tier {
    Incomplete,
    Sufficient,
    Complete,
}

/// Result of evaluating a single word or example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub tier: Tier,
    /// Requirements still missing for the Sufficient tier, in rule order.
    pub sufficient_requirements: Vec<String>,
    /// Requirements still missing for the Complete tier, in rule order.
    /// Always a superset of `sufficient_requirements`.
    pub complete_requirements: Vec<String>,
}

impl Evaluation {
    fn classify(sufficient: Vec<String>, complete: Vec<String>) -> Self {
        let tier = if complete.is_empty() {
            Tier::Complete
        } else if sufficient.is_empty() {
            Tier::Sufficient
        } else {
            Tier::Incomplete
        };
        Self {
            tier,
            sufficient_requirements: sufficient,
            complete_requirements: complete,
        }
    }

    pub fn is_sufficient(&self) -> bool {
        self.sufficient_requirements.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.complete_requirements.is_empty()
    }
}

/// Whether a word is structurally as complete as it can ever get, waiving the
/// example-sentence requirement: its word class never takes examples, or the
/// word is a constructed term.
pub fn is_as_complete_as_possible(word: &WordPayload) -> bool {
    word.word_class.is_some_and(|class| !class.takes_examples())
        || word.attributes.is_constructed_term
}

/// Classify a word entry.
///
/// Sufficient needs a headword, a non-empty definition, and a word class.
/// Complete additionally needs audio or accent markings, and at least one
/// linked example unless the word is as complete as possible.
pub fn evaluate_word(word: &WordPayload) -> Evaluation {
    let mut sufficient = Vec::new();

    if word.word.trim().is_empty() {
        sufficient.push(HEADWORD_REQUIREMENT.to_string());
    }
    if !word.definitions.iter().any(|d| !d.trim().is_empty()) {
        sufficient.push(DEFINITION_REQUIREMENT.to_string());
    }
    if word.word_class.is_none() {
        sufficient.push(WORD_CLASS_REQUIREMENT.to_string());
    }

    let mut complete = sufficient.clone();

    let has_audio = word.pronunciation.as_deref().is_some_and(|p| !p.is_empty());
    if !has_audio && !word.attributes.is_accented {
        complete.push(AUDIO_OR_ACCENT_REQUIREMENT.to_string());
    }
    if word.examples.is_empty() && !is_as_complete_as_possible(word) {
        complete.push(EXAMPLE_REQUIREMENT.to_string());
    }

    Evaluation::classify(sufficient, complete)
}

/// Classify an example sentence.
///
/// The English-vs-Igbo rule compares text lengths in code points, not
/// meaning. That is a heuristic carried over from the platform's review
/// queries and is preserved as-is.
pub fn evaluate_example(example: &ExamplePayload) -> Evaluation {
    let mut sufficient = Vec::new();

    let igbo_len = example.igbo.chars().count();
    let english_len = example.english.chars().count();

    if igbo_len <= 3 {
        sufficient.push(IGBO_LENGTH_REQUIREMENT.to_string());
    }
    if english_len < igbo_len {
        sufficient.push(ENGLISH_LENGTH_REQUIREMENT.to_string());
    }
    if example.associated_words.is_empty() {
        sufficient.push(ASSOCIATED_WORD_REQUIREMENT.to_string());
    }

    let mut complete = sufficient.clone();

    let has_audio = example
        .pronunciation
        .as_deref()
        .is_some_and(|p| !p.is_empty());
    if !has_audio {
        complete.push(EXAMPLE_AUDIO_REQUIREMENT.to_string());
    }

    Evaluation::classify(sufficient, complete)
}
