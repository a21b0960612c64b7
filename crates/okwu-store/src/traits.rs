//! Datastore seams consumed by the engine.
//!
//! Implementations guarantee per-record atomicity only; there are no
//! cross-record or cross-store transactions. Every method is a suspension
//! point. [`SuggestionStore::complete_merge_word`] and its example
//! counterpart are the one compare-and-swap primitive: `merged_by` is set
//! only if currently unset, so at most one merge of a suggestion commits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use okwu_core::{
    DocumentId, Example, ExampleSuggestion, SuggestionId, UserId, Word, WordSuggestion,
    evaluate_example,
};

use crate::error::StoreError;
use crate::stat::{Stat, StatKey};

/// Closed filter set for word counts. Replaces free-form query maps: every
/// countable predicate the platform uses is enumerated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordFilter {
    All,
    /// Words carrying Nsịbịdị script.
    HasNsibidi,
    /// Words attributed as Standard Igbo.
    StandardIgbo,
    /// Words with a headword audio recording.
    HeadwordAudio,
    /// Words eligible for completeness review: non-empty headword, Standard
    /// Igbo, and accent-marked.
    ReviewableCorpus,
}

impl WordFilter {
    pub fn matches(&self, word: &Word) -> bool {
        let c = &word.content;
        match self {
            WordFilter::All => true,
            WordFilter::HasNsibidi => !c.nsibidi.is_empty(),
            WordFilter::StandardIgbo => c.attributes.is_standard_igbo,
            WordFilter::HeadwordAudio => {
                c.pronunciation.as_deref().is_some_and(|p| !p.is_empty())
            }
            WordFilter::ReviewableCorpus => {
                !c.word.trim().is_empty()
                    && c.attributes.is_standard_igbo
                    && c.attributes.is_accented
            }
        }
    }
}

/// Closed filter set for example counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExampleFilter {
    All,
    /// Examples meeting the Sufficient tier.
    Sufficient,
}

impl ExampleFilter {
    pub fn matches(&self, example: &Example) -> bool {
        match self {
            ExampleFilter::All => true,
            ExampleFilter::Sufficient => evaluate_example(&example.content).is_sufficient(),
        }
    }
}

/// Closed filter set for word-suggestion counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionFilter {
    All,
    /// Open suggestions carrying Nsịbịdị script.
    UnmergedWithNsibidi,
}

impl SuggestionFilter {
    pub fn matches(&self, suggestion: &WordSuggestion) -> bool {
        match self {
            SuggestionFilter::All => true,
            SuggestionFilter::UnmergedWithNsibidi => {
                suggestion.merged_by.is_none() && !suggestion.payload.nsibidi.is_empty()
            }
        }
    }
}

/// Canonical document CRUD plus filtered counts.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_word(&self, id: &DocumentId) -> Result<Word, StoreError>;

    /// Insert or replace the word at its id. On replace the incoming content
    /// wins wholesale; only `created_at` survives from the existing record.
    async fn upsert_word(&self, word: Word) -> Result<Word, StoreError>;

    async fn list_words(&self) -> Result<Vec<Word>, StoreError>;

    async fn count_words(&self, filter: WordFilter) -> Result<u64, StoreError>;

    async fn get_example(&self, id: &DocumentId) -> Result<Example, StoreError>;

    async fn upsert_example(&self, example: Example) -> Result<Example, StoreError>;

    async fn list_examples(&self) -> Result<Vec<Example>, StoreError>;

    async fn count_examples(&self, filter: ExampleFilter) -> Result<u64, StoreError>;
}

/// Suggestion CRUD plus the merge compare-and-swap.
#[async_trait]
pub trait SuggestionStore: Send + Sync {
    async fn get_word_suggestion(&self, id: &SuggestionId) -> Result<WordSuggestion, StoreError>;

    async fn put_word_suggestion(&self, suggestion: WordSuggestion) -> Result<(), StoreError>;

    async fn list_word_suggestions(&self) -> Result<Vec<WordSuggestion>, StoreError>;

    async fn count_word_suggestions(&self, filter: SuggestionFilter)
    -> Result<u64, StoreError>;

    /// Set `merged_by`/`merged_at` iff `merged_by` is currently unset.
    /// Returns the updated suggestion, or [`StoreError::Conflict`] when
    /// another merge already claimed it.
    async fn complete_merge_word(
        &self,
        id: &SuggestionId,
        by: &UserId,
        at: DateTime<Utc>,
    ) -> Result<WordSuggestion, StoreError>;

    async fn get_example_suggestion(
        &self,
        id: &SuggestionId,
    ) -> Result<ExampleSuggestion, StoreError>;

    async fn put_example_suggestion(
        &self,
        suggestion: ExampleSuggestion,
    ) -> Result<(), StoreError>;

    async fn list_example_suggestions(&self) -> Result<Vec<ExampleSuggestion>, StoreError>;

    /// Example-side counterpart of [`complete_merge_word`](Self::complete_merge_word).
    async fn complete_merge_example(
        &self,
        id: &SuggestionId,
        by: &UserId,
        at: DateTime<Utc>,
    ) -> Result<ExampleSuggestion, StoreError>;
}

/// Keyed stat rows, created lazily and overwritten on recompute.
#[async_trait]
pub trait StatStore: Send + Sync {
    async fn get_stat(&self, key: &StatKey) -> Result<Option<Stat>, StoreError>;

    async fn upsert_stat(&self, key: StatKey, value: u64) -> Result<Stat, StoreError>;

    async fn all_stats(&self) -> Result<Vec<Stat>, StoreError>;
}
