//! In-memory store.
//!
//! Backs the engine tests and the CLI demo mode. Each collection sits behind
//! its own `tokio::sync::RwLock`; a write-lock acquisition is the unit of
//! atomicity, which gives the compare-and-swap in `complete_merge_*` its
//! only-one-winner guarantee.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use okwu_core::{
    DocumentId, Example, ExampleSuggestion, SuggestionId, UserId, Word, WordSuggestion,
};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StoreError;
use crate::stat::{Stat, StatKey};
use crate::traits::{
    DocumentStore, ExampleFilter, StatStore, SuggestionFilter, SuggestionStore, WordFilter,
};

#[derive(Default)]
pub struct MemoryStore {
    words: RwLock<HashMap<DocumentId, Word>>,
    examples: RwLock<HashMap<DocumentId, Example>>,
    word_suggestions: RwLock<HashMap<SuggestionId, WordSuggestion>>,
    example_suggestions: RwLock<HashMap<SuggestionId, ExampleSuggestion>>,
    stats: RwLock<HashMap<StatKey, Stat>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_word(&self, id: &DocumentId) -> Result<Word, StoreError> {
        self.words
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("word", id.as_str()))
    }

    async fn upsert_word(&self, mut word: Word) -> Result<Word, StoreError> {
        let mut words = self.words.write().await;
        if let Some(existing) = words.get(&word.id) {
            word.created_at = existing.created_at;
        }
        words.insert(word.id.clone(), word.clone());
        Ok(word)
    }

    async fn list_words(&self) -> Result<Vec<Word>, StoreError> {
        Ok(self.words.read().await.values().cloned().collect())
    }

    async fn count_words(&self, filter: WordFilter) -> Result<u64, StoreError> {
        let words = self.words.read().await;
        Ok(words.values().filter(|w| filter.matches(w)).count() as u64)
    }

    async fn get_example(&self, id: &DocumentId) -> Result<Example, StoreError> {
        self.examples
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("example", id.as_str()))
    }

    async fn upsert_example(&self, mut example: Example) -> Result<Example, StoreError> {
        let mut examples = self.examples.write().await;
        if let Some(existing) = examples.get(&example.id) {
            example.created_at = existing.created_at;
        }
        examples.insert(example.id.clone(), example.clone());
        Ok(example)
    }

    async fn list_examples(&self) -> Result<Vec<Example>, StoreError> {
        Ok(self.examples.read().await.values().cloned().collect())
    }

    async fn count_examples(&self, filter: ExampleFilter) -> Result<u64, StoreError> {
        let examples = self.examples.read().await;
        Ok(examples.values().filter(|e| filter.matches(e)).count() as u64)
    }
}

#[async_trait]
impl SuggestionStore for MemoryStore {
    async fn get_word_suggestion(&self, id: &SuggestionId) -> Result<WordSuggestion, StoreError> {
        self.word_suggestions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("word suggestion", id.as_str()))
    }

    async fn put_word_suggestion(&self, suggestion: WordSuggestion) -> Result<(), StoreError> {
        self.word_suggestions
            .write()
            .await
            .insert(suggestion.id.clone(), suggestion);
        Ok(())
    }

    async fn list_word_suggestions(&self) -> Result<Vec<WordSuggestion>, StoreError> {
        Ok(self
            .word_suggestions
            .read()
            .await
            .values()
            .cloned()
            .collect())
    }

    async fn count_word_suggestions(
        &self,
        filter: SuggestionFilter,
    ) -> Result<u64, StoreError> {
        let suggestions = self.word_suggestions.read().await;
        Ok(suggestions.values().filter(|s| filter.matches(s)).count() as u64)
    }

    async fn complete_merge_word(
        &self,
        id: &SuggestionId,
        by: &UserId,
        at: DateTime<Utc>,
    ) -> Result<WordSuggestion, StoreError> {
        let mut suggestions = self.word_suggestions.write().await;
        let suggestion = suggestions
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("word suggestion", id.as_str()))?;
        if let Some(winner) = &suggestion.merged_by {
            debug!(%id, %winner, loser = %by, "word merge compare-and-swap lost");
            return Err(StoreError::Conflict(format!(
                "word suggestion {id} already merged by {winner}"
            )));
        }
        suggestion.merged_by = Some(by.clone());
        suggestion.merged_at = Some(at);
        suggestion.updated_at = at;
        Ok(suggestion.clone())
    }

    async fn get_example_suggestion(
        &self,
        id: &SuggestionId,
    ) -> Result<ExampleSuggestion, StoreError> {
        self.example_suggestions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("example suggestion", id.as_str()))
    }

    async fn put_example_suggestion(
        &self,
        suggestion: ExampleSuggestion,
    ) -> Result<(), StoreError> {
        self.example_suggestions
            .write()
            .await
            .insert(suggestion.id.clone(), suggestion);
        Ok(())
    }

    async fn list_example_suggestions(&self) -> Result<Vec<ExampleSuggestion>, StoreError> {
        Ok(self
            .example_suggestions
            .read()
            .await
            .values()
            .cloned()
            .collect())
    }

    async fn complete_merge_example(
        &self,
        id: &SuggestionId,
        by: &UserId,
        at: DateTime<Utc>,
    ) -> Result<ExampleSuggestion, StoreError> {
        let mut suggestions = self.example_suggestions.write().await;
        let suggestion = suggestions
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("example suggestion", id.as_str()))?;
        if let Some(winner) = &suggestion.merged_by {
            debug!(%id, %winner, loser = %by, "example merge compare-and-swap lost");
            return Err(StoreError::Conflict(format!(
                "example suggestion {id} already merged by {winner}"
            )));
        }
        suggestion.merged_by = Some(by.clone());
        suggestion.merged_at = Some(at);
        suggestion.updated_at = at;
        Ok(suggestion.clone())
    }
}

#[async_trait]
impl StatStore for MemoryStore {
    async fn get_stat(&self, key: &StatKey) -> Result<Option<Stat>, StoreError> {
        Ok(self.stats.read().await.get(key).cloned())
    }

    async fn upsert_stat(&self, key: StatKey, value: u64) -> Result<Stat, StoreError> {
        let stat = Stat {
            key: key.clone(),
            value,
            updated_at: Utc::now(),
        };
        self.stats.write().await.insert(key, stat.clone());
        Ok(stat)
    }

    async fn all_stats(&self) -> Result<Vec<Stat>, StoreError> {
        let mut stats: Vec<Stat> = self.stats.read().await.values().cloned().collect();
        stats.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat::StatType;
    use okwu_core::{ExamplePayload, Suggestion, WordPayload};

    fn word(id: &str, payload: WordPayload) -> Word {
        payload.into_word(DocumentId::new(id), Utc::now())
    }

    #[tokio::test]
    async fn get_missing_word_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_word(&DocumentId::new("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "word", .. }));
    }

    #[tokio::test]
    async fn upsert_replaces_content_but_keeps_created_at() {
        let store = MemoryStore::new();
        let first = store
            .upsert_word(word(
                "w1",
                WordPayload {
                    word: "mmiri".into(),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        let replacement = WordPayload {
            word: "mmiri".into(),
            definitions: vec!["water".into()],
            ..Default::default()
        }
        .into_word(DocumentId::new("w1"), Utc::now());
        let updated = store.upsert_word(replacement).await.unwrap();

        assert_eq!(updated.created_at, first.created_at);
        assert_eq!(updated.content.definitions, vec!["water".to_string()]);
        assert_eq!(store.count_words(WordFilter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn word_filters_count_expected_subsets() {
        let store = MemoryStore::new();
        store
            .upsert_word(word(
                "w1",
                WordPayload {
                    word: "mmiri".into(),
                    nsibidi: "𑀉".into(),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();
        let mut attrs = WordPayload {
            word: "anyanwụ".into(),
            pronunciation: Some("https://cdn/a.webm".into()),
            ..Default::default()
        };
        attrs.attributes.is_standard_igbo = true;
        attrs.attributes.is_accented = true;
        store.upsert_word(word("w2", attrs)).await.unwrap();

        assert_eq!(store.count_words(WordFilter::All).await.unwrap(), 2);
        assert_eq!(store.count_words(WordFilter::HasNsibidi).await.unwrap(), 1);
        assert_eq!(store.count_words(WordFilter::StandardIgbo).await.unwrap(), 1);
        assert_eq!(store.count_words(WordFilter::HeadwordAudio).await.unwrap(), 1);
        assert_eq!(
            store.count_words(WordFilter::ReviewableCorpus).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn complete_merge_is_single_winner() {
        let store = MemoryStore::new();
        let suggestion = Suggestion::draft(UserId::new("author"), WordPayload::default());
        let id = suggestion.id.clone();
        store.put_word_suggestion(suggestion).await.unwrap();

        let merged = store
            .complete_merge_word(&id, &UserId::new("u1"), Utc::now())
            .await
            .unwrap();
        assert_eq!(merged.merged_by, Some(UserId::new("u1")));

        let err = store
            .complete_merge_word(&id, &UserId::new("u2"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        // The losing caller changed nothing.
        let stored = store.get_word_suggestion(&id).await.unwrap();
        assert_eq!(stored.merged_by, Some(UserId::new("u1")));
    }

    #[tokio::test]
    async fn complete_merge_example_is_single_winner() {
        let store = MemoryStore::new();
        let suggestion = Suggestion::draft(UserId::new("author"), ExamplePayload::default());
        let id = suggestion.id.clone();
        store.put_example_suggestion(suggestion).await.unwrap();

        store
            .complete_merge_example(&id, &UserId::new("u1"), Utc::now())
            .await
            .unwrap();
        let err = store
            .complete_merge_example(&id, &UserId::new("u2"), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let stored = store.get_example_suggestion(&id).await.unwrap();
        assert_eq!(stored.merged_by, Some(UserId::new("u1")));
    }

    #[tokio::test]
    async fn stats_upsert_overwrites() {
        let store = MemoryStore::new();
        let key = StatKey::system(StatType::SufficientWords);
        assert!(store.get_stat(&key).await.unwrap().is_none());

        store.upsert_stat(key.clone(), 5).await.unwrap();
        store.upsert_stat(key.clone(), 3).await.unwrap();

        let stat = store.get_stat(&key).await.unwrap().unwrap();
        assert_eq!(stat.value, 3);
        assert_eq!(store.all_stats().await.unwrap().len(), 1);
    }
}
