//! Store-backed suggestion lifecycle operations.
//!
//! Each operation is a plain read-modify-write: load, apply the core
//! transition, write back. Concurrent votes on one suggestion are
//! last-write-wins per call; the store offers no optimistic lock and none is
//! taken. Lifecycle violations surface verbatim and are never retried.

use std::sync::Arc;

use okwu_core::{
    ExamplePayload, ExampleSuggestion, Suggestion, SuggestionId, UserId, WordPayload,
    WordSuggestion,
};
use okwu_store::SuggestionStore;
use tracing::info;

use crate::error::EngineError;

pub struct LifecycleService<S> {
    store: Arc<S>,
}

impl<S: SuggestionStore> LifecycleService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Submit a fresh word suggestion, optionally editing an existing document.
    pub async fn submit_word(
        &self,
        author: UserId,
        payload: WordPayload,
        original_document_id: Option<okwu_core::DocumentId>,
    ) -> Result<WordSuggestion, EngineError> {
        let mut suggestion = Suggestion::draft(author, payload);
        suggestion.original_document_id = original_document_id;
        self.store.put_word_suggestion(suggestion.clone()).await?;
        info!(id = %suggestion.id, "word suggestion submitted");
        Ok(suggestion)
    }

    /// Submit a fresh example suggestion.
    pub async fn submit_example(
        &self,
        author: UserId,
        payload: ExamplePayload,
        original_document_id: Option<okwu_core::DocumentId>,
    ) -> Result<ExampleSuggestion, EngineError> {
        let mut suggestion = Suggestion::draft(author, payload);
        suggestion.original_document_id = original_document_id;
        self.store
            .put_example_suggestion(suggestion.clone())
            .await?;
        info!(id = %suggestion.id, "example suggestion submitted");
        Ok(suggestion)
    }

    pub async fn approve_word(
        &self,
        id: &SuggestionId,
        user: UserId,
    ) -> Result<WordSuggestion, EngineError> {
        let mut suggestion = self.store.get_word_suggestion(id).await?;
        suggestion.approve(user)?;
        self.store.put_word_suggestion(suggestion.clone()).await?;
        Ok(suggestion)
    }

    pub async fn deny_word(
        &self,
        id: &SuggestionId,
        user: UserId,
    ) -> Result<WordSuggestion, EngineError> {
        let mut suggestion = self.store.get_word_suggestion(id).await?;
        suggestion.deny(user)?;
        self.store.put_word_suggestion(suggestion.clone()).await?;
        Ok(suggestion)
    }

    pub async fn mark_editing_word(
        &self,
        id: &SuggestionId,
        user: UserId,
    ) -> Result<WordSuggestion, EngineError> {
        let mut suggestion = self.store.get_word_suggestion(id).await?;
        suggestion.mark_editing(user)?;
        self.store.put_word_suggestion(suggestion.clone()).await?;
        Ok(suggestion)
    }

    pub async fn clear_editing_word(
        &self,
        id: &SuggestionId,
        user: &UserId,
    ) -> Result<WordSuggestion, EngineError> {
        let mut suggestion = self.store.get_word_suggestion(id).await?;
        suggestion.clear_editing(user)?;
        self.store.put_word_suggestion(suggestion.clone()).await?;
        Ok(suggestion)
    }

    pub async fn approve_example(
        &self,
        id: &SuggestionId,
        user: UserId,
    ) -> Result<ExampleSuggestion, EngineError> {
        let mut suggestion = self.store.get_example_suggestion(id).await?;
        suggestion.approve(user)?;
        self.store
            .put_example_suggestion(suggestion.clone())
            .await?;
        Ok(suggestion)
    }

    pub async fn deny_example(
        &self,
        id: &SuggestionId,
        user: UserId,
    ) -> Result<ExampleSuggestion, EngineError> {
        let mut suggestion = self.store.get_example_suggestion(id).await?;
        suggestion.deny(user)?;
        self.store
            .put_example_suggestion(suggestion.clone())
            .await?;
        Ok(suggestion)
    }

    pub async fn mark_editing_example(
        &self,
        id: &SuggestionId,
        user: UserId,
    ) -> Result<ExampleSuggestion, EngineError> {
        let mut suggestion = self.store.get_example_suggestion(id).await?;
        suggestion.mark_editing(user)?;
        self.store
            .put_example_suggestion(suggestion.clone())
            .await?;
        Ok(suggestion)
    }

    pub async fn clear_editing_example(
        &self,
        id: &SuggestionId,
        user: &UserId,
    ) -> Result<ExampleSuggestion, EngineError> {
        let mut suggestion = self.store.get_example_suggestion(id).await?;
        suggestion.clear_editing(user)?;
        self.store
            .put_example_suggestion(suggestion.clone())
            .await?;
        Ok(suggestion)
    }
}
