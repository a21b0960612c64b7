//! Merge transaction coordinator: promotes an approved suggestion into a
//! canonical document.
//!
//! True cross-store atomicity is unavailable — the datastore and the blob
//! store commit independently — so the steps are sequenced to bound the blast
//! radius of a partial failure:
//!
//! 1. load and check preconditions (merged? enough approvals?)
//! 2. resolve the target document id (reuse on edit, allocate on new entry)
//! 3. rename every suggestion-owned asset to its document-scoped key;
//!    any failure aborts before a single document write happens
//! 4. evaluate completeness (derived, cacheable, never stored as truth)
//! 5. upsert the document — suggestion values win on conflict
//! 6. compare-and-swap `merged_by`, so at most one concurrent merge commits
//!
//! Transient store/blob failures at the rename and write steps are retried at
//! the step boundary; everything else is fatal on first failure with the
//! failing step named in the error.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use okwu_assets::{AssetError, AssetStore};
use okwu_core::{
    DocumentId, Evaluation, Example, LifecycleError, SuggestionId, UserId, Word, evaluate_example,
    evaluate_word,
};
use okwu_store::{DocumentStore, StoreError, SuggestionStore};
use tracing::{info, warn};

use crate::error::{MergeError, MergeStep};

const MAX_STEP_ATTEMPTS: u32 = 3;

/// A merged document together with its derived completeness evaluation.
#[derive(Debug, Clone)]
pub struct Merged<D> {
    pub document: D,
    pub evaluation: Evaluation,
}

pub struct MergeCoordinator<S> {
    store: Arc<S>,
    assets: Arc<AssetStore>,
    approval_threshold: usize,
}

impl<S> MergeCoordinator<S>
where
    S: DocumentStore + SuggestionStore,
{
    pub fn new(store: Arc<S>, assets: Arc<AssetStore>, approval_threshold: usize) -> Self {
        Self {
            store,
            assets,
            approval_threshold,
        }
    }

    /// Promote an approved word suggestion into a word document.
    pub async fn merge_word_suggestion(
        &self,
        id: &SuggestionId,
        by: UserId,
    ) -> Result<Merged<Word>, MergeError> {
        let suggestion = self
            .store
            .get_word_suggestion(id)
            .await
            .map_err(|source| MergeError::Store {
                step: MergeStep::LoadSuggestion,
                source,
            })?;
        self.check_mergeable(suggestion.merged_by.as_ref(), suggestion.approvals.len())?;

        let target = suggestion
            .original_document_id
            .clone()
            .unwrap_or_else(DocumentId::allocate);

        // Relocate every suggestion-owned asset before any document write.
        let mut content = suggestion.payload.clone();

        let owns_headword_audio = content
            .pronunciation
            .as_deref()
            .is_some_and(|p| !p.is_empty());
        let old_id = if owns_headword_audio {
            suggestion.id.as_str()
        } else {
            ""
        };
        let uri = self
            .rename_with_retry(old_id, target.as_str())
            .await?;
        content.pronunciation = (!uri.is_empty()).then_some(uri);

        for (dialect, slot) in content.dialects.iter_mut() {
            let suggestion_key = format!("{}-{}", suggestion.id, dialect.code());
            let target_key = format!("{}-{}", target, dialect.code());
            let owns_audio = slot.pronunciation.iter().any(|p| !p.is_empty());
            let old_id = if owns_audio { suggestion_key.as_str() } else { "" };
            let uri = self.rename_with_retry(old_id, &target_key).await?;
            slot.pronunciation = if uri.is_empty() { vec![] } else { vec![uri] };
        }

        let evaluation = evaluate_word(&content);

        let now = Utc::now();
        let word = content.into_word(target.clone(), now);
        let word = retry_store(MergeStep::DocumentWrite, || {
            self.store.upsert_word(word.clone())
        })
        .await?;

        self.mark_merged_word(id, &by).await?;

        info!(
            suggestion = %id,
            document = %target,
            merged_by = %by,
            tier = ?evaluation.tier,
            "word suggestion merged"
        );
        Ok(Merged {
            document: word,
            evaluation,
        })
    }

    /// Promote an approved example suggestion into an example document.
    pub async fn merge_example_suggestion(
        &self,
        id: &SuggestionId,
        by: UserId,
    ) -> Result<Merged<Example>, MergeError> {
        let suggestion = self
            .store
            .get_example_suggestion(id)
            .await
            .map_err(|source| MergeError::Store {
                step: MergeStep::LoadSuggestion,
                source,
            })?;
        self.check_mergeable(suggestion.merged_by.as_ref(), suggestion.approvals.len())?;

        let target = suggestion
            .original_document_id
            .clone()
            .unwrap_or_else(DocumentId::allocate);

        let mut content = suggestion.payload.clone();
        let owns_audio = content
            .pronunciation
            .as_deref()
            .is_some_and(|p| !p.is_empty());
        let old_id = if owns_audio { suggestion.id.as_str() } else { "" };
        let uri = self.rename_with_retry(old_id, target.as_str()).await?;
        content.pronunciation = (!uri.is_empty()).then_some(uri);

        let evaluation = evaluate_example(&content);

        let now = Utc::now();
        let example = content.into_example(target.clone(), now);
        let example = retry_store(MergeStep::DocumentWrite, || {
            self.store.upsert_example(example.clone())
        })
        .await?;

        self.mark_merged_example(id, &by).await?;

        info!(
            suggestion = %id,
            document = %target,
            merged_by = %by,
            tier = ?evaluation.tier,
            "example suggestion merged"
        );
        Ok(Merged {
            document: example,
            evaluation,
        })
    }

    fn check_mergeable(
        &self,
        merged_by: Option<&UserId>,
        approvals: usize,
    ) -> Result<(), MergeError> {
        if merged_by.is_some() {
            return Err(LifecycleError::AlreadyMerged.into());
        }
        if approvals < self.approval_threshold {
            return Err(LifecycleError::InsufficientApprovals {
                have: approvals,
                need: self.approval_threshold,
            }
            .into());
        }
        Ok(())
    }

    async fn rename_with_retry(&self, old_id: &str, new_id: &str) -> Result<String, MergeError> {
        let mut attempt = 1;
        loop {
            match self.assets.rename(old_id, new_id, false).await {
                Ok(uri) => return Ok(uri),
                Err(err) if is_transient_asset_error(&err) && attempt < MAX_STEP_ATTEMPTS => {
                    warn!(old_id, new_id, attempt, error = %err, "transient asset failure, retrying rename");
                    attempt += 1;
                }
                Err(source) => {
                    return Err(MergeError::Asset {
                        step: MergeStep::AssetRename,
                        source,
                    });
                }
            }
        }
    }

    async fn mark_merged_word(&self, id: &SuggestionId, by: &UserId) -> Result<(), MergeError> {
        match self.store.complete_merge_word(id, by, Utc::now()).await {
            Ok(_) => Ok(()),
            // A concurrent merge won the compare-and-swap.
            Err(StoreError::Conflict(_)) => Err(LifecycleError::AlreadyMerged.into()),
            Err(source) => Err(MergeError::Store {
                step: MergeStep::MarkMerged,
                source,
            }),
        }
    }

    async fn mark_merged_example(&self, id: &SuggestionId, by: &UserId) -> Result<(), MergeError> {
        match self.store.complete_merge_example(id, by, Utc::now()).await {
            Ok(_) => Ok(()),
            Err(StoreError::Conflict(_)) => Err(LifecycleError::AlreadyMerged.into()),
            Err(source) => Err(MergeError::Store {
                step: MergeStep::MarkMerged,
                source,
            }),
        }
    }
}

fn is_transient_asset_error(err: &AssetError) -> bool {
    match err {
        AssetError::Http(_) => true,
        AssetError::Server { status, .. } => *status >= 500,
        AssetError::Validation(_) | AssetError::NotFound { .. } => false,
    }
}

async fn retry_store<T, F, Fut>(step: MergeStep, mut op: F) -> Result<T, MergeError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt < MAX_STEP_ATTEMPTS => {
                warn!(step = %step, attempt, error = %err, "transient store failure, retrying step");
                attempt += 1;
            }
            Err(source) => return Err(MergeError::Store { step, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okwu_core::{
        Dialect, ReviewState, Suggestion, Tier, WordClass, WordDialect, WordPayload,
    };
    use okwu_store::{MemoryStore, WordFilter};

    const SAMPLE: &str = "data:audio/webm;base64,aWdibyBhdWRpbw==";

    struct Fixture {
        store: Arc<MemoryStore>,
        assets: Arc<AssetStore>,
        coordinator: MergeCoordinator<MemoryStore>,
    }

    fn fixture(threshold: usize) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let assets = Arc::new(AssetStore::in_memory());
        let coordinator = MergeCoordinator::new(store.clone(), assets.clone(), threshold);
        Fixture {
            store,
            assets,
            coordinator,
        }
    }

    async fn submit(store: &MemoryStore, payload: WordPayload) -> SuggestionId {
        let suggestion = Suggestion::draft(UserId::new("author"), payload);
        let id = suggestion.id.clone();
        store.put_word_suggestion(suggestion).await.unwrap();
        id
    }

    #[tokio::test]
    async fn approved_suggestion_merges_into_new_document() {
        let fx = fixture(1);
        let id = submit(
            &fx.store,
            WordPayload {
                word: "mmiri".into(),
                definitions: vec!["water".into()],
                word_class: Some(WordClass::NNC),
                ..Default::default()
            },
        )
        .await;

        let mut suggestion = fx.store.get_word_suggestion(&id).await.unwrap();
        suggestion.approve(UserId::new("u1")).unwrap();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let merged = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(merged.document.content.word, "mmiri");
        assert_eq!(merged.evaluation.tier, Tier::Sufficient);

        // A new document was allocated and persisted.
        let stored = fx.store.get_word(&merged.document.id).await.unwrap();
        assert_eq!(stored.content.word, "mmiri");

        // The suggestion is terminal.
        let suggestion = fx.store.get_word_suggestion(&id).await.unwrap();
        assert_eq!(suggestion.merged_by, Some(UserId::new("u1")));
        assert_eq!(suggestion.state(), ReviewState::Merged);
        assert!(suggestion.merged_at.is_some());
    }

    #[tokio::test]
    async fn merge_below_threshold_is_rejected() {
        let fx = fixture(2);
        let id = submit(&fx.store, WordPayload::default()).await;
        let mut suggestion = fx.store.get_word_suggestion(&id).await.unwrap();
        suggestion.approve(UserId::new("u1")).unwrap();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let err = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MergeError::Lifecycle(LifecycleError::InsufficientApprovals { have: 1, need: 2 })
        ));
        assert_eq!(fx.store.count_words(WordFilter::All).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn second_merge_gets_already_merged() {
        let fx = fixture(0);
        let id = submit(&fx.store, WordPayload::default()).await;

        fx.coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();
        let err = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u2"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MergeError::Lifecycle(LifecycleError::AlreadyMerged)
        ));
    }

    #[tokio::test]
    async fn edit_suggestion_reuses_document_id_and_wins_conflicts() {
        let fx = fixture(0);

        let original = WordPayload {
            word: "mmiri".into(),
            definitions: vec!["water".into()],
            ..Default::default()
        }
        .into_word(DocumentId::new("doc456"), Utc::now());
        fx.store.upsert_word(original).await.unwrap();

        let mut suggestion = Suggestion::draft(
            UserId::new("author"),
            WordPayload {
                word: "mmiri".into(),
                definitions: vec!["water".into(), "rain".into()],
                word_class: Some(WordClass::NNC),
                ..Default::default()
            },
        );
        suggestion.original_document_id = Some(DocumentId::new("doc456"));
        let id = suggestion.id.clone();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let merged = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(merged.document.id, DocumentId::new("doc456"));
        let stored = fx.store.get_word(&DocumentId::new("doc456")).await.unwrap();
        assert_eq!(stored.content.definitions.len(), 2);
        assert_eq!(stored.content.word_class, Some(WordClass::NNC));
        assert_eq!(fx.store.count_words(WordFilter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn merge_renames_headword_asset_before_persisting() {
        let fx = fixture(0);
        let mut suggestion = Suggestion::draft(
            UserId::new("author"),
            WordPayload {
                word: "mmiri".into(),
                ..Default::default()
            },
        );
        suggestion.payload.pronunciation =
            Some(fx.assets.put(suggestion.id.as_str(), SAMPLE).await.unwrap());
        let id = suggestion.id.clone();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let merged = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();

        let doc_id = merged.document.id.clone();
        // The recording now lives at the document-scoped key only.
        assert_eq!(
            fx.assets.get(doc_id.as_str(), false).await.unwrap(),
            b"igbo audio"
        );
        assert!(fx.assets.get(id.as_str(), false).await.is_err());
        assert_eq!(
            merged.document.content.pronunciation.as_deref(),
            Some(format!("memory://audio-pronunciations/{doc_id}.webm").as_str())
        );
    }

    #[tokio::test]
    async fn merge_renames_dialect_assets() {
        let fx = fixture(0);
        let mut suggestion = Suggestion::draft(
            UserId::new("author"),
            WordPayload {
                word: "mmiri".into(),
                ..Default::default()
            },
        );
        let slot_key = format!("{}-OWE", suggestion.id);
        let uri = fx.assets.put(&slot_key, SAMPLE).await.unwrap();
        suggestion.payload.dialects.insert(
            Dialect::OWE,
            WordDialect {
                variations: vec!["mmili".into()],
                dialects: vec![Dialect::OWE],
                pronunciation: vec![uri],
            },
        );
        let id = suggestion.id.clone();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let merged = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();

        let target_slot = format!("{}-OWE", merged.document.id);
        assert_eq!(fx.assets.get(&target_slot, false).await.unwrap(), b"igbo audio");
        assert!(fx.assets.get(&slot_key, false).await.is_err());
        let slot = &merged.document.content.dialects[&Dialect::OWE];
        assert_eq!(slot.pronunciation, vec![format!("memory://audio-pronunciations/{target_slot}.webm")]);
    }

    #[tokio::test]
    async fn edit_without_recording_deletes_document_audio() {
        let fx = fixture(0);

        // Existing document with a recording.
        let doc_id = DocumentId::new("doc456");
        fx.assets.put(doc_id.as_str(), SAMPLE).await.unwrap();
        let word = WordPayload {
            word: "mmiri".into(),
            pronunciation: Some("memory://audio-pronunciations/doc456.webm".into()),
            ..Default::default()
        }
        .into_word(doc_id.clone(), Utc::now());
        fx.store.upsert_word(word).await.unwrap();

        // Edit that removed the recording.
        let mut suggestion = Suggestion::draft(
            UserId::new("author"),
            WordPayload {
                word: "mmiri".into(),
                pronunciation: None,
                ..Default::default()
            },
        );
        suggestion.original_document_id = Some(doc_id.clone());
        let id = suggestion.id.clone();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let merged = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();
        assert_eq!(merged.document.content.pronunciation, None);
        // The document-scoped recording was deleted by the empty-source rename.
        assert!(fx.assets.get(doc_id.as_str(), false).await.is_err());
    }

    #[tokio::test]
    async fn failed_rename_aborts_before_any_document_write() {
        let fx = fixture(0);
        let suggestion = Suggestion::draft(
            UserId::new("author"),
            WordPayload {
                word: "mmiri".into(),
                // Claims a recording that does not exist in the blob store.
                pronunciation: Some("memory://audio-pronunciations/ghost.webm".into()),
                ..Default::default()
            },
        );
        let id = suggestion.id.clone();
        fx.store.put_word_suggestion(suggestion).await.unwrap();

        let err = fx
            .coordinator
            .merge_word_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            MergeError::Asset {
                step: MergeStep::AssetRename,
                ..
            }
        ));

        // Fully unmerged: no document, suggestion untouched.
        assert_eq!(fx.store.count_words(WordFilter::All).await.unwrap(), 0);
        let stored = fx.store.get_word_suggestion(&id).await.unwrap();
        assert!(stored.merged_by.is_none());
    }

    #[tokio::test]
    async fn example_suggestion_merges_with_audio() {
        let fx = fixture(0);
        let mut suggestion = Suggestion::draft(
            UserId::new("author"),
            okwu_core::ExamplePayload {
                igbo: "mmiri dị ọcha".into(),
                english: "the water is clean".into(),
                associated_words: vec![DocumentId::new("w1")],
                ..Default::default()
            },
        );
        suggestion.payload.pronunciation =
            Some(fx.assets.put(suggestion.id.as_str(), SAMPLE).await.unwrap());
        let id = suggestion.id.clone();
        fx.store.put_example_suggestion(suggestion).await.unwrap();

        let merged = fx
            .coordinator
            .merge_example_suggestion(&id, UserId::new("u1"))
            .await
            .unwrap();

        assert_eq!(merged.evaluation.tier, Tier::Complete);
        let stored = fx.store.get_example(&merged.document.id).await.unwrap();
        assert!(
            stored
                .content
                .pronunciation
                .as_deref()
                .unwrap()
                .contains(merged.document.id.as_str())
        );
        let suggestion = fx.store.get_example_suggestion(&id).await.unwrap();
        assert_eq!(suggestion.state(), ReviewState::Merged);
    }
}
