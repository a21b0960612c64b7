//! Statistics aggregation.
//!
//! Platform-wide counters are recomputed from full scans and written by
//! overwrite, never incremented, so a missed live update can never leave a
//! counter drifted. Recompute runs eventually-consistently alongside writes
//! and never blocks a user-facing path. Per-user stats are computed on demand
//! from the suggestion lists.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, Utc};
use okwu_core::{
    HEADWORD_REQUIREMENT, SuggestionId, UserId, evaluate_example, evaluate_word,
    is_as_complete_as_possible,
};
use okwu_store::{
    DocumentStore, ExampleFilter, Stat, StatKey, StatStore, StatType, StoreError,
    SuggestionFilter, SuggestionStore, WordFilter,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Outcome of one dashboard recompute pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecomputeReport {
    pub succeeded: Vec<StatType>,
    pub failed: Vec<StatType>,
}

/// On-demand per-user review counters.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub approved_word_suggestions_count: u64,
    pub denied_word_suggestions_count: u64,
    pub approved_example_suggestions_count: u64,
    pub denied_example_suggestions_count: u64,
    pub authored_word_suggestions_count: u64,
    pub authored_example_suggestions_count: u64,
    pub merged_word_suggestions_count: u64,
    pub merged_example_suggestions_count: u64,
    pub current_editing_word_suggestions_count: u64,
    pub current_editing_example_suggestions_count: u64,
}

/// Merge history over the trailing three months, bucketed by ISO week number.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMergeStats {
    pub word_suggestion_merges: BTreeMap<u32, Vec<SuggestionId>>,
    pub example_suggestion_merges: BTreeMap<u32, Vec<SuggestionId>>,
}

pub struct StatsAggregator<S> {
    store: Arc<S>,
}

impl<S> StatsAggregator<S>
where
    S: DocumentStore + SuggestionStore + StatStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Recompute every platform-wide counter, in fixed order: example stats,
    /// suggestion nsibidi, document nsibidi, standard variant, audio
    /// pronunciation, then word sufficiency/completeness. One calculator's
    /// failure is logged and does not abort the others.
    pub async fn recompute_dashboard(&self) -> RecomputeReport {
        let mut report = RecomputeReport::default();

        let example_stats = self.calculate_example_stats().await;
        self.record(
            &mut report,
            &[StatType::SufficientExamples, StatType::CompleteExamples],
            example_stats,
        );

        let suggestion_nsibidi = self.calculate_nsibidi_word_suggestions().await;
        self.record(
            &mut report,
            &[StatType::NsibidiWordSuggestions],
            suggestion_nsibidi,
        );

        let document_nsibidi = self.calculate_nsibidi_words().await;
        self.record(&mut report, &[StatType::NsibidiWords], document_nsibidi);

        let standard = self.calculate_standard_igbo_words().await;
        self.record(&mut report, &[StatType::StandardIgbo], standard);

        let audio = self.calculate_headword_audio_words().await;
        self.record(
            &mut report,
            &[StatType::HeadwordAudioPronunciations],
            audio,
        );

        let word_stats = self.calculate_word_stats().await;
        self.record(
            &mut report,
            &[
                StatType::SufficientWords,
                StatType::CompleteWords,
                StatType::DialectalVariations,
            ],
            word_stats,
        );

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "dashboard recompute finished"
        );
        report
    }

    fn record(
        &self,
        report: &mut RecomputeReport,
        types: &[StatType],
        result: Result<(), StoreError>,
    ) {
        match result {
            Ok(()) => report.succeeded.extend_from_slice(types),
            Err(err) => {
                error!(stats = ?types, error = %err, "stat recompute failed");
                report.failed.extend_from_slice(types);
            }
        }
    }

    async fn update_stat(&self, stat_type: StatType, value: u64) -> Result<(), StoreError> {
        self.store
            .upsert_stat(StatKey::system(stat_type), value)
            .await?;
        Ok(())
    }

    /// Sufficient and complete example counts from a full scan.
    async fn calculate_example_stats(&self) -> Result<(), StoreError> {
        let sufficient = self.store.count_examples(ExampleFilter::Sufficient).await?;
        self.update_stat(StatType::SufficientExamples, sufficient)
            .await?;

        let examples = self.store.list_examples().await?;
        let complete = examples
            .iter()
            .filter(|e| evaluate_example(&e.content).is_complete())
            .count() as u64;
        self.update_stat(StatType::CompleteExamples, complete).await
    }

    /// Open word suggestions carrying Nsịbịdị.
    async fn calculate_nsibidi_word_suggestions(&self) -> Result<(), StoreError> {
        let count = self
            .store
            .count_word_suggestions(SuggestionFilter::UnmergedWithNsibidi)
            .await?;
        self.update_stat(StatType::NsibidiWordSuggestions, count)
            .await
    }

    /// Published words carrying Nsịbịdị.
    async fn calculate_nsibidi_words(&self) -> Result<(), StoreError> {
        let count = self.store.count_words(WordFilter::HasNsibidi).await?;
        self.update_stat(StatType::NsibidiWords, count).await
    }

    /// Published words attributed as Standard Igbo.
    async fn calculate_standard_igbo_words(&self) -> Result<(), StoreError> {
        let count = self.store.count_words(WordFilter::StandardIgbo).await?;
        self.update_stat(StatType::StandardIgbo, count).await
    }

    /// Published words with a headword recording.
    async fn calculate_headword_audio_words(&self) -> Result<(), StoreError> {
        let count = self.store.count_words(WordFilter::HeadwordAudio).await?;
        self.update_stat(StatType::HeadwordAudioPronunciations, count)
            .await
    }

    /// Word sufficiency/completeness and dialectal-variation counts over the
    /// reviewable corpus (Standard Igbo, accent-marked, non-empty headword).
    async fn calculate_word_stats(&self) -> Result<(), StoreError> {
        let words = self.store.list_words().await?;

        let mut sufficient = 0u64;
        let mut complete = 0u64;
        let mut dialectal_variations = 0u64;
        for word in words
            .iter()
            .filter(|w| WordFilter::ReviewableCorpus.matches(w))
        {
            let evaluation = evaluate_word(&word.content);
            if evaluation.is_sufficient() {
                sufficient += 1;
            }
            // A word whose only outstanding Complete requirement is the
            // headword sentence still counts as complete, as does one that is
            // as complete as it can structurally get.
            let requirements = &evaluation.complete_requirements;
            let only_headword_missing =
                requirements.len() == 1 && requirements[0] == HEADWORD_REQUIREMENT;
            if is_as_complete_as_possible(&word.content)
                || evaluation.is_complete()
                || only_headword_missing
            {
                complete += 1;
            }
            dialectal_variations += word.content.dialects.len() as u64 + 1;
        }

        self.update_stat(StatType::SufficientWords, sufficient)
            .await?;
        self.update_stat(StatType::CompleteWords, complete).await?;
        self.update_stat(StatType::DialectalVariations, dialectal_variations)
            .await
    }

    /// Every stored counter row, for the dashboard read endpoint.
    pub async fn all_stats(&self) -> Result<Vec<Stat>, StoreError> {
        self.store.all_stats().await
    }

    /// Review counters for one user, filtered from the full suggestion lists.
    pub async fn user_stats(&self, user: &UserId) -> Result<UserStats, StoreError> {
        let word_suggestions = self.store.list_word_suggestions().await?;
        let example_suggestions = self.store.list_example_suggestions().await?;

        let mut stats = UserStats::default();
        for s in &word_suggestions {
            if s.approvals.contains(user) {
                stats.approved_word_suggestions_count += 1;
            }
            if s.denials.contains(user) {
                stats.denied_word_suggestions_count += 1;
            }
            if &s.author_id == user {
                stats.authored_word_suggestions_count += 1;
            }
            if s.merged_by.as_ref() == Some(user) {
                stats.merged_word_suggestions_count += 1;
            }
            if s.merged_by.is_none() && s.user_interactions.contains(user) {
                stats.current_editing_word_suggestions_count += 1;
            }
        }
        for s in &example_suggestions {
            if s.approvals.contains(user) {
                stats.approved_example_suggestions_count += 1;
            }
            if s.denials.contains(user) {
                stats.denied_example_suggestions_count += 1;
            }
            if &s.author_id == user {
                stats.authored_example_suggestions_count += 1;
            }
            if s.merged_by.as_ref() == Some(user) {
                stats.merged_example_suggestions_count += 1;
            }
            if s.merged_by.is_none() && s.user_interactions.contains(user) {
                stats.current_editing_example_suggestions_count += 1;
            }
        }
        Ok(stats)
    }

    /// Merges by `user` within the trailing three months of `now`, bucketed
    /// by ISO week number and ordered by merge time within each bucket.
    pub async fn user_merge_stats(
        &self,
        user: &UserId,
        now: DateTime<Utc>,
    ) -> Result<UserMergeStats, StoreError> {
        let window_start = now
            .checked_sub_months(Months::new(3))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut stats = UserMergeStats::default();

        let mut merged_words: Vec<(DateTime<Utc>, SuggestionId)> = self
            .store
            .list_word_suggestions()
            .await?
            .into_iter()
            .filter(|s| s.merged_by.as_ref() == Some(user))
            .filter_map(|s| s.merged_at.map(|at| (at, s.id)))
            .filter(|(at, _)| *at >= window_start)
            .collect();
        merged_words.sort_by_key(|(at, _)| *at);
        for (at, id) in merged_words {
            stats
                .word_suggestion_merges
                .entry(at.iso_week().week())
                .or_default()
                .push(id);
        }

        let mut merged_examples: Vec<(DateTime<Utc>, SuggestionId)> = self
            .store
            .list_example_suggestions()
            .await?
            .into_iter()
            .filter(|s| s.merged_by.as_ref() == Some(user))
            .filter_map(|s| s.merged_at.map(|at| (at, s.id)))
            .filter(|(at, _)| *at >= window_start)
            .collect();
        merged_examples.sort_by_key(|(at, _)| *at);
        for (at, id) in merged_examples {
            stats
                .example_suggestion_merges
                .entry(at.iso_week().week())
                .or_default()
                .push(id);
        }

        Ok(stats)
    }
}
