//! Suggestions: crowd-submitted edits awaiting review.
//!
//! The review state machine is Draft → Under Review → Merged, and Merged is
//! terminal. There is deliberately no rejected state: any number of denials
//! leaves a suggestion reviewable, and removal stays a human decision taken
//! outside this machine.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{ExamplePayload, WordPayload};
use crate::id::{DocumentId, SuggestionId, UserId};

/// Lifecycle violations raised by suggestion transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("suggestion has already been merged")]
    AlreadyMerged,

    #[error("insufficient approvals: have {have}, need {need}")]
    InsufficientApprovals { have: usize, need: usize },
}

/// Where a suggestion sits in the review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewState {
    /// Submitted, no votes yet.
    Draft,
    /// At least one approval or denial recorded.
    UnderReview,
    /// Promoted into a document. Terminal.
    Merged,
}

/// Review envelope around a word or example payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion<P> {
    pub id: SuggestionId,
    pub author_id: UserId,
    pub payload: P,
    /// Reviewers who approved. Disjoint from `denials`.
    #[serde(default = "BTreeSet::new")]
    pub approvals: BTreeSet<UserId>,
    /// Reviewers who denied. Disjoint from `approvals`.
    #[serde(default = "BTreeSet::new")]
    pub denials: BTreeSet<UserId>,
    /// Advisory "currently editing" set; carries no locking semantics.
    #[serde(default = "BTreeSet::new")]
    pub user_interactions: BTreeSet<UserId>,
    /// Set exactly once, by the merge coordinator. Non-null means terminal.
    pub merged_by: Option<UserId>,
    pub merged_at: Option<DateTime<Utc>>,
    /// Present when this suggestion edits an existing document.
    pub original_document_id: Option<DocumentId>,
    #[serde(default)]
    pub editors_notes: String,
    #[serde(default)]
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type WordSuggestion = Suggestion<WordPayload>;
pub type ExampleSuggestion = Suggestion<ExamplePayload>;

impl<P> Suggestion<P> {
    /// Create a fresh draft from an author and payload.
    pub fn draft(author_id: UserId, payload: P) -> Self {
        let now = Utc::now();
        Self {
            id: SuggestionId::allocate(),
            author_id,
            payload,
            approvals: BTreeSet::new(),
            denials: BTreeSet::new(),
            user_interactions: BTreeSet::new(),
            merged_by: None,
            merged_at: None,
            original_document_id: None,
            editors_notes: String::new(),
            source: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> ReviewState {
        if self.merged_by.is_some() {
            ReviewState::Merged
        } else if self.approvals.is_empty() && self.denials.is_empty() {
            ReviewState::Draft
        } else {
            ReviewState::UnderReview
        }
    }

    /// Whether this suggestion creates a new document rather than editing one.
    pub fn is_new_entry(&self) -> bool {
        self.original_document_id.is_none()
    }

    fn ensure_open(&self) -> Result<(), LifecycleError> {
        if self.merged_by.is_some() {
            return Err(LifecycleError::AlreadyMerged);
        }
        Ok(())
    }

    /// Record an approval, withdrawing any denial by the same user.
    /// Idempotent.
    pub fn approve(&mut self, user: UserId) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        self.denials.remove(&user);
        self.approvals.insert(user);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Record a denial, withdrawing any approval by the same user.
    /// Idempotent.
    pub fn deny(&mut self, user: UserId) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        self.approvals.remove(&user);
        self.denials.insert(user);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Note that a user has the suggestion open for editing. Advisory only.
    pub fn mark_editing(&mut self, user: UserId) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        self.user_interactions.insert(user);
        Ok(())
    }

    /// Withdraw an advisory editing note.
    pub fn clear_editing(&mut self, user: &UserId) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        self.user_interactions.remove(user);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::WordPayload;

    fn draft() -> WordSuggestion {
        Suggestion::draft(UserId::new("author"), WordPayload::default())
    }

    #[test]
    fn fresh_suggestion_is_draft() {
        assert_eq!(draft().state(), ReviewState::Draft);
        assert!(draft().is_new_entry());
    }

    #[test]
    fn voting_moves_to_under_review() {
        let mut s = draft();
        s.approve(UserId::new("u1")).unwrap();
        assert_eq!(s.state(), ReviewState::UnderReview);
    }

    #[test]
    fn approve_then_deny_moves_between_sets() {
        let mut s = draft();
        let u = UserId::new("u1");
        s.approve(u.clone()).unwrap();
        assert!(s.approvals.contains(&u));
        s.deny(u.clone()).unwrap();
        assert!(!s.approvals.contains(&u));
        assert!(s.denials.contains(&u));
    }

    #[test]
    fn approve_is_idempotent() {
        let mut s = draft();
        let u = UserId::new("u1");
        s.approve(u.clone()).unwrap();
        s.approve(u.clone()).unwrap();
        assert_eq!(s.approvals.len(), 1);
    }

    #[test]
    fn merged_suggestion_rejects_every_transition() {
        let mut s = draft();
        s.merged_by = Some(UserId::new("merger"));
        let before = s.clone();
        let u = UserId::new("u1");
        assert_eq!(s.approve(u.clone()), Err(LifecycleError::AlreadyMerged));
        assert_eq!(s.deny(u.clone()), Err(LifecycleError::AlreadyMerged));
        assert_eq!(s.mark_editing(u.clone()), Err(LifecycleError::AlreadyMerged));
        assert_eq!(s.clear_editing(&u), Err(LifecycleError::AlreadyMerged));
        // No state change on any rejected call.
        assert_eq!(s, before);
        assert_eq!(s.state(), ReviewState::Merged);
    }

    #[test]
    fn unbounded_denials_never_terminate_review() {
        let mut s = draft();
        for i in 0..100 {
            s.deny(UserId::new(format!("u{i}"))).unwrap();
        }
        assert_eq!(s.state(), ReviewState::UnderReview);
        assert!(s.approve(UserId::new("late")).is_ok());
    }
}
