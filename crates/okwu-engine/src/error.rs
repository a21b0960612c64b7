use std::fmt;

use okwu_assets::AssetError;
use okwu_core::LifecycleError;
use okwu_store::StoreError;
use thiserror::Error;

/// The merge step at which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    LoadSuggestion,
    AssetRename,
    DocumentWrite,
    MarkMerged,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergeStep::LoadSuggestion => "load-suggestion",
            MergeStep::AssetRename => "asset-rename",
            MergeStep::DocumentWrite => "document-write",
            MergeStep::MarkMerged => "mark-merged",
        };
        f.write_str(name)
    }
}

/// Failure of a merge transaction, raised once no automatic recovery remains.
/// Always names the failing step.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Lifecycle violation: already merged, or approvals below threshold.
    /// Surfaced as-is, never retried.
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("merge failed at {step}: {source}")]
    Store {
        step: MergeStep,
        source: StoreError,
    },

    #[error("merge failed at {step}: {source}")]
    Asset {
        step: MergeStep,
        source: AssetError,
    },
}

/// Errors from lifecycle and statistics services.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
