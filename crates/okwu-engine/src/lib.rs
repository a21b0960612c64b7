//! Review and merge engine: suggestion lifecycle, merge transactions, and
//! platform statistics over the storage and asset seams.

pub mod error;
pub mod lifecycle;
pub mod merge;
pub mod stats;

pub use error::{EngineError, MergeError, MergeStep};
pub use lifecycle::LifecycleService;
pub use merge::{MergeCoordinator, Merged};
pub use stats::{RecomputeReport, StatsAggregator, UserMergeStats, UserStats};
