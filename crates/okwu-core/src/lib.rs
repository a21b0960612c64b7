pub mod completeness;
pub mod document;
pub mod id;
pub mod registry;
pub mod suggestion;

pub use completeness::{
    Evaluation, HEADWORD_REQUIREMENT, Tier, evaluate_example, evaluate_word,
    is_as_complete_as_possible,
};
pub use document::{Example, ExamplePayload, Word, WordAttributes, WordDialect, WordPayload};
pub use id::{DocumentId, SuggestionId, UserId};
pub use registry::{Dialect, ExampleStyle, Tense, WordAttribute, WordClass, WordTag};
pub use suggestion::{ExampleSuggestion, LifecycleError, ReviewState, Suggestion, WordSuggestion};
