//! Storage layer: datastore traits and the in-memory reference store.

mod error;
pub use error::StoreError;

mod stat;
pub use stat::{Stat, StatKey, StatType};

mod traits;
pub use traits::{
    DocumentStore, ExampleFilter, StatStore, SuggestionFilter, SuggestionStore, WordFilter,
};

mod memory;
pub use memory::MemoryStore;
