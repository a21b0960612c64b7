//! Canonical dictionary documents and the payload shapes shared with
//! suggestions.
//!
//! A [`Word`] or [`Example`] is the published form of an entry; the same
//! content travels inside a suggestion as a [`WordPayload`] /
//! [`ExamplePayload`] until a merge promotes it. Keeping the payload as a
//! separate struct (flattened into the document) means a merge never has to
//! copy fields one by one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::DocumentId;
use crate::registry::{Dialect, ExampleStyle, Tense, WordClass, WordTag};

/// Per-dialect variant of a headword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordDialect {
    /// Dialect-specific spellings of the headword.
    pub variations: Vec<String>,
    /// Registered dialect codes this variant belongs to.
    pub dialects: Vec<Dialect>,
    /// Audio asset URIs for this dialect slot.
    pub pronunciation: Vec<String>,
}

/// Boolean attributes of a word document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordAttributes {
    pub is_standard_igbo: bool,
    pub is_accented: bool,
    pub is_slang: bool,
    pub is_constructed_term: bool,
}

/// Content of a word entry, shared between suggestions and documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordPayload {
    /// The headword.
    pub word: String,
    pub word_class: Option<WordClass>,
    pub definitions: Vec<String>,
    /// Dialect variants keyed by registered dialect code.
    #[serde(default)]
    pub dialects: BTreeMap<Dialect, WordDialect>,
    #[serde(default)]
    pub tenses: BTreeMap<Tense, String>,
    #[serde(default)]
    pub tags: Vec<WordTag>,
    #[serde(default)]
    pub attributes: WordAttributes,
    /// Headword audio: a public URI on documents, a data URI or public URI on
    /// suggestions, `None` when no recording exists.
    pub pronunciation: Option<String>,
    #[serde(default)]
    pub variations: Vec<String>,
    #[serde(default)]
    pub stems: Vec<String>,
    #[serde(default)]
    pub related_terms: Vec<DocumentId>,
    /// Broader terms this word is a kind of.
    #[serde(default)]
    pub hypernyms: Vec<DocumentId>,
    /// Narrower terms that are kinds of this word.
    #[serde(default)]
    pub hyponyms: Vec<DocumentId>,
    #[serde(default)]
    pub nsibidi: String,
    pub frequency: Option<f64>,
    /// Linked example document ids.
    #[serde(default)]
    pub examples: Vec<DocumentId>,
}

impl WordPayload {
    /// Promote this payload into a canonical document at `id`.
    pub fn into_word(self, id: DocumentId, now: DateTime<Utc>) -> Word {
        Word {
            id,
            content: self,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A published word entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: DocumentId,
    #[serde(flatten)]
    pub content: WordPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content of an example sentence, shared between suggestions and documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePayload {
    pub igbo: String,
    pub english: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub nsibidi: String,
    #[serde(default)]
    pub style: ExampleStyle,
    /// Word documents this sentence illustrates.
    #[serde(default)]
    pub associated_words: Vec<DocumentId>,
    /// Audio asset URI, `None` when no recording exists.
    pub pronunciation: Option<String>,
}

impl ExamplePayload {
    /// Promote this payload into a canonical document at `id`.
    pub fn into_example(self, id: DocumentId, now: DateTime<Utc>) -> Example {
        Example {
            id,
            content: self,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A published example sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Example {
    pub id: DocumentId,
    #[serde(flatten)]
    pub content: ExamplePayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
