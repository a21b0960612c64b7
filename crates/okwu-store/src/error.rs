use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// I/O-class failure worth retrying at a step boundary.
    #[error("transient store error: {0}")]
    Transient(String),

    /// Compare-and-swap loss; the record was claimed by another writer.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
