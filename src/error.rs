//! Error types for stores and persisted cells
//!
//! None of these ever reach the owning UI unit: the cell logs them and falls
//! back (on read) or keeps the in-memory value (on write).

/// Failure reported by a [`Store`](crate::store::Store) backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("storage is not available")]
    Unavailable,
    #[error("quota exceeded writing {key:?}: {needed} bytes needed{}", limit_suffix(.limit))]
    QuotaExceeded {
        key: String,
        needed: usize,
        /// `None` when the backend doesn't report its limit (browsers)
        limit: Option<usize>,
    },
    #[error("storage backend error: {0}")]
    Backend(String),
}

fn limit_suffix(limit: &Option<usize>) -> String {
    limit.map(|l| format!(", limit {l}")).unwrap_or_default()
}

/// Failure reading or writing a persisted value
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("malformed value at {key:?}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot serialize value for {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
