use async_trait::async_trait;

use super::domain::{EsgResponse, FiscalYear, ResponseDraft, UserId};

/// Storage abstraction for responses keyed by (user, fiscal year).
///
/// Implementations must be interchangeable: the in-memory and SQLite stores honour the same
/// upsert, lookup and ordering contract so callers never branch on the active backend.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Inserts a new response or replaces every figure of the existing one for the same key.
    /// The identifier and creation time of an existing response are preserved.
    async fn upsert(&self, draft: ResponseDraft) -> Result<EsgResponse, StoreError>;

    /// A missing key is `Ok(None)`, never an error.
    async fn get(
        &self,
        user_id: &UserId,
        fiscal_year: &FiscalYear,
    ) -> Result<Option<EsgResponse>, StoreError>;

    /// All responses of one user, ascending by fiscal year.
    async fn list(&self, user_id: &UserId) -> Result<Vec<EsgResponse>, StoreError>;

    /// Short backend label for logs.
    fn backend(&self) -> &'static str;
}

/// Persistence failures. These are reported to clients as opaque server errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("response store unavailable: {0}")]
    Unavailable(String),
    #[error("response store rejected the write: {0}")]
    Constraint(String),
    #[error("stored response could not be decoded: {0}")]
    Corrupt(String),
}
