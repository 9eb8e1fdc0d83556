//! Annual ESG responses: intake coercion, keyed persistence, derived ratios and exports.

pub mod domain;
pub mod export;
pub mod intake;
pub mod metrics;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
pub(crate) mod tests;

pub use domain::{EsgFigures, EsgResponse, FiscalYear, ResponseDraft, ResponseId, UserId};
pub use intake::{IntakeError, ResponseSubmission};
pub use metrics::{EsgRatios, FormattedRatios};
pub use repository::{ResponseStore, StoreError};
pub use router::response_router;
pub use service::{EsgResponseService, ResponseServiceError, ResponseSummary};
pub use store::{open_store, InMemoryResponseStore, SqliteResponseStore};
