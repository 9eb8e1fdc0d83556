use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use super::domain::{EsgResponse, FiscalYear, UserId};
use super::export::{filter_by_year, render_text_report, write_csv};
use super::intake::{IntakeError, ResponseSubmission};
use super::metrics::{EsgRatios, FormattedRatios};
use super::repository::{ResponseStore, StoreError};

/// Service composing intake coercion, the response store and the ratio calculator.
pub struct EsgResponseService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for EsgResponseService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

/// One fiscal year with its derived metrics, raw and formatted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub fiscal_year: FiscalYear,
    pub ratios: EsgRatios,
    pub formatted: FormattedRatios,
}

impl ResponseSummary {
    pub fn from_response(response: &EsgResponse) -> Self {
        let ratios = EsgRatios::from_figures(&response.figures);
        Self {
            fiscal_year: response.fiscal_year.clone(),
            formatted: ratios.formatted(),
            ratios,
        }
    }
}

impl<S> EsgResponseService<S>
where
    S: ResponseStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Name of the backing store, for startup logs.
    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// Coerce and upsert a questionnaire submission for `user_id`.
    pub async fn save(
        &self,
        user_id: &UserId,
        submission: ResponseSubmission,
    ) -> Result<EsgResponse, ResponseServiceError> {
        let draft = submission.into_draft(user_id.clone())?;
        let fiscal_year = draft.fiscal_year.clone();

        let saved = self.store.upsert(draft).await.map_err(|err| {
            warn!(user = %user_id, %fiscal_year, error = %err, "failed to save esg response");
            err
        })?;

        debug!(user = %user_id, %fiscal_year, id = %saved.id, "esg response saved");
        Ok(saved)
    }

    pub async fn get(
        &self,
        user_id: &UserId,
        fiscal_year: &str,
    ) -> Result<Option<EsgResponse>, ResponseServiceError> {
        let fiscal_year = FiscalYear::parse(fiscal_year).ok_or(IntakeError::MissingFiscalYear)?;
        let found = self
            .store
            .get(user_id, &fiscal_year)
            .await
            .map_err(|err| {
                warn!(user = %user_id, %fiscal_year, error = %err, "failed to load esg response");
                err
            })?;
        Ok(found)
    }

    pub async fn list(&self, user_id: &UserId) -> Result<Vec<EsgResponse>, ResponseServiceError> {
        let responses = self.store.list(user_id).await.map_err(|err| {
            warn!(user = %user_id, error = %err, "failed to list esg responses");
            err
        })?;
        debug!(user = %user_id, count = responses.len(), "esg responses listed");
        Ok(responses)
    }

    pub async fn summaries(
        &self,
        user_id: &UserId,
        year: Option<&FiscalYear>,
    ) -> Result<Vec<ResponseSummary>, ResponseServiceError> {
        let responses = self.list(user_id).await?;
        Ok(filter_by_year(&responses, year)
            .map(ResponseSummary::from_response)
            .collect())
    }

    pub async fn export_csv(
        &self,
        user_id: &UserId,
        year: Option<&FiscalYear>,
    ) -> Result<Vec<u8>, ResponseServiceError> {
        let responses = self.list(user_id).await?;
        let bytes = write_csv(filter_by_year(&responses, year))?;
        Ok(bytes)
    }

    pub async fn text_report(
        &self,
        user_id: &UserId,
        year: Option<&FiscalYear>,
    ) -> Result<String, ResponseServiceError> {
        let responses = self.list(user_id).await?;
        Ok(render_text_report(filter_by_year(&responses, year), year))
    }
}

/// Error raised by the response service.
#[derive(Debug, thiserror::Error)]
pub enum ResponseServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to encode export: {0}")]
    Export(#[from] csv::Error),
}

impl ResponseServiceError {
    /// Validation failures are the caller's fault; everything else is ours.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Intake(_))
    }
}
