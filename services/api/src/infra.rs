use esg_ledger::config::StoreConfig;
use esg_ledger::error::AppError;
use esg_ledger::esg::{open_store, EsgResponseService, FiscalYear, ResponseStore, UserId};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Service wired to whichever backend the configuration selected.
pub(crate) type ResponseService = EsgResponseService<dyn ResponseStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) async fn connect_service(config: &StoreConfig) -> Result<Arc<ResponseService>, AppError> {
    let store = open_store(config).await?;
    Ok(Arc::new(EsgResponseService::new(store)))
}

pub(crate) fn parse_user(value: &str) -> Result<UserId, String> {
    UserId::parse(value).ok_or_else(|| "user id must not be blank".to_string())
}

pub(crate) fn parse_fiscal_year(value: &str) -> Result<FiscalYear, String> {
    FiscalYear::parse(value).ok_or_else(|| "fiscal year must not be blank".to_string())
}
