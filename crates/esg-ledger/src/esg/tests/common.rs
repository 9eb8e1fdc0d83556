use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use chrono::Utc;
use serde_json::{json, Value};

use crate::esg::domain::{EsgFigures, EsgResponse, FiscalYear, ResponseDraft, UserId};
use crate::esg::intake::ResponseSubmission;
use crate::esg::repository::{ResponseStore, StoreError};
use crate::esg::service::EsgResponseService;
use crate::esg::store::InMemoryResponseStore;

pub(crate) fn user(id: &str) -> UserId {
    UserId(id.to_string())
}

pub(crate) fn year(raw: &str) -> FiscalYear {
    FiscalYear::parse(raw).expect("valid fiscal year")
}

/// Minimal draft whose only figure is the emissions value, handy for last-write-wins checks.
pub(crate) fn draft(user_id: &str, fiscal_year: &str, emissions: f64) -> ResponseDraft {
    ResponseDraft {
        user_id: user(user_id),
        fiscal_year: year(fiscal_year),
        figures: EsgFigures {
            carbon_emissions_tco2e: Some(emissions),
            total_revenue_inr: Some(50_000_000.0),
            total_employees: Some(200),
            ..EsgFigures::default()
        },
    }
}

pub(crate) fn response(fiscal_year: &str, figures: EsgFigures) -> EsgResponse {
    EsgResponse::create(
        ResponseDraft {
            user_id: user("fixture"),
            fiscal_year: year(fiscal_year),
            figures,
        },
        Utc::now(),
    )
}

/// Questionnaire payload reproducing the reference scenario: 800 T CO2e on 50M revenue,
/// 30k of 120k kWh renewable, 90 of 200 employees female, 1.5M community investment.
pub(crate) fn scenario_payload(fiscal_year: &str) -> Value {
    json!({
        "fiscalYear": fiscal_year,
        "totalElectricityKwh": "120000",
        "renewableElectricityKwh": "30000",
        "totalFuelLiters": "",
        "carbonEmissionsTco2e": 800,
        "totalEmployees": "200",
        "femaleEmployees": 90,
        "avgTrainingHours": "12.5",
        "communityInvestmentInr": 1500000,
        "independentBoardPct": 40,
        "hasDataPrivacyPolicy": "Yes",
        "totalRevenueInr": "50000000",
    })
}

pub(crate) fn scenario_submission(fiscal_year: &str) -> ResponseSubmission {
    serde_json::from_value(scenario_payload(fiscal_year)).expect("object payload")
}

pub(crate) fn build_service() -> (
    EsgResponseService<InMemoryResponseStore>,
    Arc<InMemoryResponseStore>,
) {
    let store = Arc::new(InMemoryResponseStore::new());
    let service = EsgResponseService::new(Arc::clone(&store));
    (service, store)
}

pub(crate) struct UnavailableStore;

#[async_trait]
impl ResponseStore for UnavailableStore {
    async fn upsert(&self, _draft: ResponseDraft) -> Result<EsgResponse, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn get(
        &self,
        _user_id: &UserId,
        _fiscal_year: &FiscalYear,
    ) -> Result<Option<EsgResponse>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn list(&self, _user_id: &UserId) -> Result<Vec<EsgResponse>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn backend(&self) -> &'static str {
        "unavailable"
    }
}

pub(crate) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    serde_json::from_slice(&read_body(response).await).expect("json payload")
}
