//! End-to-end scenarios for recording ESG responses and reading back derived ratios.
//!
//! Everything goes through the public router and service facade, against both the in-memory
//! fallback and the SQLite backend selected by configuration.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use esg_ledger::config::StoreConfig;
use esg_ledger::esg::{open_store, response_router, EsgResponseService, ResponseStore};
use esg_ledger::identity::USER_ID_HEADER;

async fn router_for(config: StoreConfig) -> axum::Router {
    let store: Arc<dyn ResponseStore> = open_store(&config).await.expect("store opens");
    response_router(Arc::new(EsgResponseService::new(store)))
}

fn sqlite_config() -> StoreConfig {
    StoreConfig {
        database_url: Some("sqlite::memory:".to_string()),
        max_connections: 1,
    }
}

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router responds");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

fn save(user: &str, payload: Value) -> Request<Body> {
    Request::post("/api/v1/responses")
        .header(header::CONTENT_TYPE, "application/json")
        .header(USER_ID_HEADER, user)
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn read(uri: &str, user: &str) -> Request<Body> {
    Request::get(uri)
        .header(USER_ID_HEADER, user)
        .body(Body::empty())
        .expect("request")
}

async fn questionnaire_flow(router: axum::Router) {
    let (status, body) = send(
        &router,
        save(
            "user-u",
            json!({
                "fiscalYear": "2023-24",
                "carbonEmissionsTCO2e": "800",
                "totalRevenueINR": "50000000",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = body["item"]["id"].clone();

    let (status, body) = send(
        &router,
        save(
            "user-u",
            json!({
                "fiscalYear": "2023-24",
                "carbonEmissionsTco2e": 800,
                "totalRevenueInr": 50000000,
                "totalElectricityKwh": 120000,
                "renewableElectricityKwh": 30000,
                "totalEmployees": 200,
                "femaleEmployees": 90,
                "communityInvestmentInr": 1500000,
                "hasDataPrivacyPolicy": "No",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["item"]["id"], id, "resave keeps the identifier");
    assert_eq!(body["item"]["hasDataPrivacyPolicy"], false);

    let (_, body) = send(&router, read("/api/v1/responses/summary", "user-u")).await;
    let summaries = body["data"].as_array().expect("summaries");
    assert_eq!(summaries.len(), 1);
    let formatted = &summaries[0]["formatted"];
    assert_eq!(formatted["carbonIntensity"], "0.000016");
    assert_eq!(formatted["renewableRatioPct"], "25.00");
    assert_eq!(formatted["diversityRatioPct"], "45.00");
    assert_eq!(formatted["communityRatioPct"], "3.00");

    for fiscal_year in ["2021-22", "2022-23"] {
        let (status, _) = send(
            &router,
            save("user-u", json!({ "fiscalYear": fiscal_year, "totalEmployees": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(&router, read("/api/v1/responses", "user-u")).await;
    let items = body["data"].as_array().expect("items");
    let years: Vec<&str> = items
        .iter()
        .filter_map(|item| item["fiscalYear"].as_str())
        .collect();
    assert_eq!(years, ["2021-22", "2022-23", "2023-24"]);
    assert!(items[0]["totalEmployees"].is_null());

    let (status, body) = send(&router, read("/api/v1/responses", "fresh-user")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = send(
        &router,
        read("/api/v1/responses?year=2023-24", "fresh-user"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn questionnaire_flow_on_memory_store() {
    questionnaire_flow(router_for(StoreConfig::in_memory()).await).await;
}

#[tokio::test]
async fn questionnaire_flow_on_sqlite_store() {
    questionnaire_flow(router_for(sqlite_config()).await).await;
}

#[tokio::test]
async fn unauthenticated_reads_are_rejected() {
    let router = router_for(StoreConfig::in_memory()).await;
    let request = Request::get("/api/v1/responses")
        .body(Body::empty())
        .expect("request");

    let (status, body) = send(&router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}
