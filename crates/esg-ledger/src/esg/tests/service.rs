use std::sync::Arc;

use serde_json::json;

use super::common::*;
use crate::esg::intake::{IntakeError, ResponseSubmission};
use crate::esg::repository::{ResponseStore, StoreError};
use crate::esg::service::{EsgResponseService, ResponseServiceError};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

#[tokio::test]
async fn save_coerces_payload_before_storing() {
    let (service, store) = build_service();

    let saved = service
        .save(&user("alice"), scenario_submission("2023-24"))
        .await
        .expect("save succeeds");

    assert_eq!(saved.figures.total_electricity_kwh, Some(120_000.0));
    assert_eq!(saved.figures.total_fuel_liters, None);
    assert_eq!(saved.figures.total_employees, Some(200));
    assert_eq!(saved.figures.avg_training_hours, Some(12.5));
    assert_eq!(saved.figures.has_data_privacy_policy, Some(true));

    let stored = store
        .get(&user("alice"), &year("2023-24"))
        .await
        .expect("get")
        .expect("present");
    assert_eq!(stored, saved);
}

#[tokio::test]
async fn save_rejects_missing_fiscal_year_without_writing() {
    let (service, store) = build_service();
    let submission: ResponseSubmission =
        serde_json::from_value(json!({ "totalEmployees": 10 })).expect("object");

    match service.save(&user("alice"), submission).await {
        Err(ResponseServiceError::Intake(IntakeError::MissingFiscalYear)) => {}
        other => panic!("expected missing fiscal year, got {other:?}"),
    }
    assert!(store.list(&user("alice")).await.expect("list").is_empty());
}

#[tokio::test]
async fn empty_employee_count_is_stored_as_unset() {
    let (service, _) = build_service();
    let submission = ResponseSubmission::default()
        .with("fiscalYear", "2023-24")
        .with("totalEmployees", "");

    let saved = service
        .save(&user("alice"), submission)
        .await
        .expect("save succeeds");
    assert_eq!(saved.figures.total_employees, None);
}

#[tokio::test]
async fn resaving_replaces_every_figure() {
    let (service, _) = build_service();
    let first = service
        .save(&user("alice"), scenario_submission("2023-24"))
        .await
        .expect("first save");

    let replacement = ResponseSubmission::default()
        .with("fiscalYear", "2023-24")
        .with("totalRevenueINR", 1000);
    let second = service
        .save(&user("alice"), replacement)
        .await
        .expect("second save");

    assert_eq!(first.id, second.id);
    assert_eq!(second.figures.total_revenue_inr, Some(1000.0));
    assert_eq!(second.figures.carbon_emissions_tco2e, None);
    assert_eq!(second.figures.has_data_privacy_policy, None);
}

#[tokio::test]
async fn scenario_summary_matches_reference_ratios() {
    let (service, _) = build_service();
    service
        .save(&user("alice"), scenario_submission("2023-24"))
        .await
        .expect("save");

    let summaries = service
        .summaries(&user("alice"), None)
        .await
        .expect("summaries");
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    assert_eq!(summary.fiscal_year, year("2023-24"));
    assert_close(summary.ratios.carbon_intensity, 0.000_016);
    assert_close(summary.ratios.renewable_ratio_pct, 25.0);
    assert_close(summary.ratios.diversity_ratio_pct, 45.0);
    assert_close(summary.ratios.community_ratio_pct, 3.0);
    assert_eq!(summary.formatted.carbon_intensity, "0.000016");
    assert_eq!(summary.formatted.renewable_ratio_pct, "25.00");
    assert_eq!(summary.formatted.diversity_ratio_pct, "45.00");
    assert_eq!(summary.formatted.community_ratio_pct, "3.00");
}

#[tokio::test]
async fn summaries_can_be_filtered_to_one_year() {
    let (service, _) = build_service();
    for fiscal_year in ["2022-23", "2023-24"] {
        service
            .save(&user("alice"), scenario_submission(fiscal_year))
            .await
            .expect("save");
    }

    let selected = year("2022-23");
    let summaries = service
        .summaries(&user("alice"), Some(&selected))
        .await
        .expect("summaries");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].fiscal_year, selected);
}

#[tokio::test]
async fn get_requires_a_fiscal_year() {
    let (service, _) = build_service();
    match service.get(&user("alice"), " ").await {
        Err(err) => assert!(err.is_client_error()),
        Ok(found) => panic!("expected validation error, got {found:?}"),
    }
}

#[tokio::test]
async fn fresh_user_gets_empty_results() {
    let (service, _) = build_service();
    assert!(service
        .list(&user("fresh"))
        .await
        .expect("list")
        .is_empty());
    assert!(service
        .get(&user("fresh"), "2023-24")
        .await
        .expect("get")
        .is_none());
    assert!(service
        .export_csv(&user("fresh"), None)
        .await
        .expect("export")
        .is_empty());
}

#[tokio::test]
async fn store_failures_are_not_client_errors() {
    let service = EsgResponseService::new(Arc::new(UnavailableStore));

    match service
        .save(&user("alice"), scenario_submission("2023-24"))
        .await
    {
        Err(err @ ResponseServiceError::Store(StoreError::Unavailable(_))) => {
            assert!(!err.is_client_error());
        }
        other => panic!("expected store failure, got {other:?}"),
    }
}

#[tokio::test]
async fn trait_object_store_is_accepted() {
    let store: Arc<dyn ResponseStore> = Arc::new(crate::esg::InMemoryResponseStore::new());
    let service = EsgResponseService::new(store);
    service
        .save(&user("alice"), scenario_submission("2023-24"))
        .await
        .expect("save through trait object");

    let report = service
        .text_report(&user("alice"), None)
        .await
        .expect("report");
    assert!(report.contains("Fiscal Year: 2023-24"));
    assert!(report.contains("Renewable Electricity: 25.00%"));
    assert!(report.contains("Community Investment: 3.00%"));
    assert!(report.contains("Data Privacy Policy: Yes"));
}
