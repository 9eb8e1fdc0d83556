use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::FiscalYear;
use super::export::export_file_name;
use super::intake::ResponseSubmission;
use super::repository::ResponseStore;
use super::service::{EsgResponseService, ResponseServiceError};
use crate::identity::AuthenticatedUser;

/// Optional `?year=` filter shared by the read endpoints.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct YearQuery {
    #[serde(default)]
    pub(crate) year: Option<String>,
}

impl YearQuery {
    /// Blank values behave like an absent filter.
    fn fiscal_year(&self) -> Option<FiscalYear> {
        self.year.as_deref().and_then(FiscalYear::parse)
    }
}

/// Router builder exposing the questionnaire, summary and export endpoints.
pub fn response_router<S>(service: Arc<EsgResponseService<S>>) -> Router
where
    S: ResponseStore + ?Sized + 'static,
{
    Router::new()
        .route(
            "/api/v1/responses",
            get(list_handler::<S>).post(save_handler::<S>),
        )
        .route("/api/v1/responses/summary", get(summary_handler::<S>))
        .route("/api/v1/responses/export.csv", get(csv_handler::<S>))
        .route("/api/v1/responses/report.txt", get(report_handler::<S>))
        .with_state(service)
}

fn error_response(error: &ResponseServiceError, fallback: &str) -> Response {
    if error.is_client_error() {
        let payload = json!({ "error": error.to_string() });
        (StatusCode::BAD_REQUEST, Json(payload)).into_response()
    } else {
        let payload = json!({ "error": fallback });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
    }
}

pub(crate) async fn save_handler<S>(
    State(service): State<Arc<EsgResponseService<S>>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(submission): Json<ResponseSubmission>,
) -> Response
where
    S: ResponseStore + ?Sized + 'static,
{
    match service.save(&user_id, submission).await {
        Ok(saved) => (StatusCode::OK, Json(json!({ "item": saved }))).into_response(),
        Err(error) => error_response(&error, "save failed"),
    }
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<EsgResponseService<S>>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<YearQuery>,
) -> Response
where
    S: ResponseStore + ?Sized + 'static,
{
    let result = match query.fiscal_year() {
        Some(year) => service
            .get(&user_id, year.as_str())
            .await
            .map(|found| json!({ "data": found })),
        None => service
            .list(&user_id)
            .await
            .map(|items| json!({ "data": items })),
    };

    match result {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(error) => error_response(&error, "load failed"),
    }
}

pub(crate) async fn summary_handler<S>(
    State(service): State<Arc<EsgResponseService<S>>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<YearQuery>,
) -> Response
where
    S: ResponseStore + ?Sized + 'static,
{
    let year = query.fiscal_year();
    match service.summaries(&user_id, year.as_ref()).await {
        Ok(summaries) => (StatusCode::OK, Json(json!({ "data": summaries }))).into_response(),
        Err(error) => error_response(&error, "load failed"),
    }
}

pub(crate) async fn csv_handler<S>(
    State(service): State<Arc<EsgResponseService<S>>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<YearQuery>,
) -> Response
where
    S: ResponseStore + ?Sized + 'static,
{
    let year = query.fiscal_year();
    match service.export_csv(&user_id, year.as_ref()).await {
        Ok(bytes) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_file_name(year.as_ref(), "csv")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(error) => error_response(&error, "export failed"),
    }
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<EsgResponseService<S>>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(query): Query<YearQuery>,
) -> Response
where
    S: ResponseStore + ?Sized + 'static,
{
    let year = query.fiscal_year();
    match service.text_report(&user_id, year.as_ref()).await {
        Ok(report) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            report,
        )
            .into_response(),
        Err(error) => error_response(&error, "export failed"),
    }
}
