//! Request identity resolved by the upstream session layer.
//!
//! Session cookies and tokens are verified before requests reach this service; the verified user
//! id arrives in the [`USER_ID_HEADER`] header. Requests without it are rejected before any
//! handler runs.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::esg::UserId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor yielding the caller's [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityRejection {
    #[error("unauthorized")]
    Missing,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

pub fn user_from_headers(headers: &HeaderMap) -> Result<UserId, IdentityRejection> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(UserId::parse)
        .ok_or(IdentityRejection::Missing)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = IdentityRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        user_from_headers(&parts.headers).map(Self)
    }
}
