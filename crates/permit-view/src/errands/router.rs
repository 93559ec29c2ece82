use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::backend::CaseBackend;
use super::domain::CaseEventReference;
use super::service::{ErrandService, ServiceError};

/// Router builder exposing the citizen lookups.
pub fn errand_router<B>(service: Arc<ErrandService<B>>) -> Router
where
    B: CaseBackend + 'static,
{
    Router::new()
        .route(
            "/api/v1/neighborhood-notifications/:identifier",
            get(neighborhood_notifications_handler::<B>),
        )
        .route(
            "/api/v1/applicant-errands/:identifier",
            get(applicant_errands_handler::<B>),
        )
        .route(
            "/api/v1/errands/:case_number/classification",
            get(classification_handler::<B>),
        )
        .route("/api/v1/files/:reference", get(files_handler::<B>))
        .with_state(service)
}

pub(crate) async fn neighborhood_notifications_handler<B>(
    State(service): State<Arc<ErrandService<B>>>,
    Path(identifier): Path<String>,
) -> Response
where
    B: CaseBackend + 'static,
{
    match service.find_neighborhood_notifications(&identifier) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn applicant_errands_handler<B>(
    State(service): State<Arc<ErrandService<B>>>,
    Path(identifier): Path<String>,
) -> Response
where
    B: CaseBackend + 'static,
{
    match service.find_applicant_errands(&identifier) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn classification_handler<B>(
    State(service): State<Arc<ErrandService<B>>>,
    Path(case_number): Path<String>,
) -> Response
where
    B: CaseBackend + 'static,
{
    match service.get_classification(&case_number) {
        Ok(classification) => {
            let payload = json!({
                "caseNumber": case_number,
                "classification": classification.0,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn files_handler<B>(
    State(service): State<Arc<ErrandService<B>>>,
    Path(reference): Path<String>,
) -> Response
where
    B: CaseBackend + 'static,
{
    let reference = match CaseEventReference::parse(&reference) {
        Ok(reference) => reference,
        Err(error) => {
            let payload = json!({
                "title": "Bad Request",
                "status": StatusCode::BAD_REQUEST.as_u16(),
                "detail": error.to_string(),
            });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    match service.list_files(&reference) {
        Ok(manifest) => (StatusCode::OK, axum::Json(manifest)).into_response(),
        Err(error) => error.into_response(),
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, title, detail) = match &self {
            ServiceError::NoRolesAvailable => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "No roles available for lookup".to_string(),
            ),
            ServiceError::Integration(error) => {
                (StatusCode::BAD_GATEWAY, "Bad Gateway", error.to_string())
            }
        };

        let payload = json!({
            "title": title,
            "status": status.as_u16(),
            "detail": detail,
        });
        (status, axum::Json(payload)).into_response()
    }
}
