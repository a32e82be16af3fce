use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, FieldValue};
use super::repository::ApplicationRepository;
use super::service::{ApplicationServiceError, MortgageApplicationService};

/// Router builder exposing HTTP endpoints for intake, merge, and status.
pub fn application_router<R>(service: Arc<MortgageApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/mortgage/applications", post(create_handler::<R>))
        .route(
            "/api/v1/mortgage/applications/:application_id",
            get(status_handler::<R>).delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/mortgage/applications/:application_id/fields",
            post(merge_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateApplicationRequest {
    pub(crate) applicant_id: String,
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<MortgageApplicationService<R>>>,
    axum::Json(request): axum::Json<CreateApplicationRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.create(&request.applicant_id) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(ApplicationServiceError::Validation(message)) => {
            let payload = json!({ "error": message });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(err @ ApplicationServiceError::DuplicateApplication(_)) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn merge_handler<R>(
    State(service): State<Arc<MortgageApplicationService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(updates): axum::Json<BTreeMap<String, FieldValue>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.merge_fields(&id, updates) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(&id, err),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<MortgageApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(&id, err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<MortgageApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let id = ApplicationId(application_id);
    match service.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(&id, err),
    }
}

fn error_response(id: &ApplicationId, err: ApplicationServiceError) -> Response {
    match err {
        ApplicationServiceError::NotFound => {
            let payload = json!({
                "application_id": id.0,
                "error": "application not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
