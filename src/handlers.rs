use crate::errors::AppError;
use crate::models::{CheckCompanyRequest, ErrorEnvelope, HealthResponse, LookupEnvelope};
use crate::services::CompanyLookupGateway;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

/// Header carrying the optional caller identity, logged with each lookup.
pub const CALLER_ID_HEADER: &str = "x-caller-id";

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Company lookup gateway.
    pub gateway: CompanyLookupGateway,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is running", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            upstream_configured: state.gateway.is_configured(),
        }),
    )
}

/// POST /api/v1/check-company
///
/// Searches the Zefix registry for active companies matching the given name.
/// A search without matches still answers 200 with `found: false`.
#[utoipa::path(
    post,
    path = "/api/v1/check-company",
    tag = "companies",
    request_body = CheckCompanyRequest,
    params(("x-caller-id" = Option<String>, Header, description = "Caller identity, logged only")),
    responses(
        (status = 200, description = "Lookup completed", body = LookupEnvelope),
        (status = 400, description = "Missing or blank company name", body = ErrorEnvelope),
        (status = 413, description = "Request body too large", body = ErrorEnvelope),
        (status = 429, description = "Per-IP rate limit exceeded"),
        (status = 500, description = "Server not configured or internal failure", body = ErrorEnvelope),
        (status = 502, description = "Zefix answered with an error status", body = ErrorEnvelope),
        (status = 503, description = "Zefix did not respond", body = ErrorEnvelope)
    )
)]
pub async fn check_company(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<CheckCompanyRequest>, JsonRejection>,
) -> Result<Json<LookupEnvelope>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Rejected check-company body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidArgument(format!("Invalid request body: {}", rejection.body_text()))
        }
    })?;

    let caller = headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let result = state.gateway.lookup(payload.into_lookup(caller)).await?;

    Ok(Json(result.into()))
}
