use crate::errors::AppError;
use crate::handlers::{self, AppState};
use crate::openapi::ApiDoc;
use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Company names are short; anything larger is rejected before parsing.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

/// Sustained per-IP rate: one token every 100 ms, i.e. 10 requests/second.
pub const RATE_LIMIT_REPLENISH_MS: u64 = 100;
pub const RATE_LIMIT_BURST: u32 = 20;

/// Lookup routes without rate limiting.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/check-company", post(handlers::check_company))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::map_response(envelope_oversized_body))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
}

/// Lookup routes behind per-IP rate limiting: 10 req/s, burst of 20.
///
/// The client key comes from forwarding headers, falling back to the peer
/// address, so the server must be run with connect info.
pub fn rate_limited_api() -> anyhow::Result<Router<Arc<AppState>>> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(RATE_LIMIT_REPLENISH_MS)
            .burst_size(RATE_LIMIT_BURST)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
    );

    Ok(api_routes().layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    })))
}

/// Assembles the full application around the given API routes.
///
/// Health and documentation routes bypass whatever layers `api` carries.
pub fn app(state: Arc<AppState>, api: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Rewrites the body limit's plain-text 413 into the JSON error envelope.
async fn envelope_oversized_body<B>(response: Response<B>) -> Response
where
    B: axum::body::HttpBody<Data = axum::body::Bytes> + Send + 'static,
    B::Error: Into<axum::BoxError>,
{
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    if response.status() == StatusCode::PAYLOAD_TOO_LARGE && !is_json {
        return AppError::PayloadTooLarge.into_response();
    }
    response.into_response()
}
