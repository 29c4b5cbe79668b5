use crate::handlers;
use crate::models::{CheckCompanyRequest, ErrorEnvelope, HealthResponse, LookupEnvelope, LookupResult};
use utoipa::OpenApi;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "Zefix Company Lookup Gateway"),
    paths(handlers::health, handlers::check_company),
    components(schemas(
        CheckCompanyRequest,
        LookupEnvelope,
        LookupResult,
        ErrorEnvelope,
        HealthResponse
    )),
    tags(
        (name = "companies", description = "Swiss company registry lookups"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
