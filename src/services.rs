use crate::config::{Config, Credentials};
use crate::errors::AppError;
use crate::models::{LookupRequest, LookupResult, UpstreamQuery};
use crate::registry_client::RegistryTransport;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Relays company-name lookups to the registry search API.
///
/// Stateless per call: concurrent lookups share only the read-only transport
/// and credentials.
#[derive(Clone)]
pub struct CompanyLookupGateway {
    transport: Arc<dyn RegistryTransport>,
    credentials: Option<Credentials>,
    throttle_delay: Duration,
}

impl CompanyLookupGateway {
    pub fn new(
        transport: Arc<dyn RegistryTransport>,
        credentials: Option<Credentials>,
        throttle_delay: Duration,
    ) -> Self {
        Self {
            transport,
            credentials,
            throttle_delay,
        }
    }

    pub fn from_config(transport: Arc<dyn RegistryTransport>, config: &Config) -> Self {
        Self::new(
            transport,
            config.credentials.clone(),
            config.throttle_delay,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Looks up active companies matching `request.company_name`.
    ///
    /// A search with no matches succeeds with `found: false`.
    pub async fn lookup(&self, request: LookupRequest) -> Result<LookupResult, AppError> {
        let span = tracing::info_span!(
            "lookup",
            request_id = %Uuid::new_v4(),
            caller = request.caller_identity.as_deref().unwrap_or("anonymous")
        );

        async move {
            let result = self.run(request).await;
            match &result {
                Ok(outcome) => tracing::info!(
                    found = outcome.found,
                    "Lookup completed for '{}'",
                    outcome.company_name
                ),
                Err(e) => tracing::error!(kind = e.kind(), "Lookup failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, request: LookupRequest) -> Result<LookupResult, AppError> {
        tracing::info!("Company lookup triggered");

        let Some(credentials) = self.credentials.as_ref() else {
            return Err(AppError::Misconfigured);
        };

        let company_name = validate_company_name(request.company_name.as_deref())?;

        // Static placeholder for rate limiting; not adaptive.
        tokio::time::sleep(self.throttle_delay).await;

        let query = UpstreamQuery::for_name(company_name.clone());
        tracing::info!("Searching Zefix for company: {}", company_name);

        let body = self
            .transport
            .search(&query, &credentials.basic_authorization())
            .await?;

        let result = LookupResult::from_upstream(company_name, body);
        if result.found {
            tracing::info!(
                "Company found: {} ({} record(s))",
                result.company_name,
                result.data.as_ref().map_or(0, Vec::len)
            );
        } else {
            tracing::info!("Company not found: {}", result.company_name);
        }
        Ok(result)
    }
}

/// Returns the trimmed company name, or `InvalidArgument` when nothing is left.
pub fn validate_company_name(raw: Option<&str>) -> Result<String, AppError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Err(AppError::InvalidArgument(
            "companyName is required and must be a non-empty string".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
