use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// ============ Gateway Models ============

/// A single company lookup as seen by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    /// Raw company name; `None` when the caller sent nothing usable.
    pub company_name: Option<String>,
    /// Opaque caller identifier, used for logging only.
    pub caller_identity: Option<String>,
}

impl LookupRequest {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: Some(company_name.into()),
            caller_identity: None,
        }
    }

    pub fn with_caller(mut self, caller_identity: impl Into<String>) -> Self {
        self.caller_identity = Some(caller_identity.into());
        self
    }
}

/// Body sent to the registry search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamQuery {
    pub name: String,
    pub active_only: bool,
}

impl UpstreamQuery {
    /// Only active companies are ever searched.
    pub fn for_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active_only: true,
        }
    }
}

/// Normalized outcome of a successful lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub found: bool,
    /// Trimmed input, echoed back.
    pub company_name: String,
    /// Company records exactly as the registry returned them; `null` when nothing matched.
    #[schema(value_type = Option<Vec<Object>>)]
    pub data: Option<Vec<Value>>,
}

impl LookupResult {
    pub fn found(company_name: impl Into<String>, records: Vec<Value>) -> Self {
        Self {
            found: true,
            company_name: company_name.into(),
            data: Some(records),
        }
    }

    pub fn not_found(company_name: impl Into<String>) -> Self {
        Self {
            found: false,
            company_name: company_name.into(),
            data: None,
        }
    }

    /// Maps a decoded 200 body. Only a non-empty JSON array counts as a match.
    pub fn from_upstream(company_name: impl Into<String>, body: Value) -> Self {
        match body {
            Value::Array(records) if !records.is_empty() => Self::found(company_name, records),
            _ => Self::not_found(company_name),
        }
    }
}

// ============ HTTP Models ============

/// Request body of `POST /api/v1/check-company`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CheckCompanyRequest {
    /// Company name to search for. Accepted as `name` or `companyName`.
    #[serde(default, alias = "companyName")]
    #[schema(value_type = Option<String>, example = "Sygnum")]
    pub name: Option<Value>,
}

impl CheckCompanyRequest {
    /// Non-string names are treated as missing.
    pub fn into_lookup(self, caller_identity: Option<String>) -> LookupRequest {
        LookupRequest {
            company_name: self.name.and_then(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            }),
            caller_identity,
        }
    }
}

/// Successful response envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LookupEnvelope {
    pub success: bool,
    pub data: LookupResult,
}

impl From<LookupResult> for LookupEnvelope {
    fn from(data: LookupResult) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure response envelope, as produced by `AppError`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub upstream_configured: bool,
}
