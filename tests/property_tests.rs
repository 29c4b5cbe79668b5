/// Property-based tests using proptest
/// Tests invariants of company-name validation and upstream query construction
use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use zefix_gateway::config::Credentials;
use zefix_gateway::errors::AppError;
use zefix_gateway::models::{LookupRequest, UpstreamQuery};
use zefix_gateway::registry_client::{RegistryTransport, TransportError};
use zefix_gateway::services::{validate_company_name, CompanyLookupGateway};

#[derive(Default)]
struct CapturingTransport {
    queries: Mutex<Vec<UpstreamQuery>>,
}

#[async_trait]
impl RegistryTransport for CapturingTransport {
    async fn search(
        &self,
        query: &UpstreamQuery,
        _authorization: &str,
    ) -> Result<Value, TransportError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(json!([{"name": query.name}]))
    }
}

fn run_lookup(name: &str) -> (Result<zefix_gateway::models::LookupResult, AppError>, Vec<UpstreamQuery>) {
    let transport = Arc::new(CapturingTransport::default());
    let gateway = CompanyLookupGateway::new(
        transport.clone(),
        Some(Credentials::new("user", "pass")),
        Duration::ZERO,
    );
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let result = runtime.block_on(gateway.lookup(LookupRequest::new(name)));
    let queries = transport.queries.lock().unwrap().clone();
    (result, queries)
}

// Property: validation never panics
proptest! {
    #[test]
    fn validation_never_panics(name in "\\PC*") {
        let _ = validate_company_name(Some(name.as_str()));
    }
}

// Property: whitespace-only names are rejected without any upstream call
proptest! {
    #[test]
    fn whitespace_names_never_reach_upstream(name in "[ \\t\\n\\r]{0,16}") {
        let (result, queries) = run_lookup(&name);
        prop_assert!(matches!(result, Err(AppError::InvalidArgument(_))));
        prop_assert!(queries.is_empty());
    }
}

// Property: the upstream query carries the trimmed name and activeOnly=true
proptest! {
    #[test]
    fn upstream_query_uses_trimmed_name(
        leading in "[ \\t]{0,4}",
        stem in "[A-Za-z0-9][A-Za-z0-9 .&-]{0,30}[A-Za-z0-9]",
        trailing in "[ \\t\\n]{0,4}"
    ) {
        let raw = format!("{}{}{}", leading, stem, trailing);
        let (result, queries) = run_lookup(&raw);

        prop_assert_eq!(queries.len(), 1);
        prop_assert_eq!(&queries[0].name, &stem);
        prop_assert!(queries[0].active_only);

        let result = result.unwrap();
        prop_assert!(result.found);
        prop_assert_eq!(result.company_name, stem);
    }

    #[test]
    fn valid_names_are_trimmed_not_rewritten(name in "\\PC*") {
        match validate_company_name(Some(name.as_str())) {
            Ok(trimmed) => {
                prop_assert_eq!(trimmed.as_str(), name.trim());
                prop_assert!(!trimmed.is_empty());
            }
            Err(e) => {
                prop_assert!(name.trim().is_empty());
                prop_assert!(matches!(e, AppError::InvalidArgument(_)));
            }
        }
    }
}
