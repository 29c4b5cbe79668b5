use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zefix_gateway::config::Config;
use zefix_gateway::handlers::AppState;
use zefix_gateway::registry_client::ReqwestRegistryClient;
use zefix_gateway::routes;
use zefix_gateway::services::CompanyLookupGateway;

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, builds the Zefix client and the
/// lookup gateway, then serves the HTTP routes behind CORS, tracing and
/// per-IP rate limiting.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zefix_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    let client = ReqwestRegistryClient::new(&config.zefix_base_url, config.upstream_timeout)
        .map_err(|e| anyhow::anyhow!("Failed to initialize Zefix client: {}", e))?;
    tracing::info!("✓ Zefix client initialized: {}", client.search_url());

    // Build application state
    let app_state = Arc::new(AppState {
        gateway: CompanyLookupGateway::from_config(Arc::new(client), &config),
    });

    // Rate limiting: 10 req/sec per IP, burst of 20; health check and docs bypass it
    let app = routes::app(app_state, routes::rate_limited_api()?);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
