//! Calcdeck API server
//!
//! Axum router, CORS and request tracing, graceful shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::rates::DEFAULT_RATES_URL;

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the currency rate service
    pub rates_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            rates_url: DEFAULT_RATES_URL.to_string(),
        }
    }
}

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub version: String,
    pub rates_url: String,
}

impl AppState {
    pub fn new(rates_url: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            rates_url: rates_url.into(),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Engines
        .route("/api/v1/basic", post(handlers::basic))
        .route("/api/v1/scientific", post(handlers::scientific))
        .route("/api/v1/convert/unit", post(handlers::convert_unit_handler))
        .route(
            "/api/v1/convert/temperature",
            post(handlers::convert_temperature_handler),
        )
        .route(
            "/api/v1/convert/currency",
            post(handlers::convert_currency_handler),
        )
        .route("/api/v1/loan", post(handlers::loan))
        .route("/api/v1/graph", post(handlers::graph))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server until Ctrl+C or SIGTERM.
///
/// Expects a tracing subscriber to be installed by the caller.
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.rates_url.clone()));
    let app = router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Calcdeck API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/basic, /api/v1/scientific, /api/v1/convert/{{unit,temperature,currency}}, /api/v1/loan, /api/v1/graph");
    info!("   Health: /health, Version: /version");
    info!("   Rates: {}", config.rates_url);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Calcdeck API Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM. If a handler cannot be installed that
/// branch never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.rates_url, DEFAULT_RATES_URL);
    }

    #[test]
    fn test_config_address_format() {
        let config = ApiConfig {
            host: "192.168.1.100".to_string(),
            port: 9090,
            ..ApiConfig::default()
        };
        let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse().unwrap();
        assert_eq!(addr.port(), 9090);
    }

    #[test]
    fn test_app_state_version() {
        let state = AppState::new("http://localhost:1");
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(state.rates_url, "http://localhost:1");
    }
}
