//! HTTP server module
//!
//! Exposes the export form endpoint plus health and OpenAPI documentation.
//! Every export request is handled independently: the table, the ticket list and
//! the credentials live only for the duration of that request.

use crate::client::{ConversationSource, HelpdeskClient};
use crate::{Config, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the router with all route definitions
///
/// # Routes
///
/// - `POST /export` - Export ticket comments as a CSV download (form submission)
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
pub fn create_router(source: Arc<dyn ConversationSource>, config: Arc<Config>) -> Router {
    let state = AppState::new(source, config.clone());

    let router = Router::new()
        .route("/export", post(routes::export_comments))
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec));

    let router = if config.server.api.swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    if config.server.api.cors_enabled {
        let cors = build_cors_layer(&config.server.api.cors_origins);
        router.layer(cors)
    } else {
        router
    }
}

/// Build a CORS layer based on configured origins
///
/// `"*"` or an empty list allows any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_any = origins.iter().any(|o| o == "*");

    if allow_any || origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Serve `router` on an already bound listener until a shutdown signal arrives
pub async fn serve(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(crate::wait_for_signal())
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))
}

/// Start the export server on the configured bind address.
///
/// Builds the helpdesk client from `config`, binds the listener, and serves until
/// SIGTERM/SIGINT (or Ctrl+C).
///
/// # Example
///
/// ```no_run
/// use freshdesk_export::Config;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// freshdesk_export::api::start_api_server(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(config: Arc<Config>) -> Result<()> {
    config.validate()?;
    let bind_address = config.server.api.bind_address;

    let client = HelpdeskClient::new(config.helpdesk.clone())?;
    let app = create_router(Arc::new(client), config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "export server listening");

    serve(listener, app).await?;

    tracing::info!("export server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
