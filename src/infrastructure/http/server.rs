//! HTTP surface for the repository catalog.
//!
//! `GET /` serves the enhanced popular-repository listing, `GET /health` a
//! liveness check. Client errors answer 400 with `{"error"}`, everything
//! else that goes wrong answers 500 with `{"success": false, "error"}`.

use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::errors::CatalogError;
use crate::domain::models::ServerConfig;
use crate::services::CatalogService;

const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Shared state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub const fn new(catalog: Arc<CatalogService>) -> Self {
        Self { catalog }
    }
}

#[derive(Debug, Serialize)]
struct ClientErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct ServerErrorResponse {
    success: bool,
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Build the router with all endpoints.
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(list_repositories))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .max_age(CORS_MAX_AGE),
        );
    }

    router
}

/// Parse the raw `limit` query value. Absent or empty means "use the default".
fn parse_limit(raw: Option<&str>) -> Result<Option<usize>, CatalogError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<i64>() {
        Ok(n) if n > 0 => usize::try_from(n)
            .map(Some)
            .map_err(|_| CatalogError::InvalidLimit),
        _ => Err(CatalogError::InvalidLimit),
    }
}

/// First `limit` value in the query string; later repeats are ignored.
fn limit_param(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, _)| key == "limit")
        .map(|(_, value)| value.as_str())
}

async fn list_repositories(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let limit = limit_param(&params);
    let result = match parse_limit(limit) {
        Ok(limit) => state.catalog.list(limit).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(catalog) => Json(catalog).into_response(),
        Err(err) if err.is_client_error() => {
            warn!(error = %err, limit = ?limit, "rejected repository listing request");
            (
                StatusCode::BAD_REQUEST,
                Json(ClientErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
        Err(err) => {
            error!(error = %err, "error processing repository listing request");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerErrorResponse {
                    success: false,
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Catalog HTTP server.
pub struct HttpServer {
    state: AppState,
    config: ServerConfig,
}

impl HttpServer {
    pub const fn new(state: AppState, config: ServerConfig) -> Self {
        Self { state, config }
    }

    /// Serve until `shutdown` resolves.
    pub async fn serve_with_shutdown<F>(
        self,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;
        let router = build_router(self.state, self.config.enable_cors);

        info!(%addr, "HTTP server listening");

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}
