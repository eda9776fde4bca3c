use crate::config::SourcesConfig;
use crate::constants::HELLOTICKETS_SOURCE;
use crate::dates::parse_date_range;
use crate::error::ScraperError;
use crate::fetch::PageFetcher;
use crate::normalizer::TeamNameNormalizer;
use crate::pipeline::{run, ScrapeRequest};
use crate::types::{ScrapingResult, Source, SourceSelection};
use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::{Local, Utc};
use hyper::Server;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Shared, read-only state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<dyn PageFetcher>,
    pub normalizer: Arc<TeamNameNormalizer>,
    pub sources: Arc<SourcesConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScrapeParams {
    pub source: Option<String>,
    pub normalize: Option<String>,
    pub filter: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ScrapeParams {
    /// Validate the query into a request. Only the literal `true` turns
    /// normalization on.
    pub fn into_request(self) -> Result<ScrapeRequest, ScraperError> {
        let selection: SourceSelection = self
            .source
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(HELLOTICKETS_SOURCE)
            .parse()?;
        let date_range = parse_date_range(
            self.from.as_deref(),
            self.to.as_deref(),
            Local::now().date_naive(),
        )?;

        Ok(ScrapeRequest {
            selection,
            normalize: self.normalize.as_deref() == Some("true"),
            keyword: self.filter.unwrap_or_default(),
            date_range,
        })
    }
}

/// Error body returned by the API: `{"error": "..."}`
pub struct ApiError(ScraperError);

impl From<ScraperError> for ApiError {
    fn from(e: ScraperError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        let body = Json(serde_json::json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

async fn scrape(
    State(state): State<AppState>,
    Query(params): Query<ScrapeParams>,
) -> Result<Json<ScrapingResult>, ApiError> {
    let request = params.into_request().map_err(|e| {
        warn!(error = %e, "Rejected scrape request");
        ApiError(e)
    })?;

    let result = run(&request, state.fetcher.as_ref(), &state.sources, &state.normalizer)
        .await
        .map_err(|e| {
            error!(error = %e, "Scrape failed");
            ApiError(e)
        })?;

    Ok(Json(result))
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    let services: BTreeMap<&str, &str> = Source::ALL
        .iter()
        .map(|source| (source.as_str(), "available"))
        .collect();

    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": services,
    }))
}

/// Build the router: the JSON API plus, when configured, the static
/// frontend as fallback.
pub fn create_server(state: AppState, web_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let router = Router::new()
        .route("/api/scrape", get(scrape))
        .route("/api/health", get(health))
        .with_state(state);

    let router = match web_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}

/// Start the HTTP server on the specified port
pub async fn start_server(
    state: AppState,
    web_dir: Option<PathBuf>,
    port: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(dir) = web_dir.as_ref().filter(|d| !d.is_dir()) {
        warn!(path = %dir.display(), "Web directory not found, static frontend disabled");
    }
    let app = create_server(state, web_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "HTTP server listening");

    println!("🚀 HTTP server running on http://localhost:{port}");
    println!("🔎 Scrape:       http://localhost:{port}/api/scrape?source=hellotickets");
    println!("💚 Health check: http://localhost:{port}/api/health");

    Server::bind(&addr).serve(app.into_make_service()).await?;

    Ok(())
}
