//! HTTP server setup and the import resolution handler.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, rate limiting)
//! - Serve with graceful shutdown
//! - Resolve import requests against the store chain and render hits
//! - Delegate misses to the configured fallback handler

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceExt;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use url::Url;

use crate::config::ServerConfig;
use crate::http::render;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::store::{ImportStore, StoreChain};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<StoreChain>,
    /// Handler owning the response for every request no store resolves.
    pub fallback: Option<Router>,
}

/// HTTP server for the vanity import service.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server over the given store chain.
    pub fn new(config: ServerConfig, store: StoreChain, fallback: Option<Router>) -> Self {
        let state = AppState {
            store: Arc::new(store),
            fallback,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/healthz", get(healthz))
            .route("/{*path}", any(import_handler))
            .route("/", any(import_handler))
            .with_state(state);

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(axum::middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until the shutdown signal fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Import resolution handler.
/// Derives the lookup URL, queries the store chain, and renders the
/// winning record; misses go to the fallback handler or a bare 404.
async fn import_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    if let Some(url) = request_url(&request) {
        if let Some(record) = state.store.lookup(&url).await {
            let from_tool = url
                .query_pairs()
                .find(|(k, _)| k == "go-get")
                .is_some_and(|(_, v)| v == "1");

            tracing::debug!(url = %url, prefix = %record.prefix, from_tool, "import resolved");

            // Rendering is buffered, so the status line is only
            // committed once the body exists.
            return Html(render::import_page(&record, from_tool)).into_response();
        }

        tracing::debug!(url = %url, "no store resolved the request");
    }

    match state.fallback.clone() {
        Some(fallback) => match fallback.oneshot(request).await {
            Ok(response) => response,
            Err(e) => match e {},
        },
        None => not_found(),
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Reconstruct the request URL for store lookups.
///
/// The Host header wins over an absolute-form request target; the query
/// is carried along so stores may inspect it.
fn request_url(request: &Request<Body>) -> Option<Url> {
    let uri = request.uri();

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| uri.authority().map(|a| a.as_str().to_string()))?;

    let scheme = uri.scheme_str().unwrap_or("http");
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    Url::parse(&format!("{scheme}://{host}{path_and_query}")).ok()
}
