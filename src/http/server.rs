//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, limits, request ID, security headers)
//! - Bind server to listener
//! - Stop on the shutdown signal

use axum::{
    body::Body,
    extract::{MatchedPath, Request},
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockcypher::{BlockCypherClient, BlockCypherResult};
use crate::config::ExplorerConfig;
use crate::http::handlers;
use crate::http::request::X_REQUEST_ID;
use crate::lifecycle::ShutdownSignal;
use crate::observability::metrics;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ExplorerConfig>,
    pub client: BlockCypherClient,
}

impl AppState {
    pub fn new(config: ExplorerConfig) -> BlockCypherResult<Self> {
        let client = BlockCypherClient::new(config.blockcypher.clone())?;
        Ok(Self {
            config: Arc::new(config),
            client,
        })
    }
}

/// HTTP server for the explorer.
pub struct HttpServer {
    router: Router,
    config: Arc<ExplorerConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ExplorerConfig) -> BlockCypherResult<Self> {
        let state = AppState::new(config)?;
        let config = state.config.clone();
        let router = build_router(state);
        Ok(Self { router, config })
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                match shutdown.wait().await {
                    Some(reason) => tracing::info!(reason = %reason, "Draining in-flight requests"),
                    None => tracing::info!("Shutdown coordinator dropped, draining"),
                }
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .route("/", get(handlers::home))
        .route("/healthz", get(handlers::health))
        .route("/pushtx/", get(handlers::pushtx_forwarding))
        .route("/decodetx/", get(handlers::decodetx_forwarding))
        .route("/{coin_symbol}/", get(handlers::coin_overview))
        .route("/{coin_symbol}/tx/{tx_hash}/", get(handlers::transaction_overview))
        .route(
            "/{coin_symbol}/tx-confidence/{tx_hash}/",
            get(handlers::poll_confidence),
        )
        .route(
            "/{coin_symbol}/pushtx/",
            get(handlers::push_tx_form).post(handlers::push_tx_submit),
        )
        .route(
            "/{coin_symbol}/decodetx/",
            get(handlers::decode_tx_form).post(handlers::decode_tx_submit),
        )
        .route_layer(middleware::from_fn(record_page_view))
        .fallback(handlers::not_found)
        .with_state(state);

    if config.security.enable_headers {
        router = router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("same-origin"),
            ));
    }

    router
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(X_REQUEST_ID)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("unknown");
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id,
            )
        }))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Count handled requests per route template.
async fn record_page_view(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_page_view(&route, response.status().as_u16());
    response
}
