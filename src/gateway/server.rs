//! HTTP hosting with axum.
//!
//! Mounts the two CCIP-Read routes on an axum [`Router`] and wraps them in
//! the hosting layers: tracing, timeout, body limit, panic recovery and
//! (optionally) CORS.

use std::any::Any;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Path, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{self, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::config::{ConfigError, GatewayConfig};
use super::request::{parse_get, parse_post, RequestError};
use crate::envelope::{ResponseProfile, RpcResponse};
use crate::router::CcipRouter;

/// Failure to start or run the gateway.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("invalid gateway configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared state of the HTTP handlers.
#[derive(Clone)]
struct GatewayState {
    router: Arc<CcipRouter>,
    path_suffix: Arc<str>,
}

impl CcipRouter {
    /// Build the axum application serving this router.
    ///
    /// Routes, relative to `config.base_path`:
    /// - `GET /:sender/:call_data`
    /// - `POST /`
    pub fn into_axum_router(self, config: &GatewayConfig) -> Router {
        let profile = self.profile();
        let state = GatewayState {
            router: Arc::new(self),
            path_suffix: Arc::from(config.path_suffix.as_str()),
        };

        let routes = Router::new()
            .route("/:sender/:call_data", get(get_handler))
            .route("/", post(post_handler))
            .with_state(state);

        let app = if config.base_path.is_empty() {
            routes
        } else {
            Router::new().nest(&config.base_path, routes)
        };

        // Layer order is bottom-up: the last layer added is the outermost.
        let app = app
            .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
                panic_response(profile, panic)
            }))
            .layer(DefaultBodyLimit::max(config.max_body_size))
            .layer(TimeoutLayer::new(config.request_timeout))
            .layer(TraceLayer::new_for_http());

        if config.cors {
            app.layer(cors_layer())
        } else {
            app
        }
    }

    /// Serve this router over HTTP until ctrl-c.
    pub async fn serve(self, config: GatewayConfig) -> Result<(), ServeError> {
        config.validate()?;
        let listener = TcpListener::bind(config.socket_addr()).await?;
        self.serve_on(listener, &config).await
    }

    /// Serve on an already bound listener until ctrl-c.
    pub async fn serve_on(self, listener: TcpListener, config: &GatewayConfig) -> Result<(), ServeError> {
        config.validate()?;

        info!("Starting CCIP-Read gateway...");
        info!("  Listening on: {}", listener.local_addr()?);
        info!("  Handlers: {}", self.len());
        info!("  Profile: {:?}", self.profile());
        if !config.base_path.is_empty() {
            info!("  Base path: {}", config.base_path);
        }
        info!("  Request timeout: {}s", config.request_timeout.as_secs());

        let app = self.into_axum_router(config);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("CCIP-Read gateway stopped");
        Ok(())
    }
}

async fn get_handler(
    State(state): State<GatewayState>,
    Path((sender, call_data)): Path<(String, String)>,
) -> Response {
    match parse_get(&sender, &call_data, &state.path_suffix) {
        Ok(ctx) => render(state.router.handle(ctx).await),
        Err(e) => reject(&state, e),
    }
}

async fn post_handler(State(state): State<GatewayState>, body: Bytes) -> Response {
    match parse_post(&body) {
        Ok(ctx) => render(state.router.handle(ctx).await),
        Err(e) => reject(&state, e),
    }
}

fn reject(state: &GatewayState, e: RequestError) -> Response {
    warn!("Rejected request: {}", e);
    render(state.router.profile().invalid_request())
}

fn render(response: RpcResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}

/// 500 envelope for a handler that panicked instead of returning an error.
fn panic_response(profile: ResponseProfile, panic: Box<dyn Any + Send + 'static>) -> Response {
    let description = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "handler panicked".to_string()
    };

    error!("Handler panicked: {}", description);
    render(profile.internal_error(description))
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(cors::Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("CCIP-Read gateway received shutdown signal");
}
