//! HTTP front of the relay.
//!
//! `POST /` receives Misskey webhook deliveries and answers with a short
//! plain-text body, `200` on a published tweet and `403` for everything the
//! relay turned away or failed on. `GET /api/health` is a liveness probe.
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use tracing::{debug, info};

use crate::misskey::SECRET_HEADER;
use crate::relay::Relay;

/// Max webhook payload size: 1 MB.
const WEBHOOK_MAX_BODY: usize = 1_048_576;

/// Reply body for a published note.
pub const SUCCESS_REPLY: &str = "successfully tweeted";

#[derive(Clone)]
pub struct GatewayState {
    relay: Arc<Relay>,
}

impl GatewayState {
    pub fn new(relay: Arc<Relay>) -> Self {
        Self { relay }
    }
}

/// Build the HTTP router.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", post(webhook_handler))
        .route("/api/health", get(health_handler))
        .layer(DefaultBodyLimit::max(WEBHOOK_MAX_BODY))
        .with_state(state)
}

/// POST /: relay one note.
async fn webhook_handler(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let secret = headers
        .get(SECRET_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
    debug!("webhook delivery: payload_len={}", body.len());

    match state.relay.handle(secret.as_deref(), &body).await {
        Ok(relayed) => {
            debug!(
                "published post {} ({} uploaded, {} linked)",
                relayed.post_id, relayed.uploaded, relayed.linked
            );
            (StatusCode::OK, SUCCESS_REPLY.to_string())
        }
        Err(e) => (StatusCode::FORBIDDEN, e.reply()),
    }
}

/// GET /api/health: health check endpoint.
async fn health_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION
    }))
}

/// Bind `host:port` and serve until `shutdown` resolves.
pub async fn serve<F>(host: &str, port: u16, relay: Arc<Relay>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(GatewayState::new(relay));
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")?;
    info!("server stopped");
    Ok(())
}
