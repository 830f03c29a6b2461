//! zola-relay: Streaming relay endpoint
//!
//! Accepts `{ prompt, history }`, forwards the conversation to the upstream
//! model with streaming enabled, and pipes generated text back to the caller
//! as a plain-text body, chunk by chunk, in arrival order.

pub mod error;
pub mod handler;
pub mod state;

pub use error::RelayError;
pub use state::{RelayConfig, RelayState};

use axum::{
    Json, Router,
    http::{Method, header},
    routing::{get, post},
};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir};

/// Path of the relay endpoint
pub const RELAY_PATH: &str = "/api/gemini";

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the relay router.
///
/// When `static_dir` is set, unmatched paths are served from it (the client's
/// background image lives there).
pub fn router(state: RelayState, static_dir: Option<&Path>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/health", get(health))
        .route(RELAY_PATH, post(handler::relay));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors).with_state(state)
}

/// Bind and serve the relay until Ctrl+C.
pub async fn serve(config: &RelayConfig, state: RelayState) -> std::io::Result<()> {
    let app = router(state, config.static_dir.as_deref());
    let listener = tokio::net::TcpListener::bind(config.addr()).await?;

    tracing::info!("zola relay listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutting down relay");
            }
        })
        .await
}
