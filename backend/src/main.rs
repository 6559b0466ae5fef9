use axum::{
    extract::ws::WebSocketUpgrade,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_core::registry::RegistryError;
use catalog_core::{BuildError, ModelSummary, Registry, StlOptions};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, Instrument};
use tracing_subscriber::EnvFilter;

mod config;
mod protocol;
mod session;

use config::{ConfigError, ServerConfig};

#[derive(Debug, Error)]
enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("server I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

// Application State
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, RegistryError> {
        Ok(Self { registry: Arc::new(Registry::builtin()?), config })
    }
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.addr;
    let shared_state = Arc::new(AppState::new(config)?);
    info!(models = shared_state.registry.len(), "registry loaded");

    let app = router(shared_state);

    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/ws", get(ws_handler))
        .route("/models", get(list_models))
        .route("/models/:id/stl", get(download_stl))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> &'static str {
    "Hello from the catalog backend!"
}

async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let span = info_span!("session", id = %uuid::Uuid::new_v4());
    ws.on_upgrade(move |socket| session::handle_socket(socket, state).instrument(span))
}

async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelSummary>> {
    Json(state.registry.list())
}

async fn download_stl(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let options = StlOptions::default().with_mesh(state.config.export);
    let job_id = id.clone();
    match session::run_build(state.registry.clone(), move |d| d.export_stl(&job_id, &options)).await {
        Ok(Ok(bytes)) => (
            [
                (header::CONTENT_TYPE, "model/stl".to_string()),
                (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}.stl\"", id)),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => build_error_response(&e),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "code": "INTERNAL", "message": e.to_string() })),
        )
            .into_response(),
    }
}

fn build_error_response(err: &BuildError) -> Response {
    let status = match err {
        BuildError::UnknownModelId(_) => StatusCode::NOT_FOUND,
        BuildError::InvalidParameters { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        BuildError::KernelOperationFailed { .. } | BuildError::AdapterFailure { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let body = json!({
        "code": err.code(),
        "message": err.to_string(),
        "stage": err.stage().map(|s| s.as_str()),
    });
    (status, Json(body)).into_response()
}
