use crate::protocol::{self, Request};
use crate::AppState;
use axum::extract::ws::{Message, WebSocket};
use catalog_core::kernel::{default_kernel, TruckKernel};
use catalog_core::{BuildError, Dispatcher, Registry, StlOptions};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{info, warn};

/// Run a build off the async runtime with a kernel of its own.
pub async fn run_build<T, F>(registry: Arc<Registry>, job: F) -> Result<Result<T, BuildError>, JoinError>
where
    F: FnOnce(&Dispatcher<TruckKernel>) -> Result<T, BuildError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || job(&Dispatcher::new(registry, default_kernel()))).await
}

/// Answer one request with the frames to send back, in order.
async fn respond(state: &AppState, request: Request) -> Vec<Message> {
    match request {
        Request::GetModels => vec![Message::Text(protocol::models_list(&state.registry.list()))],
        Request::BuildModel { model_id } => {
            let (id, options) = (model_id.clone(), state.config.view);
            match run_build(state.registry.clone(), move |d| d.mesh(&id, &options)).await {
                Ok(Ok(mesh)) => vec![Message::Text(protocol::model_ready(&model_id, &[mesh]))],
                Ok(Err(e)) => vec![Message::Text(protocol::build_error(&e))],
                Err(e) => vec![Message::Text(protocol::internal_error(&e.to_string()))],
            }
        }
        Request::ExportStl { model_id } => {
            let id = model_id.clone();
            let options = StlOptions::default().with_mesh(state.config.export);
            match run_build(state.registry.clone(), move |d| d.export_stl(&id, &options)).await {
                Ok(Ok(bytes)) => vec![
                    Message::Text(protocol::stl_ready(&model_id, bytes.len())),
                    Message::Binary(bytes),
                ],
                Ok(Err(e)) => vec![Message::Text(protocol::build_error(&e))],
                Err(e) => vec![Message::Text(protocol::internal_error(&e.to_string()))],
            }
        }
    }
}

pub async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("client connected");

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!("websocket receive failed: {}", e);
                break;
            }
        };

        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        let replies = match Request::parse(&text) {
            Ok(request) => {
                info!(?request, "request");
                respond(&state, request).await
            }
            Err(e) => {
                warn!("rejected frame: {}", e);
                vec![Message::Text(protocol::protocol_error(&e))]
            }
        };

        for reply in replies {
            if socket.send(reply).await.is_err() {
                info!("client went away mid-reply");
                return;
            }
        }
    }

    info!("client disconnected");
}
