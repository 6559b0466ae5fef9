//! Text frame codec for the WebSocket session.
//!
//! Frames are `KIND` or `KIND:{json}`. A successful `EXPORT_STL` answers with
//! an `STL_READY` text frame followed by one binary frame holding the file.

use catalog_core::geometry::MeshBuffer;
use catalog_core::{BuildError, ModelSummary};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    GetModels,
    BuildModel { model_id: String },
    ExportStl { model_id: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Malformed {command} payload: {reason}")]
    MalformedPayload { command: &'static str, reason: String },
}

impl ProtocolError {
    pub fn code(&self) -> &'static str {
        match self {
            ProtocolError::UnknownCommand(_) => "UNKNOWN_COMMAND",
            ProtocolError::MalformedPayload { .. } => "BAD_REQUEST",
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelRef {
    model_id: String,
}

impl Request {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let text = text.trim();
        let (kind, payload) = match text.split_once(':') {
            Some((kind, payload)) => (kind, Some(payload)),
            None => (text, None),
        };

        match kind {
            "GET_MODELS" => Ok(Request::GetModels),
            "BUILD_MODEL" => Ok(Request::BuildModel { model_id: model_ref("BUILD_MODEL", payload)? }),
            "EXPORT_STL" => Ok(Request::ExportStl { model_id: model_ref("EXPORT_STL", payload)? }),
            _ => Err(ProtocolError::UnknownCommand(kind.to_string())),
        }
    }
}

fn model_ref(command: &'static str, payload: Option<&str>) -> Result<String, ProtocolError> {
    let payload = payload.ok_or_else(|| ProtocolError::MalformedPayload {
        command,
        reason: "missing payload".into(),
    })?;
    let parsed: ModelRef = serde_json::from_str(payload)
        .map_err(|e| ProtocolError::MalformedPayload { command, reason: e.to_string() })?;
    Ok(parsed.model_id)
}

pub fn models_list(models: &[ModelSummary]) -> String {
    let json = serde_json::to_string(models).unwrap_or_else(|_| "[]".to_string());
    format!("MODELS_LIST:{}", json)
}

pub fn model_ready(model_id: &str, meshes: &[MeshBuffer]) -> String {
    format!("MODEL_READY:{}", json!({ "modelId": model_id, "meshes": meshes }))
}

pub fn stl_ready(model_id: &str, bytes: usize) -> String {
    format!("STL_READY:{}", json!({ "modelId": model_id, "bytes": bytes }))
}

pub fn build_error(err: &BuildError) -> String {
    let mut payload = json!({ "code": err.code(), "message": err.to_string() });
    if let (Some(stage), Value::Object(map)) = (err.stage(), &mut payload) {
        map.insert("stage".into(), Value::String(stage.as_str().into()));
    }
    format!("ERROR:{}", payload)
}

pub fn protocol_error(err: &ProtocolError) -> String {
    format!("ERROR:{}", json!({ "code": err.code(), "message": err.to_string() }))
}

/// A build that never reported back, e.g. a panicked blocking task.
pub fn internal_error(message: &str) -> String {
    format!("ERROR:{}", json!({ "code": "INTERNAL", "message": message }))
}
