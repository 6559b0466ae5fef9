//! Build errors surfaced to callers of the dispatcher.

use crate::kernel::KernelOpError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Named recipe step, reported with kernel failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Extrude,
    Cut,
    Profile,
    SocketSweep,
    SocketCutouts,
    GridTiling,
    ShellExtrude,
    Shell,
    LipSweep,
    LipFillet,
    Accessories,
    Assembly,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Extrude => "extrude",
            Stage::Cut => "cut",
            Stage::Profile => "profile",
            Stage::SocketSweep => "socket-sweep",
            Stage::SocketCutouts => "socket-cutouts",
            Stage::GridTiling => "grid-tiling",
            Stage::ShellExtrude => "shell-extrude",
            Stage::Shell => "shell",
            Stage::LipSweep => "lip-sweep",
            Stage::LipFillet => "lip-fillet",
            Stage::Accessories => "accessories",
            Stage::Assembly => "assembly",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    #[error("Unknown model id: {0}")]
    UnknownModelId(String),

    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameters { field: &'static str, reason: String },

    #[error("Kernel operation failed during {stage}: {source}")]
    KernelOperationFailed {
        stage: Stage,
        #[source]
        source: KernelOpError,
    },

    #[error("Meshing failed at tolerance {tolerance}: {source}")]
    AdapterFailure {
        tolerance: f64,
        #[source]
        source: KernelOpError,
    },
}

impl BuildError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BuildError::InvalidParameters { field, reason: reason.into() }
    }

    /// Stable code for the request protocol.
    pub fn code(&self) -> &'static str {
        match self {
            BuildError::UnknownModelId(_) => "UNKNOWN_MODEL",
            BuildError::InvalidParameters { .. } => "INVALID_PARAMETERS",
            BuildError::KernelOperationFailed { .. } => "KERNEL_FAILED",
            BuildError::AdapterFailure { .. } => "ADAPTER_FAILED",
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            BuildError::KernelOperationFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Tag kernel results with the recipe step that produced them.
pub trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, BuildError>;
}

impl<T> StageExt<T> for Result<T, KernelOpError> {
    fn stage(self, stage: Stage) -> Result<T, BuildError> {
        self.map_err(|source| BuildError::KernelOperationFailed { stage, source })
    }
}
