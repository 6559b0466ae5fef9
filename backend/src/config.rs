use catalog_core::kernel::MeshOptions;
use std::net::SocketAddr;
use thiserror::Error;

pub const ADDR_VAR: &str = "CATALOG_ADDR";
pub const VIEW_TOLERANCE_VAR: &str = "CATALOG_VIEW_TOLERANCE";
pub const EXPORT_TOLERANCE_VAR: &str = "CATALOG_EXPORT_TOLERANCE";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },

    #[error("{var} must be a positive number of millimetres, got {value}")]
    InvalidTolerance { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Tessellation used for `BUILD_MODEL` previews.
    pub view: MeshOptions,
    /// Tessellation used for STL downloads.
    pub export: MeshOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            view: MeshOptions::VIEW,
            export: MeshOptions::EXPORT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ADDR_VAR) {
            config.addr = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidAddr { var: ADDR_VAR, value })?;
        }
        if let Some(value) = lookup(VIEW_TOLERANCE_VAR) {
            config.view = config.view.with_tolerance(parse_tolerance(VIEW_TOLERANCE_VAR, value)?);
        }
        if let Some(value) = lookup(EXPORT_TOLERANCE_VAR) {
            config.export = config.export.with_tolerance(parse_tolerance(EXPORT_TOLERANCE_VAR, value)?);
        }

        Ok(config)
    }
}

fn parse_tolerance(var: &'static str, value: String) -> Result<f64, ConfigError> {
    match value.trim().parse::<f64>() {
        Ok(t) if t.is_finite() && t > 0.0 => Ok(t),
        _ => Err(ConfigError::InvalidTolerance { var, value }),
    }
}
