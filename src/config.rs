use std::net::SocketAddr;
use std::path::PathBuf;

use crate::features::AlignmentPolicy;

/// Application-level constants
pub const APP_NAME: &str = "Survival Predictor";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model artifact location, fixed at build time.
pub const DEFAULT_MODEL_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/survival_model.json");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Environment overrides.
pub const ENV_MODEL_PATH: &str = "SURVIVAL_MODEL_PATH";
pub const ENV_BIND_ADDR: &str = "SURVIVAL_BIND_ADDR";
pub const ENV_ALIGNMENT_POLICY: &str = "SURVIVAL_ALIGNMENT_POLICY";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "survival_predictor=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
    #[error("{var}: {message}")]
    InvalidPolicy { var: &'static str, message: String },
}

/// Runtime configuration for the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub alignment_policy: AlignmentPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            alignment_policy: AlignmentPolicy::Strict,
        }
    }
}

impl ServiceConfig {
    /// Defaults, overridden by `SURVIVAL_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_MODEL_PATH).filter(|v| !v.trim().is_empty()) {
            config.model_path = PathBuf::from(path.trim());
        }
        if let Some(addr) = lookup(ENV_BIND_ADDR).filter(|v| !v.trim().is_empty()) {
            config.bind_addr = addr
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidBindAddr {
                    var: ENV_BIND_ADDR,
                    value: addr.clone(),
                })?;
        }
        if let Some(policy) = lookup(ENV_ALIGNMENT_POLICY).filter(|v| !v.trim().is_empty()) {
            config.alignment_policy =
                policy
                    .parse()
                    .map_err(|message| ConfigError::InvalidPolicy {
                        var: ENV_ALIGNMENT_POLICY,
                        message,
                    })?;
        }

        Ok(config)
    }
}
