use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::AppError;
use crate::network::{NetworkDescriptor, WalletConnectorConfig, build_wallet_connector_config};

pub const PLACEHOLDER_PROJECT_ID: &str = "YOUR_PROJECT_ID";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_PASSING_SCORE_PERCENT: u32 = 70;

/// A resolved setting that remembers whether it came from the environment
/// or from a built-in default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue<T> {
    Explicit(T),
    Default(T),
}

impl<T> ConfigValue<T> {
    pub fn value(&self) -> &T {
        match self {
            ConfigValue::Explicit(v) | ConfigValue::Default(v) => v,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            ConfigValue::Explicit(v) | ConfigValue::Default(v) => v,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ConfigValue::Default(_))
    }
}

/// Blank values count as missing.
pub fn resolve_project_id(raw: Option<String>) -> ConfigValue<String> {
    match raw {
        Some(id) if !id.trim().is_empty() => ConfigValue::Explicit(id),
        _ => ConfigValue::Default(PLACEHOLDER_PROJECT_ID.to_string()),
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub project_id: ConfigValue<String>,
    pub require_project_id: bool,
    pub bind_addr: SocketAddr,
    pub catalog_path: Option<PathBuf>,
    pub passing_score_percent: u32,
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = resolve_project_id(lookup("WALLETCONNECT_PROJECT_ID"));

        let require_project_id = match lookup("REQUIRE_WALLET_PROJECT_ID") {
            Some(v) => parse_bool(&v).ok_or_else(|| {
                AppError::Config(format!("REQUIRE_WALLET_PROJECT_ID is not a boolean: {}", v))
            })?,
            None => false,
        };

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDR is invalid: {}", e)))?;

        let catalog_path = lookup("CATALOG_PATH")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let passing_score_percent = match lookup("PASSING_SCORE_PERCENT") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|p| *p <= 100)
                .ok_or_else(|| {
                    AppError::Config(format!("PASSING_SCORE_PERCENT must be 0-100, got {}", v))
                })?,
            None => DEFAULT_PASSING_SCORE_PERCENT,
        };

        Ok(Self {
            project_id,
            require_project_id,
            bind_addr,
            catalog_path,
            passing_score_percent,
        })
    }

    /// Builds the wallet config, refusing the placeholder project id when
    /// `REQUIRE_WALLET_PROJECT_ID` is set.
    pub fn wallet_connector_config(
        &self,
        chains: Vec<NetworkDescriptor>,
    ) -> Result<WalletConnectorConfig, AppError> {
        if self.project_id.is_default() {
            if self.require_project_id {
                return Err(AppError::Config(
                    "WALLETCONNECT_PROJECT_ID is not set".to_string(),
                ));
            }
            tracing::warn!(
                "WALLETCONNECT_PROJECT_ID is not set, using placeholder {}",
                PLACEHOLDER_PROJECT_ID
            );
        }
        Ok(build_wallet_connector_config(self.project_id.value().clone(), chains))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
