use serde::{Deserialize, Serialize};

use super::NetworkDescriptor;

pub const APP_NAME: &str = "LearnHub Academy";

/// Configuration handed to the wallet-connection UI at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletConnectorConfig {
    pub app_name: String,
    pub project_id: String,
    pub chains: Vec<NetworkDescriptor>,
    /// Always false: the frontend renders client side only.
    pub ssr: bool,
}

pub fn build_wallet_connector_config(
    project_id: impl Into<String>,
    chains: Vec<NetworkDescriptor>,
) -> WalletConnectorConfig {
    WalletConnectorConfig {
        app_name: APP_NAME.to_string(),
        project_id: project_id.into(),
        chains,
        ssr: false,
    }
}
