pub mod wallet;

pub use wallet::{APP_NAME, WalletConnectorConfig, build_wallet_connector_config};

use serde::{Deserialize, Serialize};

pub const EDU_TESTNET_CHAIN_ID: u64 = 656476;
pub const EDU_TESTNET_RPC_URL: &str = "https://rpc.open-campus-codex.gelato.digital";
pub const EDU_TESTNET_EXPLORER_URL: &str = "https://edu-chain-testnet.blockscout.com";

/// Connection parameters of one EVM network, in the camelCase shape that
/// wallet libraries expect for a custom chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDescriptor {
    pub id: u64,
    pub name: String,
    pub network: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: RpcUrls,
    pub block_explorers: BlockExplorers,
    pub testnet: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub decimals: u8,
    pub name: String,
    pub symbol: String,
}

/// RPC endpoint lists keyed by usage role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcUrls {
    pub default: RpcEndpoints,
    pub public: RpcEndpoints,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEndpoints {
    pub http: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorers {
    pub default: BlockExplorer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockExplorer {
    pub name: String,
    pub url: String,
}

/// EDU Chain testnet (Open Campus Codex).
pub fn build_network_descriptor() -> NetworkDescriptor {
    let rpc = RpcEndpoints {
        http: vec![EDU_TESTNET_RPC_URL.to_string()],
    };

    NetworkDescriptor {
        id: EDU_TESTNET_CHAIN_ID,
        name: "EDU Chain Testnet".to_string(),
        network: "open-campus-codex".to_string(),
        native_currency: NativeCurrency {
            decimals: 18,
            name: "EDU".to_string(),
            symbol: "EDU".to_string(),
        },
        rpc_urls: RpcUrls {
            default: rpc.clone(),
            public: rpc,
        },
        block_explorers: BlockExplorers {
            default: BlockExplorer {
                name: "Blockscout".to_string(),
                url: EDU_TESTNET_EXPLORER_URL.to_string(),
            },
        },
        testnet: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_serializes_in_wallet_library_shape() {
        let value = serde_json::to_value(build_network_descriptor()).unwrap();

        assert_eq!(value["id"], 656476);
        assert_eq!(value["nativeCurrency"]["symbol"], "EDU");
        assert_eq!(value["rpcUrls"]["public"]["http"][0], EDU_TESTNET_RPC_URL);
        assert_eq!(value["blockExplorers"]["default"]["url"], EDU_TESTNET_EXPLORER_URL);
        assert_eq!(value["testnet"], true);
    }
}
