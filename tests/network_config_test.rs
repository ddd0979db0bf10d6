use learnhub::config::{PLACEHOLDER_PROJECT_ID, resolve_project_id};
use learnhub::network::{
    APP_NAME, EDU_TESTNET_CHAIN_ID, EDU_TESTNET_RPC_URL, build_network_descriptor,
    build_wallet_connector_config,
};

#[test]
fn test_chain_survives_wallet_config_unchanged() {
    let descriptor = build_network_descriptor();
    let config = build_wallet_connector_config("project-123", vec![descriptor.clone()]);

    assert_eq!(config.chains.len(), 1);
    let chain = &config.chains[0];
    assert_eq!(chain, &descriptor);
    assert_eq!(chain.id, EDU_TESTNET_CHAIN_ID);
    assert_eq!(chain.rpc_urls.default.http, vec![EDU_TESTNET_RPC_URL.to_string()]);
    assert_eq!(chain.rpc_urls.public.http, vec![EDU_TESTNET_RPC_URL.to_string()]);
    assert!(chain.testnet);
}

#[test]
fn test_descriptor_is_constant() {
    assert_eq!(build_network_descriptor(), build_network_descriptor());
}

#[test]
fn test_missing_project_id_uses_placeholder() {
    let resolved = resolve_project_id(None);
    assert!(resolved.is_default());

    let config = build_wallet_connector_config(resolved.into_value(), vec![build_network_descriptor()]);
    assert_eq!(config.project_id, PLACEHOLDER_PROJECT_ID);
}

#[test]
fn test_supplied_project_id_is_kept_verbatim() {
    let resolved = resolve_project_id(Some("a1b2c3d4e5".to_string()));
    assert!(!resolved.is_default());

    let config = build_wallet_connector_config(resolved.into_value(), vec![]);
    assert_eq!(config.project_id, "a1b2c3d4e5");
    assert_eq!(config.app_name, APP_NAME);
    assert!(!config.ssr);
}

#[test]
fn test_padded_project_id_is_not_trimmed() {
    let resolved = resolve_project_id(Some(" abc ".to_string()));
    assert!(!resolved.is_default());
    assert_eq!(resolved.value(), " abc ");

    assert!(resolve_project_id(Some(" \t ".to_string())).is_default());
}

#[test]
fn test_wallet_config_json_shape() {
    let config = build_wallet_connector_config("p", vec![build_network_descriptor()]);
    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(value["appName"], APP_NAME);
    assert_eq!(value["projectId"], "p");
    assert_eq!(value["ssr"], false);
    assert_eq!(value["chains"][0]["id"], EDU_TESTNET_CHAIN_ID);
}
