use std::sync::Arc;

use crate::network::{NetworkDescriptor, WalletConnectorConfig};
use crate::store::CourseStore;

/// Built once at startup and shared read-only with every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CourseStore>,
    pub network: Arc<NetworkDescriptor>,
    pub wallet: Arc<WalletConnectorConfig>,
    pub passing_score_percent: u32,
}
