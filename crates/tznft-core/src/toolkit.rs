//! Toolkit factory.

use std::sync::Arc;
use std::time::Duration;

use tznft_resolver::{AliasResolver, ConfigRead};
use tznft_transport::{Connector, ExecutionHandle, ToolkitSpec};
use tznft_types::{Result, TznftError};

/// Interval between confirmation polls for every operation issued through a handle.
pub const CONFIRMATION_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Build an execution handle signing as `identity` on the active network.
///
/// A missing provider URL is a configuration error and is not retried.
pub async fn create_execution_handle(
    config: &dyn ConfigRead,
    connector: &dyn Connector,
    identity: &str,
) -> Result<Arc<dyn ExecutionHandle>> {
    let signer = AliasResolver::new(config).resolve_signer(identity)?;
    let network = config.active_network()?;
    let provider_url = config
        .provider_url(&network)
        .ok_or_else(|| TznftError::NetworkNotConfigured {
            network: network.clone(),
        })?;

    tracing::debug!(%network, signer = %signer.label(), %provider_url, "creating execution handle");
    connector
        .connect(ToolkitSpec {
            signer,
            network,
            provider_url,
            confirmation_interval: CONFIRMATION_POLL_INTERVAL,
        })
        .await
}
