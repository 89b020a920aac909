//! Network-bound execution handles.
//!
//! An [`ExecutionHandle`] is a signer bound to one RPC endpoint with a fixed
//! confirmation-polling interval. The core only ever talks to the network
//! through this trait, which keeps the orchestrators testable with fakes.
//!
//! [`OctezConnector`] builds the production handle: RPC reads go straight to
//! the node, injections go through `octez-client`, and confirmation scans new
//! blocks for the operation hash every `confirmation_interval`.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tznft_types::{Address, Micheline, Result, Signer, TznftError};

use crate::network::octez_base_dir;
use crate::octez::OctezClient;
use crate::rpc::RpcClient;

pub use crate::rpc::BlockHeader;

/// How far back confirmation scans for operations it did not inject itself.
const UNTRACKED_LOOKBACK_LEVELS: i64 = 20;

/// A pre-compiled contract program, treated as an opaque artifact.
///
/// The engine reads the program from `path` itself; loading only checks that
/// the artifact is present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCode {
    pub path: PathBuf,
}

impl ContractCode {
    /// Check a compiled contract on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            TznftError::config(format!(
                "failed to read contract code {}: {}",
                path.display(),
                e
            ))
        })?;
        if source.trim().is_empty() {
            return Err(TznftError::config(format!(
                "contract code {} is empty",
                path.display()
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

/// Outcome of a confirmed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReceipt {
    pub hash: String,
    pub level: i64,
    pub originated_contracts: Vec<String>,
}

/// Everything needed to bind a handle.
#[derive(Debug, Clone)]
pub struct ToolkitSpec {
    pub signer: Signer,
    pub network: String,
    pub provider_url: String,
    pub confirmation_interval: Duration,
}

#[async_trait]
pub trait ExecutionHandle: Send + Sync {
    /// Address operations are signed by.
    fn signer_address(&self) -> &Address;

    async fn block_header(&self, block: &str) -> Result<BlockHeader>;

    /// Inject an origination; returns the operation hash.
    async fn originate(&self, label: &str, code: &ContractCode, storage: &str) -> Result<String>;

    /// Inject a contract call; returns the operation hash.
    async fn call(&self, contract: &Address, entrypoint: &str, arg: &Micheline) -> Result<String>;

    /// Block until `operation_hash` is included. Fails if it was not applied.
    async fn confirm(&self, operation_hash: &str) -> Result<OperationReceipt>;

    async fn storage(&self, contract: &Address) -> Result<Micheline>;
}

/// Builds execution handles from a resolved signer and endpoint.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, spec: ToolkitSpec) -> Result<Arc<dyn ExecutionHandle>>;
}

/// Connector for the `octez-client` engine.
#[derive(Debug, Clone)]
pub struct OctezConnector {
    home: PathBuf,
    binary: String,
}

impl OctezConnector {
    pub fn new(home: &Path, binary: &str) -> Self {
        Self {
            home: home.to_path_buf(),
            binary: binary.to_string(),
        }
    }
}

fn engine_alias(signer: &Signer) -> String {
    let label: String = signer
        .label()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("tznft_{}", label)
}

#[async_trait]
impl Connector for OctezConnector {
    async fn connect(&self, spec: ToolkitSpec) -> Result<Arc<dyn ExecutionHandle>> {
        let client = OctezClient::new(
            &self.binary,
            &octez_base_dir(&self.home, &spec.network),
            &spec.provider_url,
        );
        let key_alias = engine_alias(&spec.signer);
        client
            .import_secret_key(&key_alias, &spec.signer.secret)
            .await?;
        let address = match spec.signer.address {
            Some(address) => address,
            None => client.show_address(&key_alias).await?,
        };
        tracing::debug!(
            network = %spec.network,
            signer = %address,
            endpoint = %spec.provider_url,
            "connected execution handle"
        );

        Ok(Arc::new(OctezHandle {
            rpc: RpcClient::new(&spec.provider_url),
            client,
            key_alias,
            address,
            confirmation_interval: spec.confirmation_interval,
            injected_after: Mutex::new(HashMap::new()),
        }))
    }
}

/// Production handle: node RPC for reads, `octez-client` for injection.
pub struct OctezHandle {
    rpc: RpcClient,
    client: OctezClient,
    key_alias: String,
    address: Address,
    confirmation_interval: Duration,
    /// Operation hash -> head level observed just before injection.
    injected_after: Mutex<HashMap<String, i64>>,
}

impl OctezHandle {
    fn track(&self, hash: &str, level: i64) {
        self.injected_after.lock().insert(hash.to_string(), level);
    }
}

#[async_trait]
impl ExecutionHandle for OctezHandle {
    fn signer_address(&self) -> &Address {
        &self.address
    }

    async fn block_header(&self, block: &str) -> Result<BlockHeader> {
        self.rpc.block_header(block).await
    }

    async fn originate(&self, label: &str, code: &ContractCode, storage: &str) -> Result<String> {
        let level = self.rpc.head_level().await?;
        let hash = self
            .client
            .originate(label, &self.key_alias, &code.path, storage)
            .await?;
        self.track(&hash, level);
        tracing::info!(label, operation = %hash, "origination injected");
        Ok(hash)
    }

    async fn call(&self, contract: &Address, entrypoint: &str, arg: &Micheline) -> Result<String> {
        let level = self.rpc.head_level().await?;
        let hash = self
            .client
            .call(&self.key_alias, contract, entrypoint, arg)
            .await?;
        self.track(&hash, level);
        tracing::info!(%contract, entrypoint, operation = %hash, "contract call injected");
        Ok(hash)
    }

    async fn confirm(&self, operation_hash: &str) -> Result<OperationReceipt> {
        let tracked = self.injected_after.lock().remove(operation_hash);
        let mut next = match tracked {
            Some(level) => level + 1,
            None => (self.rpc.head_level().await? - UNTRACKED_LOOKBACK_LEVELS).max(1),
        };

        loop {
            let head = self.rpc.head_level().await?;
            while next <= head {
                let ops = self.rpc.manager_operations(next).await?;
                if let Some(op) = ops.iter().find(|op| op.hash == operation_hash) {
                    if let Some(status) = op.failure_status() {
                        return Err(TznftError::OperationFailed {
                            hash: operation_hash.to_string(),
                            status,
                        });
                    }
                    tracing::info!(operation = %operation_hash, level = next, "operation confirmed");
                    return Ok(OperationReceipt {
                        hash: operation_hash.to_string(),
                        level: next,
                        originated_contracts: op.originated_contracts(),
                    });
                }
                next += 1;
            }
            tracing::debug!(
                operation = %operation_hash,
                head,
                "operation not included yet; polling again in {:?}",
                self.confirmation_interval
            );
            tokio::time::sleep(self.confirmation_interval).await;
        }
    }

    async fn storage(&self, contract: &Address) -> Result<Micheline> {
        self.rpc.contract_storage(contract).await
    }
}
