//! Bootstrap and readiness orchestration.
//!
//! [`Bootstrap::run`] brings a network to the point where balance queries
//! work:
//!
//! 1. On the sandbox network, start the sandbox process.
//! 2. Connect as the bootstrap identity.
//! 3. Probe an early block header until the node answers, within the retry budget.
//! 4. Originate the inspector contract.
//! 5. Record the inspector address for the active network.
//!
//! Configuration writes happen only in step 5. Concurrent bootstraps against
//! the same configuration are not coordinated.

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use tznft_resolver::{keys, ConfigRead, ConfigWrite};
use tznft_transport::network::is_sandbox;
use tznft_transport::{Connector, ContractCode};
use tznft_types::{Address, Result, RetryConfig, TznftError};

use crate::originate::{originate, InitialStorage};
use crate::retry::with_retries;
use crate::toolkit::create_execution_handle;

/// Identity that signs the inspector origination.
pub const BOOTSTRAP_IDENTITY: &str = "bob";

/// Block requested by the readiness probe. The node answers once it has baked
/// past its genesis blocks.
pub const READINESS_PROBE_BLOCK: &str = "2";

pub const INSPECTOR_LABEL: &str = "inspector";
pub const INSPECTOR_INITIAL_STORAGE: &str = "(Left Unit)";

/// Starts and stops the external sandbox process.
#[async_trait]
pub trait ProcessController: Send + Sync {
    /// Run the start command to completion.
    async fn start(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;
}

/// Runs the sandbox start/stop commands through `sh -c`.
#[derive(Debug, Clone)]
pub struct ShellProcessController {
    start_command: String,
    stop_command: String,
}

impl ShellProcessController {
    pub fn new(start_command: &str, stop_command: &str) -> Self {
        Self {
            start_command: start_command.to_string(),
            stop_command: stop_command.to_string(),
        }
    }

    /// Commands from `sandbox.startCommand` / `sandbox.stopCommand`.
    pub fn from_config(config: &dyn ConfigRead) -> Result<Self> {
        let read = |key: &str| {
            config
                .get_str(key)
                .ok_or_else(|| TznftError::config(format!("missing '{}'", key)))
        };
        Ok(Self::new(&read(keys::SANDBOX_START)?, &read(keys::SANDBOX_STOP)?))
    }

    /// Run `command`, returning a failure description on non-zero exit.
    async fn run(command: &str) -> std::result::Result<(), String> {
        tracing::debug!(command, "running sandbox command");
        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .map_err(|e| format!("failed to spawn '{}': {}", command, e))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!("'{}' exited with {}: {}", command, output.status, stderr.trim()))
    }
}

#[async_trait]
impl ProcessController for ShellProcessController {
    async fn start(&self) -> Result<()> {
        Self::run(&self.start_command)
            .await
            .map_err(|reason| TznftError::SandboxStart { reason })
    }

    async fn stop(&self) -> Result<()> {
        Self::run(&self.stop_command)
            .await
            .map_err(|reason| TznftError::SandboxStop { reason })
    }
}

pub struct Bootstrap<'a> {
    connector: &'a dyn Connector,
    process: &'a dyn ProcessController,
    inspector_code: ContractCode,
    retry: RetryConfig,
}

impl<'a> Bootstrap<'a> {
    pub fn new(
        connector: &'a dyn Connector,
        process: &'a dyn ProcessController,
        inspector_code: ContractCode,
    ) -> Self {
        Self {
            connector,
            process,
            inspector_code,
            retry: RetryConfig::default(),
        }
    }

    /// Override the readiness probe's retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Bootstrap the active network and return the inspector address.
    pub async fn run<C: ConfigWrite>(&self, config: &mut C) -> Result<Address> {
        let network = config.active_network()?;

        if is_sandbox(&network) {
            tracing::info!("starting sandbox");
            self.process.start().await?;
        }

        let handle = create_execution_handle(&*config, self.connector, BOOTSTRAP_IDENTITY).await?;

        let header = with_retries(self.retry, |attempt| {
            let handle = handle.clone();
            async move {
                tracing::debug!(attempt, block = READINESS_PROBE_BLOCK, "probing network readiness");
                handle.block_header(READINESS_PROBE_BLOCK).await
            }
        })
        .await
        .map_err(|exhausted| {
            tracing::warn!(attempts = exhausted.attempts, error = %exhausted.last_error, "network did not become ready");
            TznftError::NetworkUnreachable {
                attempts: exhausted.attempts,
                last_error: exhausted.last_error.to_string(),
            }
        })?;
        tracing::info!(%network, level = header.level, "network is ready");

        let inspector = originate(
            &*handle,
            &self.inspector_code,
            &InitialStorage::Literal(INSPECTOR_INITIAL_STORAGE.to_string()),
            INSPECTOR_LABEL,
        )
        .await?;

        config.set(&keys::inspector(&network), Value::String(inspector.to_string()))?;
        tracing::info!(%network, %inspector, "bootstrap complete");
        Ok(inspector)
    }

    /// Stop the sandbox process. Does nothing on other networks.
    pub async fn kill(&self, config: &dyn ConfigRead) -> Result<()> {
        kill_sandbox(self.process, config).await
    }
}

/// Stop the sandbox when it is the active network.
pub async fn kill_sandbox(process: &dyn ProcessController, config: &dyn ConfigRead) -> Result<()> {
    let network = config.active_network()?;
    if !is_sandbox(&network) {
        tracing::debug!(%network, "not a sandbox network; nothing to stop");
        return Ok(());
    }
    match process.stop().await {
        Ok(()) => {
            tracing::info!("sandbox stopped");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to stop sandbox");
            Err(match e {
                TznftError::SandboxStop { .. } => e,
                other => TznftError::SandboxStop {
                    reason: other.to_string(),
                },
            })
        }
    }
}
