//! CLI subcommand implementations for tznft

pub mod bootstrap;
pub mod config_cmd;
pub mod mint;
pub mod operators;
pub mod output;
pub mod show;
pub mod transfer;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tznft_core::{create_execution_handle, ContractCode, ExecutionHandle};
use tznft_resolver::{AliasResolver, ConfigRead, JsonConfig};
use tznft_transport::network::{octez_client_binary, tznft_home};
use tznft_transport::OctezConnector;
use tznft_types::Address;

/// Global options shared by every command.
pub struct CliContext {
    pub config_path: PathBuf,
    pub json: bool,
}

impl CliContext {
    pub fn new(config_path: PathBuf, json: bool) -> Self {
        Self { config_path, json }
    }

    /// Load the configuration file, or the default document if it does not exist.
    pub fn load_config(&self) -> Result<JsonConfig> {
        JsonConfig::load_or_default(&self.config_path)
            .with_context(|| format!("loading {}", self.config_path.display()))
    }

    pub fn connector(&self) -> OctezConnector {
        OctezConnector::new(&tznft_home(), &octez_client_binary())
    }

    /// Execution handle signing as `identity` on the active network.
    pub async fn handle(
        &self,
        config: &dyn ConfigRead,
        identity: &str,
    ) -> Result<Arc<dyn ExecutionHandle>> {
        let connector = self.connector();
        create_execution_handle(config, &connector, identity)
            .await
            .with_context(|| format!("connecting as '{}'", identity))
    }

    /// Load the contract artifact configured under `key`.
    ///
    /// Relative paths are resolved against the configuration file's directory.
    pub fn contract_code(&self, config: &dyn ConfigRead, key: &str) -> Result<ContractCode> {
        let raw = config
            .get_str(key)
            .with_context(|| format!("'{}' is not set in {}", key, self.config_path.display()))?;
        let path = resolve_relative(&self.config_path, Path::new(&raw));
        Ok(ContractCode::load(&path)?)
    }
}

fn resolve_relative(config_path: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(path),
        _ => path.to_path_buf(),
    }
}

/// Resolve an address token (alias or literal) with error context.
pub fn resolve_address(resolver: &AliasResolver<'_>, token: &str, what: &str) -> Result<Address> {
    resolver
        .resolve_address(token)
        .with_context(|| format!("resolving {} '{}'", what, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative(Path::new("tznft.json"), Path::new("contracts/a.tz")),
            PathBuf::from("contracts/a.tz")
        );
        assert_eq!(
            resolve_relative(Path::new("/work/tznft.json"), Path::new("contracts/a.tz")),
            PathBuf::from("/work/contracts/a.tz")
        );
        assert_eq!(
            resolve_relative(Path::new("/work/tznft.json"), Path::new("/abs/a.tz")),
            PathBuf::from("/abs/a.tz")
        );
    }
}
