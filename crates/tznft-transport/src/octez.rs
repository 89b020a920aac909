//! `octez-client` execution engine driver.
//!
//! Signing and injection are delegated to the external `octez-client` binary.
//! Every call runs with an isolated `--base-dir`, the network's `--endpoint`,
//! and `--wait none` so the client returns as soon as the operation is
//! injected. Confirmation is tracked separately over RPC.

use std::path::{Path, PathBuf};
use tokio::process::Command;

use tznft_types::{Address, Micheline, Result, SecretKey, TznftError};

const ORIGINATION_BURN_CAP: &str = "10";
const CALL_BURN_CAP: &str = "1";

#[derive(Debug, Clone)]
pub struct OctezClient {
    binary: String,
    base_dir: PathBuf,
    endpoint: String,
}

impl OctezClient {
    pub fn new(binary: &str, base_dir: &Path, endpoint: &str) -> Self {
        Self {
            binary: binary.to_string(),
            base_dir: base_dir.to_path_buf(),
            endpoint: endpoint.to_string(),
        }
    }

    fn global_args(&self) -> Vec<String> {
        vec![
            "--base-dir".to_string(),
            self.base_dir.display().to_string(),
            "--endpoint".to_string(),
            self.endpoint.clone(),
            "--wait".to_string(),
            "none".to_string(),
        ]
    }

    async fn run(&self, context: &str, args: Vec<String>) -> Result<String> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        let mut full = self.global_args();
        full.extend(args);
        tracing::debug!(binary = %self.binary, context, "running execution engine");

        let output = Command::new(&self.binary)
            .args(&full)
            .output()
            .await
            .map_err(|e| {
                TznftError::engine(context, format!("failed to run '{}': {}", self.binary, e))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TznftError::engine(
                context,
                format!("{}\n{}", stdout.trim(), stderr.trim()).trim().to_string(),
            ));
        }
        Ok(stdout)
    }

    /// Store `secret` under `alias` in this client's key store, replacing any
    /// previous key with the same alias.
    pub async fn import_secret_key(&self, alias: &str, secret: &SecretKey) -> Result<()> {
        self.run(
            "import secret key",
            vec![
                "import".to_string(),
                "secret".to_string(),
                "key".to_string(),
                alias.to_string(),
                format!("unencrypted:{}", secret.expose()),
                "--force".to_string(),
            ],
        )
        .await?;
        Ok(())
    }

    /// Public key hash of a stored key.
    pub async fn show_address(&self, alias: &str) -> Result<Address> {
        let out = self
            .run(
                "show address",
                vec!["show".to_string(), "address".to_string(), alias.to_string()],
            )
            .await?;
        parse_show_address(&out)
            .ok_or_else(|| TznftError::engine("show address", format!("no 'Hash:' line in: {}", out)))
    }

    /// Inject an origination and return its operation hash.
    pub async fn originate(
        &self,
        label: &str,
        from_alias: &str,
        code: &Path,
        init: &str,
    ) -> Result<String> {
        let out = self
            .run(
                "originate",
                vec![
                    "originate".to_string(),
                    "contract".to_string(),
                    label.to_string(),
                    "transferring".to_string(),
                    "0".to_string(),
                    "from".to_string(),
                    from_alias.to_string(),
                    "running".to_string(),
                    code.display().to_string(),
                    "--init".to_string(),
                    init.to_string(),
                    "--burn-cap".to_string(),
                    ORIGINATION_BURN_CAP.to_string(),
                    "--force".to_string(),
                ],
            )
            .await?;
        parse_operation_hash(&out).ok_or_else(|| missing_hash("originate", &out))
    }

    /// Inject a zero-amount contract call and return its operation hash.
    pub async fn call(
        &self,
        from_alias: &str,
        contract: &Address,
        entrypoint: &str,
        arg: &Micheline,
    ) -> Result<String> {
        let out = self
            .run(
                "transfer",
                vec![
                    "transfer".to_string(),
                    "0".to_string(),
                    "from".to_string(),
                    from_alias.to_string(),
                    "to".to_string(),
                    contract.to_string(),
                    "--entrypoint".to_string(),
                    entrypoint.to_string(),
                    "--arg".to_string(),
                    arg.to_string(),
                    "--burn-cap".to_string(),
                    CALL_BURN_CAP.to_string(),
                ],
            )
            .await?;
        parse_operation_hash(&out).ok_or_else(|| missing_hash("transfer", &out))
    }
}

fn missing_hash(context: &str, out: &str) -> TznftError {
    TznftError::engine(context, format!("no operation hash in output: {}", out.trim()))
}

/// Extract `oo...` from `Operation hash is 'oo...'`.
pub fn parse_operation_hash(output: &str) -> Option<String> {
    const MARKER: &str = "Operation hash is '";
    let start = output.find(MARKER)? + MARKER.len();
    let rest = &output[start..];
    let end = rest.find('\'')?;
    let hash = &rest[..end];
    (!hash.is_empty()).then(|| hash.to_string())
}

/// Extract the address from `show address` output (`Hash: tz1...`).
pub fn parse_show_address(output: &str) -> Option<Address> {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix("Hash:"))
        .and_then(|rest| Address::parse(rest).ok())
}
