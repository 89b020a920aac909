//! Node JSON RPC client.
//!
//! Read-only calls used by the toolkit: block headers (readiness probe and
//! confirmation polling), manager operation receipts, and contract storage.
//! Responses are decoded against typed structs at this boundary; a response
//! that does not match is a [`TznftError::SchemaMismatch`].
//!
//! ## Endpoints
//! - `GET  /chains/main/blocks/<block>/header`
//! - `GET  /chains/main/blocks/<level>/operations/3`
//! - `POST /chains/main/blocks/head/context/contracts/<kt1>/storage/normalized`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

use tznft_types::{Address, Micheline, Result, TznftError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Validation pass holding manager operations (transactions, originations).
const MANAGER_PASS: u8 = 3;

/// Block header as returned by the node. Unused fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub hash: String,
    pub level: i64,
    #[serde(default)]
    pub predecessor: String,
    #[serde(default)]
    pub timestamp: String,
}

/// One operation group in a block's manager pass.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcOperation {
    pub hash: String,
    #[serde(default)]
    pub contents: Vec<RpcContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcContent {
    pub kind: String,
    #[serde(default)]
    pub metadata: Option<RpcContentMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcContentMetadata {
    #[serde(default)]
    pub operation_result: Option<RpcOperationResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcOperationResult {
    pub status: String,
    #[serde(default)]
    pub originated_contracts: Vec<String>,
    #[serde(default)]
    pub errors: Vec<Value>,
}

impl RpcOperation {
    /// First non-`applied` status among the group's contents, if any.
    pub fn failure_status(&self) -> Option<String> {
        self.contents
            .iter()
            .filter_map(|c| c.metadata.as_ref()?.operation_result.as_ref())
            .find(|r| r.status != "applied")
            .map(|r| {
                if r.errors.is_empty() {
                    r.status.clone()
                } else {
                    format!("{} ({} errors)", r.status, r.errors.len())
                }
            })
    }

    pub fn originated_contracts(&self) -> Vec<String> {
        self.contents
            .iter()
            .filter_map(|c| c.metadata.as_ref()?.operation_result.as_ref())
            .flat_map(|r| r.originated_contracts.iter().cloned())
            .collect()
    }
}

/// JSON RPC client for one node endpoint.
#[derive(Clone)]
pub struct RpcClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl RpcClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn get_value(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self.agent.get(&url).call().map_err(|e| rpc_error(path, e))?;
        response
            .into_json()
            .map_err(|e| TznftError::rpc(path, format!("invalid JSON: {}", e)))
    }

    fn post_value(&self, path: &str, body: Value) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        let response = self
            .agent
            .post(&url)
            .send_json(body)
            .map_err(|e| rpc_error(path, e))?;
        response
            .into_json()
            .map_err(|e| TznftError::rpc(path, format!("invalid JSON: {}", e)))
    }

    pub async fn block_header(&self, block: &str) -> Result<BlockHeader> {
        let path = format!("/chains/main/blocks/{}/header", block);
        let client = self.clone();
        let value = blocking(move || client.get_value(&path)).await?;
        decode(value, "block header")
    }

    pub async fn head_level(&self) -> Result<i64> {
        Ok(self.block_header("head").await?.level)
    }

    pub async fn manager_operations(&self, level: i64) -> Result<Vec<RpcOperation>> {
        let path = format!("/chains/main/blocks/{}/operations/{}", level, MANAGER_PASS);
        let client = self.clone();
        let value = blocking(move || client.get_value(&path)).await?;
        decode(value, "manager operation list")
    }

    /// Contract storage with addresses and keys in readable form.
    pub async fn contract_storage(&self, contract: &Address) -> Result<Micheline> {
        let path = format!(
            "/chains/main/blocks/head/context/contracts/{}/storage/normalized",
            contract
        );
        let client = self.clone();
        let value = blocking(move || {
            client.post_value(&path, json!({ "unparsing_mode": "Readable" }))
        })
        .await?;
        decode(value, "micheline storage")
    }
}

fn rpc_error(path: &str, err: ureq::Error) -> TznftError {
    match err {
        ureq::Error::Status(code, response) => {
            let body = response.into_string().unwrap_or_default();
            TznftError::rpc(path, format!("HTTP {}: {}", code, body.trim()))
        }
        ureq::Error::Transport(t) => TznftError::rpc(path, t),
    }
}

/// Decode a response against the expected schema.
pub fn decode<T: DeserializeOwned>(value: Value, expected: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| TznftError::schema(expected, e.to_string()))
}

/// Run blocking HTTP off the async executor.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| TznftError::rpc("spawn_blocking", e))?
}
