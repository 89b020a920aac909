#![allow(dead_code)]
//! Shared fakes for orchestrator tests.
//!
//! - [`FakeHandle`]: scripted execution handle that records every call
//! - [`FakeConnector`]: hands out one shared [`FakeHandle`]
//! - [`FakeProcessController`]: counts sandbox start/stop calls

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::json;
use tznft_core::ProcessController;
use tznft_resolver::{keys, ConfigWrite, JsonConfig};
use tznft_transport::handle::BlockHeader;
use tznft_transport::{Connector, ContractCode, ExecutionHandle, OperationReceipt, ToolkitSpec};
use tznft_types::{Address, Micheline, Result, RetryConfig, TznftError};

pub const BOB: &str = "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6";
pub const ALICE: &str = "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb";
pub const INSPECTOR: &str = "KT1RJ6PbjHpwc3M5rw5s2Nbmefwbuwbdxton";
pub const NFT: &str = "KT1BEqzn5Wx8uJrZNvuS9DVHmLvG9td3fDLi";

pub fn addr(s: &str) -> Address {
    Address::parse(s).unwrap()
}

/// Retry policy with the default budget and no waiting.
pub fn instant_retry() -> RetryConfig {
    RetryConfig::new(8, 0, 0)
}

pub fn sandbox_config() -> JsonConfig {
    JsonConfig::in_memory(JsonConfig::default_document())
}

/// Default document switched to `testnet`, with bob available there too.
pub fn testnet_config() -> JsonConfig {
    let mut config = sandbox_config();
    config.set(keys::ACTIVE_NETWORK, json!("testnet")).unwrap();
    config
        .set(
            &keys::alias("testnet", "bob"),
            json!({
                "address": BOB,
                "secret": "edsk3RFfvaFaxbHx8BMtEW1rKQcPtDML3LXjNqMNLCzC3wLC1bWbAt"
            }),
        )
        .unwrap();
    config
}

pub fn contract_code(name: &str) -> ContractCode {
    ContractCode {
        path: PathBuf::from(format!("contracts/{}.tz", name)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedOrigination {
    pub label: String,
    pub code: PathBuf,
    pub storage: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub contract: Address,
    pub entrypoint: String,
    pub arg: String,
}

pub struct FakeHandle {
    pub address: Address,
    /// Remaining block header calls that fail before one succeeds.
    pub header_failures: Mutex<usize>,
    pub header_calls: AtomicUsize,
    /// Contracts reported by the confirmation of an origination.
    pub originated_contracts: Mutex<Vec<String>>,
    pub fail_originate: Mutex<bool>,
    /// Every `originate` call, including rejected ones.
    pub originate_attempts: AtomicUsize,
    pub fail_confirm: Mutex<bool>,
    pub originations: Mutex<Vec<RecordedOrigination>>,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub confirmed: Mutex<Vec<String>>,
    pub storage: Mutex<HashMap<Address, Micheline>>,
}

impl FakeHandle {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            address: addr(BOB),
            header_failures: Mutex::new(0),
            header_calls: AtomicUsize::new(0),
            originated_contracts: Mutex::new(vec![INSPECTOR.to_string()]),
            fail_originate: Mutex::new(false),
            originate_attempts: AtomicUsize::new(0),
            fail_confirm: Mutex::new(false),
            originations: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            confirmed: Mutex::new(Vec::new()),
            storage: Mutex::new(HashMap::new()),
        })
    }

    pub fn fail_headers(&self, n: usize) {
        *self.header_failures.lock() = n;
    }

    pub fn header_calls(&self) -> usize {
        self.header_calls.load(Ordering::SeqCst)
    }

    pub fn originate_attempts(&self) -> usize {
        self.originate_attempts.load(Ordering::SeqCst)
    }

    pub fn set_storage(&self, contract: &str, value: Micheline) {
        self.storage.lock().insert(addr(contract), value);
    }
}

#[async_trait]
impl ExecutionHandle for FakeHandle {
    fn signer_address(&self) -> &Address {
        &self.address
    }

    async fn block_header(&self, block: &str) -> Result<BlockHeader> {
        self.header_calls.fetch_add(1, Ordering::SeqCst);
        let mut failures = self.header_failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(TznftError::rpc(
                format!("/chains/main/blocks/{}/header", block),
                "connection refused",
            ));
        }
        Ok(BlockHeader {
            hash: "BLfake".to_string(),
            level: 2,
            predecessor: "BLgenesis".to_string(),
            timestamp: "2023-09-01T00:00:00Z".to_string(),
        })
    }

    async fn originate(&self, label: &str, code: &ContractCode, storage: &str) -> Result<String> {
        self.originate_attempts.fetch_add(1, Ordering::SeqCst);
        if *self.fail_originate.lock() {
            return Err(TznftError::engine("originate", "counter in the past"));
        }
        let mut originations = self.originations.lock();
        originations.push(RecordedOrigination {
            label: label.to_string(),
            code: code.path.clone(),
            storage: storage.to_string(),
        });
        Ok(format!("ooOrigination{}", originations.len()))
    }

    async fn call(&self, contract: &Address, entrypoint: &str, arg: &Micheline) -> Result<String> {
        let mut calls = self.calls.lock();
        calls.push(RecordedCall {
            contract: contract.clone(),
            entrypoint: entrypoint.to_string(),
            arg: arg.to_string(),
        });
        Ok(format!("ooCall{}", calls.len()))
    }

    async fn confirm(&self, operation_hash: &str) -> Result<OperationReceipt> {
        if *self.fail_confirm.lock() {
            return Err(TznftError::OperationFailed {
                hash: operation_hash.to_string(),
                status: "backtracked".to_string(),
            });
        }
        self.confirmed.lock().push(operation_hash.to_string());
        let originated_contracts = if operation_hash.starts_with("ooOrigination") {
            self.originated_contracts.lock().clone()
        } else {
            Vec::new()
        };
        Ok(OperationReceipt {
            hash: operation_hash.to_string(),
            level: 3,
            originated_contracts,
        })
    }

    async fn storage(&self, contract: &Address) -> Result<Micheline> {
        self.storage.lock().get(contract).cloned().ok_or_else(|| {
            TznftError::rpc(
                format!("/chains/main/blocks/head/context/contracts/{}/storage/normalized", contract),
                "HTTP 404",
            )
        })
    }
}

pub struct FakeConnector {
    pub handle: Arc<FakeHandle>,
    pub specs: Mutex<Vec<ToolkitSpec>>,
}

impl FakeConnector {
    pub fn new(handle: Arc<FakeHandle>) -> Self {
        Self {
            handle,
            specs: Mutex::new(Vec::new()),
        }
    }

    pub fn connections(&self) -> usize {
        self.specs.lock().len()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn connect(&self, spec: ToolkitSpec) -> Result<Arc<dyn ExecutionHandle>> {
        self.specs.lock().push(spec);
        let handle: Arc<dyn ExecutionHandle> = self.handle.clone();
        Ok(handle)
    }
}

#[derive(Default)]
pub struct FakeProcessController {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub fail_start: bool,
    pub fail_stop: bool,
}

impl FakeProcessController {
    pub fn failing_start() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    pub fn failing_stop() -> Self {
        Self {
            fail_stop: true,
            ..Self::default()
        }
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessController for FakeProcessController {
    async fn start(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        if self.fail_start {
            return Err(TznftError::SandboxStart {
                reason: "'docker run' exited with exit status: 125".to_string(),
            });
        }
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        if self.fail_stop {
            return Err(TznftError::SandboxStop {
                reason: "No such container: tznft-sandbox".to_string(),
            });
        }
        Ok(())
    }
}
