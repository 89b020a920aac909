//! Bootstrap and kill orchestration against fake handles and processes.

mod common;

use common::*;
use serde_json::json;
use tznft_core::bootstrap::{kill_sandbox, INSPECTOR_INITIAL_STORAGE, INSPECTOR_LABEL};
use tznft_core::Bootstrap;
use tznft_resolver::{keys, ConfigRead, ConfigWrite};
use tznft_types::{RetryConfig, TznftError};

#[tokio::test]
async fn test_bootstrap_sandbox_end_to_end() {
    let handle = FakeHandle::new();
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = sandbox_config();

    let inspector = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap();

    assert_eq!(inspector.as_str(), INSPECTOR);
    assert_eq!(process.starts(), 1);
    assert_eq!(handle.header_calls(), 1);
    assert_eq!(config.inspector("sandbox").as_deref(), Some(INSPECTOR));

    let originations = handle.originations.lock().clone();
    assert_eq!(originations.len(), 1);
    assert_eq!(originations[0].label, INSPECTOR_LABEL);
    assert_eq!(originations[0].storage, INSPECTOR_INITIAL_STORAGE);
    assert_eq!(originations[0].code.to_str(), Some("contracts/inspector.tz"));

    let specs = connector.specs.lock();
    assert_eq!(specs[0].signer.alias.as_deref(), Some("bob"));
    assert_eq!(specs[0].provider_url, "http://localhost:20000");
}

#[tokio::test]
async fn test_readiness_probe_succeeds_on_eighth_attempt() {
    let handle = FakeHandle::new();
    handle.fail_headers(7);
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = sandbox_config();

    let result = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await;

    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(handle.header_calls(), 8);
}

#[tokio::test]
async fn test_readiness_probe_gives_up_after_nine_failures() {
    let handle = FakeHandle::new();
    handle.fail_headers(9);
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = sandbox_config();

    let err = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap_err();

    assert!(
        matches!(&err, TznftError::NetworkUnreachable { attempts: 9, last_error } if last_error.contains("connection refused")),
        "{:?}",
        err
    );
    assert_eq!(handle.header_calls(), 9);
    assert!(handle.originations.lock().is_empty());
    assert!(config.inspector("sandbox").is_none());
}

#[tokio::test]
async fn test_retry_budget_is_configurable() {
    let handle = FakeHandle::new();
    handle.fail_headers(3);
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = sandbox_config();

    let err = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(RetryConfig::new(2, 0, 0))
        .run(&mut config)
        .await
        .unwrap_err();
    assert!(matches!(err, TznftError::NetworkUnreachable { attempts: 3, .. }));
}

#[tokio::test]
async fn test_sandbox_start_failure_stops_bootstrap() {
    let handle = FakeHandle::new();
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::failing_start();
    let mut config = sandbox_config();

    let err = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap_err();

    assert!(matches!(err, TznftError::SandboxStart { .. }));
    assert_eq!(connector.connections(), 0);
    assert_eq!(handle.header_calls(), 0);
}

#[tokio::test]
async fn test_remote_network_skips_process_start() {
    let handle = FakeHandle::new();
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::failing_start();
    let mut config = testnet_config();

    Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap();

    assert_eq!(process.starts(), 0);
    assert_eq!(config.inspector("testnet").as_deref(), Some(INSPECTOR));
    assert!(config.inspector("sandbox").is_none());
}

#[tokio::test]
async fn test_missing_provider_url_is_not_retried() {
    let handle = FakeHandle::new();
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = testnet_config();
    config.remove(&keys::provider_url("testnet")).unwrap();

    let err = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap_err();

    assert!(matches!(err, TznftError::NetworkNotConfigured { network } if network == "testnet"));
    assert_eq!(connector.connections(), 0);
    assert_eq!(handle.header_calls(), 0);
}

#[tokio::test]
async fn test_inspector_origination_failure_leaves_config_untouched() {
    let handle = FakeHandle::new();
    *handle.fail_confirm.lock() = true;
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = sandbox_config();

    let err = Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap_err();

    match err {
        TznftError::Origination { label, cause } => {
            assert_eq!(label, INSPECTOR_LABEL);
            assert!(matches!(*cause, TznftError::OperationFailed { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(config.inspector("sandbox").is_none());
}

#[tokio::test]
async fn test_bootstrap_replaces_previous_inspector() {
    let handle = FakeHandle::new();
    let connector = FakeConnector::new(handle.clone());
    let process = FakeProcessController::default();
    let mut config = sandbox_config();
    config.set(&keys::inspector("sandbox"), json!(NFT)).unwrap();

    Bootstrap::new(&connector, &process, contract_code("inspector"))
        .with_retry(instant_retry())
        .run(&mut config)
        .await
        .unwrap();
    assert_eq!(config.inspector("sandbox").as_deref(), Some(INSPECTOR));
}

#[tokio::test]
async fn test_kill_stops_sandbox() {
    let process = FakeProcessController::default();
    kill_sandbox(&process, &sandbox_config()).await.unwrap();
    assert_eq!(process.stops(), 1);
}

#[tokio::test]
async fn test_kill_is_noop_off_sandbox() {
    let process = FakeProcessController::failing_stop();
    kill_sandbox(&process, &testnet_config()).await.unwrap();
    assert_eq!(process.stops(), 0);
}

#[tokio::test]
async fn test_kill_failure_is_reported() {
    let handle = FakeHandle::new();
    let connector = FakeConnector::new(handle);
    let process = FakeProcessController::failing_stop();
    let bootstrap = Bootstrap::new(&connector, &process, contract_code("inspector"));

    let err = bootstrap.kill(&sandbox_config()).await.unwrap_err();
    assert!(matches!(err, TznftError::SandboxStop { .. }));
    assert_eq!(process.stops(), 1);
}
