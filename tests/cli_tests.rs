//! End-to-end tests of the tznft binary that need no running node.
//!
//! Every command runs in a fresh temp directory with a missing `octez-client`,
//! so anything that would reach the network fails deterministically.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CAROL: &str = "tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx";
const NFT: &str = "KT1BEqzn5Wx8uJrZNvuS9DVHmLvG9td3fDLi";

fn tznft(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tznft").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("TZNFT_CONFIG")
        .env("TZNFT_HOME", dir.path().join("home"))
        .env("TZNFT_OCTEZ_CLIENT", "tznft-no-such-octez-client");
    cmd
}

fn initialized() -> TempDir {
    let dir = TempDir::new().unwrap();
    tznft(&dir).arg("config-init").assert().success();
    dir
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--json").output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_config_init_writes_default_document() {
    let dir = TempDir::new().unwrap();
    tznft(&dir)
        .arg("config-init")
        .assert()
        .success()
        .stdout(predicate::str::contains("tznft.json"));

    let content = std::fs::read_to_string(dir.path().join("tznft.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["activeNetwork"], "sandbox");
    assert_eq!(
        doc["availableNetworks"]["sandbox"]["aliases"]["bob"]["address"],
        "tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6"
    );

    tznft(&dir)
        .arg("config-init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
    tznft(&dir).args(["config-init", "--force"]).assert().success();
}

#[test]
fn test_config_path_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("custom.json");
    tznft(&dir)
        .arg("config-init")
        .arg("--config")
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());
    assert!(!dir.path().join("tznft.json").exists());

    tznft(&dir)
        .env("TZNFT_CONFIG", &path)
        .args(["set-network", "testnet"])
        .assert()
        .success();
    let doc: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(doc["activeNetwork"], "testnet");
}

#[test]
fn test_show_and_set_network() {
    let dir = initialized();

    let networks = json_stdout(tznft(&dir).arg("show-network"));
    assert_eq!(networks.as_array().unwrap().len(), 1);
    assert_eq!(networks[0]["name"], "sandbox");
    assert_eq!(networks[0]["providerUrl"], "http://localhost:20000");

    tznft(&dir).args(["set-network", "testnet"]).assert().success();
    let networks = json_stdout(tznft(&dir).args(["show-network", "--all"]));
    let active: Vec<_> = networks
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "testnet");

    tznft(&dir)
        .args(["set-network", "mainnet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown network 'mainnet'"));
}

#[test]
fn test_alias_lifecycle() {
    let dir = initialized();

    tznft(&dir).args(["add-alias", "carol", CAROL]).assert().success();
    let aliases = json_stdout(tznft(&dir).args(["show-alias", "carol"]));
    assert_eq!(aliases[0]["address"], CAROL);
    assert_eq!(aliases[0]["canSign"], false);

    let all = json_stdout(tznft(&dir).arg("show-alias"));
    assert_eq!(all.as_array().unwrap().len(), 3);

    tznft(&dir)
        .args(["add-alias", "carol", CAROL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    tznft(&dir).args(["remove-alias", "carol"]).assert().success();
    tznft(&dir)
        .args(["remove-alias", "carol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn test_add_alias_validates_input() {
    let dir = initialized();
    tznft(&dir)
        .args(["add-alias", "dave", "tz1notanaddress"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid address"));
    tznft(&dir)
        .args(["add-alias", "dave.eve", CAROL])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid alias name"));
}

#[test]
fn test_show_alias_hides_secrets() {
    let dir = initialized();
    tznft(&dir)
        .args(["show-alias", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tz1aSkwEot3L2kmUvcoxzjMomb9mvBNuzFK6"))
        .stdout(predicate::str::contains("edsk").not());
}

#[test]
fn test_show_balance_requires_inspector() {
    let dir = initialized();
    tznft(&dir)
        .args(["show-balance", "--nft", NFT, "--signer", "bob", "--owner", "alice", "--tokens", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("inspector contract is not deployed"))
        .stderr(predicate::str::contains("tznft bootstrap"));
}

#[test]
fn test_mint_rejects_bad_token_descriptor() {
    let dir = initialized();
    tznft(&dir)
        .args(["mint", "bob", "--tokens", "1, T1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid token descriptor '1, T1'"));
}

#[test]
fn test_mint_reports_missing_engine() {
    let dir = initialized();
    let contracts = dir.path().join("contracts");
    std::fs::create_dir_all(&contracts).unwrap();
    std::fs::write(
        contracts.join("fa2_fixed_collection_token.tz"),
        "parameter unit; storage unit; code { CDR ; NIL operation ; PAIR }",
    )
    .unwrap();

    tznft(&dir)
        .args(["mint", "bob", "--tokens", "1, T1, One"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("connecting as 'bob'"))
        .stderr(predicate::str::contains("tznft-no-such-octez-client"));
}

#[test]
fn test_transfer_unknown_signer() {
    let dir = initialized();
    tznft(&dir)
        .args(["transfer", "--nft", NFT, "--signer", "mallory", "--batch", "bob, alice, 1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'mallory' is neither a configured alias"));
}

#[test]
fn test_update_ops_needs_changes() {
    let dir = initialized();
    tznft(&dir)
        .args(["update-ops", "bob", "--nft", NFT])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to do"));
}

#[test]
fn test_bootstrap_needs_inspector_artifact() {
    let dir = initialized();
    tznft(&dir)
        .arg("bootstrap")
        .assert()
        .failure()
        .stderr(predicate::str::contains("inspector.tz"));
}

#[test]
fn test_kill_sandbox_is_noop_on_remote_network() {
    let dir = initialized();
    tznft(&dir).args(["set-network", "testnet"]).assert().success();
    tznft(&dir).arg("kill-sandbox").assert().success();
}

#[test]
fn test_missing_arguments_are_usage_errors() {
    let dir = initialized();
    tznft(&dir)
        .args(["transfer", "--nft", NFT, "--signer", "bob"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--batch"));
}
